use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub const APP_BUNDLE_SUFFIX: &str = ".app";

/// Names of the application bundles directly under `dir`, suffix stripped
/// and sorted.
pub fn list_applications(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to read applications directory: {}", dir.display()))?
    {
        let entry = entry.with_context(|| {
            format!("failed to read applications directory: {}", dir.display())
        })?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let Some(name) = file_name.strip_suffix(APP_BUNDLE_SUFFIX) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        names.push(name.to_string());
    }

    names.sort();
    Ok(names)
}
