use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub fn remove_file_if_exists(path: &Path) -> io::Result<bool> {
    if path.exists() {
        fs::remove_file(path)?;
        return Ok(true);
    }
    Ok(false)
}

/// Sibling path used to stage a full rewrite of `path` before renaming it
/// into place.
pub fn staging_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "history".to_string());
    path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()))
}
