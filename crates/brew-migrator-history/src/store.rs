use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brew_migrator_core::History;

use crate::codec::{format_history, parse_history};
use crate::fs_utils::{remove_file_if_exists, staging_path_for};

/// Plain-text record of every application's migration outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the history file. A missing file is an empty history.
    pub fn load(&self) -> Result<History> {
        if !self.path.exists() {
            return Ok(History::new());
        }

        let raw = fs::read(&self.path)
            .with_context(|| format!("failed to read history file: {}", self.path.display()))?;
        Ok(parse_history(&raw))
    }

    /// Rewrites the whole file. The previous file is only replaced once the
    /// new content has been written in full.
    pub fn save(&self, history: &History) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create history dir: {}", parent.display())
                })?;
            }
        }

        let staging = staging_path_for(&self.path);
        let result = fs::write(&staging, format_history(history).as_bytes())
            .with_context(|| format!("failed to write history file: {}", staging.display()))
            .and_then(|()| {
                fs::rename(&staging, &self.path).with_context(|| {
                    format!("failed to replace history file: {}", self.path.display())
                })
            });
        if result.is_err() {
            let _ = fs::remove_file(&staging);
        }
        result
    }

    /// Deletes the history file. Returns whether a file was removed.
    pub fn reset(&self) -> Result<bool> {
        remove_file_if_exists(&self.path)
            .with_context(|| format!("failed to remove history file: {}", self.path.display()))
    }
}
