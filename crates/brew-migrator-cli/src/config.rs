use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brew_migrator_engine::DEFAULT_PAGE_SIZE;
use brew_migrator_history::{history_path_in, DEFAULT_APPLICATIONS_DIR};
use brew_migrator_homebrew::DEFAULT_BREW_PROGRAM;
use serde::{Deserialize, Serialize};

pub(crate) const CONFIG_DIR_NAME: &str = "brew-migrator";
pub(crate) const CONFIG_FILE_NAME: &str = "config.toml";
pub(crate) const HISTORY_ENV: &str = "BREW_MIGRATOR_HISTORY";
pub(crate) const APPLICATIONS_DIR_ENV: &str = "BREW_MIGRATOR_APPLICATIONS_DIR";

/// Optional on-disk configuration. Every key falls back to a built-in
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    pub history_file: Option<String>,
    pub applications_dir: Option<String>,
    pub page_size: Option<usize>,
    pub brew_program: Option<String>,
}

/// Values given on the command line; these win over everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SettingsOverrides {
    pub history_file: Option<PathBuf>,
    pub applications_dir: Option<PathBuf>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub history_file: PathBuf,
    pub applications_dir: PathBuf,
    pub page_size: usize,
    pub brew_program: String,
}

pub(crate) fn parse_config_file(content: &str) -> Result<ConfigFile> {
    toml::from_str(content).context("failed parsing brew-migrator config")
}

pub(crate) fn default_config_path<F>(lookup: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(config_home) = non_empty_var(lookup, "XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(config_home)
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }
    non_empty_var(lookup, "HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    })
}

/// Reads `explicit` if given (it must exist), else `fallback` when present.
pub(crate) fn load_config_file(
    explicit: Option<&Path>,
    fallback: Option<&Path>,
) -> Result<ConfigFile> {
    let path = match (explicit, fallback) {
        (Some(path), _) => path,
        (None, Some(path)) if path.is_file() => path,
        _ => return Ok(ConfigFile::default()),
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed reading config file: {}", path.display()))?;
    parse_config_file(&content)
        .with_context(|| format!("invalid config file: {}", path.display()))
}

pub(crate) fn resolve_settings<F>(
    file: ConfigFile,
    overrides: &SettingsOverrides,
    lookup: &F,
) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let home = non_empty_var(lookup, "HOME").map(PathBuf::from);
    let expand = |raw: String| expand_home(&raw, home.as_deref());

    let history_file = match overrides
        .history_file
        .clone()
        .or_else(|| non_empty_var(lookup, HISTORY_ENV).map(expand))
        .or_else(|| file.history_file.clone().map(expand))
    {
        Some(path) => path,
        None => history_path_in(
            home.as_deref()
                .context("HOME is not set; pass --history-file to choose a history file")?,
        ),
    };

    let applications_dir = overrides
        .applications_dir
        .clone()
        .or_else(|| non_empty_var(lookup, APPLICATIONS_DIR_ENV).map(expand))
        .or_else(|| file.applications_dir.clone().map(expand))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_APPLICATIONS_DIR));

    let page_size = overrides
        .page_size
        .or(file.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        anyhow::bail!("page size must be at least 1");
    }

    Ok(Settings {
        history_file,
        applications_dir,
        page_size,
        brew_program: file
            .brew_program
            .unwrap_or_else(|| DEFAULT_BREW_PROGRAM.to_string()),
    })
}

pub(crate) fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    match (raw.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if raw == "~" => home.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(raw)),
        _ => PathBuf::from(raw),
    }
}

fn non_empty_var<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|value| !value.trim().is_empty())
}
