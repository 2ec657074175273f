use std::path::{Path, PathBuf};

pub const DEFAULT_APPLICATIONS_DIR: &str = "/Applications";
pub const HISTORY_FILE_NAME: &str = ".brew_migrator_history";

pub fn history_path_in(home: &Path) -> PathBuf {
    home.join(HISTORY_FILE_NAME)
}
