mod apps;
mod codec;
mod fs_utils;
mod layout;
mod store;

pub use apps::{list_applications, APP_BUNDLE_SUFFIX};
pub use layout::{history_path_in, DEFAULT_APPLICATIONS_DIR, HISTORY_FILE_NAME};
pub use store::HistoryStore;
