mod commands;
mod homebrew;
mod outcome;

pub use commands::PackageKind;
pub use homebrew::{Homebrew, HomebrewVersion, DEFAULT_BREW_PROGRAM};
pub use outcome::{summarize_diagnostic, InstallOutcome};
