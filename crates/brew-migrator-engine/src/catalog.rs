use anyhow::Result;
use brew_migrator_homebrew::{Homebrew, InstallOutcome, PackageKind};

/// Package catalog operations the reconciler drives.
pub trait Catalog {
    fn search(&mut self, query: &str, kind: PackageKind) -> Result<Vec<String>>;

    fn is_installed(&mut self, package: &str, kind: PackageKind) -> bool;

    fn install(&mut self, package: &str, kind: PackageKind) -> InstallOutcome;
}

impl Catalog for Homebrew {
    fn search(&mut self, query: &str, kind: PackageKind) -> Result<Vec<String>> {
        Homebrew::search(self, query, kind)
    }

    fn is_installed(&mut self, package: &str, kind: PackageKind) -> bool {
        Homebrew::is_installed(self, package, kind)
    }

    fn install(&mut self, package: &str, kind: PackageKind) -> InstallOutcome {
        Homebrew::install(self, package, kind)
    }
}
