use std::ffi::OsStr;
use std::process::Command;

/// Catalog namespace a package lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    Cask,
    Formula,
}

impl PackageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cask => "cask",
            Self::Formula => "formula",
        }
    }
}

pub(crate) fn build_version_command(program: &OsStr) -> Command {
    let mut command = Command::new(program);
    command.arg("--version");
    command
}

pub(crate) fn build_search_command(program: &OsStr, query: &str, kind: PackageKind) -> Command {
    let mut command = Command::new(program);
    command.arg("search");
    if kind == PackageKind::Cask {
        command.arg("--cask");
    }
    command.arg(query);
    command
}

pub(crate) fn build_list_command(program: &OsStr, package: &str, kind: PackageKind) -> Command {
    let mut command = Command::new(program);
    command
        .arg("list")
        .arg(format!("--{}", kind.as_str()))
        .arg(package);
    command
}

/// Install with overwrite semantics so an app that was copied in by hand
/// does not block the managed install.
pub(crate) fn build_install_command(program: &OsStr, package: &str, kind: PackageKind) -> Command {
    let mut command = Command::new(program);
    command.arg("install");
    match kind {
        PackageKind::Cask => {
            command.arg("--cask").arg(package).arg("--force");
        }
        PackageKind::Formula => {
            command.arg(package).arg("--overwrite");
        }
    }
    command
}
