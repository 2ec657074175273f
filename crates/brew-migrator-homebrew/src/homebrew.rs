use std::ffi::{OsStr, OsString};
use std::process::Stdio;

use anyhow::{Context, Result};
use semver::Version;

use crate::commands::{
    build_install_command, build_list_command, build_search_command, build_version_command,
    PackageKind,
};
use crate::outcome::{classify_install_result, summarize_diagnostic, InstallOutcome};

pub const DEFAULT_BREW_PROGRAM: &str = "brew";

/// Handle on the `brew` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Homebrew {
    program: OsString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomebrewVersion {
    pub banner: String,
    pub version: Option<Version>,
}

impl Default for Homebrew {
    fn default() -> Self {
        Self::new(DEFAULT_BREW_PROGRAM)
    }
}

impl Homebrew {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    fn display_program(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Fails when `brew --version` cannot be run or exits non-zero.
    pub fn ensure_available(&self) -> Result<HomebrewVersion> {
        let program = self.display_program();
        let output = build_version_command(&self.program)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("homebrew-unavailable: failed launching {program}"))?;
        if !output.status.success() {
            anyhow::bail!(
                "homebrew-unavailable: {program} --version failed: {}",
                summarize_diagnostic(&String::from_utf8_lossy(&output.stderr))
            );
        }

        Ok(parse_version_output(&String::from_utf8_lossy(&output.stdout)))
    }

    pub fn search(&self, query: &str, kind: PackageKind) -> Result<Vec<String>> {
        let program = self.display_program();
        let output = build_search_command(&self.program, query, kind)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed launching {program} search for '{query}'"))?;

        parse_search_output(
            output.status.success(),
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        )
        .with_context(|| format!("{program} search for '{query}' failed"))
    }

    /// Any failure to run the check counts as "not installed".
    pub fn is_installed(&self, package: &str, kind: PackageKind) -> bool {
        build_list_command(&self.program, package, kind)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    pub fn install(&self, package: &str, kind: PackageKind) -> InstallOutcome {
        let result = build_install_command(&self.program, package, kind)
            .stdin(Stdio::null())
            .output();
        classify_install_result(result, &self.display_program(), package)
    }
}

/// Candidate names from `brew search` stdout, in catalog order.
///
/// A non-zero exit with nothing on stdout is "no matches" when Homebrew says
/// so, and an error otherwise.
pub(crate) fn parse_search_output(
    success: bool,
    stdout: &str,
    stderr: &str,
) -> Result<Vec<String>> {
    let candidates = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("==>"))
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    if success || !candidates.is_empty() {
        return Ok(candidates);
    }

    let diagnostic = summarize_diagnostic(stderr);
    if diagnostic.is_empty() || is_no_match_diagnostic(&diagnostic) {
        return Ok(Vec::new());
    }
    anyhow::bail!("{diagnostic}")
}

fn is_no_match_diagnostic(diagnostic: &str) -> bool {
    diagnostic.starts_with("Error: No ") && diagnostic.contains(" found")
}

pub(crate) fn parse_version_output(stdout: &str) -> HomebrewVersion {
    let banner = stdout.lines().next().unwrap_or_default().trim().to_string();
    let version = banner
        .strip_prefix("Homebrew")
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|token| Version::parse(token).ok());
    HomebrewVersion { banner, version }
}
