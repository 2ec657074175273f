use std::io;
use std::process::Output;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    Failed(String),
}

impl InstallOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed)
    }
}

pub(crate) fn classify_install_result(
    result: io::Result<Output>,
    program: &str,
    package: &str,
) -> InstallOutcome {
    match result {
        Ok(output) if output.status.success() => InstallOutcome::Installed,
        Ok(output) => {
            let diagnostic = summarize_diagnostic(&String::from_utf8_lossy(&output.stderr));
            if diagnostic.is_empty() {
                InstallOutcome::Failed(format!(
                    "{program} install {package} exited with {}",
                    output.status
                ))
            } else {
                InstallOutcome::Failed(diagnostic)
            }
        }
        Err(err) => InstallOutcome::Failed(format!("failed launching {program} install: {err}")),
    }
}

/// Collapses tool diagnostics to one line: trimmed, non-empty lines joined
/// with `"; "`.
pub fn summarize_diagnostic(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}
