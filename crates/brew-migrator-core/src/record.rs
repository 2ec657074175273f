use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationStatus {
    Migrated,
    Failed,
    Skipped,
}

impl MigrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Migrated => "migrated",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "migrated" => Ok(Self::Migrated),
            "failed" => Ok(Self::Failed),
            "skipped" => Ok(Self::Skipped),
            _ => Err(anyhow!("invalid migration status: {value}")),
        }
    }
}

/// Reason codes stored as the detail of a skipped record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoCandidateFound,
    UserSkipped,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoCandidateFound => "no_candidate_found",
            Self::UserSkipped => "user_skipped",
        }
    }
}

/// Outcome of one application's migration attempt.
///
/// `detail` is the installed package for `Migrated`, the diagnostic for
/// `Failed`, and a [`SkipReason`] code for `Skipped`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub status: MigrationStatus,
    pub detail: String,
}

impl MigrationRecord {
    pub fn migrated(package: impl Into<String>) -> Self {
        Self {
            status: MigrationStatus::Migrated,
            detail: package.into(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: MigrationStatus::Failed,
            detail: error.into(),
        }
    }

    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            status: MigrationStatus::Skipped,
            detail: reason.as_str().to_string(),
        }
    }
}
