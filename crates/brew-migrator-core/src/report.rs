use serde::Serialize;

use crate::{History, MigrationStatus, RunSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub app: String,
    pub detail: String,
}

/// State deltas of a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub newly_migrated: Vec<ReportEntry>,
    pub failed: Vec<ReportEntry>,
    pub newly_skipped: Vec<ReportEntry>,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.newly_migrated.is_empty() && self.failed.is_empty() && self.newly_skipped.is_empty()
    }
}

/// Compares the final history against the snapshot taken at run start.
///
/// Failures are reported on every run, even when the snapshot already had
/// the application as failed.
pub fn build_report(history: &History, snapshot: &RunSnapshot) -> MigrationReport {
    let mut report = MigrationReport::default();

    for (app, record) in history.iter() {
        let previous = snapshot.status(app);
        let entry = || ReportEntry {
            app: app.to_string(),
            detail: record.detail.clone(),
        };

        if record.status == MigrationStatus::Migrated && previous != Some(MigrationStatus::Migrated)
        {
            report.newly_migrated.push(entry());
        }
        if record.status == MigrationStatus::Failed {
            report.failed.push(entry());
        }
        if record.status == MigrationStatus::Skipped && previous != Some(MigrationStatus::Skipped) {
            report.newly_skipped.push(entry());
        }
    }

    report
}
