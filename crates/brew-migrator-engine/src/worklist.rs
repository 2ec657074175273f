use brew_migrator_core::{History, MigrationStatus};

/// Flags that decide which applications a run revisits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFlags {
    pub specific_app: Option<String>,
    pub retry_skipped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkReason {
    Unprocessed,
    RetryFailed,
    RetryMigrated,
    RetrySkipped,
}

impl WorkReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unprocessed => "unprocessed",
            Self::RetryFailed => "retry-failed",
            Self::RetryMigrated => "retry-migrated",
            Self::RetrySkipped => "retry-skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorklistEntry {
    pub app: String,
    pub reason: WorkReason,
}

/// Applications to process this run, in name order, each with the reason it
/// was picked. Failed records are always retried.
pub fn plan_worklist(
    app_names: &[String],
    history: &History,
    flags: &RunFlags,
) -> Vec<WorklistEntry> {
    let mut names = app_names.iter().collect::<Vec<_>>();
    names.sort();
    names.dedup();

    let mut worklist = Vec::new();
    for app in names {
        if flags
            .specific_app
            .as_deref()
            .is_some_and(|specific| specific != app)
        {
            continue;
        }

        let reason = match history.status(app) {
            None => WorkReason::Unprocessed,
            Some(MigrationStatus::Failed) => WorkReason::RetryFailed,
            Some(MigrationStatus::Migrated) if flags.retry_skipped => WorkReason::RetryMigrated,
            Some(MigrationStatus::Skipped) if flags.retry_skipped => WorkReason::RetrySkipped,
            Some(MigrationStatus::Migrated | MigrationStatus::Skipped) => continue,
        };
        worklist.push(WorklistEntry {
            app: app.clone(),
            reason,
        });
    }
    worklist
}

pub fn compute_worklist(app_names: &[String], history: &History, flags: &RunFlags) -> Vec<String> {
    plan_worklist(app_names, history, flags)
        .into_iter()
        .map(|entry| entry.app)
        .collect()
}
