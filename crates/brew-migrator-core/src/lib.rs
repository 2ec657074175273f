mod history;
mod record;
mod report;

pub use history::{History, RunSnapshot};
pub use record::{MigrationRecord, MigrationStatus, SkipReason};
pub use report::{build_report, MigrationReport, ReportEntry};
