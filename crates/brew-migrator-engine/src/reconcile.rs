use brew_migrator_core::{History, MigrationRecord, MigrationStatus, SkipReason};
use brew_migrator_homebrew::{InstallOutcome, PackageKind};

use crate::catalog::Catalog;
use crate::console::{Console, StatusKind};
use crate::selection::{run_selection_loop, Selection};

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub page_size: usize,
    /// Take the top candidate without prompting.
    pub batch: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            batch: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppOutcome {
    Recorded(MigrationStatus),
    Quit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Applications that reached a recorded outcome, in processing order.
    pub processed: Vec<String>,
    pub quit: bool,
}

/// Drives search, selection and install for each worklist entry and records
/// the outcome in the run's history.
pub struct Reconciler<'a, C: ?Sized, K: ?Sized> {
    catalog: &'a mut C,
    console: &'a mut K,
    options: RunOptions,
}

impl<'a, C, K> Reconciler<'a, C, K>
where
    C: Catalog + ?Sized,
    K: Console + ?Sized,
{
    pub fn new(catalog: &'a mut C, console: &'a mut K, options: RunOptions) -> Self {
        Self {
            catalog,
            console,
            options,
        }
    }

    /// Processes `worklist` in order. A quit stops before the next entry;
    /// everything recorded up to that point stays in `history`.
    pub fn run(&mut self, worklist: &[String], history: &mut History) -> RunOutcome {
        let mut outcome = RunOutcome::default();
        for app in worklist {
            match self.process_app(app, history) {
                AppOutcome::Recorded(_) => outcome.processed.push(app.clone()),
                AppOutcome::Quit => {
                    outcome.quit = true;
                    break;
                }
            }
        }
        outcome
    }

    pub fn process_app(&mut self, app: &str, history: &mut History) -> AppOutcome {
        self.console
            .status(StatusKind::Step, &format!("scanning {app}"));

        let candidates = match self.catalog.search(app, PackageKind::Cask) {
            Ok(candidates) => candidates,
            Err(err) => {
                self.console.status(
                    StatusKind::Warn,
                    &format!("cask search failed for {app}: {err:#}"),
                );
                Vec::new()
            }
        };

        if candidates.is_empty() {
            self.console.status(
                StatusKind::Skip,
                &format!("no casks found for {app}, skipping"),
            );
            return record_outcome(
                history,
                app,
                MigrationRecord::skipped(SkipReason::NoCandidateFound),
            );
        }

        let selection = if self.options.batch {
            let top = candidates[0].clone();
            self.console.status(
                StatusKind::Info,
                &format!("batch mode selected top match {top} for {app}"),
            );
            Selection::Chosen(top)
        } else {
            run_selection_loop(app, &candidates, self.options.page_size, &mut *self.console)
        };

        match selection {
            Selection::Chosen(candidate) => self.migrate(app, candidate, history),
            Selection::Skipped => {
                self.console
                    .status(StatusKind::Skip, &format!("skipped {app}"));
                record_outcome(
                    history,
                    app,
                    MigrationRecord::skipped(SkipReason::UserSkipped),
                )
            }
            Selection::Quit => {
                self.console.status(StatusKind::Warn, "quitting");
                AppOutcome::Quit
            }
        }
    }

    fn migrate(&mut self, app: &str, candidate: String, history: &mut History) -> AppOutcome {
        if self.catalog.is_installed(&candidate, PackageKind::Cask) {
            self.console
                .status(StatusKind::Ok, &format!("{candidate} is already installed"));
            return record_outcome(history, app, MigrationRecord::migrated(candidate));
        }

        self.console
            .status(StatusKind::Step, &format!("installing {candidate}"));
        match self.catalog.install(&candidate, PackageKind::Cask) {
            InstallOutcome::Installed => {
                self.console
                    .status(StatusKind::Ok, &format!("installed {candidate} for {app}"));
                record_outcome(history, app, MigrationRecord::migrated(candidate))
            }
            InstallOutcome::Failed(detail) => {
                self.console.status(
                    StatusKind::Error,
                    &format!("installing {candidate} failed: {detail}"),
                );
                record_outcome(history, app, MigrationRecord::failed(detail))
            }
        }
    }
}

fn record_outcome(history: &mut History, app: &str, record: MigrationRecord) -> AppOutcome {
    let status = record.status;
    history.record(app, record);
    AppOutcome::Recorded(status)
}
