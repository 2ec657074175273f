mod catalog;
mod console;
mod reconcile;
mod selection;
mod worklist;

pub use catalog::Catalog;
pub use console::{Console, PageView, StatusKind};
pub use reconcile::{AppOutcome, Reconciler, RunOptions, RunOutcome, DEFAULT_PAGE_SIZE};
pub use selection::{
    page_view, parse_choice, run_selection_loop, step, Choice, Selection, SelectionState,
};
pub use worklist::{compute_worklist, plan_worklist, RunFlags, WorkReason, WorklistEntry};
