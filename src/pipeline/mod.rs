//! Pipeline entry points for monitor runs.
//!
//! - `diff_snapshots`: pure change detection between two snapshots
//! - `run_monitor`: one full acquire, diff, notify, persist cycle

pub mod diff;
pub mod run;

pub use diff::{DiffTally, diff_snapshots};
pub use run::{RunSummary, run_monitor};
