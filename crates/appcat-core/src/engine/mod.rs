//! Reconciliation engine: decides per application whether a new artifact
//! exists, whether it must be downloaded, and what the catalog records.
//!
//! Processing is sequential in source-list order. The previous catalog is
//! read-only; the new one is written once per key and persisted as a whole.

mod outcome;
mod reconcile;
mod run;

pub use outcome::{AppReport, Outcome, Phase, RunSummary};
pub use reconcile::{reconcile, ReconcileOptions, Reconciliation};
pub use run::{run, RunOptions};
