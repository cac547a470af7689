//! CLI command handlers. Each command is in its own file.

mod checksum;
mod run;

pub use checksum::run_checksum;
pub use run::run_reconcile;
