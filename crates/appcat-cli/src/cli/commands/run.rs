//! `appcat run` (and bare `appcat`): one reconciliation pass.

use anyhow::Result;
use appcat_core::config::AppcatConfig;
use appcat_core::engine::{self, RunOptions};
use appcat_core::resolver::HttpUpstream;

use crate::cli::RunArgs;

pub fn run_reconcile(cfg: &AppcatConfig, args: &RunArgs) -> Result<()> {
    let mut opts = RunOptions::from_config(cfg);
    if let Some(path) = &args.sources {
        opts.sources_path = path.clone();
    }
    if let Some(path) = &args.catalog {
        opts.catalog_path = path.clone();
    }
    opts.prune_removed |= args.prune_removed;
    opts.dry_run = args.dry_run;

    let upstream = HttpUpstream::from_config(cfg);
    let summary = engine::run(&opts, &upstream)?;

    if summary.has_failures() {
        tracing::warn!("run finished with failures: {}", summary);
    } else {
        tracing::info!("run finished: {}", summary);
    }
    Ok(())
}
