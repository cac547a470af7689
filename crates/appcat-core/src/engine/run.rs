//! A full run: load sources and the previous catalog, reconcile, persist.

use chrono::Utc;
use std::path::PathBuf;

use super::outcome::RunSummary;
use super::reconcile::{reconcile, ReconcileOptions};
use crate::catalog::{read_catalog, save_catalog};
use crate::config::AppcatConfig;
use crate::error::ConfigLoadError;
use crate::resolver::Upstream;
use crate::source::load_sources;

/// Files and switches for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub sources_path: PathBuf,
    pub catalog_path: PathBuf,
    pub prune_removed: bool,
    /// Reconcile and report, but never write the catalog.
    pub dry_run: bool,
}

impl RunOptions {
    pub fn from_config(cfg: &AppcatConfig) -> Self {
        Self {
            sources_path: cfg.sources_path.clone(),
            catalog_path: cfg.catalog_path.clone(),
            prune_removed: cfg.prune_removed,
            dry_run: false,
        }
    }
}

/// Run one reconciliation pass.
///
/// Only an unloadable source list is an error. Per-application failures are
/// logged and reflected in the summary; a failed catalog write is logged and
/// leaves the previous file in place.
pub fn run(opts: &RunOptions, upstream: &dyn Upstream) -> Result<RunSummary, ConfigLoadError> {
    let sources = load_sources(&opts.sources_path)?;
    tracing::info!(
        "loaded {} application(s) from {}",
        sources.len(),
        opts.sources_path.display()
    );

    let prior = read_catalog(&opts.catalog_path);
    let old = &prior.catalog;
    let rec = reconcile(
        &sources,
        old,
        upstream,
        Utc::now(),
        ReconcileOptions {
            prune_removed: opts.prune_removed,
        },
    );

    let mut summary = rec.summary();
    if !rec.needs_write(old, prior.state) {
        tracing::info!("no changes needed; {}", summary);
        return Ok(summary);
    }

    if opts.dry_run {
        tracing::info!(
            "dry run: catalog {} not written ({} change(s)); {}",
            opts.catalog_path.display(),
            rec.changes,
            summary
        );
        return Ok(summary);
    }

    match save_catalog(&opts.catalog_path, &rec.catalog) {
        Ok(()) => {
            summary.written = true;
            tracing::info!(
                "catalog saved to {} with {} change(s); {}",
                opts.catalog_path.display(),
                rec.changes,
                summary
            );
        }
        Err(e) => {
            tracing::error!(
                "could not save catalog {}: {:#}",
                opts.catalog_path.display(),
                e
            );
        }
    }
    Ok(summary)
}
