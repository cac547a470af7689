//! One reconciliation pass over the source list.
//!
//! Per application: resolve, skip when the version is unchanged, otherwise
//! download and hash, then either keep the stored entry (static links whose
//! content did not change) or build a fresh one. Any failure keeps the stored
//! entry if there is one and leaves the application out otherwise.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use super::outcome::{AppReport, Outcome, Phase, RunSummary};
use crate::catalog::{Catalog, CatalogEntry, PriorState};
use crate::resolver::Upstream;
use crate::source::SourceApp;
use crate::strategy::Strategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Drop entries whose ID is no longer in the source list.
    pub prune_removed: bool,
}

/// New catalog plus what happened to each application.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub catalog: Catalog,
    pub reports: Vec<AppReport>,
    /// Fresh entries plus pruned entries.
    pub changes: usize,
    pub retained: usize,
    pub pruned: usize,
}

impl Reconciliation {
    /// Write when something changed, or to create the first catalog. A damaged
    /// previous file is only replaced once there is a real change.
    pub fn needs_write(&self, old: &Catalog, prior: PriorState) -> bool {
        match prior {
            PriorState::Damaged => self.changes > 0,
            PriorState::Missing | PriorState::Intact => self.changes > 0 || old.is_empty(),
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_reports(&self.reports, self.retained, self.pruned)
    }
}

/// Reconcile `sources` (in order) against `old`. `old` is not modified.
pub fn reconcile(
    sources: &[SourceApp],
    old: &Catalog,
    upstream: &dyn Upstream,
    now: DateTime<Utc>,
    opts: ReconcileOptions,
) -> Reconciliation {
    let mut catalog = Catalog::new(now);
    let mut reports = Vec::with_capacity(sources.len());
    let mut seen: HashSet<&str> = HashSet::new();

    for src in sources {
        if !seen.insert(src.id.as_str()) {
            tracing::warn!(id = %src.id, "duplicate id in source list, ignoring later entry");
            reports.push(AppReport {
                id: src.id.clone(),
                outcome: Outcome::Duplicate,
            });
            continue;
        }

        tracing::info!(id = %src.id, strategy = %src.strategy, "checking {}", src.name);
        let (entry, outcome) = reconcile_app(src, old.get(&src.id), upstream);
        log_outcome(src, entry.as_ref(), outcome);

        if let Some(entry) = entry {
            catalog.insert(entry);
        }
        reports.push(AppReport {
            id: src.id.clone(),
            outcome,
        });
    }

    let mut retained = 0;
    let mut pruned = 0;
    for (id, entry) in &old.apps {
        if seen.contains(id.as_str()) {
            continue;
        }
        if opts.prune_removed {
            tracing::info!(id = %id, "no longer in source list, removing");
            pruned += 1;
        } else {
            tracing::debug!(id = %id, "no longer in source list, keeping stored entry");
            catalog.insert(entry.clone());
            retained += 1;
        }
    }

    let changes = reports.iter().filter(|r| r.outcome.is_change()).count() + pruned;
    Reconciliation {
        catalog,
        reports,
        changes,
        retained,
        pruned,
    }
}

/// Run the state machine for one application.
fn reconcile_app(
    src: &SourceApp,
    prior: Option<&CatalogEntry>,
    upstream: &dyn Upstream,
) -> (Option<CatalogEntry>, Outcome) {
    let resolved = Strategy::from_source(src).and_then(|strategy| {
        let resolved = upstream.resolve(&strategy)?;
        Ok((strategy, resolved))
    });
    let (strategy, resolved) = match resolved {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(id = %src.id, phase = %Phase::Resolve, "{}", e);
            return carry_forward(prior, Phase::Resolve);
        }
    };

    let force_check = strategy.force_check();
    if let Some(prior) = prior {
        if !force_check && prior.version == resolved.version {
            return (Some(prior.clone()), Outcome::VersionUnchanged);
        }
    }

    tracing::info!(
        id = %src.id,
        "new version or forced check ({} -> {}), downloading {}",
        prior.map(|p| p.version.as_str()).unwrap_or("none"),
        resolved.version,
        resolved.download_url
    );
    let fingerprint = match upstream.fetch(&resolved.download_url) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(id = %src.id, phase = %Phase::Fetch, "{}", e);
            return carry_forward(prior, Phase::Fetch);
        }
    };

    if let Some(prior) = prior.filter(|_| force_check) {
        if prior.checksum == fingerprint.checksum {
            return (Some(prior.clone()), Outcome::ChecksumUnchanged);
        }
    }

    let size = match resolved.declared_size {
        0 => fingerprint.size,
        declared => declared,
    };
    let entry = CatalogEntry::new(
        src,
        resolved.version,
        resolved.download_url,
        fingerprint.checksum,
        size,
    );
    (Some(entry), Outcome::Updated)
}

/// Keep the previous entry if there is one; otherwise the application is absent.
fn carry_forward(prior: Option<&CatalogEntry>, phase: Phase) -> (Option<CatalogEntry>, Outcome) {
    match prior {
        Some(p) => (Some(p.clone()), Outcome::CarriedForward(phase)),
        None => (None, Outcome::Absent(phase)),
    }
}

fn log_outcome(src: &SourceApp, entry: Option<&CatalogEntry>, outcome: Outcome) {
    let version = entry.map(|e| e.version.as_str()).unwrap_or("-");
    match outcome {
        Outcome::Updated => tracing::info!(
            id = %src.id,
            "updated to version {} (size: {} bytes)",
            version,
            entry.map(|e| e.size).unwrap_or(0)
        ),
        Outcome::VersionUnchanged => {
            tracing::info!(id = %src.id, "version unchanged ({}), keeping cached entry", version)
        }
        Outcome::ChecksumUnchanged => {
            tracing::info!(id = %src.id, "static file checksum unchanged, keeping {}", version)
        }
        Outcome::CarriedForward(phase) => {
            tracing::warn!(id = %src.id, %phase, "keeping previous version {}", version)
        }
        Outcome::Absent(phase) => {
            tracing::warn!(id = %src.id, %phase, "no previous entry, leaving out of catalog")
        }
        Outcome::Duplicate => {}
    }
}
