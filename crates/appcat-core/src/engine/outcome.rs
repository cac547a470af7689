//! Per-application outcomes and the run summary.

use std::fmt;

/// Where an application's reconciliation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Resolve,
    Fetch,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Resolve => write!(f, "resolve"),
            Phase::Fetch => write!(f, "fetch"),
        }
    }
}

/// Terminal state of one application in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new entry was built from a fresh download.
    Updated,
    /// Resolved version equals the stored one; nothing downloaded.
    VersionUnchanged,
    /// Forced re-download produced the stored checksum; stored entry kept as is.
    ChecksumUnchanged,
    /// Failed in the given phase; the previous entry was kept.
    CarriedForward(Phase),
    /// Failed in the given phase and there was no previous entry.
    Absent(Phase),
    /// ID already seen earlier in the source list; ignored.
    Duplicate,
}

impl Outcome {
    /// Only fresh entries count as catalog changes.
    pub fn is_change(&self) -> bool {
        matches!(self, Outcome::Updated)
    }
}

/// Outcome for one application ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppReport {
    pub id: String,
    pub outcome: Outcome,
}

/// Counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub updated: usize,
    pub unchanged: usize,
    pub carried_forward: usize,
    pub absent: usize,
    pub duplicates: usize,
    /// Entries of applications no longer in the source list, kept as is.
    pub retained: usize,
    /// Entries of applications no longer in the source list, dropped.
    pub pruned: usize,
    /// Whether the catalog file was rewritten.
    pub written: bool,
}

impl RunSummary {
    pub(crate) fn from_reports(reports: &[AppReport], retained: usize, pruned: usize) -> Self {
        let mut s = RunSummary {
            retained,
            pruned,
            ..Default::default()
        };
        for r in reports {
            match r.outcome {
                Outcome::Updated => s.updated += 1,
                Outcome::VersionUnchanged | Outcome::ChecksumUnchanged => s.unchanged += 1,
                Outcome::CarriedForward(_) => s.carried_forward += 1,
                Outcome::Absent(_) => s.absent += 1,
                Outcome::Duplicate => s.duplicates += 1,
            }
        }
        s
    }

    /// Any application failed this run.
    pub fn has_failures(&self) -> bool {
        self.carried_forward + self.absent > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} updated, {} unchanged, {} kept after failure, {} missing",
            self.updated, self.unchanged, self.carried_forward, self.absent
        )?;
        if self.duplicates > 0 {
            write!(f, ", {} duplicate id(s) ignored", self.duplicates)?;
        }
        if self.pruned > 0 {
            write!(f, ", {} removed", self.pruned)?;
        }
        Ok(())
    }
}
