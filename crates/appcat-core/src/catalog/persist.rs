//! Catalog file load/save.
//!
//! Two on-disk shapes are accepted: the wrapped `{ "last_updated", "apps" }`
//! object, and an older bare `{ id: entry }` mapping. Entries are decoded one
//! by one so a single bad entry does not hide the rest. Saving always writes
//! the wrapped shape via a `.part` file renamed over the target.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{Catalog, CatalogEntry};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// What was found at the catalog path before the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorState {
    /// No file yet.
    Missing,
    /// Every entry decoded.
    Intact,
    /// The file exists but could not be read or decoded, in whole or in part.
    Damaged,
}

/// The previous catalog together with how it was loaded.
#[derive(Debug, Clone)]
pub struct PriorCatalog {
    pub catalog: Catalog,
    pub state: PriorState,
}

impl PriorCatalog {
    fn missing() -> Self {
        Self {
            catalog: Catalog::default(),
            state: PriorState::Missing,
        }
    }

    fn damaged(catalog: Catalog) -> Self {
        Self {
            catalog,
            state: PriorState::Damaged,
        }
    }
}

/// Load the previous catalog, ignoring how it was found.
pub fn load_catalog(path: &Path) -> Catalog {
    read_catalog(path).catalog
}

/// Load the previous catalog. Undecodable entries are skipped and mark the
/// result as damaged; an unreadable or unparseable file is damaged and empty.
pub fn read_catalog(path: &Path) -> PriorCatalog {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("no catalog at {}, starting empty", path.display());
            return PriorCatalog::missing();
        }
        Err(e) => {
            tracing::warn!("could not read catalog {}: {}", path.display(), e);
            return PriorCatalog::damaged(Catalog::default());
        }
    };
    match parse_catalog(&bytes) {
        Some((catalog, 0)) => PriorCatalog {
            catalog,
            state: PriorState::Intact,
        },
        Some((catalog, skipped)) => {
            tracing::warn!(
                "catalog {}: skipped {} undecodable entr{}",
                path.display(),
                skipped,
                if skipped == 1 { "y" } else { "ies" }
            );
            PriorCatalog::damaged(catalog)
        }
        None => {
            tracing::warn!(
                "catalog {} is not valid JSON in a known shape",
                path.display()
            );
            PriorCatalog::damaged(Catalog::default())
        }
    }
}

/// Decode either shape. Returns the catalog and the number of skipped entries,
/// or `None` when the top level is not a JSON object.
fn parse_catalog(bytes: &[u8]) -> Option<(Catalog, usize)> {
    let mut root: Map<String, Value> = serde_json::from_slice(bytes).ok()?;

    let (last_updated, raw_apps) = match root.remove("apps") {
        Some(Value::Object(apps)) => {
            let last_updated = root
                .remove("last_updated")
                .and_then(|v| serde_json::from_value::<DateTime<Utc>>(v).ok());
            (last_updated, apps)
        }
        Some(other) => {
            root.insert("apps".to_string(), other);
            (None, root)
        }
        None => (None, root),
    };

    let mut apps = BTreeMap::new();
    let mut skipped = 0;
    for (id, raw) in raw_apps {
        match serde_json::from_value::<CatalogEntry>(raw) {
            Ok(entry) => {
                apps.insert(id, entry);
            }
            Err(e) => {
                tracing::warn!(id = %id, "skipping catalog entry: {}", e);
                skipped += 1;
            }
        }
    }
    Some((Catalog { last_updated, apps }, skipped))
}

/// Write the catalog as pretty JSON. The previous file stays intact until the
/// new content is fully on disk.
pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(catalog).context("serialize catalog")?;

    let tmp = temp_path(path);
    if let Err(e) = write_and_rename(&tmp, path, json.as_bytes()) {
        if tmp.is_file() {
            let _ = std::fs::remove_file(&tmp);
        }
        return Err(e);
    }
    Ok(())
}

fn write_and_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    {
        let mut f =
            std::fs::File::create(tmp).with_context(|| format!("create {}", tmp.display()))?;
        f.write_all(bytes)
            .with_context(|| format!("write {}", tmp.display()))?;
        f.sync_all().context("catalog sync failed")?;
    }
    std::fs::rename(tmp, path)
        .with_context(|| format!("failed to rename {} to {}", tmp.display(), path.display()))?;
    Ok(())
}

/// Path for the temp file: appends `.part` to the catalog path.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}
