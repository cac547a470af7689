//! The catalog: last known good artifact per application.
//!
//! A run reads the previous catalog once as a read-only reference and builds
//! a fresh one; the old value is never mutated.

mod persist;

pub use persist::{
    load_catalog, read_catalog, save_catalog, temp_path, PriorCatalog, PriorState, TEMP_SUFFIX,
};

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::source::SourceApp;

/// Persisted record of one application's artifact.
///
/// Metadata fields mirror the source descriptor; the remaining fields are the
/// verified artifact identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub package_name: String,
    #[serde(default)]
    pub install_type: String,

    #[serde(rename = "latest_version")]
    pub version: String,
    pub download_url: String,
    /// Lowercase hex SHA-256 of the artifact.
    pub checksum: String,
    /// Size in bytes. Older catalogs stored -1 for an unknown length; that
    /// loads as 0.
    #[serde(deserialize_with = "size_or_unknown")]
    pub size: u64,
}

fn size_or_unknown<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    struct SizeVisitor;

    impl<'de> Visitor<'de> for SizeVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a byte count")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            Ok(u64::try_from(v).unwrap_or(0))
        }
    }

    d.deserialize_u64(SizeVisitor)
}

impl CatalogEntry {
    /// Build an entry with metadata copied from the current descriptor.
    pub fn new(
        src: &SourceApp,
        version: String,
        download_url: String,
        checksum: String,
        size: u64,
    ) -> Self {
        Self {
            id: src.id.clone(),
            name: src.name.clone(),
            description: src.description.clone(),
            icon_url: src.icon_url.clone(),
            package_name: src.package_name.clone(),
            install_type: src.install_type.clone(),
            version,
            download_url,
            checksum,
            size,
        }
    }
}

/// Application ID to entry, plus when the catalog was last written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub apps: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    /// Empty catalog stamped with `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_updated: Some(now),
            apps: BTreeMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.apps.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.apps.contains_key(id)
    }

    pub fn insert(&mut self, entry: CatalogEntry) {
        self.apps.insert(entry.id.clone(), entry);
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}
