//! Source descriptors: the list of tracked applications read at the start of a run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::ConfigLoadError;

/// One tracked application as declared in the source list.
///
/// `strategy` stays a plain string here; it is turned into a
/// [`Strategy`](crate::strategy::Strategy) per application so an unknown name
/// only fails that application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceApp {
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
    pub strategy: String,
    #[serde(default)]
    pub config: HashMap<String, String>,
}

/// Read the source list (a JSON array of descriptors). Any failure is fatal for the run.
pub fn load_sources(path: &Path) -> Result<Vec<SourceApp>, ConfigLoadError> {
    let bytes = std::fs::read(path).map_err(|source| ConfigLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_sources_reads_descriptors_in_order() {
        let json = r#"[
            {
                "id": "obsidian",
                "name": "Obsidian",
                "description": "Notes",
                "icon_url": "https://example.com/obsidian.png",
                "package_name": "md.obsidian",
                "install_type": "appimage",
                "strategy": "github_release",
                "config": { "repo": "obsidianmd/obsidian-releases", "asset_filter": "appimage" }
            },
            {
                "id": "chrome",
                "name": "Chrome",
                "strategy": "direct_static",
                "config": { "url": "https://dl.example.com/chrome.deb" }
            }
        ]"#;
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f.flush().unwrap();

        let sources = load_sources(f.path()).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].id, "obsidian");
        assert_eq!(sources[0].config.get("asset_filter").unwrap(), "appimage");
        assert_eq!(sources[1].id, "chrome");
        assert_eq!(sources[1].description, "");
        assert_eq!(sources[1].strategy, "direct_static");
    }

    #[test]
    fn load_sources_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_sources(&dir.path().join("apps.source.json")).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Read { .. }));
    }

    #[test]
    fn load_sources_invalid_json_is_parse_error() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"{ not json").unwrap();
        f.flush().unwrap();
        let err = load_sources(f.path()).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }
}
