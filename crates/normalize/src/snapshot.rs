//! Debug snapshots of one normalization pass, written as flat JSON files.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::error::NormalizeError;
use crate::session::NormalizeOutcome;

/// Serializes the intermediate and final collections of one pass to a
/// snapshot directory. Purely diagnostic; nothing reads these files back.
pub struct SnapshotWriter {
    dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct SnapshotManifest {
    created_at: String,
    types: usize,
    asset_roots: usize,
    models: usize,
    assets: usize,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn write(&self, outcome: &NormalizeOutcome) -> Result<(), NormalizeError> {
        fs::create_dir_all(&self.dir)?;

        self.write_file("raw_tree.json", &outcome.raw_tree)?;
        self.write_file("type_registry.json", &outcome.type_registry)?;
        self.write_file("asset_roots.json", &outcome.asset_roots)?;
        self.write_file("models.json", &outcome.models)?;
        self.write_file("assets.json", &outcome.assets)?;
        self.write_file(
            "manifest.json",
            &SnapshotManifest {
                created_at: Utc::now().to_rfc3339(),
                types: outcome.type_registry.len(),
                asset_roots: outcome.asset_roots.len(),
                models: outcome.models.len(),
                assets: outcome.assets.len(),
            },
        )?;

        info!(dir = %self.dir.display(), "snapshot written");
        Ok(())
    }

    fn write_file<T: Serialize>(&self, name: &str, data: &T) -> Result<(), NormalizeError> {
        let path = self.dir.join(name);
        fs::write(&path, serde_json::to_string_pretty(data)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::normalize;
    use serde_json::json;
    use sparkwise_core::config::NormalizeConfig;

    #[test]
    fn writes_all_snapshot_files() {
        let payloads = vec![json!({
            "tags": [
                { "name": "_types_", "tags": [{ "name": "PumpType", "tagType": "UdtType",
                    "tags": [{ "name": "Speed", "dataType": "Float4",
                               "opcItemPath": { "binding": "ns=1;s=[default]P/{id}/Speed" } }] }] },
                { "name": "Pump1", "tagType": "UdtInstance", "typeId": "PumpType",
                  "parameters": { "id": "1" } },
            ]
        })];
        let outcome = normalize(&payloads, &NormalizeConfig::default()).unwrap();

        let dir = std::env::temp_dir().join("sparkwise-snapshot-test");
        std::fs::remove_dir_all(&dir).ok();
        SnapshotWriter::new(&dir).write(&outcome).unwrap();

        for file in [
            "raw_tree.json",
            "type_registry.json",
            "asset_roots.json",
            "models.json",
            "assets.json",
            "manifest.json",
        ] {
            assert!(dir.join(file).exists(), "{file} missing");
        }

        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("manifest.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["types"], 1);
        assert_eq!(manifest["assets"], 1);
        chrono::DateTime::parse_from_rfc3339(manifest["created_at"].as_str().unwrap())
            .expect("created_at should be valid RFC 3339");

        std::fs::remove_dir_all(&dir).ok();
    }
}
