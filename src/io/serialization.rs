// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project snapshot persistence.
//!
//! The snapshot is one JSON document at a fixed path. It is read once at
//! startup and rewritten after every mutating operation.

use crate::models::project::ProjectSnapshot;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File name of the snapshot inside the data directory.
pub const SNAPSHOT_FILE: &str = "hotspots.json";

/// Default snapshot location under the platform data directory.
pub fn default_snapshot_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hotspotter")
        .join(SNAPSHOT_FILE)
}

/// Key-value style store holding a single project snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. A missing file is not an error.
    pub fn load(&self) -> Result<Option<ProjectSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        import_json(&self.path).map(Some)
    }

    pub fn save(&self, snapshot: &ProjectSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        export_json(snapshot, &self.path)?;
        log::debug!(
            "Wrote snapshot with {} hotspots to {}",
            snapshot.hotspots.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Export a snapshot to JSON.
pub fn export_json(data: &ProjectSnapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string(data)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Import a snapshot from JSON.
pub fn import_json(path: &Path) -> Result<ProjectSnapshot> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let data = serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hotspot::{Hotspot, Point};

    #[test]
    fn test_missing_snapshot_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("nested").join(SNAPSHOT_FILE));
        let snapshot = ProjectSnapshot {
            hotspots: vec![Hotspot {
                id: 3,
                name: "Door".to_string(),
                description: String::new(),
                color: "#ff0000".to_string(),
                points: vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0), Point::new(5.0, 6.0)],
            }],
            image_data: None,
            canvas_width: Some(400),
            canvas_height: Some(300),
        };

        store.save(&snapshot).unwrap();

        assert_eq!(store.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);
        std::fs::write(&path, "{not json").unwrap();
        assert!(SnapshotStore::new(path).load().is_err());
    }
}
