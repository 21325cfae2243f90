// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persisted project snapshot.
//!
//! The whole editor state that survives a restart: the hotspot list, the
//! uploaded image as a data URI, and the display canvas size the hotspot
//! points were recorded against.

use super::hotspot::Hotspot;
use serde::{Deserialize, Serialize};

/// Complete project data for serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_height: Option<u32>,
}

impl ProjectSnapshot {
    /// Display canvas size, when both dimensions were recorded.
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        self.canvas_width.zip(self.canvas_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_snapshot_without_canvas_size() {
        let json = r#"{"hotspots":[],"imageData":null}"#;
        let snapshot: ProjectSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot, ProjectSnapshot::default());
        assert_eq!(snapshot.canvas_size(), None);
    }

    #[test]
    fn test_snapshot_uses_camel_case_keys() {
        let snapshot = ProjectSnapshot {
            hotspots: vec![],
            image_data: Some("data:image/png;base64,AAAA".to_string()),
            canvas_width: Some(400),
            canvas_height: Some(300),
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"imageData\""));
        assert!(json.contains("\"canvasWidth\":400"));
    }
}
