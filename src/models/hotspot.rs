// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hotspot data structures.
//!
//! This module defines the core data structures for representing
//! hotspot polygons and their descriptive metadata.

use serde::{Deserialize, Serialize};

/// Minimum number of vertices a stored hotspot must have.
pub const MIN_POINTS: usize = 3;

/// A 2D point in display-canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A named, colored polygon region over the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Hex RGB color, `#rrggbb`.
    pub color: String,
    pub points: Vec<Point>,
}

impl Hotspot {
    /// Description text, if the user entered one.
    pub fn description(&self) -> Option<&str> {
        let trimmed = self.description.trim();
        (!trimmed.is_empty()).then_some(self.description.as_str())
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }
}

/// The user-editable fields of a hotspot, as submitted from the form.
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotFields {
    pub name: String,
    pub description: String,
    pub color: String,
}

impl HotspotFields {
    pub fn new(name: impl Into<String>, description: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            color: color.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_description_is_absent() {
        let hotspot = Hotspot {
            id: 1,
            name: "Door".to_string(),
            description: "   ".to_string(),
            color: "#ff0000".to_string(),
            points: vec![],
        };
        assert_eq!(hotspot.description(), None);
    }

    #[test]
    fn test_missing_description_deserializes_empty() {
        let json = r##"{"id":7,"name":"Window","color":"#00ff00","points":[{"x":1.0,"y":2.0}]}"##;
        let hotspot: Hotspot = serde_json::from_str(json).unwrap();
        assert_eq!(hotspot.description, "");
        assert_eq!(hotspot.points, vec![Point::new(1.0, 2.0)]);
    }
}
