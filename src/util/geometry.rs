// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the polygon-closing hit test and the coordinate
//! transformations between display-canvas space and native image space.

use crate::models::hotspot::Point;

/// Distance in display pixels within which a click closes the polygon.
pub const CLOSING_THRESHOLD: f64 = 10.0;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// True when `candidate` lands near the first vertex of a polygon that
/// already has more than two points.
pub fn is_closing_click(candidate: Point, polygon: &[Point], threshold: f64) -> bool {
    match polygon.first() {
        Some(&first) if polygon.len() > 2 => distance(candidate, first) < threshold,
        _ => false,
    }
}

/// Multiply every point by the given per-axis scale factors.
pub fn scale_points(points: &[Point], scale_x: f64, scale_y: f64) -> Vec<Point> {
    points
        .iter()
        .map(|p| Point::new(p.x * scale_x, p.y * scale_y))
        .collect()
}

/// Shrink `(width, height)` to fit within `(max_width, max_height)`,
/// preserving aspect ratio. Sizes that already fit are returned unchanged.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let mut w = width as f64;
    let mut h = height as f64;

    if w > max_width as f64 {
        h = h * max_width as f64 / w;
        w = max_width as f64;
    }
    if h > max_height as f64 {
        w = w * max_height as f64 / h;
        h = max_height as f64;
    }

    ((w.floor() as u32).max(1), (h.floor() as u32).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Point> {
        vec![Point::new(10.0, 10.0), Point::new(50.0, 10.0), Point::new(50.0, 50.0)]
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_closing_click_needs_three_points() {
        let polygon = &triangle()[..2];
        assert!(!is_closing_click(Point::new(10.0, 10.0), polygon, CLOSING_THRESHOLD));
        assert!(!is_closing_click(Point::new(10.0, 10.0), &[], CLOSING_THRESHOLD));
    }

    #[test]
    fn test_closing_click_threshold_is_exclusive() {
        let polygon = triangle();
        assert!(is_closing_click(Point::new(10.0, 10.0), &polygon, CLOSING_THRESHOLD));
        assert!(is_closing_click(Point::new(19.9, 10.0), &polygon, CLOSING_THRESHOLD));
        assert!(!is_closing_click(Point::new(20.0, 10.0), &polygon, CLOSING_THRESHOLD));
        assert!(!is_closing_click(Point::new(16.0, 18.0), &polygon, CLOSING_THRESHOLD));
    }

    #[test]
    fn test_scale_points_inverse_roundtrip() {
        let points = vec![Point::new(12.5, 7.25), Point::new(333.0, 0.5)];
        let (sx, sy) = (1920.0 / 1200.0, 1080.0 / 675.0);

        let native = scale_points(&points, sx, sy);
        let back = scale_points(&native, 1.0 / sx, 1.0 / sy);

        for (a, b) in points.iter().zip(&back) {
            assert!((a.x - b.x).abs() < 0.0001);
            assert!((a.y - b.y).abs() < 0.0001);
        }
    }

    #[test]
    fn test_scale_points_preserves_order() {
        let scaled = scale_points(&triangle(), 2.0, 3.0);
        assert_eq!(
            scaled,
            vec![Point::new(20.0, 30.0), Point::new(100.0, 30.0), Point::new(100.0, 150.0)]
        );
    }

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(800, 600, 400, 1000), (400, 300));
        assert_eq!(fit_within(600, 1200, 1200, 800), (400, 800));
        assert_eq!(fit_within(640, 480, 1200, 800), (640, 480));
        assert_eq!(fit_within(4000, 1000, 1200, 200), (800, 200));
    }
}
