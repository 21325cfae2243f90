// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hotspot rasterization.
//!
//! `render` produces the editor canvas: the display-size image with every
//! stored hotspot and the in-progress polygon drawn on top. `burn_in`
//! produces the native-resolution download with the hotspots scaled up.
//! Both start from a fresh copy of the image on every call.

use anyhow::{anyhow, Result};
use image::RgbaImage;
use tiny_skia::{ColorU8, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::io::media::ImageRef;
use crate::models::hotspot::{Hotspot, Point};
use crate::util::color;
use crate::util::geometry::scale_points;

/// Fill alpha for hotspot interiors (0x40, 25%).
const FILL_ALPHA: u8 = 0x40;
const STROKE_WIDTH: f32 = 2.0;
const EDITING_STROKE_WIDTH: f32 = 3.0;
const MARKER_RADIUS: f32 = 5.0;
const MARKER_OUTLINE: f32 = 2.0;

/// The polygon currently being placed.
#[derive(Debug, Clone, Copy)]
pub struct Draft<'a> {
    pub points: &'a [Point],
    pub color: &'a str,
}

struct PolygonStyle {
    rgb: [u8; 3],
    stroke_width: f32,
    closed: bool,
    fill: bool,
    markers: bool,
}

/// Redraw the display canvas.
pub fn render(
    image: &ImageRef,
    hotspots: &[Hotspot],
    draft: Option<Draft<'_>>,
    editing_id: Option<u64>,
) -> Result<RgbaImage> {
    let mut pixmap = pixmap_from_image(image.display())?;

    for hotspot in hotspots {
        let stroke_width = if editing_id == Some(hotspot.id) {
            EDITING_STROKE_WIDTH
        } else {
            STROKE_WIDTH
        };
        draw_polygon(
            &mut pixmap,
            &hotspot.points,
            &PolygonStyle {
                rgb: rgb_or_default(&hotspot.color),
                stroke_width,
                closed: true,
                fill: true,
                markers: false,
            },
        );
    }

    if let Some(draft) = draft {
        let closed = draft.points.len() > 2;
        draw_polygon(
            &mut pixmap,
            draft.points,
            &PolygonStyle {
                rgb: rgb_or_default(draft.color),
                stroke_width: STROKE_WIDTH,
                closed,
                fill: closed,
                markers: true,
            },
        );
    }

    pixmap_to_image(&pixmap)
}

/// Draw every hotspot onto the native-resolution image.
pub fn burn_in(image: &ImageRef, hotspots: &[Hotspot]) -> Result<RgbaImage> {
    let mut pixmap = pixmap_from_image(image.native())?;
    let (scale_x, scale_y) = image.scale();
    let stroke_width = STROKE_WIDTH * scale_x.max(scale_y) as f32;

    for hotspot in hotspots {
        let points = scale_points(&hotspot.points, scale_x, scale_y);
        draw_polygon(
            &mut pixmap,
            &points,
            &PolygonStyle {
                rgb: rgb_or_default(&hotspot.color),
                stroke_width,
                closed: true,
                fill: true,
                markers: false,
            },
        );
    }

    pixmap_to_image(&pixmap)
}

fn rgb_or_default(hex: &str) -> [u8; 3] {
    color::parse_hex(hex)
        .or_else(|| color::parse_hex(color::DEFAULT_COLOR))
        .unwrap_or([255, 0, 0])
}

fn draw_polygon(pixmap: &mut Pixmap, points: &[Point], style: &PolygonStyle) {
    let [r, g, b] = style.rgb;

    if points.len() >= 2 {
        let mut pb = PathBuilder::new();
        pb.move_to(points[0].x as f32, points[0].y as f32);
        for p in &points[1..] {
            pb.line_to(p.x as f32, p.y as f32);
        }
        if style.closed {
            pb.close();
        }

        if let Some(path) = pb.finish() {
            let mut paint = Paint::default();
            paint.anti_alias = true;

            if style.fill {
                paint.set_color_rgba8(r, g, b, FILL_ALPHA);
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }

            paint.set_color_rgba8(r, g, b, 255);
            let stroke = Stroke {
                width: style.stroke_width,
                ..Default::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    if style.markers {
        for p in points {
            draw_marker(pixmap, *p, style.rgb);
        }
    }
}

fn draw_marker(pixmap: &mut Pixmap, center: Point, [r, g, b]: [u8; 3]) {
    let Some(circle) = PathBuilder::from_circle(center.x as f32, center.y as f32, MARKER_RADIUS) else {
        return;
    };

    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.set_color_rgba8(r, g, b, 255);
    pixmap.fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);

    paint.set_color_rgba8(255, 255, 255, 255);
    let outline = Stroke {
        width: MARKER_OUTLINE,
        ..Default::default()
    };
    pixmap.stroke_path(&circle, &paint, &outline, Transform::identity(), None);
}

fn pixmap_from_image(image: &RgbaImage) -> Result<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())
        .ok_or_else(|| anyhow!("cannot allocate {}x{} pixmap", image.width(), image.height()))?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

fn pixmap_to_image(pixmap: &Pixmap) -> Result<RgbaImage> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| anyhow!("cannot construct output image"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn white_image(width: u32, height: u32, display: (u32, u32)) -> ImageRef {
        ImageRef::new(RgbaImage::from_pixel(width, height, WHITE), display.0, display.1).unwrap()
    }

    fn square(id: u64, color: &str) -> Hotspot {
        Hotspot {
            id,
            name: format!("square {}", id),
            description: String::new(),
            color: color.to_string(),
            points: vec![
                Point::new(10.0, 10.0),
                Point::new(50.0, 10.0),
                Point::new(50.0, 50.0),
                Point::new(10.0, 50.0),
            ],
        }
    }

    fn is_red_tint(pixel: &Rgba<u8>) -> bool {
        pixel[0] == 255 && pixel[1] < 230 && pixel[1] > 150 && pixel[1] == pixel[2]
    }

    #[test]
    fn render_matches_display_size() {
        let image = white_image(800, 600, (400, 300));
        let canvas = render(&image, &[], None, None).unwrap();
        assert_eq!(canvas.dimensions(), (400, 300));
        assert_eq!(canvas.get_pixel(200, 150), &WHITE);
    }

    #[test]
    fn render_fills_hotspot_interior_translucently() {
        let image = white_image(100, 100, (100, 100));
        let canvas = render(&image, &[square(1, "#ff0000")], None, None).unwrap();

        assert!(is_red_tint(canvas.get_pixel(30, 30)));
        assert_eq!(canvas.get_pixel(80, 80), &WHITE);
        // stroke is fully opaque
        let edge = canvas.get_pixel(30, 10);
        assert!(edge[0] == 255 && edge[1] < 20 && edge[2] < 20);
    }

    #[test]
    fn render_is_repeatable() {
        let image = white_image(100, 100, (100, 100));
        let hotspots = [square(1, "#00ff00")];
        let points = [Point::new(60.0, 60.0), Point::new(90.0, 60.0)];
        let draft = Some(Draft { points: &points, color: "#0000ff" });

        let first = render(&image, &hotspots, draft, None).unwrap();
        let second = render(&image, &hotspots, draft, None).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn render_marks_single_draft_point() {
        let image = white_image(100, 100, (100, 100));
        let points = [Point::new(70.0, 70.0)];
        let canvas = render(&image, &[], Some(Draft { points: &points, color: "#0000ff" }), None).unwrap();

        assert_eq!(canvas.get_pixel(70, 70), &Rgba([0, 0, 255, 255]));
        assert_eq!(canvas.get_pixel(90, 90), &WHITE);
    }

    #[test]
    fn render_widens_stroke_of_edited_hotspot() {
        let image = white_image(100, 100, (100, 100));
        let hotspots = [square(1, "#ff0000"), square(2, "#ff0000")];

        let plain = render(&image, &hotspots[..1], None, None).unwrap();
        let editing = render(&image, &hotspots[..1], None, Some(1)).unwrap();
        let other = render(&image, &hotspots, None, Some(2)).unwrap();

        // 1.5px above the top edge: outside a 2px stroke, inside a 3px one
        assert!(plain.get_pixel(30, 8)[1] > 240);
        assert!(editing.get_pixel(30, 8)[1] < 200);
        assert_eq!(editing.get_pixel(30, 8)[0], 255);
        assert!(other.get_pixel(30, 8)[1] < 200);
        assert_eq!(render(&image, &hotspots[..1], None, Some(2)).unwrap(), plain);
    }

    #[test]
    fn render_outlines_markers_in_white() {
        let background = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        let dark = ImageRef::new(background, 100, 100).unwrap();
        let points = [Point::new(70.0, 70.0)];
        let draft = Some(Draft { points: &points, color: "#0000ff" });

        let canvas = render(&dark, &[], draft, None).unwrap();
        let ring = canvas.get_pixel(75, 70);
        assert!(ring[0] > 200 && ring[1] > 200 && ring[2] > 200);
        assert_eq!(canvas.get_pixel(70, 70), &Rgba([0, 0, 255, 255]));
        assert_eq!(canvas.get_pixel(90, 90), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn render_open_draft_is_not_filled() {
        let image = white_image(100, 100, (100, 100));
        let points = [Point::new(10.0, 10.0), Point::new(90.0, 10.0)];
        let canvas = render(&image, &[], Some(Draft { points: &points, color: "#ff0000" }), None).unwrap();

        assert_eq!(canvas.get_pixel(50, 50), &WHITE);
    }

    #[test]
    fn burn_in_scales_to_native() {
        let image = white_image(800, 600, (400, 300));
        let output = burn_in(&image, &[square(1, "#ff0000")]).unwrap();

        assert_eq!(output.dimensions(), (800, 600));
        assert!(is_red_tint(output.get_pixel(60, 60)));
        assert!(is_red_tint(output.get_pixel(90, 90)));
        assert_eq!(output.get_pixel(150, 150), &WHITE);
    }
}
