// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and hotspot placement.
//!
//! The canvas shows the rendered editor image at its display size and
//! reports clicks in display-canvas coordinates. While a polygon is being
//! placed, a dashed preview line follows the pointer.

use crate::models::hotspot::Point;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    AddPoint(Point),
}

/// What the canvas needs to know about the drawing session.
pub struct CanvasState<'a> {
    pub texture: Option<&'a egui::TextureHandle>,
    pub display_size: Option<(u32, u32)>,
    pub drawing: bool,
    pub last_point: Option<Point>,
    pub draft_color: [u8; 3],
}

/// Display the canvas area and handle mouse interactions.
pub fn show(ui: &mut egui::Ui, state: &CanvasState<'_>) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let (Some(texture), Some((width, height))) = (state.texture, state.display_size) else {
        show_welcome(ui);
        return action;
    };

    egui::ScrollArea::both().show(ui, |ui| {
        let (image_rect, response) = ui.allocate_exact_size(
            egui::vec2(width as f32, height as f32),
            if state.drawing {
                egui::Sense::click()
            } else {
                egui::Sense::hover()
            },
        );

        let painter = ui.painter_at(image_rect);
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        if !state.drawing {
            return;
        }

        let response = response.on_hover_cursor(egui::CursorIcon::Crosshair);
        let to_canvas = |pos: egui::Pos2| {
            Point::new((pos.x - image_rect.min.x) as f64, (pos.y - image_rect.min.y) as f64)
        };

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if image_rect.contains(pos) {
                    action = CanvasAction::AddPoint(to_canvas(pos));
                }
            }
        }

        // Rubber-band line from the last placed point to the pointer
        if let (Some(last), Some(hover)) = (state.last_point, response.hover_pos()) {
            let [r, g, b] = state.draft_color;
            let from = image_rect.min + egui::vec2(last.x as f32, last.y as f32);
            painter.extend(egui::Shape::dashed_line(
                &[from, hover],
                egui::Stroke::new(2.0, egui::Color32::from_rgb(r, g, b)),
                5.0,
                5.0,
            ));
        }
    });

    action
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Hotspotter")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Interactive image hotspots")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open an image, then draw polygons over it")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open Image...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}
