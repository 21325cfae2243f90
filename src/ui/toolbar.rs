// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the drawing toggle and export commands.

/// Toolbar button pressed this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    OpenImage,
    ToggleDrawing,
    ClearHotspots,
    ClearAll,
    Download,
    Export,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, has_image: bool, drawing: bool, has_hotspots: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("🖼 Open Image").clicked() {
            action = ToolbarAction::OpenImage;
        }

        ui.separator();

        let toggle_text = if drawing { "⏹ Stop Drawing" } else { "▱ Start Drawing" };
        if ui
            .add_enabled(has_image, egui::SelectableLabel::new(drawing, toggle_text))
            .clicked()
        {
            action = ToolbarAction::ToggleDrawing;
        }

        ui.separator();

        let exportable = has_image && has_hotspots;
        if ui.add_enabled(exportable, egui::Button::new("⬇ Download Image")).clicked() {
            action = ToolbarAction::Download;
        }
        if ui.add_enabled(exportable, egui::Button::new("</> Export Embed")).clicked() {
            action = ToolbarAction::Export;
        }

        ui.separator();

        if ui.add_enabled(has_hotspots, egui::Button::new("Clear Hotspots")).clicked() {
            action = ToolbarAction::ClearHotspots;
        }
        if ui.add_enabled(has_image, egui::Button::new("Clear All")).clicked() {
            action = ToolbarAction::ClearAll;
        }

        ui.separator();

        let status = if drawing {
            "Drawing: click to add points, click the first point to close"
        } else {
            "Not drawing"
        };
        ui.label(egui::RichText::new(status).italics().weak());
    });

    action
}
