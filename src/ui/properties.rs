// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hotspot properties panel.
//!
//! This module provides the side panel listing every hotspot with its
//! edit and delete controls, and the form that names a finished polygon.

use crate::models::hotspot::{Hotspot, HotspotFields};
use crate::util::color;

/// Result of panel interaction.
pub enum PropertiesAction {
    None,
    EditHotspot(u64),
    DeleteHotspot(u64),
    Submit,
    Cancel,
}

/// Contents of the hotspot form.
pub struct HotspotForm {
    pub name: String,
    pub description: String,
    pub color: [u8; 3],
}

impl Default for HotspotForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            color: color::parse_hex(color::DEFAULT_COLOR).unwrap_or([255, 0, 0]),
        }
    }
}

impl HotspotForm {
    /// Prefill the form from an existing hotspot.
    pub fn from_hotspot(hotspot: &Hotspot) -> Self {
        Self {
            name: hotspot.name.clone(),
            description: hotspot.description.clone(),
            color: color::parse_hex(&hotspot.color).unwrap_or_default(),
        }
    }

    pub fn color_hex(&self) -> String {
        color::to_hex(self.color)
    }

    pub fn fields(&self) -> HotspotFields {
        HotspotFields::new(self.name.trim(), self.description.trim(), self.color_hex())
    }
}

/// Display the panel. The form is shown only while `form_open` is set.
pub fn show(
    ui: &mut egui::Ui,
    hotspots: &[Hotspot],
    editing_id: Option<u64>,
    form: &mut HotspotForm,
    form_open: bool,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    if form_open {
        ui.heading(if editing_id.is_some() { "Edit Hotspot" } else { "New Hotspot" });
        egui::Grid::new("hotspot_form").num_columns(2).show(ui, |ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut form.name);
            ui.end_row();

            ui.label("Description");
            ui.text_edit_multiline(&mut form.description);
            ui.end_row();

            ui.label("Color");
            ui.color_edit_button_srgb(&mut form.color);
            ui.end_row();
        });
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                action = PropertiesAction::Submit;
            }
            if ui.button("Cancel").clicked() {
                action = PropertiesAction::Cancel;
            }
        });
        ui.separator();
    }

    ui.heading("Hotspots");
    ui.separator();

    if hotspots.is_empty() {
        ui.label(egui::RichText::new("No hotspots yet. Start drawing to create one!").weak());
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for hotspot in hotspots {
            let swatch = color::parse_hex(&hotspot.color)
                .map(|[r, g, b]| egui::Color32::from_rgb(r, g, b))
                .unwrap_or(egui::Color32::GRAY);

            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("■").color(swatch));
                    let mut title = egui::RichText::new(&hotspot.name).strong();
                    if editing_id == Some(hotspot.id) {
                        title = title.underline();
                    }
                    ui.label(title);
                });
                if let Some(description) = hotspot.description() {
                    ui.label(description);
                }
                ui.label(
                    egui::RichText::new(format!("{} points", hotspot.vertex_count()))
                        .small()
                        .weak(),
                );
                ui.horizontal(|ui| {
                    if ui.button("✏ Edit").clicked() {
                        action = PropertiesAction::EditHotspot(hotspot.id);
                    }
                    if ui.button("🗑 Delete").clicked() {
                        action = PropertiesAction::DeleteHotspot(hotspot.id);
                    }
                });
            });
        }
    });

    action
}
