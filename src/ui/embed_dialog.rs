// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Embed code dialog: format tabs, copy and save-to-library.

use crate::export::EmbedFormat;

pub enum EmbedAction {
    None,
    SelectFormat(EmbedFormat),
    Copy,
    SaveToLibrary,
    Close,
}

/// State of the open dialog.
pub struct EmbedDialog {
    pub format: EmbedFormat,
    pub code: String,
    pub filename: String,
    pub copied: bool,
}

impl EmbedDialog {
    pub fn new(format: EmbedFormat, code: String) -> Self {
        Self {
            format,
            code,
            filename: "hotspot-image".to_string(),
            copied: false,
        }
    }
}

/// Display the dialog window.
pub fn show(ctx: &egui::Context, dialog: &mut EmbedDialog, saving: bool) -> EmbedAction {
    let mut action = EmbedAction::None;
    let mut open = true;

    egui::Window::new("Export Embed Code")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(720.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for format in EmbedFormat::ALL {
                    if ui.selectable_label(dialog.format == format, format.label()).clicked()
                        && dialog.format != format
                    {
                        action = EmbedAction::SelectFormat(format);
                    }
                }
            });
            ui.separator();

            egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut dialog.code.as_str())
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .desired_rows(16),
                );
            });

            ui.label(
                egui::RichText::new(format!("{} KB", dialog.code.len() / 1024))
                    .small()
                    .weak(),
            );

            ui.horizontal(|ui| {
                let copy_text = if dialog.copied { "✅ Copied!" } else { "📋 Copy Code" };
                if ui.button(copy_text).clicked() {
                    action = EmbedAction::Copy;
                }

                ui.separator();

                ui.label("File name");
                ui.text_edit_singleline(&mut dialog.filename);
                if ui
                    .add_enabled(!saving, egui::Button::new("💾 Save to Library"))
                    .clicked()
                {
                    action = EmbedAction::SaveToLibrary;
                }
                if saving {
                    ui.spinner();
                }
            });
        });

    if !open {
        action = EmbedAction::Close;
    }
    action
}
