// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It turns UI events into `Editor` operations,
//! uploads the rendered canvas as a texture, and runs image decoding and
//! library uploads on background threads.

use crate::config::Settings;
use crate::editor::{Editor, PendingImage};
use crate::export::{EmbedFormat, ExportOptions};
use crate::io::download;
use crate::io::library_client::{LibraryClient, SaveOutcome};
use crate::io::media::{load_image, ImageRef};
use crate::io::serialization::SnapshotStore;
use crate::models::error::HotspotError;
use crate::models::session::{PointOutcome, SessionState};
use crate::ui::embed_dialog::{self, EmbedAction, EmbedDialog};
use crate::ui::properties::{self, HotspotForm, PropertiesAction};
use crate::ui::{canvas, toolbar};
use crate::util::color;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Result of background image loading operation.
enum LoadedImage {
    Uploaded(ImageRef),
    Restored(ImageRef),
}

/// An action waiting for the user to confirm it.
enum Confirm {
    DeleteHotspot(u64),
    ClearHotspots,
    ClearAll,
    DiscardAndDraw,
    DiscardAndEdit(u64),
    Overwrite { filename: String, content: String },
}

impl Confirm {
    fn message(&self) -> String {
        match self {
            Confirm::DeleteHotspot(_) => "Are you sure you want to delete this hotspot?".to_string(),
            Confirm::ClearHotspots => "Are you sure you want to remove all hotspots?".to_string(),
            Confirm::ClearAll => "Are you sure you want to remove the image and all hotspots?".to_string(),
            Confirm::DiscardAndDraw | Confirm::DiscardAndEdit(_) => {
                "The polygon in progress will be discarded. Continue?".to_string()
            }
            Confirm::Overwrite { filename, .. } => {
                format!("{} already exists in the library. Overwrite it?", filename)
            }
        }
    }
}

/// Main application state.
pub struct HotspotApp {
    settings: Settings,

    /// Image, hotspots and drawing session
    editor: Editor,

    /// Rendered canvas texture
    texture: Option<egui::TextureHandle>,

    /// Whether the canvas texture is stale
    needs_redraw: bool,

    /// Hotspot form contents
    form: HotspotForm,

    /// Pending confirmation dialog
    confirm: Option<Confirm>,

    /// Open embed code dialog
    embed: Option<EmbedDialog>,

    /// Blocking alert (validation and load failures)
    alert: Option<String>,

    /// Status bar message
    status: Option<String>,

    library: LibraryClient,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImage, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Receiver for an in-flight library upload, with the uploaded page
    library_task: Option<(Receiver<Result<SaveOutcome, String>>, String)>,
}

impl HotspotApp {
    /// Create the application, restoring the last session from disk.
    pub fn new(settings: Settings) -> Self {
        let store = SnapshotStore::new(settings.snapshot_path());
        let (editor, pending) = Editor::restore(store);
        let library = LibraryClient::new(settings.save_endpoint.clone());

        let mut app = Self {
            settings,
            editor,
            texture: None,
            needs_redraw: true,
            form: HotspotForm::default(),
            confirm: None,
            embed: None,
            alert: None,
            status: None,
            library,
            image_loader: None,
            loading_message: None,
            library_task: None,
        };

        if let Some(pending) = pending {
            app.restore_image(pending);
        }
        app
    }

    /// Decode the persisted image (asynchronously).
    fn restore_image(&mut self, pending: PendingImage) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Restoring image...".to_string());
        let (max_w, max_h) = (self.settings.max_display_width, self.settings.max_display_height);

        std::thread::spawn(move || {
            let result = pending
                .decode(max_w, max_h)
                .map(LoadedImage::Restored)
                .map_err(|e| format!("Failed to restore image: {:#}", e));
            let _ = sender.send(result);
        });
    }

    fn open_image(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "gif", "webp", "tiff", "tif"])
            .pick_file()
        {
            self.load_image_file(path);
        }
    }

    /// Load an image file and fit it to the display canvas (asynchronously).
    fn load_image_file(&mut self, path: std::path::PathBuf) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());
        let (max_w, max_h) = (self.settings.max_display_width, self.settings.max_display_height);

        std::thread::spawn(move || {
            let result = (|| -> anyhow::Result<ImageRef> {
                let native = load_image(&path)?;
                log::info!("Loaded image: {} ({}x{})", path.display(), native.width(), native.height());
                ImageRef::fit(native, max_w, max_h)
            })()
            .map(LoadedImage::Uploaded)
            .map_err(|e| format!("Failed to load image: {:#}", e));

            let _ = sender.send(result);
        });
    }

    fn poll_image_loader(&mut self) {
        let Some(receiver) = &self.image_loader else {
            return;
        };
        let Some(result) = poll_worker(receiver, "Image loading") else {
            return;
        };
        self.image_loader = None;
        self.loading_message = None;

        match result {
            Ok(LoadedImage::Uploaded(image)) => {
                self.editor.set_image(image);
                self.form = HotspotForm::default();
            }
            Ok(LoadedImage::Restored(image)) => self.editor.restore_image(image),
            Err(e) => {
                log::error!("{}", e);
                self.alert = Some(e);
            }
        }
        self.needs_redraw = true;
    }

    fn poll_library_task(&mut self) {
        let Some((receiver, _)) = &self.library_task else {
            return;
        };
        let Some(result) = poll_worker(receiver, "Library upload") else {
            return;
        };
        let Some((_, content)) = self.library_task.take() else {
            return;
        };

        match result {
            Ok(SaveOutcome::Saved { url, overwritten, .. }) => {
                let verb = if overwritten { "Overwrote" } else { "Saved" };
                self.status = Some(format!("{} {}", verb, url));
            }
            Ok(SaveOutcome::AlreadyExists { filename }) => {
                self.confirm = Some(Confirm::Overwrite { filename, content });
            }
            Ok(SaveOutcome::Failed(error)) => self.alert = Some(error),
            Err(e) => {
                log::error!("{}", e);
                self.alert = Some(e);
            }
        }
    }

    fn save_to_library(&mut self, filename: String, content: String, overwrite: bool) {
        let (sender, receiver) = channel();
        let client = self.library.clone();
        let page = content.clone();
        log::info!("Saving {} to {}", filename, client.endpoint());

        std::thread::spawn(move || {
            let result = client
                .save(&filename, &page, overwrite)
                .map_err(|e| format!("Failed to save to library: {:#}", e));
            let _ = sender.send(result);
        });
        self.library_task = Some((receiver, content));
    }

    fn redraw(&mut self, ctx: &egui::Context) {
        self.needs_redraw = false;
        match self.editor.render() {
            Ok(Some(rendered)) => {
                let size = [rendered.width() as usize, rendered.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rendered.as_raw());
                match &mut self.texture {
                    Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
                    None => {
                        self.texture = Some(ctx.load_texture(
                            "hotspot_canvas",
                            color_image,
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                }
            }
            Ok(None) => self.texture = None,
            Err(e) => log::error!("Failed to render canvas: {:#}", e),
        }
    }

    /// Show a domain error to the user.
    fn report(&mut self, error: HotspotError) {
        match error {
            HotspotError::NotFound(id) => {
                log::error!("Hotspot {} vanished; this should not happen", id);
            }
            other => self.alert = Some(other.to_string()),
        }
    }

    fn toggle_drawing(&mut self) {
        if self.editor.session().is_active() && self.has_unsaved_points() {
            self.confirm = Some(Confirm::DiscardAndDraw);
            return;
        }
        if let Err(e) = self.editor.toggle_drawing() {
            self.report(e);
        }
        self.sync_form_color();
    }

    fn start_edit(&mut self, id: u64) {
        if self.editor.session().is_active() {
            if self.has_unsaved_points() {
                self.confirm = Some(Confirm::DiscardAndEdit(id));
                return;
            }
            self.editor.cancel();
        }
        match self.editor.start_edit(id) {
            Ok(hotspot) => self.form = HotspotForm::from_hotspot(&hotspot),
            Err(e) => self.report(e),
        }
    }

    fn has_unsaved_points(&self) -> bool {
        !self.editor.session().points().is_empty()
    }

    fn sync_form_color(&mut self) {
        self.form = HotspotForm::default();
        if let Some(rgb) = color::parse_hex(self.editor.draft_color()) {
            self.form.color = rgb;
        }
    }

    fn open_embed_dialog(&mut self, format: EmbedFormat) {
        match self.editor.export(format, &export_options()) {
            Ok(code) => match &mut self.embed {
                Some(dialog) => {
                    dialog.format = format;
                    dialog.code = code;
                    dialog.copied = false;
                }
                None => self.embed = Some(EmbedDialog::new(format, code)),
            },
            Err(e) => self.report(e),
        }
    }

    fn download(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(download::default_file_name(unix_millis()))
            .save_file()
        else {
            return;
        };
        if let Err(e) = self.editor.download(&path) {
            log::error!("Download failed: {:#}", e);
            self.alert = Some(format!("{:#}", e));
        }
    }

    fn apply_confirmed(&mut self, confirm: Confirm) {
        match confirm {
            Confirm::DeleteHotspot(id) => {
                let name = self.editor.find_hotspot(id).map(|h| h.name.clone());
                match self.editor.delete(id) {
                    Ok(()) => {
                        self.status = name.map(|name| format!("Deleted hotspot \"{}\"", name));
                    }
                    Err(e) => self.report(e),
                }
            }
            Confirm::ClearHotspots => self.editor.clear_hotspots(),
            Confirm::ClearAll => {
                self.editor.clear_all();
                self.embed = None;
            }
            Confirm::DiscardAndDraw => {
                self.editor.cancel();
                self.sync_form_color();
            }
            Confirm::DiscardAndEdit(id) => {
                self.editor.cancel();
                self.start_edit(id);
            }
            Confirm::Overwrite { filename, content } => {
                log::warn!("Overwriting {} in the library", filename);
                self.save_to_library(filename, content, true);
            }
        }
        self.needs_redraw = true;
    }

    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.alert.clone() {
            egui::Window::new("Notice")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message);
                    if ui.button("OK").clicked() {
                        self.alert = None;
                    }
                });
            return;
        }

        if let Some(confirm) = &self.confirm {
            let mut answer = None;
            egui::Window::new("Confirm")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(confirm.message());
                    ui.horizontal(|ui| {
                        if ui.button("Yes").clicked() {
                            answer = Some(true);
                        }
                        if ui.button("No").clicked() {
                            answer = Some(false);
                        }
                    });
                });
            match answer {
                Some(true) => {
                    if let Some(confirm) = self.confirm.take() {
                        self.apply_confirmed(confirm);
                    }
                }
                Some(false) => self.confirm = None,
                None => {}
            }
            return;
        }

        let saving = self.library_task.is_some();
        let action = match &mut self.embed {
            Some(dialog) => embed_dialog::show(ctx, dialog, saving),
            None => EmbedAction::None,
        };
        match action {
            EmbedAction::SelectFormat(format) => self.open_embed_dialog(format),
            EmbedAction::Copy => {
                if let Some(dialog) = &mut self.embed {
                    ctx.output_mut(|o| o.copied_text = dialog.code.clone());
                    dialog.copied = true;
                }
            }
            EmbedAction::SaveToLibrary => {
                let filename = self.embed.as_ref().map(|d| d.filename.clone()).unwrap_or_default();
                match self.editor.export(EmbedFormat::Standalone, &export_options()) {
                    Ok(page) => self.save_to_library(filename, page, false),
                    Err(e) => self.report(e),
                }
            }
            EmbedAction::Close => self.embed = None,
            EmbedAction::None => {}
        }
    }
}

/// Check a background worker for its result. A worker that went away
/// without answering is reported as a failure.
fn poll_worker<T>(receiver: &Receiver<Result<T, String>>, task: &str) -> Option<Result<T, String>> {
    match receiver.try_recv() {
        Ok(result) => Some(result),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => Some(Err(format!("{} stopped unexpectedly", task))),
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Each export gets a fresh instance id so several embeds can share a page.
fn export_options() -> ExportOptions {
    ExportOptions::new(unix_millis().to_string())
}

impl eframe::App for HotspotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_image_loader();
        self.poll_library_task();

        // Request repaint while background work is running
        if self.loading_message.is_some() || self.library_task.is_some() {
            ctx.request_repaint();
        }

        let has_image = self.editor.image().is_some() && self.loading_message.is_none();
        let has_hotspots = !self.editor.hotspots().is_empty();
        let drawing = self.editor.session().is_active();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        self.open_image();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, has_image, drawing, has_hotspots))
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::OpenImage => self.open_image(),
            toolbar::ToolbarAction::ToggleDrawing => {
                self.toggle_drawing();
                self.needs_redraw = true;
            }
            toolbar::ToolbarAction::ClearHotspots => self.confirm = Some(Confirm::ClearHotspots),
            toolbar::ToolbarAction::ClearAll => self.confirm = Some(Confirm::ClearAll),
            toolbar::ToolbarAction::Download => self.download(),
            toolbar::ToolbarAction::Export => self.open_embed_dialog(EmbedFormat::Widget),
            toolbar::ToolbarAction::None => {}
        }

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.editor.image() {
                    Some(image) => {
                        let (nw, nh) = image.native_size();
                        let (dw, dh) = image.display_size();
                        ui.label(format!("Image {}x{} shown at {}x{}", nw, nh, dw, dh));
                    }
                    None => {
                        ui.label("No image loaded");
                    }
                }
                ui.separator();
                ui.label(format!("{} hotspots", self.editor.hotspots().len()));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });

        // Hotspot panel (right side)
        let session = self.editor.session();
        let form_open = session.state() == SessionState::ReadyToSave || session.editing_id().is_some();
        let editing_id = session.editing_id();
        let properties_action = egui::SidePanel::right("properties")
            .default_width(280.0)
            .show(ctx, |ui| {
                properties::show(ui, self.editor.hotspots(), editing_id, &mut self.form, form_open)
            })
            .inner;

        // Keep the draft outline in the form's color
        let form_color = self.form.color_hex();
        if drawing && form_color != self.editor.draft_color() {
            self.editor.set_draft_color(form_color);
            self.needs_redraw = true;
        }

        match properties_action {
            PropertiesAction::EditHotspot(id) => {
                self.start_edit(id);
                self.needs_redraw = true;
            }
            PropertiesAction::DeleteHotspot(id) => self.confirm = Some(Confirm::DeleteHotspot(id)),
            PropertiesAction::Submit => match self.editor.submit(self.form.fields()) {
                Ok(hotspot) => {
                    self.status = Some(format!("Saved hotspot \"{}\"", hotspot.name));
                    self.form = HotspotForm::default();
                    self.needs_redraw = true;
                }
                Err(e) => self.report(e),
            },
            PropertiesAction::Cancel => {
                self.editor.cancel();
                self.form = HotspotForm::default();
                self.needs_redraw = true;
            }
            PropertiesAction::None => {}
        }

        // Escape cancels the polygon in progress
        if !ctx.wants_keyboard_input()
            && ctx.input(|i| i.key_pressed(egui::Key::Escape))
            && self.editor.session().is_active()
        {
            if self.has_unsaved_points() {
                self.confirm = Some(Confirm::DiscardAndDraw);
            } else {
                self.editor.cancel();
                self.needs_redraw = true;
            }
        }

        if self.needs_redraw {
            self.redraw(ctx);
        }

        // Main canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    return canvas::CanvasAction::None;
                }

                let session = self.editor.session();
                let placing = session.state() == SessionState::Placing;
                let state = canvas::CanvasState {
                    texture: self.texture.as_ref(),
                    display_size: self.editor.image().map(ImageRef::display_size),
                    drawing: placing,
                    last_point: session.points().last().copied(),
                    draft_color: color::parse_hex(self.editor.draft_color()).unwrap_or([255, 0, 0]),
                };
                canvas::show(ui, &state)
            })
            .inner;

        if let canvas::CanvasAction::AddPoint(point) = canvas_action {
            match self.editor.add_point(point) {
                Ok(PointOutcome::Closed) => log::info!("Polygon closed, awaiting details"),
                Ok(PointOutcome::Placed) => {}
                Err(e) => self.report(e),
            }
            self.needs_redraw = true;
        }

        self.show_dialogs(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_worker_waits_then_delivers() {
        let (sender, receiver) = channel::<Result<u32, String>>();
        assert_eq!(poll_worker(&receiver, "Job"), None);

        sender.send(Ok(7)).unwrap();
        assert_eq!(poll_worker(&receiver, "Job"), Some(Ok(7)));
    }

    #[test]
    fn test_poll_worker_reports_dead_worker() {
        let (sender, receiver) = channel::<Result<u32, String>>();
        std::thread::spawn(move || {
            let _sender = sender;
            panic!("decoder crashed");
        })
        .join()
        .unwrap_err();

        assert_eq!(
            poll_worker(&receiver, "Image loading"),
            Some(Err("Image loading stopped unexpectedly".to_string()))
        );
    }
}
