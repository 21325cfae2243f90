// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor session.
//!
//! Owns the loaded image, the hotspot repository and the drawing session,
//! and writes a snapshot after every mutating operation. The egui layer
//! holds one `Editor` and never mutates the model directly.

use anyhow::Result;
use image::RgbaImage;
use std::path::Path;

use crate::export::{self, EmbedFormat, ExportOptions};
use crate::io::download;
use crate::io::media::{decode_data_uri, ImageRef};
use crate::io::serialization::SnapshotStore;
use crate::models::error::{HotspotError, HotspotResult};
use crate::models::hotspot::{Hotspot, HotspotFields, Point};
use crate::models::project::ProjectSnapshot;
use crate::models::repository::HotspotRepository;
use crate::models::session::{DrawingSession, PointOutcome};
use crate::render::{self, Draft};
use crate::util::color::DEFAULT_COLOR;

/// A persisted image that still has to be decoded.
#[derive(Debug, Clone)]
pub struct PendingImage {
    pub data_uri: String,
    pub canvas_size: Option<(u32, u32)>,
}

impl PendingImage {
    /// Decode the image and rebuild its display canvas. The recorded canvas
    /// size wins so stored points stay aligned; otherwise fit to the bounds.
    pub fn decode(&self, max_width: u32, max_height: u32) -> Result<ImageRef> {
        let native = decode_data_uri(&self.data_uri)?;
        match self.canvas_size {
            Some((width, height)) => ImageRef::new(native, width, height),
            None => {
                log::warn!("Snapshot has no canvas size, fitting image to display bounds");
                ImageRef::fit(native, max_width, max_height)
            }
        }
    }
}

pub struct Editor {
    image: Option<ImageRef>,
    repository: HotspotRepository,
    session: DrawingSession,
    draft_color: String,
    /// Persisted image not yet decoded, kept so snapshots written before
    /// `restore_image` do not drop it.
    pending: Option<PendingImage>,
    store: Option<SnapshotStore>,
}

impl Editor {
    /// An empty editor. Without a store nothing is persisted.
    pub fn new(store: Option<SnapshotStore>) -> Self {
        Self {
            image: None,
            repository: HotspotRepository::new(),
            session: DrawingSession::new(),
            draft_color: DEFAULT_COLOR.to_string(),
            pending: None,
            store,
        }
    }

    /// Restore hotspots from the store. The image, if any, is returned for
    /// decoding off the UI thread. Unreadable snapshots are logged and
    /// ignored.
    pub fn restore(store: SnapshotStore) -> (Self, Option<PendingImage>) {
        let snapshot = match store.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("Failed to load snapshot: {:#}", e);
                None
            }
        };

        let mut editor = Self::new(Some(store));
        let Some(snapshot) = snapshot else {
            return (editor, None);
        };

        log::info!("Restored {} hotspots", snapshot.hotspots.len());
        let canvas_size = snapshot.canvas_size();
        editor.repository = HotspotRepository::from_hotspots(snapshot.hotspots);
        let pending = snapshot.image_data.map(|data_uri| PendingImage {
            data_uri,
            canvas_size,
        });
        editor.pending = pending.clone();
        (editor, pending)
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    pub fn hotspots(&self) -> &[Hotspot] {
        self.repository.list()
    }

    pub fn find_hotspot(&self, id: u64) -> Option<&Hotspot> {
        self.repository.find_by_id(id)
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn draft_color(&self) -> &str {
        &self.draft_color
    }

    pub fn set_draft_color(&mut self, color: impl Into<String>) {
        self.draft_color = color.into();
    }

    /// Install a freshly decoded image. Any polygon in progress is dropped.
    pub fn set_image(&mut self, image: ImageRef) {
        log::info!(
            "Image ready: native {:?}, display {:?}",
            image.native_size(),
            image.display_size()
        );
        self.session.cancel();
        self.image = Some(image);
        self.pending = None;
        self.persist();
    }

    /// Install an image restored from the snapshot. Nothing changed, so
    /// nothing is written.
    pub fn restore_image(&mut self, image: ImageRef) {
        log::info!("Restored image, display {:?}", image.display_size());
        self.image = Some(image);
        self.pending = None;
    }

    pub fn start_drawing(&mut self) -> HotspotResult<()> {
        self.require_image()?;
        self.session.start_drawing()?;
        self.draft_color = DEFAULT_COLOR.to_string();
        log::info!("Drawing started");
        Ok(())
    }

    pub fn stop_drawing(&mut self) {
        self.session.stop_drawing();
        log::info!("Drawing stopped");
    }

    /// Toggle drawing mode on or off.
    pub fn toggle_drawing(&mut self) -> HotspotResult<()> {
        if self.session.is_active() {
            self.stop_drawing();
            Ok(())
        } else {
            self.start_drawing()
        }
    }

    pub fn add_point(&mut self, point: Point) -> HotspotResult<PointOutcome> {
        self.require_image()?;
        let outcome = self.session.add_point(point)?;
        log::debug!(
            "Added point ({:.1}, {:.1}), total: {}",
            point.x,
            point.y,
            self.session.points().len()
        );
        Ok(outcome)
    }

    /// Begin editing a hotspot; returns it so the form can be prefilled.
    pub fn start_edit(&mut self, id: u64) -> HotspotResult<Hotspot> {
        self.require_image()?;
        let hotspot = self
            .repository
            .find_by_id(id)
            .cloned()
            .ok_or(HotspotError::NotFound(id))?;
        self.session.start_edit(&hotspot)?;
        self.draft_color = hotspot.color.clone();
        log::info!("Editing hotspot {}", id);
        Ok(hotspot)
    }

    pub fn submit(&mut self, fields: HotspotFields) -> HotspotResult<Hotspot> {
        let hotspot = self.session.submit(&mut self.repository, fields)?;
        self.draft_color = DEFAULT_COLOR.to_string();
        self.persist();
        Ok(hotspot)
    }

    pub fn cancel(&mut self) {
        self.session.cancel();
        self.draft_color = DEFAULT_COLOR.to_string();
    }

    pub fn delete(&mut self, id: u64) -> HotspotResult<()> {
        self.repository.delete(id)?;
        if self.session.editing_id() == Some(id) {
            self.session.cancel();
        }
        self.persist();
        Ok(())
    }

    /// Remove every hotspot, keeping the image.
    pub fn clear_hotspots(&mut self) {
        let count = self.repository.len();
        self.repository.clear();
        self.session.cancel();
        self.persist();
        log::info!("Cleared {} hotspots", count);
    }

    /// Remove every hotspot and the image.
    pub fn clear_all(&mut self) {
        self.repository.clear();
        self.session.cancel();
        self.image = None;
        self.pending = None;
        self.persist();
        log::info!("Cleared image and hotspots");
    }

    /// Redraw the display canvas, or `None` before an image is loaded.
    pub fn render(&self) -> Result<Option<RgbaImage>> {
        let Some(image) = &self.image else {
            return Ok(None);
        };
        let draft = self.session.is_active().then(|| Draft {
            points: self.session.points(),
            color: &self.draft_color,
        });
        render::render(image, self.repository.list(), draft, self.session.editing_id()).map(Some)
    }

    pub fn export(&self, format: EmbedFormat, options: &ExportOptions) -> HotspotResult<String> {
        let image = self.require_exportable()?;
        Ok(export::generate(format, image, self.repository.list(), options))
    }

    pub fn download(&self, path: &Path) -> Result<()> {
        let image = self.require_exportable()?;
        download::write_png(image, self.repository.list(), path)
    }

    /// A persisted image that has not been decoded yet, or failed to
    /// decode, is carried through unchanged.
    pub fn snapshot(&self) -> ProjectSnapshot {
        let (image_data, canvas) = match (&self.image, &self.pending) {
            (Some(image), _) => (Some(image.data_uri().to_string()), Some(image.display_size())),
            (None, Some(pending)) => (Some(pending.data_uri.clone()), pending.canvas_size),
            (None, None) => (None, None),
        };
        ProjectSnapshot {
            hotspots: self.repository.list().to_vec(),
            image_data,
            canvas_width: canvas.map(|(w, _)| w),
            canvas_height: canvas.map(|(_, h)| h),
        }
    }

    fn require_image(&self) -> HotspotResult<&ImageRef> {
        self.image.as_ref().ok_or(HotspotError::NoImage)
    }

    fn require_exportable(&self) -> HotspotResult<&ImageRef> {
        let image = self.require_image()?;
        if self.repository.is_empty() {
            return Err(HotspotError::Validation(
                "Upload an image and create at least one hotspot first".to_string(),
            ));
        }
        Ok(image)
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.snapshot()) {
            log::error!("Failed to save snapshot to {}: {:#}", store.path().display(), e);
        }
    }
}
