// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing session state machine.
//!
//! Tracks the polygon currently being placed, either for a new hotspot or
//! as the replacement outline of an existing one. The session owns its
//! in-progress points; the repository is only touched on `submit`.

use super::error::{HotspotError, HotspotResult};
use super::hotspot::{Hotspot, HotspotFields, Point, MIN_POINTS};
use super::repository::HotspotRepository;
use crate::util::geometry::{is_closing_click, CLOSING_THRESHOLD};

/// Phase of the drawing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Placing,
    /// Polygon closed, waiting for the form to be submitted.
    ReadyToSave,
}

/// Outcome of placing a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    Placed,
    /// The point closed the polygon; the caller should present the form.
    Closed,
}

#[derive(Debug, Clone)]
pub struct DrawingSession {
    state: SessionState,
    points: Vec<Point>,
    editing_id: Option<u64>,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            points: Vec::new(),
            editing_id: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != SessionState::Idle
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Id of the hotspot being edited, if this session replaces one.
    pub fn editing_id(&self) -> Option<u64> {
        self.editing_id
    }

    /// Begin placing points for a new hotspot.
    pub fn start_drawing(&mut self) -> HotspotResult<()> {
        self.ensure_idle()?;
        self.points.clear();
        self.editing_id = None;
        self.state = SessionState::Placing;
        Ok(())
    }

    /// Begin editing an existing hotspot, seeded with a copy of its points.
    pub fn start_edit(&mut self, hotspot: &Hotspot) -> HotspotResult<()> {
        self.ensure_idle()?;
        self.points = hotspot.points.clone();
        self.editing_id = Some(hotspot.id);
        self.state = SessionState::Placing;
        Ok(())
    }

    pub fn add_point(&mut self, point: Point) -> HotspotResult<PointOutcome> {
        match self.state {
            SessionState::Placing => {}
            SessionState::Idle => return Err(HotspotError::InvalidState("not drawing")),
            SessionState::ReadyToSave => {
                return Err(HotspotError::InvalidState("polygon already closed"))
            }
        }

        let closing = is_closing_click(point, &self.points, CLOSING_THRESHOLD);
        self.points.push(point);

        if closing {
            self.state = SessionState::ReadyToSave;
            Ok(PointOutcome::Closed)
        } else {
            Ok(PointOutcome::Placed)
        }
    }

    /// Store the polygon: creates a hotspot, or replaces the one being
    /// edited. On validation failure nothing changes and the session stays
    /// open so the user can correct the form.
    pub fn submit(
        &mut self,
        repository: &mut HotspotRepository,
        fields: HotspotFields,
    ) -> HotspotResult<Hotspot> {
        if self.state == SessionState::Idle {
            return Err(HotspotError::InvalidState("nothing to submit"));
        }
        if self.points.len() < MIN_POINTS {
            return Err(HotspotError::Validation(format!(
                "Draw at least {} points to create a hotspot",
                MIN_POINTS
            )));
        }

        let points = self.points.clone();
        let hotspot = match self.editing_id {
            Some(id) => repository.update(id, fields, points)?,
            None => repository.create(fields, points)?,
        };

        self.reset();
        Ok(hotspot)
    }

    /// Discard the in-progress polygon without touching the repository.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Leave drawing mode. The hotspot being edited, if any, is kept as is.
    pub fn stop_drawing(&mut self) {
        self.reset();
    }

    fn ensure_idle(&self) -> HotspotResult<()> {
        if self.is_active() {
            return Err(HotspotError::InvalidState(
                "a polygon is already in progress; cancel it first",
            ));
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.points.clear();
        self.editing_id = None;
    }
}
