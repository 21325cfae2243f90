// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory hotspot collection.
//!
//! The repository exclusively owns the hotspot list. Hotspots keep their
//! insertion order and their id for their whole lifetime; edits replace
//! the mutable fields wholesale.

use super::error::{HotspotError, HotspotResult};
use super::hotspot::{Hotspot, HotspotFields, Point, MIN_POINTS};
use crate::util::color;

/// Ordered collection of hotspots keyed by id.
#[derive(Debug, Clone)]
pub struct HotspotRepository {
    hotspots: Vec<Hotspot>,
    next_id: u64,
}

impl Default for HotspotRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl HotspotRepository {
    pub fn new() -> Self {
        Self {
            hotspots: Vec::new(),
            next_id: 1,
        }
    }

    /// Build a repository from persisted hotspots. New ids continue above
    /// the largest id already present.
    pub fn from_hotspots(hotspots: Vec<Hotspot>) -> Self {
        let next_id = hotspots.iter().map(|h| h.id).max().map_or(1, |max| max + 1);
        Self { hotspots, next_id }
    }

    pub fn create(&mut self, fields: HotspotFields, points: Vec<Point>) -> HotspotResult<Hotspot> {
        validate(&fields, &points)?;

        let hotspot = Hotspot {
            id: self.next_id,
            name: fields.name,
            description: fields.description,
            color: fields.color,
            points,
        };
        self.next_id += 1;
        self.hotspots.push(hotspot.clone());

        log::info!("Created hotspot {} ({:?}), total: {}", hotspot.id, hotspot.name, self.hotspots.len());
        Ok(hotspot)
    }

    pub fn update(&mut self, id: u64, fields: HotspotFields, points: Vec<Point>) -> HotspotResult<Hotspot> {
        let index = self.position(id).ok_or(HotspotError::NotFound(id))?;
        validate(&fields, &points)?;

        let hotspot = &mut self.hotspots[index];
        hotspot.name = fields.name;
        hotspot.description = fields.description;
        hotspot.color = fields.color;
        hotspot.points = points;

        log::info!("Updated hotspot {} ({:?})", id, hotspot.name);
        Ok(hotspot.clone())
    }

    pub fn delete(&mut self, id: u64) -> HotspotResult<()> {
        let index = self.position(id).ok_or(HotspotError::NotFound(id))?;
        self.hotspots.remove(index);
        log::info!("Deleted hotspot {}, total: {}", id, self.hotspots.len());
        Ok(())
    }

    /// Remove every hotspot. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.hotspots.clear();
    }

    /// Hotspots in insertion order.
    pub fn list(&self) -> &[Hotspot] {
        &self.hotspots
    }

    pub fn find_by_id(&self, id: u64) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    pub fn len(&self) -> usize {
        self.hotspots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.hotspots.iter().position(|h| h.id == id)
    }
}

fn validate(fields: &HotspotFields, points: &[Point]) -> HotspotResult<()> {
    if points.len() < MIN_POINTS {
        return Err(HotspotError::Validation(format!(
            "Draw at least {} points to create a hotspot",
            MIN_POINTS
        )));
    }
    if fields.name.trim().is_empty() {
        return Err(HotspotError::Validation("Hotspot name is required".to_string()));
    }
    if color::parse_hex(&fields.color).is_none() {
        return Err(HotspotError::Validation(format!(
            "Invalid color {:?}, expected #rrggbb",
            fields.color
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(offset: f64) -> Vec<Point> {
        vec![
            Point::new(offset, offset),
            Point::new(offset + 10.0, offset),
            Point::new(offset + 10.0, offset + 10.0),
            Point::new(offset, offset + 10.0),
        ]
    }

    fn fields(name: &str) -> HotspotFields {
        HotspotFields::new(name, "", "#ff0000")
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let mut repo = HotspotRepository::new();
        let a = repo.create(fields("A"), square(0.0)).unwrap();
        let b = repo.create(fields("B"), square(20.0)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(repo.list().len(), 2);
        assert_eq!(repo.list()[0].name, "A");
        assert_eq!(repo.list()[1].name, "B");
    }

    #[test]
    fn test_create_rejects_short_polygon() {
        let mut repo = HotspotRepository::new();
        let err = repo.create(fields("A"), square(0.0)[..2].to_vec()).unwrap_err();
        assert!(matches!(err, HotspotError::Validation(_)));
        assert!(repo.is_empty());
    }

    #[test]
    fn test_create_rejects_blank_name_and_bad_color() {
        let mut repo = HotspotRepository::new();
        assert!(matches!(
            repo.create(fields("  "), square(0.0)),
            Err(HotspotError::Validation(_))
        ));
        assert!(matches!(
            repo.create(HotspotFields::new("A", "", "red"), square(0.0)),
            Err(HotspotError::Validation(_))
        ));
        assert!(repo.is_empty());
    }

    #[test]
    fn test_update_preserves_id_and_position() {
        let mut repo = HotspotRepository::new();
        let a = repo.create(fields("A"), square(0.0)).unwrap();
        let b = repo.create(fields("B"), square(20.0)).unwrap();
        let c = repo.create(fields("C"), square(40.0)).unwrap();

        let updated = repo
            .update(b.id, HotspotFields::new("B2", "desc", "#00ff00"), square(60.0))
            .unwrap();

        assert_eq!(updated.id, b.id);
        let ids: Vec<u64> = repo.list().iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
        let stored = repo.find_by_id(b.id).unwrap();
        assert_eq!(stored.name, "B2");
        assert_eq!(stored.description, "desc");
        assert_eq!(stored.color, "#00ff00");
        assert_eq!(stored.points, square(60.0));
    }

    #[test]
    fn test_update_missing_id() {
        let mut repo = HotspotRepository::new();
        assert_eq!(
            repo.update(42, fields("A"), square(0.0)),
            Err(HotspotError::NotFound(42))
        );
    }

    #[test]
    fn test_update_invalid_leaves_hotspot_untouched() {
        let mut repo = HotspotRepository::new();
        let a = repo.create(fields("A"), square(0.0)).unwrap();
        assert!(repo.update(a.id, fields(""), square(5.0)).is_err());
        assert_eq!(repo.find_by_id(a.id), Some(&a));
    }

    #[test]
    fn test_delete_then_find() {
        let mut repo = HotspotRepository::new();
        repo.create(fields("Keep"), square(0.0)).unwrap();
        let before = repo.len();
        let gone = repo.create(fields("Gone"), square(20.0)).unwrap();

        repo.delete(gone.id).unwrap();

        assert!(repo.find_by_id(gone.id).is_none());
        assert_eq!(repo.len(), before);
        assert_eq!(repo.delete(gone.id), Err(HotspotError::NotFound(gone.id)));
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut repo = HotspotRepository::new();
        let a = repo.create(fields("A"), square(0.0)).unwrap();
        repo.clear();
        assert!(repo.list().is_empty());
        let b = repo.create(fields("B"), square(0.0)).unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn test_from_hotspots_continues_ids() {
        let mut seed = HotspotRepository::new();
        seed.create(fields("A"), square(0.0)).unwrap();
        seed.create(fields("B"), square(0.0)).unwrap();

        let mut repo = HotspotRepository::from_hotspots(seed.list().to_vec());
        let c = repo.create(fields("C"), square(0.0)).unwrap();
        assert!(repo.list()[..2].iter().all(|h| h.id < c.id));
    }
}
