// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Snap engine: finds the one correction vector that moves a rigid set
//! of anchors onto the nearest grid point or registered anchor.
//!
//! Grid candidates are computed analytically (round each anchor to the
//! minor spacing), so the cost of a query only depends on the number of
//! moving anchors and the registered anchors that survive the near-field
//! filter.
//!
//! Registered anchors live in a shared registry. `add_snap_points`
//! hands back a `SnapRegistration`; dropping it removes the points, so a
//! component that goes away cannot leave stale targets behind.

use super::grid::GridSettings;
use crate::geometry::{Length, bounds_of_points, rect_contains};
use crate::settings;
use kurbo::{Point, Vec2};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// Identity of one registration in the anchor registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegistrationId(u64);

#[derive(Debug, Default)]
struct AnchorRegistry {
    next_id: u64,
    // BTreeMap keeps candidate order stable between queries
    entries: BTreeMap<RegistrationId, Vec<Point>>,
}

impl AnchorRegistry {
    fn insert(&mut self, points: Vec<Point>) -> RegistrationId {
        let id = RegistrationId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, points);
        id
    }
}

/// Scoped ownership of a set of registered anchors
#[derive(Debug)]
pub struct SnapRegistration {
    id: RegistrationId,
    registry: Weak<RefCell<AnchorRegistry>>,
}

impl SnapRegistration {
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// Replace the registered points (after the owner moved)
    pub fn update(&self, points: Vec<Point>) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().entries.insert(self.id, points);
        }
    }

    /// Currently registered points
    pub fn points(&self) -> Vec<Point> {
        self.registry
            .upgrade()
            .and_then(|r| r.borrow().entries.get(&self.id).cloned())
            .unwrap_or_default()
    }

    /// Remove the points now instead of at drop
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for SnapRegistration {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().entries.remove(&self.id);
        }
    }
}

/// What a snap query landed on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapTarget {
    /// Nothing within reach; the position is unchanged
    None,
    Grid(Point),
    Anchor {
        registration: RegistrationId,
        point: Point,
    },
}

/// Result of a snap query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// Corrected reference position
    pub point: Point,
    /// Vector applied to every moving anchor
    pub correction: Vec2,
    pub target: SnapTarget,
}

impl SnapResult {
    fn unsnapped(position: Point) -> Self {
        Self {
            point: position,
            correction: Vec2::ZERO,
            target: SnapTarget::None,
        }
    }
}

/// The snap engine. One per editor.
#[derive(Debug)]
pub struct SnapEngine {
    registry: Rc<RefCell<AnchorRegistry>>,
    grid: GridSettings,
    max_distance: f64,
    markers_visible: bool,
}

impl SnapEngine {
    pub fn new(grid: GridSettings) -> Self {
        Self::with_max_distance(grid, Length::cm(settings::snap::MAX_DISTANCE_CM).to_px())
    }

    /// `max_distance` is in pixels
    pub fn with_max_distance(grid: GridSettings, max_distance: f64) -> Self {
        Self {
            registry: Rc::new(RefCell::new(AnchorRegistry::default())),
            grid,
            max_distance,
            markers_visible: false,
        }
    }

    pub fn set_grid(&mut self, grid: GridSettings) {
        tracing::debug!(
            "snap grid spacing now {:.3}px (visible: {})",
            grid.minor_spacing(),
            grid.visible
        );
        self.grid = grid;
    }

    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn set_max_distance(&mut self, max_distance: f64) {
        self.max_distance = max_distance;
    }

    /// Spacing used for grid candidates
    fn effective_spacing(&self) -> f64 {
        if self.grid.visible {
            self.grid.minor_spacing()
        } else {
            settings::snap::HIDDEN_GRID_SPACING
        }
    }

    /// Register fixed anchors; they stay until the handle is dropped
    pub fn add_snap_points(&self, points: Vec<Point>) -> SnapRegistration {
        let id = self.registry.borrow_mut().insert(points);
        SnapRegistration {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Explicit counterpart of `add_snap_points`
    pub fn remove_snap_points(&self, registration: SnapRegistration) {
        registration.release();
    }

    /// Number of registered anchors across all registrations
    pub fn anchor_count(&self) -> usize {
        self.registry.borrow().entries.values().map(Vec::len).sum()
    }

    pub fn show_markers(&mut self) {
        self.markers_visible = true;
    }

    pub fn hide_markers(&mut self) {
        self.markers_visible = false;
    }

    pub fn markers_visible(&self) -> bool {
        self.markers_visible
    }

    /// Anchor positions to decorate while markers are shown
    pub fn markers(&self) -> Vec<Point> {
        if !self.markers_visible {
            return Vec::new();
        }
        self.registry
            .borrow()
            .entries
            .values()
            .flatten()
            .copied()
            .collect()
    }

    /// Snap a single point (anchor set `{(0,0)}`)
    pub fn snap_point(&self, point: Point) -> Point {
        self.snap(point, &[], &[]).point
    }

    /// Snap a rigid entity at `position` whose anchors sit at `offsets`
    /// relative to it. Registrations in `exclude` are ignored as targets.
    pub fn snap(&self, position: Point, offsets: &[Vec2], exclude: &[RegistrationId]) -> SnapResult {
        let origin_only = [Vec2::ZERO];
        let offsets = if offsets.is_empty() {
            &origin_only[..]
        } else {
            offsets
        };
        let moving: Vec<Point> = offsets.iter().map(|o| position + *o).collect();

        // (squared distance, correction, target)
        let mut best: Option<(f64, Vec2, SnapTarget)> = None;

        let spacing = self.effective_spacing();
        for &anchor in &moving {
            let grid_point = Point::new(
                (anchor.x / spacing).round() * spacing,
                (anchor.y / spacing).round() * spacing,
            );
            let d2 = anchor.distance_squared(grid_point);
            if best.as_ref().is_none_or(|(b, ..)| d2 < *b) {
                best = Some((d2, grid_point - anchor, SnapTarget::Grid(grid_point)));
            }
        }

        if let Some(cluster) = bounds_of_points(moving.iter().copied()) {
            let field = cluster.inflate(self.max_distance, self.max_distance);
            let registry = self.registry.borrow();
            for (&id, points) in registry.entries.iter() {
                if exclude.contains(&id) {
                    continue;
                }
                for &fixed in points.iter().filter(|p| rect_contains(field, **p)) {
                    for &anchor in &moving {
                        let d2 = anchor.distance_squared(fixed);
                        if best.as_ref().is_none_or(|(b, ..)| d2 < *b) {
                            best = Some((
                                d2,
                                fixed - anchor,
                                SnapTarget::Anchor {
                                    registration: id,
                                    point: fixed,
                                },
                            ));
                        }
                    }
                }
            }
        }

        match best {
            Some((d2, correction, target)) if d2 <= self.max_distance * self.max_distance => {
                SnapResult {
                    point: position + correction,
                    correction,
                    target,
                }
            }
            _ => SnapResult::unsnapped(position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::assert_point_eq;

    fn px_grid(spacing: f64, visible: bool) -> GridSettings {
        GridSettings {
            major_size: Length::px(spacing),
            subdivisions: 1,
            visible,
        }
    }

    #[test]
    fn drag_to_grid() {
        let engine = SnapEngine::new(px_grid(20.0, true));
        let result = engine.snap(Point::new(13.0, 108.0), &[], &[]);
        assert_point_eq(result.point, Point::new(20.0, 100.0));
        assert!(matches!(result.target, SnapTarget::Grid(_)));
    }

    #[test]
    fn near_field_anchor_beats_grid() {
        let engine = SnapEngine::new(px_grid(50.0, true));
        let reg = engine.add_snap_points(vec![Point::new(12.0, 12.0)]);
        let result = engine.snap(Point::new(10.0, 10.0), &[Vec2::ZERO], &[]);
        assert_point_eq(result.point, Point::new(12.0, 12.0));
        assert_eq!(
            result.target,
            SnapTarget::Anchor {
                registration: reg.id(),
                point: Point::new(12.0, 12.0)
            }
        );
    }

    #[test]
    fn point_on_grid_is_unchanged() {
        let engine = SnapEngine::new(px_grid(25.0, true));
        let result = engine.snap(Point::new(75.0, -50.0), &[], &[]);
        assert_eq!(result.point, Point::new(75.0, -50.0));
        assert_eq!(result.correction, Vec2::ZERO);
    }

    #[test]
    fn max_distance_boundary() {
        // Hidden grid: only the origin competes, and it is far away
        let engine = SnapEngine::with_max_distance(px_grid(20.0, false), 10.0);
        let position = Point::new(100.0, 100.0);

        let at = engine.add_snap_points(vec![Point::new(110.0, 100.0)]);
        assert_eq!(engine.snap(position, &[], &[]).point, Point::new(110.0, 100.0));
        drop(at);

        let beyond = engine.add_snap_points(vec![Point::new(110.5, 100.0)]);
        let result = engine.snap(position, &[], &[]);
        assert_eq!(result.point, position);
        assert_eq!(result.target, SnapTarget::None);
        drop(beyond);

        let _within = engine.add_snap_points(vec![Point::new(104.0, 97.0)]);
        assert_eq!(engine.snap(position, &[], &[]).point, Point::new(104.0, 97.0));
    }

    #[test]
    fn hidden_grid_ignores_grid_candidates() {
        let visible = SnapEngine::new(px_grid(20.0, true));
        assert_point_eq(visible.snap_point(Point::new(41.0, 59.0)), Point::new(40.0, 60.0));

        let hidden = SnapEngine::new(px_grid(20.0, false));
        assert_eq!(hidden.snap_point(Point::new(41.0, 59.0)), Point::new(41.0, 59.0));
        // The logical origin still attracts
        assert_eq!(hidden.snap_point(Point::new(3.0, -2.0)), Point::ORIGIN);

        let _pin = hidden.add_snap_points(vec![Point::new(44.0, 60.0)]);
        assert_eq!(hidden.snap_point(Point::new(41.0, 59.0)), Point::new(44.0, 60.0));
    }

    #[test]
    fn correction_is_shared_by_all_anchors() {
        let engine = SnapEngine::new(px_grid(1000.0, false));
        let _target = engine.add_snap_points(vec![Point::new(210.0, 100.0)]);
        // Second anchor is 8px from the target, the reference is far away
        let offsets = [Vec2::ZERO, Vec2::new(58.0, 0.0)];
        let result = engine.snap(Point::new(144.0, 100.0), &offsets, &[]);
        assert_eq!(result.correction, Vec2::new(8.0, 0.0));
        assert_eq!(result.point, Point::new(152.0, 100.0));
    }

    #[test]
    fn excluded_registrations_are_not_targets() {
        let engine = SnapEngine::new(px_grid(1000.0, false));
        let own = engine.add_snap_points(vec![Point::new(301.0, 300.0)]);
        let result = engine.snap(Point::new(300.0, 300.0), &[], &[own.id()]);
        assert_eq!(result.target, SnapTarget::None);
    }

    #[test]
    fn far_anchors_are_filtered_out() {
        let engine = SnapEngine::new(px_grid(1000.0, false));
        let _far = engine.add_snap_points(vec![Point::new(400.0, 300.0)]);
        let result = engine.snap(Point::new(300.0, 300.0), &[], &[]);
        assert_eq!(result.point, Point::new(300.0, 300.0));
    }

    #[test]
    fn first_minimum_wins_on_ties() {
        let engine = SnapEngine::new(px_grid(1000.0, false));
        let first = engine.add_snap_points(vec![Point::new(505.0, 500.0)]);
        let _second = engine.add_snap_points(vec![Point::new(495.0, 500.0)]);
        let result = engine.snap(Point::new(500.0, 500.0), &[], &[]);
        assert_eq!(
            result.target,
            SnapTarget::Anchor {
                registration: first.id(),
                point: Point::new(505.0, 500.0)
            }
        );
    }

    #[test]
    fn registration_lifecycle() {
        let mut engine = SnapEngine::new(GridSettings::default());
        let a = engine.add_snap_points(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]);
        let b = engine.add_snap_points(vec![Point::new(3.0, 3.0)]);
        assert_eq!(engine.anchor_count(), 3);

        a.update(vec![Point::new(9.0, 9.0)]);
        assert_eq!(a.points(), vec![Point::new(9.0, 9.0)]);
        assert_eq!(engine.anchor_count(), 2);

        engine.remove_snap_points(b);
        assert_eq!(engine.anchor_count(), 1);

        assert!(engine.markers().is_empty());
        engine.show_markers();
        assert_eq!(engine.markers(), vec![Point::new(9.0, 9.0)]);
        engine.hide_markers();

        drop(a);
        assert_eq!(engine.anchor_count(), 0);
    }

    #[test]
    fn registration_outliving_engine_is_harmless() {
        let engine = SnapEngine::new(GridSettings::default());
        let reg = engine.add_snap_points(vec![Point::new(1.0, 1.0)]);
        drop(engine);
        reg.update(vec![Point::ORIGIN]);
        assert!(reg.points().is_empty());
    }
}
