// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Diagram components: placed symbol instances (nodes) and wires.
//!
//! A node is positioned by its reference point; its anchors are the
//! symbol's offsets pushed through the instance transform (flip, then
//! rotation). A wire is an orthogonal polyline; its reference point is
//! the center of its bounds.
//!
//! Moving a component does not touch the snap registry. Callers follow a
//! move with `recalculate_snapping_points`, once the whole gesture or
//! group operation has been applied.

use super::entity_id::EntityId;
use super::symbol::Symbol;
use crate::editing::snap::{RegistrationId, SnapEngine, SnapRegistration};
use crate::geometry::{Angle, Axis, bounds_of_points, distance_to_segment, flip, rect_contains, rotate, rotate_vec};
use kurbo::{Point, Rect, Vec2};

/// A placed symbol instance
#[derive(Debug, Clone, PartialEq)]
pub struct NodeComponent {
    pub symbol: Symbol,
    /// Reference point ("mid") in canvas space
    pub position: Point,
    /// Rotation in degrees, normalized to `[0, 360)`
    pub rotation: f64,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl NodeComponent {
    /// Map a symbol-relative offset through flip and rotation
    pub fn local_to_world(&self, offset: Vec2) -> Vec2 {
        let mut v = offset;
        if self.flip_x {
            v.x = -v.x;
        }
        if self.flip_y {
            v.y = -v.y;
        }
        rotate_vec(v, Angle::degrees(self.rotation))
    }

    /// Absolute pin positions, by name
    pub fn pins(&self) -> Vec<(String, Point)> {
        self.symbol
            .pins
            .iter()
            .map(|pin| (pin.name.clone(), self.position + self.local_to_world(pin.offset)))
            .collect()
    }
}

/// An orthogonal polyline
#[derive(Debug, Clone, PartialEq)]
pub struct WireComponent {
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    Node(NodeComponent),
    Wire(WireComponent),
}

/// Drag capability of a component. Holds the grab offset of the drag in
/// progress, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragHandle {
    pub grab_offset: Option<Vec2>,
}

/// A component of the diagram
#[derive(Debug)]
pub struct Component {
    id: EntityId,
    pub kind: ComponentKind,
    drag: Option<DragHandle>,
    dragging: bool,
    registration: Option<SnapRegistration>,
}

impl Component {
    fn with_kind(kind: ComponentKind) -> Self {
        Self {
            id: EntityId::next(),
            kind,
            drag: None,
            dragging: false,
            registration: None,
        }
    }

    /// New instance of `symbol` with its reference point at `position`
    pub fn node(symbol: &Symbol, position: Point) -> Self {
        Self::with_kind(ComponentKind::Node(NodeComponent {
            symbol: symbol.clone(),
            position,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
        }))
    }

    pub fn wire(points: Vec<Point>) -> Self {
        Self::with_kind(ComponentKind::Wire(WireComponent { points }))
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn as_node(&self) -> Option<&NodeComponent> {
        match &self.kind {
            ComponentKind::Node(node) => Some(node),
            ComponentKind::Wire(_) => None,
        }
    }

    pub fn as_wire(&self) -> Option<&WireComponent> {
        match &self.kind {
            ComponentKind::Wire(wire) => Some(wire),
            ComponentKind::Node(_) => None,
        }
    }

    pub fn reference_point(&self) -> Point {
        match &self.kind {
            ComponentKind::Node(node) => node.position,
            ComponentKind::Wire(wire) => bounds_of_points(wire.points.iter().copied())
                .map(|r| r.center())
                .unwrap_or(Point::ORIGIN),
        }
    }

    /// Anchor offsets relative to the reference point; never empty
    pub fn relative_snap_offsets(&self) -> Vec<Vec2> {
        let offsets: Vec<Vec2> = match &self.kind {
            ComponentKind::Node(node) => node
                .symbol
                .anchor_offsets()
                .into_iter()
                .map(|o| node.local_to_world(o))
                .collect(),
            ComponentKind::Wire(wire) => {
                let reference = self.reference_point();
                wire.points.iter().map(|p| *p - reference).collect()
            }
        };
        if offsets.is_empty() {
            vec![Vec2::ZERO]
        } else {
            offsets
        }
    }

    /// Absolute anchor positions
    pub fn snap_points(&self) -> Vec<Point> {
        let reference = self.reference_point();
        self.relative_snap_offsets()
            .into_iter()
            .map(|o| reference + o)
            .collect()
    }

    /// Put the reference point at `point`
    pub fn move_to(&mut self, point: Point) {
        let delta = point - self.reference_point();
        self.move_rel(delta);
    }

    pub fn move_rel(&mut self, delta: Vec2) {
        match &mut self.kind {
            ComponentKind::Node(node) => node.position += delta,
            ComponentKind::Wire(wire) => {
                for p in wire.points.iter_mut() {
                    *p += delta;
                }
            }
        }
    }

    pub fn rotate_about(&mut self, angle: Angle, center: Point) {
        match &mut self.kind {
            ComponentKind::Node(node) => {
                node.position = rotate(node.position, angle, Some(center));
                node.rotation = (node.rotation + angle.to_degrees()).rem_euclid(360.0);
            }
            ComponentKind::Wire(wire) => {
                for p in wire.points.iter_mut() {
                    *p = rotate(*p, angle, Some(center));
                }
            }
        }
    }

    /// Mirror across the line through `center`
    pub fn flip_about(&mut self, axis: Axis, center: Point) {
        match &mut self.kind {
            ComponentKind::Node(node) => {
                node.position = flip(node.position, axis, center);
                match axis {
                    Axis::Horizontal => node.flip_x = !node.flip_x,
                    Axis::Vertical => node.flip_y = !node.flip_y,
                }
                // mirroring reverses the sense of rotation
                node.rotation = (-node.rotation).rem_euclid(360.0);
            }
            ComponentKind::Wire(wire) => {
                for p in wire.points.iter_mut() {
                    *p = flip(*p, axis, center);
                }
            }
        }
    }

    pub fn bounding_box(&self) -> Rect {
        match &self.kind {
            ComponentKind::Node(node) => {
                let bbox = node.symbol.bbox;
                let corners = [
                    Vec2::new(bbox.x0, bbox.y0),
                    Vec2::new(bbox.x1, bbox.y0),
                    Vec2::new(bbox.x1, bbox.y1),
                    Vec2::new(bbox.x0, bbox.y1),
                ];
                bounds_of_points(corners.map(|c| node.position + node.local_to_world(c)))
                    .unwrap_or(Rect::from_points(node.position, node.position))
            }
            ComponentKind::Wire(wire) => bounds_of_points(wire.points.iter().copied())
                .unwrap_or(Rect::ZERO),
        }
    }

    /// Whether `point` touches the component within `tolerance`
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match &self.kind {
            ComponentKind::Node(_) => {
                rect_contains(self.bounding_box().inflate(tolerance, tolerance), point)
            }
            ComponentKind::Wire(wire) => match wire.points.as_slice() {
                [] => false,
                [only] => only.distance(point) <= tolerance,
                points => points
                    .windows(2)
                    .any(|seg| distance_to_segment(point, seg[0], seg[1]) <= tolerance),
            },
        }
    }

    // ===== Drag capability =====

    /// Make the component draggable; no-op when it already is
    pub fn enable_drag(&mut self) {
        if self.drag.is_none() {
            self.drag = Some(DragHandle::default());
        }
    }

    /// Remove the drag capability along with any remembered drag state
    pub fn disable_drag(&mut self) {
        self.drag = None;
        self.dragging = false;
    }

    pub fn is_draggable(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_handle(&self) -> Option<&DragHandle> {
        self.drag.as_ref()
    }

    pub fn drag_handle_mut(&mut self) -> Option<&mut DragHandle> {
        self.drag.as_mut()
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    // ===== Snap anchors =====

    /// Register the component's anchors with `engine`, replacing any
    /// earlier registration
    pub fn register_snap_points(&mut self, engine: &SnapEngine) {
        self.registration = Some(engine.add_snap_points(self.snap_points()));
    }

    /// Push the current anchor positions to the registry
    pub fn recalculate_snapping_points(&mut self) {
        if let Some(registration) = &self.registration {
            registration.update(self.snap_points());
        }
    }

    pub fn registration_id(&self) -> Option<RegistrationId> {
        self.registration.as_ref().map(SnapRegistration::id)
    }

    /// Remove the anchors from the registry
    pub fn release_snap_points(&mut self) {
        if let Some(registration) = self.registration.take() {
            registration.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::grid::GridSettings;
    use crate::geometry::assert_point_eq;

    fn part() -> Symbol {
        Symbol::new("part", "Part", Rect::new(-20.0, -5.0, 20.0, 5.0))
            .with_pin("1", Vec2::new(-20.0, 0.0))
            .with_pin("2", Vec2::new(20.0, 0.0))
    }

    #[test]
    fn node_anchors_follow_position() {
        let mut node = Component::node(&part(), Point::new(100.0, 100.0));
        assert_eq!(
            node.snap_points(),
            vec![Point::new(100.0, 100.0), Point::new(80.0, 100.0), Point::new(120.0, 100.0)]
        );
        node.move_to(Point::new(0.0, 10.0));
        assert_eq!(node.reference_point(), Point::new(0.0, 10.0));
        assert_eq!(node.snap_points()[2], Point::new(20.0, 10.0));
    }

    #[test]
    fn rotate_then_flip_mirrors_pins() {
        let mut node = Component::node(&part(), Point::new(100.0, 100.0));
        node.rotate_about(Angle::degrees(90.0), Point::new(100.0, 100.0));
        let pins = node.as_node().unwrap().pins();
        assert_point_eq(pins[1].1, Point::new(100.0, 80.0));

        node.flip_about(Axis::Horizontal, Point::new(110.0, 100.0));
        let n = node.as_node().unwrap();
        assert!(n.flip_x);
        assert_eq!(n.rotation, 270.0);
        assert_point_eq(n.position, Point::new(120.0, 100.0));
        assert_point_eq(n.pins()[1].1, Point::new(120.0, 80.0));
        assert_point_eq(n.pins()[0].1, Point::new(120.0, 120.0));
    }

    #[test]
    fn rotation_stays_normalized() {
        let mut node = Component::node(&part(), Point::ORIGIN);
        node.rotate_about(Angle::degrees(-90.0), Point::ORIGIN);
        assert_eq!(node.as_node().unwrap().rotation, 270.0);
        node.rotate_about(Angle::degrees(450.0), Point::ORIGIN);
        assert_eq!(node.as_node().unwrap().rotation, 0.0);
    }

    #[test]
    fn wire_reference_is_bounds_center() {
        let mut wire = Component::wire(vec![Point::new(0.0, 0.0), Point::new(40.0, 0.0), Point::new(40.0, 20.0)]);
        assert_eq!(wire.reference_point(), Point::new(20.0, 10.0));
        assert_eq!(wire.relative_snap_offsets()[0], Vec2::new(-20.0, -10.0));
        wire.move_to(Point::new(120.0, 110.0));
        assert_eq!(
            wire.as_wire().unwrap().points,
            vec![Point::new(100.0, 100.0), Point::new(140.0, 100.0), Point::new(140.0, 120.0)]
        );
    }

    #[test]
    fn empty_wire_has_origin_anchor() {
        let wire = Component::wire(Vec::new());
        assert_eq!(wire.relative_snap_offsets(), vec![Vec2::ZERO]);
        assert!(!wire.hit_test(Point::ORIGIN, 1.0));
    }

    #[test]
    fn hit_testing() {
        let node = Component::node(&part(), Point::new(50.0, 50.0));
        assert!(node.hit_test(Point::new(70.0, 55.0), 0.0));
        assert!(node.hit_test(Point::new(72.0, 50.0), 4.0));
        assert!(!node.hit_test(Point::new(80.0, 50.0), 4.0));

        let wire = Component::wire(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        assert!(wire.hit_test(Point::new(50.0, 3.0), 4.0));
        assert!(!wire.hit_test(Point::new(50.0, 5.0), 4.0));
    }

    #[test]
    fn rotated_bounding_box() {
        let mut node = Component::node(&part(), Point::ORIGIN);
        node.rotate_about(Angle::degrees(90.0), Point::ORIGIN);
        let bbox = node.bounding_box();
        assert!((bbox.width() - 10.0).abs() < 1e-9);
        assert!((bbox.height() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn drag_capability_is_idempotent() {
        let mut node = Component::node(&part(), Point::ORIGIN);
        assert!(!node.is_draggable());
        node.enable_drag();
        node.drag_handle_mut().unwrap().grab_offset = Some(Vec2::new(1.0, 1.0));
        node.enable_drag();
        assert_eq!(node.drag_handle().unwrap().grab_offset, Some(Vec2::new(1.0, 1.0)));
        node.disable_drag();
        node.disable_drag();
        assert!(node.drag_handle().is_none());
        node.enable_drag();
        assert_eq!(node.drag_handle().unwrap().grab_offset, None);
    }

    #[test]
    fn registration_tracks_moves() {
        let engine = SnapEngine::new(GridSettings::default());
        let mut node = Component::node(&part(), Point::ORIGIN);
        node.register_snap_points(&engine);
        assert_eq!(engine.anchor_count(), 3);

        node.move_rel(Vec2::new(5.0, 0.0));
        node.recalculate_snapping_points();
        engine_contains(&engine, Point::new(25.0, 0.0));

        node.release_snap_points();
        assert_eq!(engine.anchor_count(), 0);
        assert_eq!(node.registration_id(), None);
    }

    fn engine_contains(engine: &SnapEngine, point: Point) {
        let result = engine.snap(point + Vec2::new(0.5, 0.0), &[], &[]);
        assert_point_eq(result.point, point);
    }
}
