// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Group transforms on the current selection
//!
//! Every transform moves the components first and then pushes their new
//! anchors to the snap registry.

use super::EditSession;
use crate::geometry::{Angle, Axis, union_rects};
use crate::model::Component;
use kurbo::{Rect, Vec2};

impl EditSession {
    /// Bounds of the selected components
    pub fn selection_bbox(&self) -> Option<Rect> {
        union_rects(
            self.selection
                .iter()
                .filter_map(|id| self.diagram.get(*id))
                .map(Component::bounding_box),
        )
    }

    fn for_each_selected(&mut self, mut f: impl FnMut(&mut Component)) {
        for id in self.selection.iter() {
            if let Some(component) = self.diagram.get_mut(*id) {
                f(component);
                component.recalculate_snapping_points();
            }
        }
    }

    pub fn move_selection_rel(&mut self, delta: Vec2) {
        self.for_each_selected(|c| c.move_rel(delta));
    }

    /// Rotate the selection about the center of its bounds
    pub fn rotate_selection(&mut self, angle: Angle) {
        let Some(bbox) = self.selection_bbox() else {
            return;
        };
        let center = bbox.center();
        tracing::debug!("rotate selection by {}° about {:?}", angle.to_degrees(), center);
        self.for_each_selected(|c| c.rotate_about(angle, center));
    }

    /// Mirror the selection across the center of its bounds
    pub fn flip_selection(&mut self, axis: Axis) {
        let Some(bbox) = self.selection_bbox() else {
            return;
        };
        let center = bbox.center();
        self.for_each_selected(|c| c.flip_about(axis, center));
    }

    /// Remove every selected component. Returns how many were removed.
    pub fn delete_selection(&mut self) -> usize {
        let ids = self.selection.to_vec();
        let mut removed = 0;
        for id in ids {
            match self.remove_component(id) {
                Ok(()) => removed += 1,
                Err(err) => tracing::warn!("stale selection entry: {err}"),
            }
        }
        self.selection.clear();
        removed
    }

    // ===== Z-order =====

    pub fn bring_forward(&mut self) {
        self.diagram.bring_forward(&self.selection);
    }

    pub fn send_backward(&mut self) {
        self.diagram.send_backward(&self.selection);
    }

    pub fn bring_to_front(&mut self) {
        self.diagram.bring_to_front(&self.selection);
    }

    pub fn send_to_back(&mut self) {
        self.diagram.send_to_back(&self.selection);
    }
}

#[cfg(test)]
mod tests {
    use crate::editing::EditSession;
    use crate::geometry::{Angle, Axis, assert_point_eq};
    use crate::model::Component;
    use kurbo::{Point, Vec2};

    #[test]
    fn rotate_group_about_bbox_center() {
        let mut s = EditSession::default();
        let a = s.place_symbol("node", Point::new(0.0, 0.0)).unwrap();
        let b = s.place_symbol("node", Point::new(100.0, 0.0)).unwrap();
        s.select_all();
        s.rotate_selection(Angle::degrees(90.0));

        assert_point_eq(s.diagram.get(a).unwrap().reference_point(), Point::new(50.0, 50.0));
        assert_point_eq(s.diagram.get(b).unwrap().reference_point(), Point::new(50.0, -50.0));
        assert_eq!(s.diagram.get(a).unwrap().as_node().unwrap().rotation, 90.0);

        // anchors followed
        s.snap.show_markers();
        let markers = s.snap.markers();
        assert!(markers.iter().any(|p| p.distance(Point::new(50.0, 50.0)) < 1e-9));
        assert!(!markers.iter().any(|p| p.distance(Point::ORIGIN) < 1e-9));
    }

    #[test]
    fn rotate_then_back_restores() {
        let mut s = EditSession::default();
        let id = s.place_symbol("resistor", Point::new(10.0, 20.0)).unwrap();
        s.select_only(id);
        let pins_before = s.diagram.get(id).unwrap().snap_points();
        s.rotate_selection(Angle::degrees(90.0));
        s.rotate_selection(Angle::degrees(-90.0));
        let node = s.diagram.get(id).unwrap();
        assert_eq!(node.as_node().unwrap().rotation, 0.0);
        for (p, q) in node.snap_points().into_iter().zip(pins_before) {
            assert_point_eq(p, q);
        }
    }

    #[test]
    fn flip_wire_group() {
        let mut s = EditSession::default();
        let wire = Component::wire(vec![
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(40.0, 20.0),
        ]);
        let id = s.add_component(wire);
        s.select_only(id);
        s.flip_selection(Axis::Vertical);
        let points = &s.diagram.get(id).unwrap().as_wire().unwrap().points;
        assert_eq!(
            points,
            &vec![Point::new(0.0, 20.0), Point::new(40.0, 20.0), Point::new(40.0, 0.0)]
        );
    }

    #[test]
    fn flip_node_toggles_mirror() {
        let mut s = EditSession::default();
        let id = s.place_symbol("resistor", Point::new(0.0, 0.0)).unwrap();
        s.select_only(id);
        s.flip_selection(Axis::Horizontal);
        let node = s.diagram.get(id).unwrap().as_node().unwrap();
        assert!(node.flip_x);
        assert!(!node.flip_y);
        assert_point_eq(node.position, Point::ORIGIN);
    }

    #[test]
    fn move_selection_leaves_others() {
        let mut s = EditSession::default();
        let a = s.place_symbol("node", Point::new(0.0, 0.0)).unwrap();
        let b = s.place_symbol("node", Point::new(50.0, 0.0)).unwrap();
        s.select_only(a);
        s.move_selection_rel(Vec2::new(5.0, -5.0));
        assert_eq!(s.diagram.get(a).unwrap().reference_point(), Point::new(5.0, -5.0));
        assert_eq!(s.diagram.get(b).unwrap().reference_point(), Point::new(50.0, 0.0));
    }

    #[test]
    fn empty_selection_transforms_are_noops() {
        let mut s = EditSession::default();
        let a = s.place_symbol("node", Point::new(10.0, 10.0)).unwrap();
        s.rotate_selection(Angle::degrees(90.0));
        s.flip_selection(Axis::Horizontal);
        assert_eq!(s.selection_bbox(), None);
        assert_eq!(s.diagram.get(a).unwrap().reference_point(), Point::new(10.0, 10.0));
    }

    #[test]
    fn delete_selection_releases_anchors() {
        let mut s = EditSession::default();
        let a = s.place_symbol("resistor", Point::new(0.0, 0.0)).unwrap();
        s.place_symbol("node", Point::new(0.0, 100.0)).unwrap();
        let anchors = s.snap.anchor_count();
        s.select_only(a);
        assert_eq!(s.delete_selection(), 1);
        assert!(!s.diagram.contains(a));
        assert!(!s.has_selection());
        assert_eq!(s.diagram.len(), 1);
        assert!(s.snap.anchor_count() < anchors);
    }

    #[test]
    fn z_order_follows_selection() {
        let mut s = EditSession::default();
        let a = s.place_symbol("node", Point::new(0.0, 0.0)).unwrap();
        let b = s.place_symbol("node", Point::new(1.0, 0.0)).unwrap();
        let c = s.place_symbol("node", Point::new(2.0, 0.0)).unwrap();
        s.select_only(a);
        s.bring_to_front();
        assert_eq!(s.diagram.ids(), vec![b, c, a]);
        s.send_backward();
        assert_eq!(s.diagram.ids(), vec![b, a, c]);
        s.send_to_back();
        assert_eq!(s.diagram.ids(), vec![a, b, c]);
        s.bring_forward();
        assert_eq!(s.diagram.ids(), vec![b, a, c]);
        // topmost of the overlapping nodes wins the hit test
        assert_eq!(s.hit_test(Point::new(1.0, 0.0)), Some(c));
    }
}
