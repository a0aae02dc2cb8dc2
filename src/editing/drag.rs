// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Drag coordinator: turns a pointer drag on a component into moves,
//! corrected by the snap engine.
//!
//! A drag acts on the grabbed component alone, or on the whole selection
//! when more than one component is selected and the grabbed one is among
//! them. The anchors of everything being dragged are excluded as snap
//! targets, so a component never snaps back onto its own old position.

use super::mouse::PointerKind;
use super::selection::Selection;
use super::snap::{RegistrationId, SnapEngine};
use crate::error::EditorError;
use crate::model::{Diagram, EntityId};
use kurbo::{Point, Vec2};

/// What a drag operates on
pub struct DragContext<'a> {
    pub diagram: &'a mut Diagram,
    pub selection: &'a Selection,
    pub snap: &'a mut SnapEngine,
}

/// How a drag ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Positions are final and anchors were recomputed
    Finished { moved: bool },
    /// A touch press that never moved: show the context menu instead
    ContextMenu(EntityId),
}

#[derive(Debug, Clone)]
struct DragSession {
    entity: EntityId,
    offsets: Vec<Vec2>,
    group: bool,
    /// Pointer position at drag start
    grabbed_at: Point,
    moved: bool,
    pointer: PointerKind,
    /// Everything being dragged, with its reference point at drag start
    members: Vec<(EntityId, Point)>,
    exclude: Vec<RegistrationId>,
}

#[derive(Debug, Clone, Default)]
pub struct DragCoordinator {
    session: Option<DragSession>,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The grabbed component, while a drag is active
    pub fn entity(&self) -> Option<EntityId> {
        self.session.as_ref().map(|s| s.entity)
    }

    /// Whether the active drag moves the whole selection
    pub fn is_group(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.group)
    }

    /// Start dragging `id`, grabbed at canvas point `pointer`. Returns
    /// `false` when the component has no drag capability.
    ///
    /// A drag that is still active is finished first, as if it had been
    /// released where it is.
    pub fn start(
        &mut self,
        mut ctx: DragContext<'_>,
        id: EntityId,
        pointer: Point,
        kind: PointerKind,
    ) -> Result<bool, EditorError> {
        if let Some(old) = self.session.take() {
            tracing::debug!("drag start while dragging {}; finishing it", old.entity);
            release(&mut ctx, &old, true);
        }
        let component = ctx.diagram.get_mut(id).ok_or(EditorError::UnknownEntity(id))?;
        let reference = component.reference_point();
        let Some(handle) = component.drag_handle_mut() else {
            return Ok(false);
        };
        handle.grab_offset = Some(reference - pointer);
        let offsets = component.relative_snap_offsets();

        let group = ctx.selection.len() > 1 && ctx.selection.contains(&id);
        let member_ids = if group {
            ctx.selection.to_vec()
        } else {
            vec![id]
        };

        let mut members = Vec::with_capacity(member_ids.len());
        let mut exclude = Vec::new();
        for member_id in member_ids {
            let Some(member) = ctx.diagram.get_mut(member_id) else {
                continue;
            };
            member.set_dragging(true);
            members.push((member_id, member.reference_point()));
            exclude.extend(member.registration_id());
        }

        ctx.snap.show_markers();
        tracing::debug!("drag start {id} (group: {group}, members: {})", members.len());
        self.session = Some(DragSession {
            entity: id,
            offsets,
            group,
            grabbed_at: pointer,
            moved: false,
            pointer: kind,
            members,
            exclude,
        });
        Ok(true)
    }

    /// Follow the pointer. Holding shift skips snapping. Returns the new
    /// reference point of the grabbed component; `None` (and no change)
    /// when there is no drag to continue.
    pub fn drag_to(&mut self, ctx: DragContext<'_>, pointer: Point, shift: bool) -> Option<Point> {
        let session = self.session.as_mut()?;
        let component = ctx.diagram.get(session.entity)?;
        let grab = component.drag_handle()?.grab_offset?;
        let current = component.reference_point();

        if pointer != session.grabbed_at {
            session.moved = true;
        }

        let raw = pointer + grab;
        let target = if shift {
            raw
        } else {
            ctx.snap.snap(raw, &session.offsets, &session.exclude).point
        };
        let delta = target - current;
        if delta == Vec2::ZERO {
            return Some(target);
        }

        if session.group {
            for (member_id, _) in &session.members {
                if let Some(member) = ctx.diagram.get_mut(*member_id) {
                    member.move_rel(delta);
                    member.recalculate_snapping_points();
                }
            }
        } else if let Some(component) = ctx.diagram.get_mut(session.entity) {
            component.move_to(target);
        }
        Some(target)
    }

    /// Finish the drag. `None` when no drag was active.
    pub fn end(&mut self, mut ctx: DragContext<'_>) -> Option<DragOutcome> {
        let session = self.session.take()?;
        let context_menu = session.pointer == PointerKind::Touch && !session.moved;
        release(&mut ctx, &session, !context_menu);

        if context_menu {
            tracing::debug!("touch press on {} without movement: context menu", session.entity);
            Some(DragOutcome::ContextMenu(session.entity))
        } else {
            tracing::debug!("drag end {} (moved: {})", session.entity, session.moved);
            Some(DragOutcome::Finished {
                moved: session.moved,
            })
        }
    }

    /// Abort the drag and put everything back where it started
    pub fn cancel(&mut self, ctx: DragContext<'_>) {
        let Some(session) = self.session.take() else {
            return;
        };
        ctx.snap.hide_markers();
        for (member_id, start) in &session.members {
            if let Some(member) = ctx.diagram.get_mut(*member_id) {
                member.move_to(*start);
                member.set_dragging(false);
                if let Some(handle) = member.drag_handle_mut() {
                    handle.grab_offset = None;
                }
                member.recalculate_snapping_points();
            }
        }
        tracing::debug!("drag of {} cancelled", session.entity);
    }
}

/// Clear the drag state of every member, refreshing their anchors at
/// the current positions when `recompute` is set
fn release(ctx: &mut DragContext<'_>, session: &DragSession, recompute: bool) {
    ctx.snap.hide_markers();
    for (member_id, _) in &session.members {
        let Some(member) = ctx.diagram.get_mut(*member_id) else {
            continue;
        };
        member.set_dragging(false);
        if let Some(handle) = member.drag_handle_mut() {
            handle.grab_offset = None;
        }
        if recompute {
            member.recalculate_snapping_points();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::grid::GridSettings;
    use crate::geometry::{Length, assert_point_eq};
    use crate::model::{Component, Symbol};
    use kurbo::Rect;

    struct Fixture {
        diagram: Diagram,
        selection: Selection,
        snap: SnapEngine,
        drag: DragCoordinator,
    }

    impl Fixture {
        fn new(spacing: f64, visible: bool) -> Self {
            let grid = GridSettings {
                major_size: Length::px(spacing),
                subdivisions: 1,
                visible,
            };
            Self {
                diagram: Diagram::new(),
                selection: Selection::new(),
                snap: SnapEngine::new(grid),
                drag: DragCoordinator::new(),
            }
        }

        fn ctx(&mut self) -> DragContext<'_> {
            DragContext {
                diagram: &mut self.diagram,
                selection: &self.selection,
                snap: &mut self.snap,
            }
        }

        fn add_dot(&mut self, at: Point) -> EntityId {
            let dot = Symbol::new("dot", "Dot", Rect::new(-2.0, -2.0, 2.0, 2.0));
            let mut component = Component::node(&dot, at);
            component.enable_drag();
            self.diagram.add(component, &self.snap)
        }

        fn position(&self, id: EntityId) -> Point {
            self.diagram.get(id).unwrap().reference_point()
        }

        fn start(&mut self, id: EntityId, pointer: Point, kind: PointerKind) -> bool {
            let mut drag = std::mem::take(&mut self.drag);
            let started = drag.start(self.ctx(), id, pointer, kind).unwrap();
            self.drag = drag;
            started
        }

        fn drag_to(&mut self, pointer: Point, shift: bool) -> Option<Point> {
            let mut drag = std::mem::take(&mut self.drag);
            let result = drag.drag_to(self.ctx(), pointer, shift);
            self.drag = drag;
            result
        }

        fn end(&mut self) -> Option<DragOutcome> {
            let mut drag = std::mem::take(&mut self.drag);
            let result = drag.end(self.ctx());
            self.drag = drag;
            result
        }
    }

    #[test]
    fn drag_to_grid() {
        let mut fx = Fixture::new(20.0, true);
        let id = fx.add_dot(Point::ORIGIN);
        assert!(fx.start(id, Point::ORIGIN, PointerKind::Mouse));
        assert!(fx.snap.markers_visible());
        let at = fx.drag_to(Point::new(13.0, 108.0), false).unwrap();
        assert_point_eq(at, Point::new(20.0, 100.0));
        assert_point_eq(fx.position(id), Point::new(20.0, 100.0));
        assert_eq!(fx.end(), Some(DragOutcome::Finished { moved: true }));
        assert!(!fx.snap.markers_visible());
        assert!(!fx.diagram.get(id).unwrap().is_dragging());
    }

    #[test]
    fn near_field_anchor_beats_grid() {
        let mut fx = Fixture::new(50.0, true);
        fx.add_dot(Point::new(12.0, 12.0));
        let id = fx.add_dot(Point::new(200.0, 200.0));
        fx.start(id, Point::new(200.0, 200.0), PointerKind::Mouse);
        fx.drag_to(Point::new(10.0, 10.0), false);
        assert_point_eq(fx.position(id), Point::new(12.0, 12.0));
    }

    #[test]
    fn grab_offset_is_kept() {
        let mut fx = Fixture::new(20.0, true);
        let id = fx.add_dot(Point::new(40.0, 40.0));
        fx.start(id, Point::new(42.0, 41.0), PointerKind::Mouse);
        fx.drag_to(Point::new(62.0, 61.0), true);
        assert_eq!(fx.position(id), Point::new(60.0, 60.0));
    }

    #[test]
    fn shift_bypasses_snapping() {
        let mut fx = Fixture::new(20.0, true);
        let id = fx.add_dot(Point::ORIGIN);
        fx.start(id, Point::ORIGIN, PointerKind::Mouse);
        fx.drag_to(Point::new(13.0, 108.0), true);
        assert_eq!(fx.position(id), Point::new(13.0, 108.0));
    }

    #[test]
    fn own_anchors_do_not_attract() {
        let mut fx = Fixture::new(20.0, false);
        let id = fx.add_dot(Point::new(100.0, 100.0));
        fx.start(id, Point::new(100.0, 100.0), PointerKind::Mouse);
        fx.drag_to(Point::new(103.0, 100.0), false);
        assert_eq!(fx.position(id), Point::new(103.0, 100.0));
    }

    #[test]
    fn group_drag_moves_selection() {
        let mut fx = Fixture::new(20.0, true);
        let a = fx.add_dot(Point::new(0.0, 0.0));
        let b = fx.add_dot(Point::new(100.0, 40.0));
        let c = fx.add_dot(Point::new(300.0, 300.0));
        fx.selection = [a, b].into_iter().collect();

        fx.start(a, Point::ORIGIN, PointerKind::Mouse);
        assert!(fx.drag.is_group());
        fx.drag_to(Point::new(21.0, 39.0), false);
        assert_point_eq(fx.position(a), Point::new(20.0, 40.0));
        assert_point_eq(fx.position(b), Point::new(120.0, 80.0));
        assert_eq!(fx.position(c), Point::new(300.0, 300.0));

        // b's anchors followed it
        fx.end();
        fx.snap.show_markers();
        let markers = fx.snap.markers();
        assert!(markers.iter().any(|p| p.distance(Point::new(120.0, 80.0)) < 1e-9));
        assert!(!markers.contains(&Point::new(100.0, 40.0)));
    }

    #[test]
    fn single_selection_is_not_a_group() {
        let mut fx = Fixture::new(20.0, true);
        let a = fx.add_dot(Point::ORIGIN);
        fx.selection = [a].into_iter().collect();
        fx.start(a, Point::ORIGIN, PointerKind::Mouse);
        assert!(!fx.drag.is_group());
    }

    #[test]
    fn unmoved_touch_requests_context_menu() {
        let mut fx = Fixture::new(20.0, true);
        let id = fx.add_dot(Point::ORIGIN);
        fx.start(id, Point::ORIGIN, PointerKind::Touch);
        assert_eq!(fx.end(), Some(DragOutcome::ContextMenu(id)));

        fx.start(id, Point::ORIGIN, PointerKind::Mouse);
        assert_eq!(fx.end(), Some(DragOutcome::Finished { moved: false }));
    }

    #[test]
    fn touch_drag_inside_a_grid_cell_still_counts_as_moved() {
        let mut fx = Fixture::new(20.0, true);
        let id = fx.add_dot(Point::ORIGIN);
        fx.start(id, Point::ORIGIN, PointerKind::Touch);
        fx.drag_to(Point::new(6.0, 4.0), false); // snaps back onto (0, 0)
        assert_eq!(fx.position(id), Point::ORIGIN);
        assert_eq!(fx.end(), Some(DragOutcome::Finished { moved: true }));
    }

    #[test]
    fn second_start_finishes_the_first_drag() {
        let mut fx = Fixture::new(20.0, false);
        let a = fx.add_dot(Point::ORIGIN);
        let b = fx.add_dot(Point::new(200.0, 0.0));
        fx.start(a, Point::ORIGIN, PointerKind::Mouse);
        fx.drag_to(Point::new(100.0, 100.0), false);

        // press on b without releasing a
        assert!(fx.start(b, Point::new(200.0, 0.0), PointerKind::Mouse));
        assert_eq!(fx.drag.entity(), Some(b));
        let first = fx.diagram.get(a).unwrap();
        assert!(!first.is_dragging());
        assert_eq!(first.drag_handle().unwrap().grab_offset, None);
        assert_eq!(fx.end(), Some(DragOutcome::Finished { moved: false }));

        fx.snap.show_markers();
        let markers = fx.snap.markers();
        assert!(markers.contains(&Point::new(100.0, 100.0)));
        assert!(!markers.contains(&Point::ORIGIN));
    }

    #[test]
    fn moves_without_session_are_ignored() {
        let mut fx = Fixture::new(20.0, true);
        let id = fx.add_dot(Point::ORIGIN);
        assert_eq!(fx.drag_to(Point::new(50.0, 50.0), false), None);
        assert_eq!(fx.end(), None);

        // teardown mid-drag: capability removed
        fx.start(id, Point::ORIGIN, PointerKind::Mouse);
        fx.diagram.get_mut(id).unwrap().disable_drag();
        assert_eq!(fx.drag_to(Point::new(50.0, 50.0), false), None);
        assert_eq!(fx.position(id), Point::ORIGIN);
    }

    #[test]
    fn undraggable_component_does_not_start() {
        let mut fx = Fixture::new(20.0, true);
        let id = fx.add_dot(Point::ORIGIN);
        fx.diagram.get_mut(id).unwrap().disable_drag();
        assert!(!fx.start(id, Point::ORIGIN, PointerKind::Mouse));
        assert!(!fx.drag.is_active());

        let missing = EntityId::next();
        let mut drag = DragCoordinator::new();
        assert_eq!(
            drag.start(fx.ctx(), missing, Point::ORIGIN, PointerKind::Mouse),
            Err(EditorError::UnknownEntity(missing))
        );
    }

    #[test]
    fn cancel_restores_positions() {
        let mut fx = Fixture::new(20.0, true);
        let a = fx.add_dot(Point::new(0.0, 0.0));
        let b = fx.add_dot(Point::new(100.0, 0.0));
        fx.selection = [a, b].into_iter().collect();
        fx.start(b, Point::new(100.0, 0.0), PointerKind::Mouse);
        fx.drag_to(Point::new(160.0, 80.0), false);
        assert_ne!(fx.position(a), Point::ORIGIN);

        let mut drag = std::mem::take(&mut fx.drag);
        drag.cancel(fx.ctx());
        assert!(!drag.is_active());
        assert_eq!(fx.position(a), Point::ORIGIN);
        assert_eq!(fx.position(b), Point::new(100.0, 0.0));
        assert!(!fx.snap.markers_visible());
    }
}
