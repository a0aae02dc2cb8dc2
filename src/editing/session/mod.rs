// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit session - owns all editing state for one canvas

mod hit_testing;
mod transform;

use super::drag::{DragContext, DragCoordinator, DragOutcome};
use super::edit_types::EditType;
use super::grid::GridSettings;
use super::input::InputEvent;
use super::mouse::{Mouse, MouseButton, MouseEvent, PointerKind};
use super::selection::Selection;
use super::snap::SnapEngine;
use super::viewport::ViewPort;
use crate::error::EditorError;
use crate::model::{Component, Diagram, EntityId, SymbolLibrary};
use crate::tools::line::LineBuilder;
use crate::tools::{ToolBox, ToolId};
use kurbo::{Point, Rect};

/// Editing session for one schematic canvas
///
/// This is the composition root: exactly one viewport, snap engine,
/// diagram, selection and drag coordinator per canvas, plus the active
/// tool and the mouse state machine that feeds it.
#[derive(Debug)]
pub struct EditSession {
    /// Placed components, in z-order
    pub diagram: Diagram,

    /// Currently selected components
    pub selection: Selection,

    /// Viewport transformation and grid overlay
    pub viewport: ViewPort,

    /// Grid and anchor snapping
    pub snap: SnapEngine,

    /// Symbols available for placement
    pub library: SymbolLibrary,

    drag: DragCoordinator,

    /// Current editing tool; also decides the editor mode
    tool: ToolBox,

    mouse: Mouse,

    /// Component a touch long-press asked a context menu for
    context_menu: Option<EntityId>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(
            Rect::new(0.0, 0.0, 800.0, 600.0),
            GridSettings::default(),
            SymbolLibrary::builtin(),
        )
    }
}

impl EditSession {
    /// Create a session for a canvas element at `element` (client coordinates)
    pub fn new(element: Rect, grid: GridSettings, library: SymbolLibrary) -> Self {
        Self {
            diagram: Diagram::new(),
            selection: Selection::new(),
            viewport: ViewPort::new(element, grid),
            snap: SnapEngine::new(grid),
            library,
            drag: DragCoordinator::new(),
            tool: ToolBox::default(),
            mouse: Mouse::new(),
            context_menu: None,
        }
    }

    fn drag_context(&mut self) -> (&mut DragCoordinator, DragContext<'_>) {
        (
            &mut self.drag,
            DragContext {
                diagram: &mut self.diagram,
                selection: &self.selection,
                snap: &mut self.snap,
            },
        )
    }

    // ===== Modes and tools =====

    pub fn tool_id(&self) -> ToolId {
        self.tool.id()
    }

    pub fn tool(&self) -> &ToolBox {
        &self.tool
    }

    /// Kind of edit the active tool is performing, for undo grouping
    pub fn edit_type(&self) -> Option<EditType> {
        self.tool.edit_type()
    }

    /// Switch tools. Whatever the old tool was doing is cancelled, and
    /// component dragging is switched on only for the select tool.
    pub fn set_tool(&mut self, tool: ToolBox) {
        let mut old = std::mem::replace(&mut self.tool, tool);
        let mut mouse = std::mem::take(&mut self.mouse);
        mouse.cancel(&mut old, self);
        self.cancel_drag();

        let id = self.tool.id();
        self.diagram.set_drag_enabled(id.enables_drag());
        tracing::info!("tool {:?} -> {:?}", old.id(), id);
    }

    /// Cancel the current operation and return to the select tool
    pub fn escape(&mut self) {
        if self.tool.id() == ToolId::Select {
            let mut tool = std::mem::take(&mut self.tool);
            let mut mouse = std::mem::take(&mut self.mouse);
            mouse.cancel(&mut tool, self);
            self.tool = tool;
        } else {
            self.set_tool(ToolBox::default());
        }
    }

    /// The line state machine, while the line tool is active
    pub fn line_builder(&self) -> Option<&LineBuilder> {
        self.tool.line_builder()
    }

    /// Turn the line in progress into a wire component
    pub fn confirm_line(&mut self) -> Result<EntityId, EditorError> {
        let builder = self
            .tool
            .line_builder_mut()
            .ok_or(EditorError::LineNotCommittable { clicks: 0 })?;
        let points = builder.confirm()?;
        Ok(self.add_component(Component::wire(points)))
    }

    /// Drop the line in progress, if any
    pub fn cancel_line(&mut self) -> bool {
        self.tool.line_builder_mut().is_some_and(LineBuilder::cancel)
    }

    // ===== Input =====

    /// Feed one host input event through the viewport and the active tool
    pub fn handle_input(&mut self, event: InputEvent) {
        match &event {
            InputEvent::Resize(rect) => self.viewport.on_resize(*rect),
            InputEvent::Gesture(gesture) => self.viewport.apply_gesture(*gesture),
            InputEvent::Wheel { pos, delta, .. } => self.viewport.wheel_zoom(*pos, *delta),
            InputEvent::MouseDown { button, .. } => {
                if let Some(ev) = self.mouse_event(&event, Some(*button)) {
                    self.dispatch(|mouse, tool, session| mouse.mouse_down(ev, tool, session));
                }
            }
            InputEvent::TouchStart(_) => {
                if let Some(ev) = self.mouse_event(&event, Some(MouseButton::Left)) {
                    self.dispatch(|mouse, tool, session| mouse.mouse_down(ev, tool, session));
                }
            }
            InputEvent::MouseMove { .. } | InputEvent::TouchMove(_) => {
                if let Some(ev) = self.mouse_event(&event, None) {
                    self.dispatch(|mouse, tool, session| mouse.mouse_moved(ev, tool, session));
                }
            }
            InputEvent::MouseUp { button, .. } => {
                if let Some(ev) = self.mouse_event(&event, Some(*button)) {
                    self.dispatch(|mouse, tool, session| mouse.mouse_up(ev, tool, session));
                }
            }
            InputEvent::TouchEnd(_) => {
                if let Some(ev) = self.mouse_event(&event, Some(MouseButton::Left)) {
                    self.dispatch(|mouse, tool, session| mouse.mouse_up(ev, tool, session));
                }
            }
        }
    }

    fn mouse_event(&self, event: &InputEvent, button: Option<MouseButton>) -> Option<MouseEvent> {
        let (Some(screen), Some(pos), Some(snapped)) = (
            event.client_position(),
            self.viewport.event_to_canvas_point(event, false, &self.snap),
            self.viewport.event_to_canvas_point(event, true, &self.snap),
        ) else {
            tracing::warn!("pointer event without a position: {:?}", event);
            return None;
        };
        Some(
            MouseEvent::new(pos, screen, button, event.mods())
                .with_snapped(snapped)
                .with_pointer(event.pointer_kind()),
        )
    }

    fn dispatch(&mut self, f: impl FnOnce(&mut Mouse, &mut ToolBox, &mut EditSession)) {
        let mut tool = std::mem::take(&mut self.tool);
        let mut mouse = std::mem::take(&mut self.mouse);
        f(&mut mouse, &mut tool, self);
        self.tool = tool;
        self.mouse = mouse;
    }

    /// Take the pending context-menu request, if any
    pub fn take_context_menu_request(&mut self) -> Option<EntityId> {
        self.context_menu.take()
    }

    // ===== Dragging =====

    /// Start dragging `id` grabbed at canvas point `pos`
    pub fn begin_drag(&mut self, id: EntityId, pos: Point, pointer: PointerKind) -> bool {
        let (drag, ctx) = self.drag_context();
        match drag.start(ctx, id, pos, pointer) {
            Ok(started) => started,
            Err(err) => {
                tracing::warn!("cannot drag: {err}");
                false
            }
        }
    }

    pub fn drag_to(&mut self, pos: Point, shift: bool) -> Option<Point> {
        let (drag, ctx) = self.drag_context();
        drag.drag_to(ctx, pos, shift)
    }

    pub fn end_drag(&mut self) -> Option<DragOutcome> {
        let (drag, ctx) = self.drag_context();
        let outcome = drag.end(ctx);
        if let Some(DragOutcome::ContextMenu(id)) = outcome {
            self.context_menu = Some(id);
        }
        outcome
    }

    pub fn cancel_drag(&mut self) {
        let (drag, ctx) = self.drag_context();
        drag.cancel(ctx);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    // ===== Components =====

    /// Add a component on top of the diagram
    pub fn add_component(&mut self, mut component: Component) -> EntityId {
        if self.tool.id().enables_drag() {
            component.enable_drag();
        }
        self.diagram.add(component, &self.snap)
    }

    /// Place an instance of `symbol` with its reference point at `at`
    pub fn place_symbol(&mut self, symbol: &str, at: Point) -> Result<EntityId, EditorError> {
        let component = Component::node(self.library.get(symbol)?, at);
        let id = self.add_component(component);
        tracing::info!("placed {symbol} {id} at ({:.2}, {:.2})", at.x, at.y);
        Ok(id)
    }

    /// Place `symbol` near `pos`, snapping all of its anchors unless
    /// `raw` is set
    pub fn place_symbol_snapped(&mut self, symbol: &str, pos: Point, raw: bool) -> Result<EntityId, EditorError> {
        let offsets = self.library.get(symbol)?.anchor_offsets();
        let at = if raw {
            pos
        } else {
            self.snap.snap(pos, &offsets, &[]).point
        };
        self.place_symbol(symbol, at)
    }

    /// Remove a component and drop it from the selection
    pub fn remove_component(&mut self, id: EntityId) -> Result<(), EditorError> {
        if self.drag.entity() == Some(id) {
            self.cancel_drag();
        }
        self.diagram.remove(id)?;
        self.selection.remove(&id);
        tracing::info!("removed {id}");
        Ok(())
    }

    // ===== Grid and view =====

    /// Change the grid; the overlay and the snap spacing follow
    pub fn set_grid(&mut self, grid: GridSettings) -> Result<(), EditorError> {
        grid.validate()?;
        self.viewport.set_grid(grid);
        self.snap.set_grid(grid);
        Ok(())
    }

    /// Fit the whole diagram into view (reset when empty)
    pub fn fit_view(&mut self) {
        self.viewport.fit_view(self.diagram.bounding_box());
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset_view();
    }
}
