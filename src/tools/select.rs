// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Select tool: click to select, drag components, pan the canvas.
//!
//! Pressing on a draggable component starts a drag session right away,
//! so a touch press that never moves can still be reported as a
//! context-menu request. Dragging empty canvas pans; with shift held it
//! draws a rubber band instead.

use crate::editing::gesture::GestureEvent;
use crate::editing::{Drag, EditSession, EditType, MouseDelegate, MouseEvent};
use crate::tools::{Tool, ToolId};
use kurbo::{Point, Rect};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum SelectState {
    #[default]
    Ready,
    /// Pressed on empty canvas, not moved yet
    PressedEmpty { screen: Point },
    /// A component drag is in progress
    Dragging,
    Panning { last_screen: Point },
    RubberBand { start: Point, current: Point },
}

#[derive(Debug, Clone, Default)]
pub struct SelectTool {
    state: SelectState,
    /// Set when a component drag finished, until the next press
    drag_finished: bool,
}

impl SelectTool {
    /// Rubber band rectangle while one is being drawn
    pub fn rubber_band(&self) -> Option<Rect> {
        match self.state {
            SelectState::RubberBand { start, current } => Some(Rect::from_points(start, current)),
            _ => None,
        }
    }

    fn pan_to(&mut self, screen: Point, data: &mut EditSession) {
        if let SelectState::Panning { last_screen } = self.state {
            let delta = screen - last_screen;
            data.viewport.apply_gesture(GestureEvent::PanDelta(delta));
            self.state = SelectState::Panning {
                last_screen: screen,
            };
        }
    }
}

impl Tool for SelectTool {
    fn id(&self) -> ToolId {
        ToolId::Select
    }

    fn edit_type(&self) -> Option<EditType> {
        match self.state {
            SelectState::Dragging => Some(EditType::Drag),
            _ if self.drag_finished => Some(EditType::DragUp),
            _ => None,
        }
    }
}

impl MouseDelegate for SelectTool {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, data: &mut EditSession) {
        // the release of an earlier press was lost
        if self.state == SelectState::Dragging {
            data.end_drag();
        }
        self.drag_finished = false;
        self.state = match data.hit_test(event.pos) {
            Some(id) if data.begin_drag(id, event.pos, event.pointer) => SelectState::Dragging,
            _ => SelectState::PressedEmpty {
                screen: event.screen_pos,
            },
        };
    }

    fn left_drag_began(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        match self.state {
            SelectState::Dragging => {
                data.drag_to(event.pos, event.mods.shift);
            }
            SelectState::PressedEmpty { .. } if event.mods.shift => {
                self.state = SelectState::RubberBand {
                    start: drag.start,
                    current: drag.current,
                };
            }
            SelectState::PressedEmpty { screen } => {
                self.state = SelectState::Panning {
                    last_screen: screen,
                };
                self.pan_to(event.screen_pos, data);
            }
            _ => {}
        }
    }

    fn left_drag_changed(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        match self.state {
            SelectState::Dragging => {
                data.drag_to(event.pos, event.mods.shift);
            }
            SelectState::Panning { .. } => self.pan_to(event.screen_pos, data),
            SelectState::RubberBand { start, .. } => {
                self.state = SelectState::RubberBand {
                    start,
                    current: drag.current,
                };
            }
            _ => {}
        }
    }

    fn left_drag_ended(&mut self, event: MouseEvent, _drag: Drag, data: &mut EditSession) {
        match self.state {
            SelectState::Dragging => {
                data.end_drag();
                self.drag_finished = true;
            }
            SelectState::RubberBand { start, .. } => {
                let rect = Rect::from_points(start, event.pos);
                data.select_in_rect(rect, event.mods.command());
            }
            _ => {}
        }
        self.state = SelectState::Ready;
    }

    fn left_up(&mut self, _event: MouseEvent, data: &mut EditSession) {
        // press and release without crossing the drag threshold
        if self.state == SelectState::Dragging {
            data.end_drag();
            self.state = SelectState::Ready;
        }
    }

    fn left_click(&mut self, event: MouseEvent, data: &mut EditSession) {
        self.state = SelectState::Ready;
        match data.hit_test(event.pos) {
            Some(id) if event.mods.shift || event.mods.command() => data.toggle_selected(id),
            Some(id) => data.select_only(id),
            None if event.mods.shift || event.mods.command() => {}
            None => data.clear_selection(),
        }
    }

    fn cancel(&mut self, data: &mut EditSession) {
        data.cancel_drag();
        self.state = SelectState::Ready;
    }
}
