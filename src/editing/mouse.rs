// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Mouse state machine.
//!
//! `Mouse` turns raw down/move/up events into clicks and drags and
//! forwards them to a `MouseDelegate` (the active tool). A press only
//! becomes a drag after the pointer travels `DRAG_THRESHOLD` screen
//! pixels; anything shorter is a click.

use crate::settings;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Keyboard modifiers held during a pointer event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

/// Input device behind a pointer event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// A pointer event, already mapped into canvas space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Canvas position (not snapped)
    pub pos: Point,
    /// Canvas position snapped as a single anchor; equal to `pos` when
    /// shift is held
    pub snapped: Point,
    /// Client position, used for the drag threshold and panning
    pub screen_pos: Point,
    pub button: Option<MouseButton>,
    pub mods: Modifiers,
    pub pointer: PointerKind,
}

impl MouseEvent {
    pub fn new(pos: Point, screen_pos: Point, button: Option<MouseButton>, mods: Modifiers) -> Self {
        Self {
            pos,
            snapped: pos,
            screen_pos,
            button,
            mods,
            pointer: PointerKind::Mouse,
        }
    }

    pub fn with_snapped(mut self, snapped: Point) -> Self {
        self.snapped = snapped;
        self
    }

    pub fn with_pointer(mut self, pointer: PointerKind) -> Self {
        self.pointer = pointer;
        self
    }
}

/// Canvas positions of an ongoing drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub start: Point,
    pub prev: Point,
    pub current: Point,
}

impl Drag {
    fn new(start: Point, prev: Point, current: Point) -> Self {
        Self {
            start,
            prev,
            current,
        }
    }
}

/// Receiver of interpreted mouse input
#[allow(unused_variables)]
pub trait MouseDelegate {
    type Data;

    fn left_down(&mut self, event: MouseEvent, data: &mut Self::Data) {}

    fn left_up(&mut self, event: MouseEvent, data: &mut Self::Data) {}

    fn left_click(&mut self, event: MouseEvent, data: &mut Self::Data) {}

    fn mouse_moved(&mut self, event: MouseEvent, data: &mut Self::Data) {}

    fn left_drag_began(&mut self, event: MouseEvent, drag: Drag, data: &mut Self::Data) {}

    fn left_drag_changed(&mut self, event: MouseEvent, drag: Drag, data: &mut Self::Data) {}

    fn left_drag_ended(&mut self, event: MouseEvent, drag: Drag, data: &mut Self::Data) {}

    fn cancel(&mut self, data: &mut Self::Data);
}

#[derive(Debug, Clone, Copy, Default)]
enum MouseState {
    #[default]
    Up,
    Down(MouseEvent),
    Drag {
        start: MouseEvent,
        prev: MouseEvent,
    },
}

/// Tracks press/drag state across events
#[derive(Debug, Clone, Default)]
pub struct Mouse {
    state: MouseState,
}

impl Mouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, MouseState::Drag { .. })
    }

    pub fn is_down(&self) -> bool {
        !matches!(self.state, MouseState::Up)
    }

    pub fn mouse_down<T>(
        &mut self,
        event: MouseEvent,
        delegate: &mut dyn MouseDelegate<Data = T>,
        data: &mut T,
    ) {
        if event.button != Some(MouseButton::Left) {
            return;
        }
        if self.is_down() {
            // A second press without a release: treat the first as lost
            tracing::debug!("mouse down while already down; restarting gesture");
        }
        self.state = MouseState::Down(event);
        delegate.left_down(event, data);
    }

    pub fn mouse_moved<T>(
        &mut self,
        event: MouseEvent,
        delegate: &mut dyn MouseDelegate<Data = T>,
        data: &mut T,
    ) {
        match self.state {
            MouseState::Up => delegate.mouse_moved(event, data),
            MouseState::Down(start) => {
                if start.screen_pos.distance(event.screen_pos)
                    >= settings::interaction::DRAG_THRESHOLD
                {
                    let drag = Drag::new(start.pos, start.pos, event.pos);
                    self.state = MouseState::Drag { start, prev: event };
                    delegate.left_drag_began(event, drag, data);
                }
            }
            MouseState::Drag { start, prev } => {
                let drag = Drag::new(start.pos, prev.pos, event.pos);
                self.state = MouseState::Drag { start, prev: event };
                delegate.left_drag_changed(event, drag, data);
            }
        }
    }

    pub fn mouse_up<T>(
        &mut self,
        event: MouseEvent,
        delegate: &mut dyn MouseDelegate<Data = T>,
        data: &mut T,
    ) {
        match std::mem::take(&mut self.state) {
            MouseState::Up => {}
            MouseState::Down(_) => {
                delegate.left_up(event, data);
                delegate.left_click(event, data);
            }
            MouseState::Drag { start, prev } => {
                let drag = Drag::new(start.pos, prev.pos, event.pos);
                delegate.left_drag_ended(event, drag, data);
                delegate.left_up(event, data);
            }
        }
    }

    /// Abandon the current gesture
    pub fn cancel<T>(&mut self, delegate: &mut dyn MouseDelegate<Data = T>, data: &mut T) {
        self.state = MouseState::Up;
        delegate.cancel(data);
    }
}
