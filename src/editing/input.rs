// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Raw pointer input, as delivered by the host in client coordinates

use super::gesture::GestureEvent;
use super::mouse::{Modifiers, MouseButton, PointerKind};
use kurbo::{Point, Rect};

/// One input event from the host
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseDown {
        pos: Point,
        button: MouseButton,
        mods: Modifiers,
    },
    MouseMove {
        pos: Point,
        mods: Modifiers,
    },
    MouseUp {
        pos: Point,
        button: MouseButton,
        mods: Modifiers,
    },
    /// Wheel notches, positive zooms in
    Wheel {
        pos: Point,
        delta: f64,
        mods: Modifiers,
    },
    TouchStart(TouchList),
    TouchMove(TouchList),
    TouchEnd(TouchList),
    Gesture(GestureEvent),
    /// New client rectangle of the canvas element
    Resize(Rect),
}

/// Touch positions of a touch event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchList {
    /// Touches still on the surface
    pub touches: Vec<Point>,
    /// Touches that changed in this event
    pub changed: Vec<Point>,
    pub mods: Modifiers,
}

impl TouchList {
    pub fn single(pos: Point) -> Self {
        Self {
            touches: vec![pos],
            changed: vec![pos],
            mods: Modifiers::NONE,
        }
    }

    /// First active touch, falling back to the first changed touch
    /// (on touch end the lifted finger is only in `changed`)
    pub fn primary(&self) -> Option<Point> {
        self.touches.first().or(self.changed.first()).copied()
    }
}

impl InputEvent {
    /// Client position of the event, if it carries one
    pub fn client_position(&self) -> Option<Point> {
        match self {
            InputEvent::MouseDown { pos, .. }
            | InputEvent::MouseMove { pos, .. }
            | InputEvent::MouseUp { pos, .. }
            | InputEvent::Wheel { pos, .. } => Some(*pos),
            InputEvent::TouchStart(list) | InputEvent::TouchMove(list) | InputEvent::TouchEnd(list) => {
                list.primary()
            }
            InputEvent::Gesture(_) | InputEvent::Resize(_) => None,
        }
    }

    pub fn mods(&self) -> Modifiers {
        match self {
            InputEvent::MouseDown { mods, .. }
            | InputEvent::MouseMove { mods, .. }
            | InputEvent::MouseUp { mods, .. }
            | InputEvent::Wheel { mods, .. } => *mods,
            InputEvent::TouchStart(list) | InputEvent::TouchMove(list) | InputEvent::TouchEnd(list) => {
                list.mods
            }
            InputEvent::Gesture(_) | InputEvent::Resize(_) => Modifiers::NONE,
        }
    }

    pub fn pointer_kind(&self) -> PointerKind {
        match self {
            InputEvent::TouchStart(_) | InputEvent::TouchMove(_) | InputEvent::TouchEnd(_) => {
                PointerKind::Touch
            }
            _ => PointerKind::Mouse,
        }
    }
}
