// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Gesture payloads delivered by the pan/zoom layer

use kurbo::{Point, Rect, Vec2};

/// A viewport gesture. Every variant goes through `ViewPort::apply_gesture`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Move the view by a screen-space delta (content follows the pointer)
    PanDelta(Vec2),
    /// Set the zoom level, keeping the canvas point `focus` fixed on screen
    ZoomLevel { level: f64, focus: Point },
    /// Show the given canvas rectangle, preserving the element's aspect
    PinchBox(Rect),
}
