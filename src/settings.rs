// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor settings and configuration constants.
//!
//! These are the compiled-in defaults. Anything the user may want to
//! change at runtime is mirrored in `config.rs`, which falls back to the
//! values here.

// ============================================================================
// VIEW SETTINGS
// ============================================================================
/// Minimum zoom level
const MIN_ZOOM: f64 = 0.25;

/// Maximum zoom level
const MAX_ZOOM: f64 = 10.0;

/// Zoom applied by `reset_view`
const DEFAULT_ZOOM: f64 = 2.0;

/// Distance (canvas px) between the canvas origin and the bottom-left
/// corner of the view after a reset
const VIEW_MARGIN: f64 = 20.0;

/// Fraction of the element used when fitting the diagram into view
const FIT_PADDING: f64 = 0.98;

/// Zoom factor per wheel notch
const WHEEL_ZOOM_STEP: f64 = 1.1;

// ============================================================================
// GRID SETTINGS
// ============================================================================
/// Major grid spacing (cm)
const GRID_MAJOR_SIZE_CM: f64 = 1.0;

/// Minor lines per major cell
const GRID_SUBDIVISIONS: u32 = 4;

/// Upper bound on the number of lines per axis in the grid overlay.
/// Past this the minor lines are dropped and only major lines remain.
const GRID_MAX_LINES: usize = 400;

// ============================================================================
// SNAP SETTINGS
// ============================================================================
/// Maximum snap distance (cm). Used both for the near-field filter and
/// for the final accept/reject test.
const SNAP_MAX_DISTANCE_CM: f64 = 0.5;

/// Grid spacing used when the grid is hidden. Large enough that only
/// the origin is ever a grid candidate.
const SNAP_HIDDEN_GRID_SPACING: f64 = 1.0e12;

// ============================================================================
// INTERACTION SETTINGS
// ============================================================================
/// Pointer travel (screen px) before a press turns into a drag
const DRAG_THRESHOLD: f64 = 3.0;

/// Hit tolerance around components and wires (screen px)
const HIT_TOLERANCE: f64 = 4.0;

/// Tolerance for geometric equality checks
const EPSILON: f64 = 1e-9;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// View settings (zoom limits, reset/fit behavior)
pub mod view {
    pub const MIN_ZOOM: f64 = super::MIN_ZOOM;
    pub const MAX_ZOOM: f64 = super::MAX_ZOOM;
    pub const DEFAULT_ZOOM: f64 = super::DEFAULT_ZOOM;
    pub const MARGIN: f64 = super::VIEW_MARGIN;
    pub const FIT_PADDING: f64 = super::FIT_PADDING;
    pub const WHEEL_ZOOM_STEP: f64 = super::WHEEL_ZOOM_STEP;
}

/// Grid defaults
pub mod grid {
    pub const MAJOR_SIZE_CM: f64 = super::GRID_MAJOR_SIZE_CM;
    pub const SUBDIVISIONS: u32 = super::GRID_SUBDIVISIONS;
    pub const MAX_LINES: usize = super::GRID_MAX_LINES;
}

/// Snapping behavior
pub mod snap {
    pub const MAX_DISTANCE_CM: f64 = super::SNAP_MAX_DISTANCE_CM;
    pub const HIDDEN_GRID_SPACING: f64 = super::SNAP_HIDDEN_GRID_SPACING;
}

/// Pointer interaction
pub mod interaction {
    pub const DRAG_THRESHOLD: f64 = super::DRAG_THRESHOLD;
    pub const HIT_TOLERANCE: f64 = super::HIT_TOLERANCE;
}

/// Numeric tolerance for geometry
pub mod geometry {
    pub const EPSILON: f64 = super::EPSILON;
}
