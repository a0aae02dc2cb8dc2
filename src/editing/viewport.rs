// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Viewport: the visible part of the canvas and the screen mapping.
//!
//! The canvas element occupies `element` in client coordinates and shows
//! `viewbox` of canvas space, so `zoom` (screen px per canvas px) always
//! equals `element.width() / viewbox.width()`. Every mutation goes
//! through `set_view`, which drops the cached inverse transform and
//! recomputes the grid overlay.

use super::gesture::GestureEvent;
use super::grid::{GridOverlay, GridSettings};
use super::input::InputEvent;
use super::snap::SnapEngine;
use crate::settings;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use std::cell::Cell;

/// Viewport transformation between client and canvas coordinates
#[derive(Debug, Clone)]
pub struct ViewPort {
    element: Rect,
    viewbox: Rect,
    zoom: f64,
    zoom_min: f64,
    zoom_max: f64,
    grid: GridSettings,
    overlay: GridOverlay,
    inverse: Cell<Option<Affine>>,
}

impl Default for ViewPort {
    fn default() -> Self {
        Self::new(Rect::new(0.0, 0.0, 800.0, 600.0), GridSettings::default())
    }
}

impl ViewPort {
    /// Create a viewport for a canvas element, in its reset position
    pub fn new(element: Rect, grid: GridSettings) -> Self {
        let mut viewport = Self {
            element,
            viewbox: Rect::ZERO,
            zoom: settings::view::DEFAULT_ZOOM,
            zoom_min: settings::view::MIN_ZOOM,
            zoom_max: settings::view::MAX_ZOOM,
            grid,
            overlay: GridOverlay::default(),
            inverse: Cell::new(None),
        };
        viewport.reset_view();
        viewport
    }

    pub fn element(&self) -> Rect {
        self.element
    }

    pub fn viewbox(&self) -> Rect {
        self.viewbox
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.zoom_min, self.zoom_max)
    }

    /// Change the zoom limits; the current zoom is clamped into them
    pub fn set_zoom_limits(&mut self, min: f64, max: f64) {
        if !(min > 0.0 && min <= max) {
            tracing::warn!("ignoring invalid zoom limits [{min}, {max}]");
            return;
        }
        self.zoom_min = min;
        self.zoom_max = max;
        if !(min..=max).contains(&self.zoom) {
            let focus = self.viewbox.center();
            self.zoom_about(self.zoom, focus);
        }
    }

    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    /// Replace the grid settings (already validated) and redraw the overlay
    pub fn set_grid(&mut self, grid: GridSettings) {
        self.grid = grid;
        self.overlay = GridOverlay::compute(self.viewbox, &self.grid);
    }

    /// Grid and axis lines for the current view
    pub fn overlay(&self) -> &GridOverlay {
        &self.overlay
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.zoom_min, self.zoom_max)
    }

    fn set_view(&mut self, viewbox: Rect, zoom: f64) {
        self.viewbox = viewbox;
        self.zoom = zoom;
        self.inverse.set(None);
        self.overlay = GridOverlay::compute(self.viewbox, &self.grid);
        tracing::debug!(
            "view now origin=({:.2}, {:.2}) size={:.2}x{:.2} zoom={:.3}",
            viewbox.x0,
            viewbox.y0,
            viewbox.width(),
            viewbox.height(),
            zoom
        );
    }

    /// View box of the element's size at `zoom`, centered on `center`
    fn centered_view(&self, center: Point, zoom: f64) -> Rect {
        let size = Size::new(self.element.width() / zoom, self.element.height() / zoom);
        Rect::from_center_size(center, size)
    }

    // ===== Coordinate transforms =====

    /// Affine transform from canvas to client coordinates
    pub fn transform(&self) -> Affine {
        Affine::translate(self.element.origin().to_vec2())
            * Affine::scale(self.zoom)
            * Affine::translate(-self.viewbox.origin().to_vec2())
    }

    /// Canvas point to client coordinates
    pub fn to_screen(&self, point: Point) -> Point {
        self.transform() * point
    }

    /// Client coordinates to canvas point
    pub fn screen_to_canvas(&self, point: Point) -> Point {
        let inverse = match self.inverse.get() {
            Some(inverse) => inverse,
            None => {
                let inverse = self.transform().inverse();
                self.inverse.set(Some(inverse));
                inverse
            }
        };
        inverse * point
    }

    /// Canvas position of an input event. Unless `snap` is false or shift
    /// is held, the point is snapped as a single anchor at its origin.
    pub fn event_to_canvas_point(
        &self,
        event: &InputEvent,
        snap: bool,
        engine: &SnapEngine,
    ) -> Option<Point> {
        let client = event.client_position()?;
        let point = self.screen_to_canvas(client);
        if snap && !event.mods().shift {
            Some(engine.snap_point(point))
        } else {
            Some(point)
        }
    }

    // ===== View changes =====

    /// Zoom 2x with the canvas origin near the bottom-left corner
    pub fn reset_view(&mut self) {
        let zoom = self.clamp_zoom(settings::view::DEFAULT_ZOOM);
        let width = self.element.width() / zoom;
        let height = self.element.height() / zoom;
        let margin = settings::view::MARGIN;
        let viewbox = Rect::from_origin_size(Point::new(-margin, margin - height), (width, height));
        tracing::debug!("reset view");
        self.set_view(viewbox, zoom);
    }

    /// Fit `bbox` into the element. `None` (empty diagram) resets the view.
    pub fn fit_view(&mut self, bbox: Option<Rect>) {
        let Some(bbox) = bbox else {
            self.reset_view();
            return;
        };
        let ratio_w = self.element.width() / bbox.width();
        let ratio_h = self.element.height() / bbox.height();
        let zoom = self.clamp_zoom(ratio_w.min(ratio_h) * settings::view::FIT_PADDING);
        let viewbox = self.centered_view(bbox.center(), zoom);
        tracing::debug!("fit view to {:?}", bbox);
        self.set_view(viewbox, zoom);
    }

    /// The canvas element changed size. The view keeps its origin and as
    /// much of its zoom as the new size allows.
    pub fn on_resize(&mut self, element: Rect) {
        if !(element.width() > 0.0 && element.height() > 0.0) {
            tracing::warn!("ignoring resize to empty element {:?}", element);
            return;
        }
        let width_ratio = element.width() / self.viewbox.width();
        let height_ratio = element.height() / self.viewbox.height();
        let zoom = self
            .zoom_min
            .max(width_ratio.min(height_ratio).min(self.zoom_max));
        self.element = element;
        let size = Size::new(element.width() / zoom, element.height() / zoom);
        let viewbox = Rect::from_origin_size(self.viewbox.origin(), size);
        self.set_view(viewbox, zoom);
    }

    /// Apply a pan/zoom gesture
    pub fn apply_gesture(&mut self, gesture: GestureEvent) {
        match gesture {
            GestureEvent::PanDelta(delta) => self.pan(delta),
            GestureEvent::ZoomLevel { level, focus } => {
                if !(level.is_finite() && level > 0.0) {
                    tracing::warn!("ignoring zoom level {level}");
                    return;
                }
                self.zoom_about(level, focus);
            }
            GestureEvent::PinchBox(rect) => {
                if !(rect.width() > 0.0 && rect.height() > 0.0) {
                    tracing::warn!("ignoring degenerate pinch box {:?}", rect);
                    return;
                }
                let ratio_w = self.element.width() / rect.width();
                let ratio_h = self.element.height() / rect.height();
                let zoom = self.clamp_zoom(ratio_w.min(ratio_h));
                let viewbox = self.centered_view(rect.center(), zoom);
                self.set_view(viewbox, zoom);
            }
        }
    }

    /// Move the view by a client-space delta
    fn pan(&mut self, delta: Vec2) {
        let viewbox = self.viewbox - delta / self.zoom;
        self.set_view(viewbox, self.zoom);
    }

    /// Set the zoom, keeping `focus` at the same client position
    fn zoom_about(&mut self, level: f64, focus: Point) {
        let zoom = self.clamp_zoom(level);
        let screen = self.to_screen(focus);
        let origin = focus - (screen - self.element.origin()) / zoom;
        let size = Size::new(self.element.width() / zoom, self.element.height() / zoom);
        self.set_view(Rect::from_origin_size(origin, size), zoom);
    }

    /// Zoom by wheel notches about a client position. Positive zooms in.
    pub fn wheel_zoom(&mut self, client: Point, notches: f64) {
        let focus = self.screen_to_canvas(client);
        let level = self.zoom * settings::view::WHEEL_ZOOM_STEP.powf(notches);
        self.apply_gesture(GestureEvent::ZoomLevel { level, focus });
    }
}
