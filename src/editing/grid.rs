// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Grid geometry: configuration, spacing in pixels, and the overlay of
//! grid and axis lines for the visible part of the canvas.

use crate::geometry::{Length, Unit};
use crate::settings;
use kurbo::{Line, Point, Rect};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid subdivisions must be at least 1, got {0}")]
    NoSubdivisions(u32),

    #[error("grid size must be positive and finite, got {0}")]
    BadSize(f64),
}

/// Grid configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSettings {
    /// Distance between major lines
    pub major_size: Length,
    /// Minor cells per major cell
    pub subdivisions: u32,
    /// Hidden grids draw nothing and only snap to the origin
    pub visible: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            major_size: Length::cm(settings::grid::MAJOR_SIZE_CM),
            subdivisions: settings::grid::SUBDIVISIONS,
            visible: true,
        }
    }
}

impl GridSettings {
    /// Build validated settings from a major size in centimeters
    pub fn new(major_size_cm: f64, subdivisions: u32, visible: bool) -> Result<Self, GridError> {
        let grid = Self {
            major_size: Length::new(major_size_cm, Unit::Cm),
            subdivisions,
            visible,
        };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.subdivisions == 0 {
            return Err(GridError::NoSubdivisions(self.subdivisions));
        }
        let px = self.major_size.to_px();
        if !px.is_finite() || px <= 0.0 {
            return Err(GridError::BadSize(self.major_size.value));
        }
        Ok(())
    }

    /// Major spacing in pixels
    pub fn major_spacing(&self) -> f64 {
        self.major_size.to_px()
    }

    /// Minor spacing in pixels
    pub fn minor_spacing(&self) -> f64 {
        self.major_spacing() / self.subdivisions.max(1) as f64
    }
}

/// A grid line inside the current view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub line: Line,
    pub major: bool,
}

/// Grid and axis lines covering a view box.
///
/// Recomputed by the viewport after every change of view box or zoom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridOverlay {
    pub lines: Vec<GridLine>,
    /// The x axis (y = 0), when visible
    pub x_axis: Option<Line>,
    /// The y axis (x = 0), when visible
    pub y_axis: Option<Line>,
}

impl GridOverlay {
    pub fn compute(view: Rect, grid: &GridSettings) -> Self {
        let x_axis = (view.y0 <= 0.0 && 0.0 <= view.y1)
            .then(|| Line::new(Point::new(view.x0, 0.0), Point::new(view.x1, 0.0)));
        let y_axis = (view.x0 <= 0.0 && 0.0 <= view.x1)
            .then(|| Line::new(Point::new(0.0, view.y0), Point::new(0.0, view.y1)));

        let mut lines = Vec::new();
        if grid.visible {
            let minor = grid.minor_spacing();
            let count_x = (view.width() / minor).ceil() as usize;
            let count_y = (view.height() / minor).ceil() as usize;
            let (spacing, step_n) = if count_x.max(count_y) > settings::grid::MAX_LINES {
                // Too dense: major lines only
                (grid.major_spacing(), 1)
            } else {
                (minor, grid.subdivisions as i64)
            };
            if (view.width() / spacing).max(view.height() / spacing) <= settings::grid::MAX_LINES as f64 {
                push_grid_lines(&mut lines, view, spacing, step_n);
            }
        }

        Self {
            lines,
            x_axis,
            y_axis,
        }
    }
}

/// Add vertical and horizontal lines at multiples of `spacing`; every
/// `major_every`th line is major
fn push_grid_lines(lines: &mut Vec<GridLine>, view: Rect, spacing: f64, major_every: i64) {
    let start_x = (view.x0 / spacing).ceil() as i64;
    let end_x = (view.x1 / spacing).floor() as i64;
    let start_y = (view.y0 / spacing).ceil() as i64;
    let end_y = (view.y1 / spacing).floor() as i64;

    for ix in start_x..=end_x {
        let x = ix as f64 * spacing;
        lines.push(GridLine {
            line: Line::new(Point::new(x, view.y0), Point::new(x, view.y1)),
            major: ix.rem_euclid(major_every) == 0,
        });
    }
    for iy in start_y..=end_y {
        let y = iy as f64 * spacing;
        lines.push(GridLine {
            line: Line::new(Point::new(view.x0, y), Point::new(view.x1, y)),
            major: iy.rem_euclid(major_every) == 0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_spacing_from_cm() {
        let grid = GridSettings::new(2.54, 4, true).unwrap();
        assert!((grid.major_spacing() - 96.0).abs() < 1e-9);
        assert!((grid.minor_spacing() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_zero_subdivisions() {
        assert_eq!(GridSettings::new(1.0, 0, true), Err(GridError::NoSubdivisions(0)));
        assert!(matches!(GridSettings::new(-1.0, 2, true), Err(GridError::BadSize(_))));
    }

    #[test]
    fn overlay_marks_major_lines() {
        let grid = GridSettings {
            major_size: Length::px(96.0),
            subdivisions: 4,
            visible: true,
        };
        let overlay = GridOverlay::compute(Rect::new(-10.0, -10.0, 100.0, 50.0), &grid);
        let vertical: Vec<_> = overlay
            .lines
            .iter()
            .filter(|l| l.line.p0.x == l.line.p1.x)
            .collect();
        let xs: Vec<f64> = vertical.iter().map(|l| l.line.p0.x).collect();
        assert_eq!(xs, vec![0.0, 24.0, 48.0, 72.0, 96.0]);
        let majors: Vec<f64> = vertical.iter().filter(|l| l.major).map(|l| l.line.p0.x).collect();
        assert_eq!(majors, vec![0.0, 96.0]);
    }

    #[test]
    fn overlay_axes_only_when_visible() {
        let grid = GridSettings::default();
        let overlay = GridOverlay::compute(Rect::new(-5.0, -5.0, 5.0, 5.0), &grid);
        assert!(overlay.x_axis.is_some());
        assert!(overlay.y_axis.is_some());

        let overlay = GridOverlay::compute(Rect::new(10.0, 10.0, 50.0, 50.0), &grid);
        assert!(overlay.x_axis.is_none());
        assert!(overlay.y_axis.is_none());
    }

    #[test]
    fn hidden_grid_has_no_lines() {
        let grid = GridSettings::new(1.0, 4, false).unwrap();
        let overlay = GridOverlay::compute(Rect::new(-50.0, -50.0, 50.0, 50.0), &grid);
        assert!(overlay.lines.is_empty());
        assert!(overlay.x_axis.is_some());
    }

    #[test]
    fn dense_grid_falls_back_to_major_lines() {
        let grid = GridSettings::new(1.0, 10, true).unwrap(); // ~3.78px minor
        let view = Rect::new(0.0, 0.0, 3000.0, 10.0);
        let overlay = GridOverlay::compute(view, &grid);
        assert!(!overlay.lines.is_empty());
        assert!(overlay.lines.iter().all(|l| l.major));
    }
}
