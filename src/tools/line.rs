// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Line tool: draws orthogonal wires click by click.
//!
//! Every click after the first commits two vertices: a corner and the
//! clicked point. Which leg comes first depends on the axis lock:
//! holding X puts the corner at `(last.x, p.y)` (vertical leg first),
//! otherwise at `(p.x, last.y)` (horizontal leg first).
//!
//! The lock is chosen per segment. Until it is established the dominant
//! delta decides (`|dx| > |dy|` holds Y, a tie holds X); once established
//! it only flips when the pointer crosses the last vertex's vertical or
//! horizontal line. On top of that the lock never lets the next leg
//! continue in the direction of the previous segment.

use crate::editing::{EditSession, EditType, MouseDelegate, MouseEvent};
use crate::error::EditorError;
use crate::tools::{Tool, ToolId};
use kurbo::Point;

/// Phase of the line-drawing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Idle,
    /// Start vertex placed, nothing committed yet
    AwaitingSecondPoint,
    /// At least one corner/endpoint pair committed
    Building,
}

/// Travel direction of a committed segment (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Direction from `a` to `b`, `None` when they coincide
    pub fn between(a: Point, b: Point) -> Option<Direction> {
        if b.x > a.x {
            Some(Direction::Right)
        } else if b.x < a.x {
            Some(Direction::Left)
        } else if b.y > a.y {
            Some(Direction::Down)
        } else if b.y < a.y {
            Some(Direction::Up)
        } else {
            None
        }
    }
}

/// Which side of `reference` a coordinate lies on
fn side(value: f64, reference: f64) -> i8 {
    if value > reference {
        1
    } else if value < reference {
        -1
    } else {
        0
    }
}

#[derive(Debug, Clone)]
struct LineSession {
    vertices: Vec<Point>,
    corner: Point,
    cursor: Point,
    hold_x: bool,
    lock_established: bool,
    prev_sample: Point,
    clicks: usize,
    last_direction: Option<Direction>,
}

impl LineSession {
    fn start(point: Point) -> Self {
        Self {
            vertices: vec![point],
            corner: point,
            cursor: point,
            hold_x: true,
            lock_established: false,
            prev_sample: point,
            clicks: 1,
            last_direction: None,
        }
    }

    fn last(&self) -> Point {
        // a session always holds its start vertex
        self.vertices[self.vertices.len() - 1]
    }

    fn track(&mut self, p: Point) {
        let last = self.last();
        let delta = p - last;

        if self.lock_established {
            let crossed_vertical = side(self.prev_sample.x, last.x) != side(p.x, last.x);
            let crossed_horizontal = side(self.prev_sample.y, last.y) != side(p.y, last.y);
            match (crossed_vertical, crossed_horizontal) {
                (true, false) => self.hold_x = true,
                (false, true) => self.hold_x = false,
                (true, true) => self.hold_x = !(delta.x.abs() > delta.y.abs()),
                (false, false) => {}
            }
        } else {
            // strict comparison: a tie holds X, giving the corner
            // (last.x, p.y); see the axis-lock entry in DESIGN.md
            self.hold_x = !(delta.x.abs() > delta.y.abs());
            self.lock_established = delta.x.abs() != delta.y.abs();
        }

        match self.last_direction {
            Some(Direction::Right) if p.x > last.x => self.hold_x = true,
            Some(Direction::Left) if p.x < last.x => self.hold_x = true,
            Some(Direction::Down) if p.y > last.y => self.hold_x = false,
            Some(Direction::Up) if p.y < last.y => self.hold_x = false,
            _ => {}
        }

        self.corner = if self.hold_x {
            Point::new(last.x, p.y)
        } else {
            Point::new(p.x, last.y)
        };
        self.cursor = p;
        self.prev_sample = p;
    }

    /// Append a vertex; zero-length legs are dropped and a leg that
    /// continues the previous segment extends it instead
    fn push_vertex(&mut self, v: Point) -> bool {
        let last = self.last();
        let Some(direction) = Direction::between(last, v) else {
            return false;
        };
        let n = self.vertices.len();
        if n >= 2 && Direction::between(self.vertices[n - 2], last) == Some(direction) {
            self.vertices[n - 1] = v;
        } else {
            self.vertices.push(v);
        }
        true
    }

    fn commit(&mut self, p: Point) -> bool {
        self.track(p);
        let (corner, cursor) = (self.corner, self.cursor);
        let committed = self.push_vertex(corner) | self.push_vertex(cursor);
        if committed {
            self.clicks += 1;
            let n = self.vertices.len();
            self.last_direction = Direction::between(self.vertices[n - 2], self.vertices[n - 1]);
            self.lock_established = false;
            self.corner = self.last();
        }
        committed
    }
}

/// The line-drawing state machine, independent of any input plumbing
#[derive(Debug, Clone, Default)]
pub struct LineBuilder {
    session: Option<LineSession>,
}

impl LineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LineState {
        match &self.session {
            None => LineState::Idle,
            Some(s) if s.clicks <= 1 => LineState::AwaitingSecondPoint,
            Some(_) => LineState::Building,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Clicks that placed or committed vertices
    pub fn click_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.clicks)
    }

    /// Whether `confirm` would succeed
    pub fn can_confirm(&self) -> bool {
        self.click_count() > 1
    }

    /// Confirmed vertices
    pub fn vertices(&self) -> &[Point] {
        match &self.session {
            Some(s) => &s.vertices,
            None => &[],
        }
    }

    /// Pending corner, while a session is active
    pub fn corner(&self) -> Option<Point> {
        self.session.as_ref().map(|s| s.corner)
    }

    /// Whether the pending segment holds X (vertical leg first)
    pub fn holds_x(&self) -> Option<bool> {
        self.session.as_ref().map(|s| s.hold_x)
    }

    /// Live polyline: confirmed vertices, then the pending corner and cursor
    pub fn preview(&self) -> Vec<Point> {
        match &self.session {
            None => Vec::new(),
            Some(s) => {
                let mut points = s.vertices.clone();
                points.push(s.corner);
                points.push(s.cursor);
                points
            }
        }
    }

    /// Pointer moved to `p` (already snapped)
    pub fn pointer_moved(&mut self, p: Point) {
        if let Some(session) = self.session.as_mut() {
            session.track(p);
        }
    }

    /// Click at `p`: starts a session or commits a corner and endpoint.
    /// Returns whether anything was placed.
    pub fn click(&mut self, p: Point) -> bool {
        match self.session.as_mut() {
            None => {
                tracing::debug!("line started at ({:.2}, {:.2})", p.x, p.y);
                self.session = Some(LineSession::start(p));
                true
            }
            Some(session) => {
                let committed = session.commit(p);
                if !committed {
                    tracing::debug!("click on the last vertex ignored");
                }
                committed
            }
        }
    }

    /// Finish the polyline, dropping the pending corner and cursor
    pub fn confirm(&mut self) -> Result<Vec<Point>, EditorError> {
        let clicks = self.click_count();
        if clicks <= 1 {
            return Err(EditorError::LineNotCommittable { clicks });
        }
        let session = self
            .session
            .take()
            .ok_or(EditorError::LineNotCommittable { clicks })?;
        tracing::info!("line confirmed with {} vertices", session.vertices.len());
        Ok(session.vertices)
    }

    /// Discard the polyline in progress. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        let active = self.session.take().is_some();
        if active {
            tracing::debug!("line cancelled");
        }
        active
    }
}

/// Tool wrapper around `LineBuilder`
#[derive(Debug, Clone, Default)]
pub struct LineTool {
    pub builder: LineBuilder,
}

impl Tool for LineTool {
    fn id(&self) -> ToolId {
        ToolId::Line
    }

    fn edit_type(&self) -> Option<EditType> {
        self.builder.is_active().then_some(EditType::Normal)
    }
}

impl MouseDelegate for LineTool {
    type Data = EditSession;

    fn left_click(&mut self, event: MouseEvent, _data: &mut EditSession) {
        self.builder.click(event.snapped);
    }

    fn mouse_moved(&mut self, event: MouseEvent, _data: &mut EditSession) {
        self.builder.pointer_moved(event.snapped);
    }

    fn left_drag_changed(&mut self, event: MouseEvent, _drag: crate::editing::Drag, _data: &mut EditSession) {
        self.builder.pointer_moved(event.snapped);
    }

    fn left_drag_ended(&mut self, event: MouseEvent, _drag: crate::editing::Drag, _data: &mut EditSession) {
        self.builder.click(event.snapped);
    }

    fn cancel(&mut self, _data: &mut EditSession) {
        self.builder.cancel();
    }
}
