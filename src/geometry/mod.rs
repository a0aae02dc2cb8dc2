// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Geometry primitives on top of `kurbo`.
//!
//! Canvas space is pixels with the y axis pointing down. Absolute
//! positions are `kurbo::Point`, displacements are `kurbo::Vec2`. Every
//! operation here is pure and returns a new value.

pub mod units;

pub use units::{Length, Unit, UnitError, convert_to_unit, ensure_in_px};

use crate::settings;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// An angle, stored in radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub fn degrees(deg: f64) -> Self {
        Self(deg.to_radians())
    }

    pub fn radians(rad: f64) -> Self {
        Self(rad)
    }

    pub fn to_degrees(self) -> f64 {
        self.0.to_degrees()
    }

    pub fn to_radians(self) -> f64 {
        self.0
    }
}

impl std::ops::Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

/// Rotate `point` by `angle` around `center` (the origin when `None`).
///
/// Rotation is clockwise on screen: with y pointing down,
/// `x' = cos·x + sin·y` and `y' = -sin·x + cos·y`.
pub fn rotate(point: Point, angle: Angle, center: Option<Point>) -> Point {
    let center = center.unwrap_or(Point::ORIGIN);
    let (sin, cos) = angle.to_radians().sin_cos();
    let local = point - center;
    let rotated = Vec2::new(cos * local.x + sin * local.y, -sin * local.x + cos * local.y);
    center + rotated
}

/// Rotate a displacement about its own origin
pub fn rotate_vec(v: Vec2, angle: Angle) -> Vec2 {
    rotate(v.to_point(), angle, None).to_vec2()
}

/// Extra point operations that kurbo does not provide directly
pub trait PointExt {
    /// Elementwise product
    fn mul_elem(self, other: Vec2) -> Point;
    /// Elementwise quotient
    fn div_elem(self, other: Vec2) -> Point;
    /// Dot product of the two position vectors
    fn dot(self, other: Point) -> f64;
    /// Equality within `settings::geometry::EPSILON`
    fn approx_eq(self, other: Point) -> bool;
    /// Equality within an explicit tolerance
    fn approx_eq_eps(self, other: Point, eps: f64) -> bool;
    /// Rotate around `center`
    fn rotate_about(self, angle: Angle, center: Point) -> Point;
}

impl PointExt for Point {
    fn mul_elem(self, other: Vec2) -> Point {
        Point::new(self.x * other.x, self.y * other.y)
    }

    fn div_elem(self, other: Vec2) -> Point {
        Point::new(self.x / other.x, self.y / other.y)
    }

    fn dot(self, other: Point) -> f64 {
        self.to_vec2().dot(other.to_vec2())
    }

    fn approx_eq(self, other: Point) -> bool {
        self.approx_eq_eps(other, settings::geometry::EPSILON)
    }

    fn approx_eq_eps(self, other: Point, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }

    fn rotate_about(self, angle: Angle, center: Point) -> Point {
        rotate(self, angle, Some(center))
    }
}

/// Reflection axis for flips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Mirror left/right (x changes sign)
    Horizontal,
    /// Mirror up/down (y changes sign)
    Vertical,
}

/// Mirror `point` across the line through `center` perpendicular to
/// the flip direction
pub fn flip(point: Point, axis: Axis, center: Point) -> Point {
    match axis {
        Axis::Horizontal => Point::new(2.0 * center.x - point.x, point.y),
        Axis::Vertical => Point::new(point.x, 2.0 * center.y - point.y),
    }
}

/// Bounding box of a set of points, `None` when empty
pub fn bounds_of_points<I>(points: I) -> Option<Rect>
where
    I: IntoIterator<Item = Point>,
{
    let mut iter = points.into_iter();
    let first = iter.next()?;
    Some(iter.fold(Rect::from_points(first, first), |acc, p| acc.union_pt(p)))
}

/// Union of a set of rectangles, `None` when empty
pub fn union_rects<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    rects.into_iter().reduce(|acc, r| acc.union(r))
}

/// Inclusive containment (kurbo's `Rect::contains` excludes the far edges)
pub fn rect_contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Distance from `point` to the segment `a`-`b`
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 <= settings::geometry::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len2).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

#[cfg(test)]
pub(crate) fn assert_point_eq(actual: Point, expected: Point) {
    assert!(
        actual.approx_eq_eps(expected, 1e-6),
        "expected {expected:?}, got {actual:?}"
    );
}
