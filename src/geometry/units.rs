// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Physical units and unit-tagged lengths.
//!
//! All geometry runs in pixels. Lengths in other units only show up at
//! the edges (grid configuration, snap distance, export), where they are
//! converted through a fixed table at 96 px per inch.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Errors from unit parsing and unit arithmetic
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("invalid unit: {0:?}")]
    InvalidUnit(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("malformed number: {0:?}")]
    MalformedNumber(String),
}

/// Supported length units, in conversion priority order.
///
/// When two lengths with different units are combined, the unit that
/// comes first here is kept and the other operand is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    #[default]
    Px,
    In,
    Pt,
    Pc,
    Cm,
    Mm,
}

impl Unit {
    pub const ALL: [Unit; 6] = [Unit::Px, Unit::In, Unit::Pt, Unit::Pc, Unit::Cm, Unit::Mm];

    fn index(self) -> usize {
        self as usize
    }

    /// Lower value means higher priority
    pub fn priority(self) -> usize {
        self.index()
    }

    /// The unit kept when combining `self` with `other`
    pub fn shared_with(self, other: Unit) -> Unit {
        if self.priority() <= other.priority() {
            self
        } else {
            other
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::In => "in",
            Unit::Pt => "pt",
            Unit::Pc => "pc",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
        }
    }

    const fn px_per_unit(self) -> f64 {
        match self {
            Unit::Px => 1.0,
            Unit::In => 96.0,
            Unit::Pt => 96.0 / 72.0,
            Unit::Pc => 16.0,
            Unit::Cm => 96.0 / 2.54,
            Unit::Mm => 96.0 / 25.4,
        }
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "px" | "" => Ok(Unit::Px),
            "in" => Ok(Unit::In),
            "pt" => Ok(Unit::Pt),
            "pc" => Ok(Unit::Pc),
            "cm" => Ok(Unit::Cm),
            "mm" => Ok(Unit::Mm),
            other => Err(UnitError::InvalidUnit(other.to_string())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

const fn build_conversion_table() -> [[f64; 6]; 6] {
    let mut table = [[1.0; 6]; 6];
    let mut from = 0;
    while from < 6 {
        let mut to = 0;
        while to < 6 {
            table[from][to] = Unit::ALL[from].px_per_unit() / Unit::ALL[to].px_per_unit();
            to += 1;
        }
        from += 1;
    }
    table
}

/// `CONVERSION[from][to]` multiplies a value in `from` into `to`
const CONVERSION: [[f64; 6]; 6] = build_conversion_table();

/// Convert a raw value between units
pub fn convert_to_unit(value: f64, from: Unit, to: Unit) -> f64 {
    value * CONVERSION[from.index()][to.index()]
}

/// Convert between units named by their text suffix.
///
/// Unknown suffixes are a hard error.
pub fn convert_named(value: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    Ok(convert_to_unit(value, from.parse()?, to.parse()?))
}

/// A scalar tagged with a unit
#[derive(Debug, Clone, Copy, Default)]
pub struct Length {
    pub value: f64,
    pub unit: Unit,
}

impl Length {
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub const fn px(value: f64) -> Self {
        Self::new(value, Unit::Px)
    }

    pub const fn cm(value: f64) -> Self {
        Self::new(value, Unit::Cm)
    }

    pub const fn mm(value: f64) -> Self {
        Self::new(value, Unit::Mm)
    }

    pub const fn inches(value: f64) -> Self {
        Self::new(value, Unit::In)
    }

    /// Same length expressed in another unit
    pub fn to_unit(self, unit: Unit) -> Length {
        Length::new(convert_to_unit(self.value, self.unit, unit), unit)
    }

    /// Raw pixel value
    pub fn to_px(self) -> f64 {
        convert_to_unit(self.value, self.unit, Unit::Px)
    }

    /// Both operands expressed in their shared unit
    fn aligned(self, other: Length) -> (Length, Length) {
        let unit = self.unit.shared_with(other.unit);
        (self.to_unit(unit), other.to_unit(unit))
    }

    pub fn plus(self, other: Length) -> Length {
        let (a, b) = self.aligned(other);
        Length::new(a.value + b.value, a.unit)
    }

    pub fn minus(self, other: Length) -> Length {
        let (a, b) = self.aligned(other);
        Length::new(a.value - b.value, a.unit)
    }

    pub fn times(self, other: Length) -> Length {
        let (a, b) = self.aligned(other);
        Length::new(a.value * b.value, a.unit)
    }

    /// Checked division; a zero divisor is an error rather than infinity
    pub fn divide(self, other: Length) -> Result<Length, UnitError> {
        let (a, b) = self.aligned(other);
        if b.value == 0.0 {
            return Err(UnitError::DivisionByZero);
        }
        Ok(Length::new(a.value / b.value, a.unit))
    }

    /// Scale by a bare factor, keeping the unit
    pub fn scale(self, factor: f64) -> Length {
        Length::new(self.value * factor, self.unit)
    }

    /// Divide by a bare factor, keeping the unit
    pub fn divide_by(self, divisor: f64) -> Result<Length, UnitError> {
        if divisor == 0.0 {
            return Err(UnitError::DivisionByZero);
        }
        Ok(Length::new(self.value / divisor, self.unit))
    }

    pub fn compare(self, other: Length) -> Option<Ordering> {
        let (a, b) = self.aligned(other);
        a.value.partial_cmp(&b.value)
    }
}

impl From<f64> for Length {
    fn from(value: f64) -> Self {
        Length::px(value)
    }
}

impl PartialEq for Length {
    fn eq(&self, other: &Self) -> bool {
        self.compare(*other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Length {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl Add for Length {
    type Output = Length;
    fn add(self, rhs: Length) -> Length {
        self.plus(rhs)
    }
}

impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length {
        self.minus(rhs)
    }
}

impl Mul<f64> for Length {
    type Output = Length;
    fn mul(self, rhs: f64) -> Length {
        self.scale(rhs)
    }
}

impl Neg for Length {
    type Output = Length;
    fn neg(self) -> Length {
        Length::new(-self.value, self.unit)
    }
}

// NOTE: Length / Length is intentionally not an operator. Use
// `Length::divide`, which reports a zero divisor.

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

/// Split `"12.5cm"` into `("12.5", "cm")`
fn split_number(s: &str) -> (&str, &str) {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|&(i, c)| {
            !(c.is_ascii_digit()
                || c == '.'
                || ((c == '-' || c == '+') && i == 0)
                || ((c == 'e' || c == 'E') && i > 0 && s[i + 1..].starts_with(|n: char| n.is_ascii_digit() || n == '-' || n == '+')))
        })
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    (&s[..end], &s[end..])
}

impl FromStr for Length {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (number, suffix) = split_number(s);
        let value: f64 = number
            .parse()
            .map_err(|_| UnitError::MalformedNumber(s.to_string()))?;
        let unit: Unit = suffix.parse()?;
        Ok(Length::new(value, unit))
    }
}

/// Anything that can be turned into a pixel scalar
#[derive(Debug, Clone, Copy)]
pub enum PxSource<'a> {
    Number(f64),
    Length(Length),
    Text(&'a str),
}

impl From<f64> for PxSource<'_> {
    fn from(v: f64) -> Self {
        PxSource::Number(v)
    }
}

impl From<Length> for PxSource<'_> {
    fn from(v: Length) -> Self {
        PxSource::Length(v)
    }
}

impl<'a> From<&'a str> for PxSource<'a> {
    fn from(v: &'a str) -> Self {
        PxSource::Text(v)
    }
}

/// Reduce a number, length or numeric string to pixels.
///
/// Bare numbers are already pixels. Strings with a valid unit suffix are
/// converted; with an unknown suffix the number is taken as pixels. A
/// string with no number at all is an error, never zero.
pub fn ensure_in_px<'a>(value: impl Into<PxSource<'a>>) -> Result<f64, UnitError> {
    match value.into() {
        PxSource::Number(v) => Ok(v),
        PxSource::Length(l) => Ok(l.to_px()),
        PxSource::Text(s) => match s.parse::<Length>() {
            Ok(l) => Ok(l.to_px()),
            Err(UnitError::InvalidUnit(unit)) => {
                tracing::warn!("unknown unit {unit:?} in {s:?}, treating as px");
                let (number, _) = split_number(s);
                number
                    .parse()
                    .map_err(|_| UnitError::MalformedNumber(s.to_string()))
            }
            Err(e) => Err(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn known_factors() {
        assert!(close(convert_to_unit(1.0, Unit::In, Unit::Px), 96.0));
        assert!(close(convert_to_unit(2.54, Unit::Cm, Unit::In), 1.0));
        assert!(close(convert_to_unit(72.0, Unit::Pt, Unit::In), 1.0));
        assert!(close(convert_to_unit(6.0, Unit::Pc, Unit::In), 1.0));
        assert!(close(convert_to_unit(10.0, Unit::Mm, Unit::Cm), 1.0));
    }

    #[test]
    fn conversion_round_trip() {
        for from in Unit::ALL {
            for to in Unit::ALL {
                for x in [-3.5, 0.0, 1.0, 17.25, 1234.5] {
                    let back = convert_to_unit(convert_to_unit(x, from, to), to, from);
                    assert!(close(back, x), "{from} -> {to} -> {from}: {x} became {back}");
                }
            }
        }
    }

    #[test]
    fn unknown_unit_is_an_error() {
        assert_eq!(
            convert_named(1.0, "cm", "furlong"),
            Err(UnitError::InvalidUnit("furlong".into()))
        );
        assert!(close(convert_named(1.0, "in", "px").unwrap(), 96.0));
    }

    #[test]
    fn mixed_units_keep_higher_priority_unit() {
        let sum = Length::cm(1.0) + Length::px(10.0);
        assert_eq!(sum.unit, Unit::Px);
        assert!(close(sum.value, 96.0 / 2.54 + 10.0));

        let sum = Length::mm(10.0).plus(Length::cm(1.0));
        assert_eq!(sum.unit, Unit::Cm);
        assert!(close(sum.value, 2.0));

        let diff = Length::inches(1.0) - Length::new(36.0, Unit::Pt);
        assert_eq!(diff.unit, Unit::In);
        assert!(close(diff.value, 0.5));
    }

    #[test]
    fn plus_is_commutative_in_value() {
        let pairs = [
            (Length::cm(3.0), Length::px(7.0)),
            (Length::mm(12.0), Length::new(4.0, Unit::Pc)),
            (Length::inches(0.5), Length::new(9.0, Unit::Pt)),
        ];
        for (a, b) in pairs {
            let ab = a.plus(b);
            let ba = b.plus(a);
            assert!(close(ab.to_px(), ba.to_px()));
            assert_eq!(ab, ba);
        }
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(Length::cm(1.0).divide(Length::px(0.0)), Err(UnitError::DivisionByZero));
        assert_eq!(Length::cm(1.0).divide_by(0.0), Err(UnitError::DivisionByZero));
        let q = Length::cm(1.0).divide(Length::mm(5.0)).unwrap();
        assert_eq!(q.unit, Unit::Cm);
        assert!(close(q.value, 2.0));
    }

    #[test]
    fn comparisons_convert_first() {
        assert!(Length::inches(1.0) > Length::cm(2.0));
        assert!(Length::mm(5.0) < Length::px(20.0));
        assert_eq!(Length::inches(1.0), Length::px(96.0));
    }

    #[test]
    fn parse_lengths() {
        let l: Length = "2.5cm".parse().unwrap();
        assert_eq!(l.unit, Unit::Cm);
        assert_eq!(l.value, 2.5);

        let l: Length = " -3 in ".parse().unwrap();
        assert_eq!(l.unit, Unit::In);
        assert_eq!(l.value, -3.0);

        let l: Length = "1e2".parse().unwrap();
        assert_eq!(l.unit, Unit::Px);
        assert_eq!(l.value, 100.0);

        assert!(matches!("cm".parse::<Length>(), Err(UnitError::MalformedNumber(_))));
        assert!(matches!("4parsecs".parse::<Length>(), Err(UnitError::InvalidUnit(_))));
    }

    #[test]
    fn ensure_in_px_accepts_all_shapes() {
        assert_eq!(ensure_in_px(12.0).unwrap(), 12.0);
        assert!(close(ensure_in_px(Length::inches(0.5)).unwrap(), 48.0));
        assert_eq!(ensure_in_px("15").unwrap(), 15.0);
        assert!(close(ensure_in_px("1in").unwrap(), 96.0));
        // Unknown unit falls back to px, never to zero
        assert_eq!(ensure_in_px("7furlongs").unwrap(), 7.0);
        assert!(ensure_in_px("wide").is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let l = Length::new(4.25, Unit::Mm);
        assert_eq!(l.to_string(), "4.25mm");
        let parsed: Length = l.to_string().parse().unwrap();
        assert_eq!(parsed.unit, Unit::Mm);
        assert_eq!(parsed.value, 4.25);
    }
}
