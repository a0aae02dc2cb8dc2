// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Symbols: the library entries that placed nodes are instances of.
//!
//! All geometry is relative to the symbol's reference point and in px.

use crate::error::EditorError;
use crate::geometry::Length;
use kurbo::{Rect, Vec2};
use std::collections::BTreeMap;

/// A named connection point of a symbol
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub name: String,
    pub offset: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub id: String,
    pub name: String,
    /// Outline bounds relative to the reference point
    pub bbox: Rect,
    /// Anchor used while placing the symbol
    pub default_anchor: Vec2,
    pub pins: Vec<Pin>,
}

impl Symbol {
    pub fn new(id: impl Into<String>, name: impl Into<String>, bbox: Rect) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bbox,
            default_anchor: Vec2::ZERO,
            pins: Vec::new(),
        }
    }

    pub fn with_pin(mut self, name: impl Into<String>, offset: Vec2) -> Self {
        self.pins.push(Pin {
            name: name.into(),
            offset,
        });
        self
    }

    pub fn with_default_anchor(mut self, anchor: Vec2) -> Self {
        self.default_anchor = anchor;
        self
    }

    /// Snap offsets of an untransformed instance: the default anchor
    /// followed by every pin not already covered by it
    pub fn anchor_offsets(&self) -> Vec<Vec2> {
        let mut offsets = vec![self.default_anchor];
        for pin in &self.pins {
            if !offsets.contains(&pin.offset) {
                offsets.push(pin.offset);
            }
        }
        offsets
    }
}

/// Symbols available for placement, keyed by id
#[derive(Debug, Clone, Default)]
pub struct SymbolLibrary {
    symbols: BTreeMap<String, Symbol>,
}

impl SymbolLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library with the basic two-terminal parts, ground and a node dot
    pub fn builtin() -> Self {
        let cm = Length::cm(1.0).to_px();
        let mut library = Self::new();
        library.insert(
            Symbol::new("resistor", "Resistor", Rect::new(-cm, -0.25 * cm, cm, 0.25 * cm))
                .with_pin("1", Vec2::new(-cm, 0.0))
                .with_pin("2", Vec2::new(cm, 0.0)),
        );
        library.insert(
            Symbol::new("capacitor", "Capacitor", Rect::new(-0.5 * cm, -0.5 * cm, 0.5 * cm, 0.5 * cm))
                .with_pin("1", Vec2::new(-0.5 * cm, 0.0))
                .with_pin("2", Vec2::new(0.5 * cm, 0.0)),
        );
        library.insert(
            Symbol::new("inductor", "Inductor", Rect::new(-cm, -0.25 * cm, cm, 0.25 * cm))
                .with_pin("1", Vec2::new(-cm, 0.0))
                .with_pin("2", Vec2::new(cm, 0.0)),
        );
        library.insert(
            Symbol::new("ground", "Ground", Rect::new(-0.5 * cm, 0.0, 0.5 * cm, 0.5 * cm))
                .with_pin("gnd", Vec2::ZERO),
        );
        library.insert(
            Symbol::new("node", "Node", Rect::new(-0.1 * cm, -0.1 * cm, 0.1 * cm, 0.1 * cm))
                .with_pin("n", Vec2::ZERO),
        );
        library
    }

    /// Add or replace a symbol
    pub fn insert(&mut self, symbol: Symbol) {
        if self.symbols.contains_key(&symbol.id) {
            tracing::info!("replacing symbol '{}'", symbol.id);
        }
        self.symbols.insert(symbol.id.clone(), symbol);
    }

    pub fn get(&self, id: &str) -> Result<&Symbol, EditorError> {
        self.symbols
            .get(id)
            .ok_or_else(|| EditorError::UnknownSymbol(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.symbols.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
