// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Diagram data model

pub mod component;
pub mod diagram;
pub mod entity_id;
pub mod symbol;

pub use component::{Component, ComponentKind, DragHandle, NodeComponent, WireComponent};
pub use diagram::Diagram;
pub use entity_id::EntityId;
pub use symbol::{Pin, Symbol, SymbolLibrary};
