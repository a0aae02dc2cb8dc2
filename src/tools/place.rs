// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Place tool: drops instances of one symbol where the user clicks

use crate::editing::{EditSession, EditType, MouseDelegate, MouseEvent};
use crate::tools::{Tool, ToolId};

#[derive(Debug, Clone, Default)]
pub struct PlaceTool {
    /// Symbol to place; clicks do nothing until one is chosen
    pub symbol: Option<String>,
}

impl PlaceTool {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
        }
    }
}

impl Tool for PlaceTool {
    fn id(&self) -> ToolId {
        ToolId::Place
    }

    fn edit_type(&self) -> Option<EditType> {
        Some(EditType::Normal)
    }
}

impl MouseDelegate for PlaceTool {
    type Data = EditSession;

    fn left_click(&mut self, event: MouseEvent, data: &mut EditSession) {
        let Some(symbol) = self.symbol.as_deref() else {
            tracing::warn!("place tool has no symbol selected");
            return;
        };
        if let Err(err) = data.place_symbol_snapped(symbol, event.pos, event.mods.shift) {
            tracing::warn!("could not place '{symbol}': {err}");
        }
    }

    fn cancel(&mut self, _data: &mut EditSession) {}
}
