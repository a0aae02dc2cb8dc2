// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Tool system for schematic editing

use crate::editing::{Drag, EditSession, EditType, MouseDelegate, MouseEvent};
use serde::{Deserialize, Serialize};

// ===== Tool Identifier =====

/// Tool identifier; doubles as the editor mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolId {
    /// Select, drag components, pan the canvas
    Select,
    /// Place symbol instances
    Place,
    /// Draw orthogonal wires
    Line,
    /// Remove components
    Erase,
}

impl ToolId {
    /// Whether components accept drag gestures in this mode
    pub fn enables_drag(self) -> bool {
        self == ToolId::Select
    }
}

// ===== Tool Trait =====

/// A tool for editing the diagram
pub trait Tool: MouseDelegate<Data = EditSession> {
    /// Get the tool identifier
    fn id(&self) -> ToolId;

    /// Get the edit type for the current operation (for undo grouping)
    fn edit_type(&self) -> Option<EditType> {
        None
    }
}

// ===== ToolBox Enum =====

/// Enum wrapping all tool types
#[derive(Debug, Clone)]
pub enum ToolBox {
    Select(select::SelectTool),
    Place(place::PlaceTool),
    Line(line::LineTool),
    Erase(erase::EraseTool),
}

impl Default for ToolBox {
    fn default() -> Self {
        ToolBox::Select(select::SelectTool::default())
    }
}

// ===== ToolBox Implementation =====

impl ToolBox {
    /// Create a tool by ID
    pub fn for_id(id: ToolId) -> Self {
        match id {
            ToolId::Select => ToolBox::Select(select::SelectTool::default()),
            ToolId::Place => ToolBox::Place(place::PlaceTool::default()),
            ToolId::Line => ToolBox::Line(line::LineTool::default()),
            ToolId::Erase => ToolBox::Erase(erase::EraseTool::default()),
        }
    }

    /// Placement tool for `symbol`
    pub fn place(symbol: impl Into<String>) -> Self {
        ToolBox::Place(place::PlaceTool::new(symbol))
    }

    /// Get the tool ID
    pub fn id(&self) -> ToolId {
        match self {
            ToolBox::Select(tool) => tool.id(),
            ToolBox::Place(tool) => tool.id(),
            ToolBox::Line(tool) => tool.id(),
            ToolBox::Erase(tool) => tool.id(),
        }
    }

    /// Get edit type
    pub fn edit_type(&self) -> Option<EditType> {
        match self {
            ToolBox::Select(tool) => tool.edit_type(),
            ToolBox::Place(tool) => tool.edit_type(),
            ToolBox::Line(tool) => tool.edit_type(),
            ToolBox::Erase(tool) => tool.edit_type(),
        }
    }

    /// The line state machine, when the line tool is active
    pub fn line_builder(&self) -> Option<&line::LineBuilder> {
        match self {
            ToolBox::Line(tool) => Some(&tool.builder),
            _ => None,
        }
    }

    pub fn line_builder_mut(&mut self) -> Option<&mut line::LineBuilder> {
        match self {
            ToolBox::Line(tool) => Some(&mut tool.builder),
            _ => None,
        }
    }
}

// ===== MouseDelegate Implementation =====

/// Lets the `Mouse` state machine drive whichever tool is active
impl MouseDelegate for ToolBox {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_down(event, data),
            ToolBox::Place(tool) => tool.left_down(event, data),
            ToolBox::Line(tool) => tool.left_down(event, data),
            ToolBox::Erase(tool) => tool.left_down(event, data),
        }
    }

    fn left_up(&mut self, event: MouseEvent, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_up(event, data),
            ToolBox::Place(tool) => tool.left_up(event, data),
            ToolBox::Line(tool) => tool.left_up(event, data),
            ToolBox::Erase(tool) => tool.left_up(event, data),
        }
    }

    fn left_click(&mut self, event: MouseEvent, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_click(event, data),
            ToolBox::Place(tool) => tool.left_click(event, data),
            ToolBox::Line(tool) => tool.left_click(event, data),
            ToolBox::Erase(tool) => tool.left_click(event, data),
        }
    }

    fn mouse_moved(&mut self, event: MouseEvent, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.mouse_moved(event, data),
            ToolBox::Place(tool) => tool.mouse_moved(event, data),
            ToolBox::Line(tool) => tool.mouse_moved(event, data),
            ToolBox::Erase(tool) => tool.mouse_moved(event, data),
        }
    }

    fn left_drag_began(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_drag_began(event, drag, data),
            ToolBox::Place(tool) => tool.left_drag_began(event, drag, data),
            ToolBox::Line(tool) => tool.left_drag_began(event, drag, data),
            ToolBox::Erase(tool) => tool.left_drag_began(event, drag, data),
        }
    }

    fn left_drag_changed(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_drag_changed(event, drag, data),
            ToolBox::Place(tool) => tool.left_drag_changed(event, drag, data),
            ToolBox::Line(tool) => tool.left_drag_changed(event, drag, data),
            ToolBox::Erase(tool) => tool.left_drag_changed(event, drag, data),
        }
    }

    fn left_drag_ended(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_drag_ended(event, drag, data),
            ToolBox::Place(tool) => tool.left_drag_ended(event, drag, data),
            ToolBox::Line(tool) => tool.left_drag_ended(event, drag, data),
            ToolBox::Erase(tool) => tool.left_drag_ended(event, drag, data),
        }
    }

    fn cancel(&mut self, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.cancel(data),
            ToolBox::Place(tool) => tool.cancel(data),
            ToolBox::Line(tool) => tool.cancel(data),
            ToolBox::Erase(tool) => tool.cancel(data),
        }
    }
}

// ===== Tool Modules =====

pub mod erase;
pub mod line;
pub mod place;
pub mod select;
