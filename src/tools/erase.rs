// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Erase tool: removes whatever is clicked or swept over

use crate::editing::{Drag, EditSession, EditType, MouseDelegate, MouseEvent};
use crate::tools::{Tool, ToolId};

#[derive(Debug, Clone, Default)]
pub struct EraseTool {
    erasing: bool,
}

impl EraseTool {
    fn erase_at(&self, event: &MouseEvent, data: &mut EditSession) {
        if let Some(id) = data.hit_test(event.pos) {
            // hit_test only returns ids present in the diagram
            if let Err(err) = data.remove_component(id) {
                tracing::warn!("erase failed: {err}");
            }
        }
    }
}

impl Tool for EraseTool {
    fn id(&self) -> ToolId {
        ToolId::Erase
    }

    fn edit_type(&self) -> Option<EditType> {
        self.erasing.then_some(EditType::Drag)
    }
}

impl MouseDelegate for EraseTool {
    type Data = EditSession;

    fn left_click(&mut self, event: MouseEvent, data: &mut EditSession) {
        self.erase_at(&event, data);
    }

    fn left_drag_began(&mut self, event: MouseEvent, _drag: Drag, data: &mut EditSession) {
        self.erasing = true;
        self.erase_at(&event, data);
    }

    fn left_drag_changed(&mut self, event: MouseEvent, _drag: Drag, data: &mut EditSession) {
        self.erase_at(&event, data);
    }

    fn left_drag_ended(&mut self, _event: MouseEvent, _drag: Drag, _data: &mut EditSession) {
        self.erasing = false;
    }

    fn cancel(&mut self, _data: &mut EditSession) {
        self.erasing = false;
    }
}
