// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Hit testing and selection methods for EditSession

use super::EditSession;
use crate::editing::selection::Selection;
use crate::model::EntityId;
use crate::settings;
use kurbo::{Point, Rect};

impl EditSession {
    /// Topmost component under a canvas point
    pub fn hit_test(&self, pos: Point) -> Option<EntityId> {
        // tolerance is given in screen pixels
        let tolerance = settings::interaction::HIT_TOLERANCE / self.viewport.zoom();
        self.diagram.hit_test(pos, tolerance)
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Select the components lying entirely inside `rect`. With `extend`
    /// they are added to the current selection instead of replacing it.
    pub fn select_in_rect(&mut self, rect: Rect, extend: bool) {
        let hits = self.diagram.ids_in_rect(rect);
        tracing::debug!("rubber band {:?} selected {} component(s)", rect, hits.len());
        if extend {
            for id in hits {
                self.selection.insert(id);
            }
        } else {
            self.selection = hits.into_iter().collect();
        }
    }

    pub fn select_only(&mut self, id: EntityId) {
        self.selection = Selection::from_iter([id]);
    }

    pub fn toggle_selected(&mut self, id: EntityId) {
        self.selection.toggle(id);
    }

    pub fn select_all(&mut self) {
        self.selection = self.diagram.ids().into_iter().collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}
