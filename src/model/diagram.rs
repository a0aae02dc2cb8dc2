// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! The diagram: components in z-order, bottom first.
//!
//! Adding a component registers its anchors with the snap engine;
//! removing it releases them, so the registry always mirrors the store.

use super::component::Component;
use super::entity_id::EntityId;
use crate::editing::selection::Selection;
use crate::editing::snap::SnapEngine;
use crate::error::EditorError;
use crate::geometry::{rect_contains, union_rects};
use kurbo::{Point, Rect};

#[derive(Debug, Default)]
pub struct Diagram {
    components: Vec<Component>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components from bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Component> {
        self.components.iter_mut()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.components.iter().map(Component::id).collect()
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.components.iter().position(|c| c.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Component> {
        self.components.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id() == id)
    }

    /// Add on top and register the component's anchors
    pub fn add(&mut self, mut component: Component, engine: &SnapEngine) -> EntityId {
        component.register_snap_points(engine);
        let id = component.id();
        tracing::debug!("adding component {id}");
        self.components.push(component);
        id
    }

    /// Remove a component, releasing its anchors
    pub fn remove(&mut self, id: EntityId) -> Result<Component, EditorError> {
        let index = self.index_of(id).ok_or(EditorError::UnknownEntity(id))?;
        let mut component = self.components.remove(index);
        component.release_snap_points();
        tracing::debug!("removed component {id}");
        Ok(component)
    }

    /// Topmost component under `point`
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<EntityId> {
        self.components
            .iter()
            .rev()
            .find(|c| c.hit_test(point, tolerance))
            .map(Component::id)
    }

    /// Components whose bounds lie entirely inside `rect`
    pub fn ids_in_rect(&self, rect: Rect) -> Vec<EntityId> {
        let rect = rect.abs();
        self.components
            .iter()
            .filter(|c| {
                let bbox = c.bounding_box();
                rect_contains(rect, bbox.origin()) && rect_contains(rect, Point::new(bbox.x1, bbox.y1))
            })
            .map(Component::id)
            .collect()
    }

    /// Bounds of everything, `None` when empty
    pub fn bounding_box(&self) -> Option<Rect> {
        union_rects(self.components.iter().map(Component::bounding_box))
    }

    /// Enable or disable dragging on every component
    pub fn set_drag_enabled(&mut self, enabled: bool) {
        for component in self.components.iter_mut() {
            if enabled {
                component.enable_drag();
            } else {
                component.disable_drag();
            }
        }
    }

    // ===== Z-order =====

    /// Move the selected components one step up, past unselected ones
    pub fn bring_forward(&mut self, selection: &Selection) {
        for i in (0..self.components.len().saturating_sub(1)).rev() {
            if selection.contains(&self.components[i].id())
                && !selection.contains(&self.components[i + 1].id())
            {
                self.components.swap(i, i + 1);
            }
        }
    }

    /// Move the selected components one step down, past unselected ones
    pub fn send_backward(&mut self, selection: &Selection) {
        for i in 1..self.components.len() {
            if selection.contains(&self.components[i].id())
                && !selection.contains(&self.components[i - 1].id())
            {
                self.components.swap(i, i - 1);
            }
        }
    }

    /// Move the selected components above everything else, keeping
    /// their relative order
    pub fn bring_to_front(&mut self, selection: &Selection) {
        let (mut rest, selected): (Vec<_>, Vec<_>) = std::mem::take(&mut self.components)
            .into_iter()
            .partition(|c| !selection.contains(&c.id()));
        rest.extend(selected);
        self.components = rest;
    }

    /// Move the selected components below everything else
    pub fn send_to_back(&mut self, selection: &Selection) {
        let (mut selected, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.components)
            .into_iter()
            .partition(|c| selection.contains(&c.id()));
        selected.extend(rest);
        self.components = selected;
    }
}
