// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Immutable selection set for tracking which components are selected.
//!
//! `Selection` wraps an `Arc<BTreeSet<EntityId>>` so it can be cloned
//! cheaply into diagram snapshots. Mutations copy the set. The `BTreeSet`
//! gives deterministic iteration order, so group transforms visit members
//! in the same order every time.

use crate::model::EntityId;
use std::collections::BTreeSet;
use std::sync::Arc;

/// A set of selected components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    inner: Arc<BTreeSet<EntityId>>,
}

impl Selection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BTreeSet::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.inner.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityId> {
        self.inner.iter()
    }

    /// Selected ids in ascending order
    pub fn to_vec(&self) -> Vec<EntityId> {
        self.inner.iter().copied().collect()
    }

    pub fn insert(&mut self, id: EntityId) {
        Arc::make_mut(&mut self.inner).insert(id);
    }

    pub fn remove(&mut self, id: &EntityId) {
        Arc::make_mut(&mut self.inner).remove(id);
    }

    /// Add `id` if absent, remove it if present
    pub fn toggle(&mut self, id: EntityId) {
        let set = Arc::make_mut(&mut self.inner);
        if !set.remove(&id) {
            set.insert(id);
        }
    }

    pub fn clear(&mut self) {
        self.inner = Arc::new(BTreeSet::new());
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<EntityId> for Selection {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        Self {
            inner: Arc::new(iter.into_iter().collect()),
        }
    }
}
