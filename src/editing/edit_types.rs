// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit types, reported to the undo collaborator for grouping

/// Type of edit being performed
///
/// Consecutive edits of the same type can be folded into a single undo
/// step by whoever stores the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditType {
    /// Normal edit (starts a new undo group)
    Normal,

    /// Drag in progress (extends the current undo group)
    Drag,

    /// Drag completed
    DragUp,
}
