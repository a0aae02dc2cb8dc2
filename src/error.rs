// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Errors raised by editor operations

use crate::editing::grid::GridError;
use crate::model::EntityId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("invalid grid: {0}")]
    InvalidGrid(#[from] GridError),

    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    #[error("no component with id {0}")]
    UnknownEntity(EntityId),

    #[error("a line needs at least two clicks before it can be confirmed (got {clicks})")]
    LineNotCommittable { clicks: usize },
}
