// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod drag;
pub mod edit_types;
pub mod gesture;
pub mod grid;
pub mod input;
pub mod mouse;
pub mod selection;
pub mod session;
pub mod snap;
pub mod viewport;

pub use drag::{DragCoordinator, DragOutcome};
pub use edit_types::EditType;
pub use gesture::GestureEvent;
pub use grid::{GridError, GridOverlay, GridSettings};
pub use input::{InputEvent, TouchList};
pub use mouse::{Drag, Modifiers, Mouse, MouseButton, MouseDelegate, MouseEvent, PointerKind};
pub use selection::Selection;
pub use session::EditSession;
pub use snap::{SnapEngine, SnapRegistration, SnapResult, SnapTarget};
pub use viewport::ViewPort;
