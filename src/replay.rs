// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Scripted sessions: drive an `EditSession` from a JSON list of actions
//! and capture the resulting diagram.
//!
//! Pointer actions carry client coordinates, exactly as a host would
//! deliver them; editing actions (`place`, `move_selection`) use canvas
//! coordinates.
//!
//! ```json
//! {
//!   "element": [0, 0, 800, 600],
//!   "actions": [
//!     { "type": "place", "symbol": "resistor", "at": [0, 0] },
//!     { "type": "set_tool", "tool": "line" },
//!     { "type": "mouse", "phase": "down", "pos": [40, 560] },
//!     { "type": "mouse", "phase": "up", "pos": [40, 560] }
//!   ]
//! }
//! ```

use crate::config::LengthValue;
use crate::editing::gesture::GestureEvent;
use crate::editing::grid::GridSettings;
use crate::editing::input::{InputEvent, TouchList};
use crate::editing::mouse::{Modifiers, MouseButton};
use crate::editing::EditSession;
use crate::geometry::{Angle, Axis};
use crate::model::{ComponentKind, EntityId};
use crate::tools::{ToolBox, ToolId};
use anyhow::{Context, Result};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

type Pair = [f64; 2];

fn point(p: Pair) -> Point {
    Point::new(p[0], p[1])
}

fn vec2(p: Pair) -> Vec2 {
    Vec2::new(p[0], p[1])
}

fn rect(r: [f64; 4]) -> Rect {
    Rect::new(r[0], r[1], r[2], r[3])
}

/// Stage of a pointer contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Down,
    Move,
    Up,
}

/// One step of a script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Resize {
        rect: [f64; 4],
    },
    ResetView,
    FitView,
    SetTool {
        tool: ToolId,
        #[serde(default)]
        symbol: Option<String>,
    },
    Mouse {
        phase: Phase,
        pos: Pair,
        #[serde(default)]
        button: MouseButton,
        #[serde(default)]
        mods: Modifiers,
    },
    Wheel {
        pos: Pair,
        delta: f64,
    },
    Touch {
        phase: Phase,
        #[serde(default)]
        touches: Vec<Pair>,
        #[serde(default)]
        changed: Vec<Pair>,
    },
    Pan {
        delta: Pair,
    },
    Zoom {
        level: f64,
        focus: Pair,
    },
    PinchBox {
        rect: [f64; 4],
    },
    Place {
        symbol: String,
        at: Pair,
        /// Snap all anchors of the symbol before placing
        #[serde(default)]
        snap: bool,
    },
    ConfirmLine,
    CancelLine,
    Escape,
    SelectAll,
    ClearSelection,
    DeleteSelection,
    Rotate {
        degrees: f64,
    },
    Flip {
        axis: Axis,
    },
    MoveSelection {
        delta: Pair,
    },
    SetGrid {
        major_size: LengthValue,
        subdivisions: u32,
        #[serde(default = "default_visible")]
        visible: bool,
    },
    BringForward,
    SendBackward,
    BringToFront,
    SendToBack,
}

fn default_visible() -> bool {
    true
}

fn default_element() -> [f64; 4] {
    [0.0, 0.0, 800.0, 600.0]
}

/// A scripted editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Client rectangle of the canvas element
    #[serde(default = "default_element")]
    pub element: [f64; 4],
    pub actions: Vec<Action>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse script {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn element_rect(&self) -> Rect {
        rect(self.element)
    }

    /// Run every action in order, stopping at the first failure
    pub fn run(&self, session: &mut EditSession) -> Result<()> {
        for (index, action) in self.actions.iter().enumerate() {
            apply(session, action).with_context(|| format!("action {index} ({action:?}) failed"))?;
        }
        tracing::info!("replayed {} action(s)", self.actions.len());
        Ok(())
    }
}

/// Apply one action to the session
pub fn apply(session: &mut EditSession, action: &Action) -> Result<()> {
    tracing::debug!("apply {:?}", action);
    match action {
        Action::Resize { rect: r } => session.handle_input(InputEvent::Resize(rect(*r))),
        Action::ResetView => session.reset_view(),
        Action::FitView => session.fit_view(),
        Action::SetTool { tool, symbol } => {
            let tool = match (tool, symbol) {
                (ToolId::Place, Some(symbol)) => {
                    session.library.get(symbol)?;
                    ToolBox::place(symbol.clone())
                }
                (ToolId::Place, None) => anyhow::bail!("the place tool needs a symbol"),
                (id, _) => ToolBox::for_id(*id),
            };
            session.set_tool(tool);
        }
        Action::Mouse {
            phase,
            pos,
            button,
            mods,
        } => {
            let (pos, button, mods) = (point(*pos), *button, *mods);
            session.handle_input(match phase {
                Phase::Down => InputEvent::MouseDown { pos, button, mods },
                Phase::Move => InputEvent::MouseMove { pos, mods },
                Phase::Up => InputEvent::MouseUp { pos, button, mods },
            });
        }
        Action::Wheel { pos, delta } => session.handle_input(InputEvent::Wheel {
            pos: point(*pos),
            delta: *delta,
            mods: Modifiers::NONE,
        }),
        Action::Touch {
            phase,
            touches,
            changed,
        } => {
            let list = TouchList {
                touches: touches.iter().copied().map(point).collect(),
                changed: changed.iter().copied().map(point).collect(),
                mods: Modifiers::NONE,
            };
            session.handle_input(match phase {
                Phase::Down => InputEvent::TouchStart(list),
                Phase::Move => InputEvent::TouchMove(list),
                Phase::Up => InputEvent::TouchEnd(list),
            });
        }
        Action::Pan { delta } => {
            session.handle_input(InputEvent::Gesture(GestureEvent::PanDelta(vec2(*delta))))
        }
        Action::Zoom { level, focus } => session.handle_input(InputEvent::Gesture(GestureEvent::ZoomLevel {
            level: *level,
            focus: point(*focus),
        })),
        Action::PinchBox { rect: r } => {
            session.handle_input(InputEvent::Gesture(GestureEvent::PinchBox(rect(*r))))
        }
        Action::Place { symbol, at, snap } => {
            if *snap {
                session.place_symbol_snapped(symbol, point(*at), false)?;
            } else {
                session.place_symbol(symbol, point(*at))?;
            }
        }
        Action::ConfirmLine => {
            session.confirm_line()?;
        }
        Action::CancelLine => {
            session.cancel_line();
        }
        Action::Escape => session.escape(),
        Action::SelectAll => session.select_all(),
        Action::ClearSelection => session.clear_selection(),
        Action::DeleteSelection => {
            session.delete_selection();
        }
        Action::Rotate { degrees } => session.rotate_selection(Angle::degrees(*degrees)),
        Action::Flip { axis } => session.flip_selection(*axis),
        Action::MoveSelection { delta } => session.move_selection_rel(vec2(*delta)),
        Action::SetGrid {
            major_size,
            subdivisions,
            visible,
        } => {
            let grid = GridSettings {
                major_size: major_size.to_length().context("major_size")?,
                subdivisions: *subdivisions,
                visible: *visible,
            };
            session.set_grid(grid)?;
        }
        Action::BringForward => session.bring_forward(),
        Action::SendBackward => session.send_backward(),
        Action::BringToFront => session.bring_to_front(),
        Action::SendToBack => session.send_to_back(),
    }
    Ok(())
}

// ===== Snapshot =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    /// x0, y0, x1, y1 of the visible canvas area
    pub viewbox: [f64; 4],
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinSnapshot {
    pub name: String,
    pub position: Pair,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentSnapshot {
    Node {
        id: u64,
        symbol: String,
        position: Pair,
        rotation: f64,
        flip_x: bool,
        flip_y: bool,
        pins: Vec<PinSnapshot>,
    },
    Wire {
        id: u64,
        points: Vec<Pair>,
    },
}

/// State of a session after a replay, in z-order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tool: ToolId,
    pub view: ViewSnapshot,
    pub components: Vec<ComponentSnapshot>,
    pub selection: Vec<u64>,
    /// Vertices of the line being drawn, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_preview: Option<Vec<Pair>>,
}

fn pair(p: Point) -> Pair {
    [p.x, p.y]
}

impl Snapshot {
    pub fn capture(session: &EditSession) -> Self {
        let viewbox = session.viewport.viewbox();
        let components = session
            .diagram
            .iter()
            .map(|component| match &component.kind {
                ComponentKind::Node(node) => ComponentSnapshot::Node {
                    id: component.id().raw(),
                    symbol: node.symbol.id.clone(),
                    position: pair(node.position),
                    rotation: node.rotation,
                    flip_x: node.flip_x,
                    flip_y: node.flip_y,
                    pins: node
                        .pins()
                        .into_iter()
                        .map(|(name, p)| PinSnapshot {
                            name,
                            position: pair(p),
                        })
                        .collect(),
                },
                ComponentKind::Wire(wire) => ComponentSnapshot::Wire {
                    id: component.id().raw(),
                    points: wire.points.iter().copied().map(pair).collect(),
                },
            })
            .collect();
        let line_preview = session
            .line_builder()
            .filter(|line| line.is_active())
            .map(|line| line.preview().into_iter().map(pair).collect());

        Self {
            tool: session.tool_id(),
            view: ViewSnapshot {
                viewbox: [viewbox.x0, viewbox.y0, viewbox.x1, viewbox.y1],
                zoom: session.viewport.zoom(),
            },
            components,
            selection: session.selection.iter().map(|id| EntityId::raw(*id)).collect(),
            line_preview,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize snapshot")
    }
}
