// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dragging from an input port.
//!
//! On a free input this mirrors the output drag and looks for an output to
//! connect. On a bound input the existing edge is lifted off its source and
//! follows the pointer; dropping it on another output reconnects the input,
//! dropping it anywhere else deletes the edge.

use super::{Gesture, GestureContext, PointerEvent, Transition};
use blockflow_graph::{Action, Curve, Edge, EdgeId, Geometry, Hit, Target};
use egui::Pos2;

/// Input drag controller: `Idle → Previewing → Idle`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputDrag {
    /// Waiting for a press on an input port
    #[default]
    Idle,
    /// Showing a connector from the pointer to the input
    Previewing {
        /// Input the gesture started on
        target: Target,
        /// Pixel position of that input
        anchor: Pos2,
        /// Current pointer position
        pointer: Pos2,
        /// Edge that was bound to the input when the gesture began
        detached: Option<Edge>,
    },
}

impl InputDrag {
    /// Connector to draw while previewing
    pub fn preview(&self, geometry: &Geometry) -> Option<Curve> {
        match self {
            Self::Idle => None,
            Self::Previewing {
                anchor, pointer, ..
            } => Some(geometry.curve(*pointer, *anchor)),
        }
    }

    /// Edge the renderer should hide while it is being moved
    pub fn detached_edge(&self) -> Option<&EdgeId> {
        match self {
            Self::Previewing {
                detached: Some(edge),
                ..
            } => Some(&edge.id),
            _ => None,
        }
    }

    fn release(target: Target, detached: Option<Edge>, hit: Hit) -> Option<Action> {
        match (hit, detached) {
            (Hit::Output(source), Some(edge)) if source == edge.source => None,
            (Hit::Output(source), _) if source.id != target.id => {
                Some(Action::create_edge(source, target))
            }
            (Hit::Input(dropped), _) if dropped == target => None,
            (_, Some(edge)) => Some(Action::delete_edge(edge.id)),
            (_, None) => {
                tracing::debug!("Discarding edge preview into {}.{}", target.id, target.input);
                None
            }
        }
    }
}

impl Gesture for InputDrag {
    fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    fn on_pointer(self, event: PointerEvent, ctx: &GestureContext<'_>) -> Transition<Self> {
        match (self, event) {
            (Self::Idle, PointerEvent::Down(p)) => match ctx.hit(p) {
                Hit::Input(target) => {
                    let detached = ctx
                        .state
                        .node(&target.id)
                        .and_then(|n| n.input(&target.input))
                        .and_then(|id| ctx.state.edge(id))
                        .cloned();
                    let anchor = ctx.geometry.target_position(ctx.state, &target).unwrap_or(p);
                    Transition::to(Self::Previewing {
                        target,
                        anchor,
                        pointer: p,
                        detached,
                    })
                }
                _ => Transition::to(Self::Idle),
            },
            (
                Self::Previewing {
                    target,
                    anchor,
                    detached,
                    ..
                },
                PointerEvent::Move(p),
            ) => Transition::to(Self::Previewing {
                target,
                anchor,
                pointer: p,
                detached,
            }),
            (Self::Previewing { target, detached, .. }, PointerEvent::Up(p)) => Transition {
                next: Self::Idle,
                action: Self::release(target, detached, ctx.hit(p)),
            },
            (state, _) => Transition::to(state),
        }
    }
}
