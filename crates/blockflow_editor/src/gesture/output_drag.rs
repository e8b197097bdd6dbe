// SPDX-License-Identifier: MIT OR Apache-2.0
//! Creating an edge by dragging from an output port.

use super::{Gesture, GestureContext, PointerEvent, Transition};
use blockflow_graph::{Action, Curve, Geometry, Hit, Source};
use egui::Pos2;

/// Output drag controller: `Idle → Previewing → Idle`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OutputDrag {
    /// Waiting for a press on an output port
    #[default]
    Idle,
    /// Showing a detached connector that follows the pointer
    Previewing {
        /// Output the edge would start from
        source: Source,
        /// Pixel position of that output
        anchor: Pos2,
        /// Current pointer position
        pointer: Pos2,
    },
}

impl OutputDrag {
    /// Connector to draw while previewing
    pub fn preview(&self, geometry: &Geometry) -> Option<Curve> {
        match self {
            Self::Idle => None,
            Self::Previewing {
                anchor, pointer, ..
            } => Some(geometry.curve(*anchor, *pointer)),
        }
    }
}

impl Gesture for OutputDrag {
    fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    fn on_pointer(self, event: PointerEvent, ctx: &GestureContext<'_>) -> Transition<Self> {
        match (self, event) {
            (Self::Idle, PointerEvent::Down(p)) => match ctx.hit(p) {
                Hit::Output(source) => {
                    let anchor = ctx.geometry.source_position(ctx.state, &source).unwrap_or(p);
                    Transition::to(Self::Previewing {
                        source,
                        anchor,
                        pointer: p,
                    })
                }
                _ => Transition::to(Self::Idle),
            },
            (Self::Previewing { source, anchor, .. }, PointerEvent::Move(p)) => {
                Transition::to(Self::Previewing {
                    source,
                    anchor,
                    pointer: p,
                })
            }
            (Self::Previewing { source, .. }, PointerEvent::Up(p)) => match ctx.hit(p) {
                Hit::Input(target) if target.id != source.id => {
                    Transition::emit(Self::Idle, Action::create_edge(source, target))
                }
                _ => {
                    tracing::debug!("Discarding edge preview from {}.{}", source.id, source.output);
                    Transition::to(Self::Idle)
                }
            },
            (state, _) => Transition::to(state),
        }
    }
}
