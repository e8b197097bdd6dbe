// SPDX-License-Identifier: MIT OR Apache-2.0
//! Moving a node by its header.

use super::{Gesture, GestureContext, PointerEvent, Transition};
use blockflow_graph::{Action, GridPos, Hit, NodeId};
use egui::Vec2;

/// Node move controller: `Idle → Dragging → Idle`
///
/// The model is updated live: every time the snapped cell under the
/// pointer changes, a `moveNode` is emitted. Releasing just ends the
/// gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum NodeDrag {
    /// Waiting for a press on a node header
    #[default]
    Idle,
    /// Following the pointer
    Dragging {
        /// Node being moved
        node: NodeId,
        /// Pointer position relative to the node origin at press time
        grab: Vec2,
        /// Last cell sent to the reducer
        cell: GridPos,
    },
}

impl NodeDrag {
    /// Node being dragged, if any
    pub fn node(&self) -> Option<&NodeId> {
        match self {
            Self::Idle => None,
            Self::Dragging { node, .. } => Some(node),
        }
    }
}

impl Gesture for NodeDrag {
    fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    fn on_pointer(self, event: PointerEvent, ctx: &GestureContext<'_>) -> Transition<Self> {
        match (self, event) {
            (Self::Idle, PointerEvent::Down(p)) => {
                let Hit::Header(id) = ctx.hit(p) else {
                    return Transition::to(Self::Idle);
                };
                let Some(node) = ctx.state.node(&id) else {
                    return Transition::to(Self::Idle);
                };
                let origin = ctx.geometry.place(node.position, Vec2::ZERO);
                Transition::to(Self::Dragging {
                    node: id,
                    grab: p - origin,
                    cell: node.position,
                })
            }
            (Self::Dragging { node, grab, cell }, PointerEvent::Move(p)) => {
                let candidate = ctx.geometry.snap(p - grab);
                if candidate == cell {
                    return Transition::to(Self::Dragging { node, grab, cell });
                }
                let action = Action::move_node(node.clone(), candidate);
                Transition::emit(
                    Self::Dragging {
                        node,
                        grab,
                        cell: candidate,
                    },
                    action,
                )
            }
            (Self::Dragging { .. }, PointerEvent::Up(_)) => Transition::to(Self::Idle),
            (state, _) => Transition::to(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::fixtures;
    use egui::vec2;

    #[test]
    fn test_drag_emits_on_cell_change() {
        let state = fixtures::state();
        let geometry = fixtures::geometry();
        let ctx = GestureContext::new(&state, &geometry);
        let press = geometry.place(GridPos::new(1, 1), vec2(30.0, 8.0));

        let t = NodeDrag::Idle.on_pointer(PointerEvent::Down(press), &ctx);
        assert!(t.action.is_none());
        assert_eq!(t.next.node(), Some(&NodeId::from("n0")));

        // Less than half a cell: no move
        let t = t.next.on_pointer(PointerEvent::Move(press + vec2(5.0, 5.0)), &ctx);
        assert!(t.action.is_none());

        let t = t.next.on_pointer(PointerEvent::Move(press + vec2(50.0, 24.0)), &ctx);
        assert_eq!(t.action, Some(Action::move_node("n0", GridPos::new(3, 2))));

        let t = t.next.on_pointer(PointerEvent::Move(press + vec2(52.0, 26.0)), &ctx);
        assert!(t.action.is_none());

        let t = t.next.on_pointer(PointerEvent::Up(press), &ctx);
        assert_eq!(t.next, NodeDrag::Idle);
        assert!(t.action.is_none());
    }

    #[test]
    fn test_press_outside_header_stays_idle() {
        let state = fixtures::state();
        let geometry = fixtures::geometry();
        let ctx = GestureContext::new(&state, &geometry);

        let body = geometry.place(GridPos::new(1, 1), vec2(40.0, 180.0));
        let t = NodeDrag::Idle.on_pointer(PointerEvent::Down(body), &ctx);
        assert!(t.next.is_idle());

        let t = NodeDrag::Idle.on_pointer(PointerEvent::Up(body), &ctx);
        assert!(t.next.is_idle());
    }
}
