// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer gesture state machines.
//!
//! Each controller is an explicit state machine: it takes its current state
//! and one pointer event and returns its next state plus at most one action
//! for the reducer. Controllers read the graph through a [`GestureContext`]
//! and never change it themselves.

pub mod input_drag;
pub mod node_drag;
pub mod output_drag;
pub mod param_edit;
pub mod variant;

pub use input_drag::InputDrag;
pub use node_drag::NodeDrag;
pub use output_drag::OutputDrag;
pub use param_edit::{EditEvent, ParamEdit};
pub use variant::VariantMenu;

use blockflow_graph::{Action, Geometry, GraphState, Hit};
use egui::Pos2;

/// Pointer input in canvas pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed
    Down(Pos2),
    /// Pointer moved
    Move(Pos2),
    /// Button released
    Up(Pos2),
}

impl PointerEvent {
    /// Position carried by the event
    pub fn pos(&self) -> Pos2 {
        match *self {
            Self::Down(p) | Self::Move(p) | Self::Up(p) => p,
        }
    }
}

/// Read-only view a controller consults while handling an event
#[derive(Clone, Copy)]
pub struct GestureContext<'a> {
    /// Current graph
    pub state: &'a GraphState,
    /// Geometry for hit-testing and placement
    pub geometry: &'a Geometry,
}

impl<'a> GestureContext<'a> {
    /// Create a context
    pub fn new(state: &'a GraphState, geometry: &'a Geometry) -> Self {
        Self { state, geometry }
    }

    /// What lies under a point
    pub fn hit(&self, point: Pos2) -> Hit {
        self.geometry.hit_test(self.state, point)
    }
}

/// Result of feeding one event to a controller
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S> {
    /// State after the event
    pub next: S,
    /// Action to hand to the reducer
    pub action: Option<Action>,
}

impl<S> Transition<S> {
    /// Move to `next` without emitting anything
    pub fn to(next: S) -> Self {
        Self { next, action: None }
    }

    /// Move to `next` and emit `action`
    pub fn emit(next: S, action: Action) -> Self {
        Self {
            next,
            action: Some(action),
        }
    }
}

/// A pointer-driven controller
pub trait Gesture: Default + Sized {
    /// Whether the controller is waiting for a new gesture
    fn is_idle(&self) -> bool;

    /// Handle one pointer event
    fn on_pointer(self, event: PointerEvent, ctx: &GestureContext<'_>) -> Transition<Self>;
}

/// Feed an event to a controller held in place, returning its action
pub(crate) fn step<G: Gesture>(
    machine: &mut G,
    event: PointerEvent,
    ctx: &GestureContext<'_>,
) -> Option<Action> {
    let transition = std::mem::take(machine).on_pointer(event, ctx);
    *machine = transition.next;
    transition.action
}

#[cfg(test)]
pub(crate) mod fixtures {
    use blockflow_graph::{
        Action, Geometry, GraphState, GridPos, KindDecl, Layout, Reducer, SchemaRegistry, Source,
        Target,
    };
    use std::sync::Arc;

    pub fn schema() -> Arc<SchemaRegistry> {
        Arc::new(
            SchemaRegistry::new([
                KindDecl::new("source", "Collection Export")
                    .input("a")
                    .input("b")
                    .output("outA")
                    .output("outB"),
                KindDecl::new("csv", "CSV Import")
                    .input("a")
                    .output("outA")
                    .output("outB")
                    .output("outC")
                    .param("delimiter", ","),
                KindDecl::new("csv_reader", "CSV Reader")
                    .input("path")
                    .output("rows")
                    .with_group("reader", "csv"),
                KindDecl::new("json_reader", "JSON Reader")
                    .input("path")
                    .output("rows")
                    .with_group("reader", "json"),
            ])
            .expect("fixture schema is valid"),
        )
    }

    pub fn geometry() -> Geometry {
        Geometry::new(schema(), Layout::default())
    }

    /// `n0` (csv) at (1, 1) wired to `n1` (source) at (14, 12) via `n1.b`
    pub fn state() -> GraphState {
        let reducer = Reducer::new(schema(), Layout::default());
        let mut state = GraphState::new();
        for action in [
            Action::create_node("csv", GridPos::new(1, 1)),
            Action::create_node("source", GridPos::new(14, 12)),
            Action::create_edge(Source::new("n0", "outB"), Target::new("n1", "b")),
        ] {
            state = reducer.reduce(&state, &action).expect("fixture action applies");
        }
        state
    }
}
