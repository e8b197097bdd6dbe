// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor session: one schema, one graph, one pointer.
//!
//! The session routes pointer and keyboard input to the gesture
//! controllers and hands every action they emit to the reducer. At most one
//! pointer gesture is active at a time; a press that arrives while one is
//! running is ignored.

use crate::gesture::{
    self, EditEvent, Gesture, GestureContext, InputDrag, NodeDrag, OutputDrag, ParamEdit,
    PointerEvent, VariantMenu,
};
use blockflow_graph::{
    Action, Curve, EdgeId, Focus, Geometry, GraphError, GraphState, Hit, Layout, NodeId, Reducer,
    SchemaRegistry,
};
use egui::Pos2;
use std::sync::Arc;

/// Callback invoked with the focus after every `setFocus` and whenever a
/// deletion clears it
pub type FocusCallback = Box<dyn FnMut(Option<&Focus>)>;

/// Interactive editing session over a [`GraphState`]
pub struct Editor {
    reducer: Reducer,
    geometry: Geometry,
    state: GraphState,
    node_drag: NodeDrag,
    output_drag: OutputDrag,
    input_drag: InputDrag,
    param_edit: ParamEdit,
    on_focus: Option<FocusCallback>,
}

impl Editor {
    /// Create a session over an initial state
    ///
    /// The state must already be consistent with the schema; use
    /// [`GraphState::validate`] first when it comes from outside.
    pub fn new(schema: impl Into<Arc<SchemaRegistry>>, layout: Layout, state: GraphState) -> Self {
        let schema: Arc<SchemaRegistry> = schema.into();
        Self {
            reducer: Reducer::new(Arc::clone(&schema), layout.clone()),
            geometry: Geometry::new(schema, layout),
            state,
            node_drag: NodeDrag::default(),
            output_drag: OutputDrag::default(),
            input_drag: InputDrag::default(),
            param_edit: ParamEdit::default(),
            on_focus: None,
        }
    }

    /// Register the focus callback
    pub fn with_focus_callback(mut self, callback: impl FnMut(Option<&Focus>) + 'static) -> Self {
        self.on_focus = Some(Box::new(callback));
        self
    }

    /// Current graph
    pub fn state(&self) -> &GraphState {
        &self.state
    }

    /// Replace the graph wholesale, ending any gesture in progress
    pub fn set_state(&mut self, state: GraphState) {
        self.reset_gestures();
        self.state = state;
    }

    /// Geometry queries for rendering
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Apply an action through the reducer
    ///
    /// On error the state is left as it was.
    pub fn dispatch(&mut self, action: Action) -> Result<(), GraphError> {
        let next = self.reducer.reduce(&self.state, &action)?;
        let focus_changed =
            matches!(action, Action::SetFocus(_)) || next.focus() != self.state.focus();
        self.state = next;
        if focus_changed {
            if let Some(callback) = self.on_focus.as_mut() {
                callback(self.state.focus());
            }
        }
        Ok(())
    }

    /// Dispatch an action produced by a gesture
    ///
    /// A gesture can outlive the element it started on, so failures here
    /// are logged and dropped.
    fn apply(&mut self, action: Option<Action>) {
        let Some(action) = action else { return };
        let name = action.name();
        if let Err(e) = self.dispatch(action) {
            tracing::warn!("Ignoring {} from gesture: {}", name, e);
        }
    }

    /// Whether a pointer gesture is in progress
    pub fn is_gesture_active(&self) -> bool {
        !(self.node_drag.is_idle() && self.output_drag.is_idle() && self.input_drag.is_idle())
    }

    /// Whether a param field is being edited
    pub fn is_editing(&self) -> bool {
        !self.param_edit.is_idle()
    }

    /// Uncommitted text of the param being edited
    pub fn edit_buffer(&self) -> Option<&str> {
        self.param_edit.buffer()
    }

    /// Node being dragged, if any
    pub fn dragged_node(&self) -> Option<&NodeId> {
        self.node_drag.node()
    }

    /// Edge being lifted by an input drag, for the renderer to hide
    pub fn detached_edge(&self) -> Option<&EdgeId> {
        self.input_drag.detached_edge()
    }

    /// Connector following the pointer, if an edge is being dragged
    pub fn preview(&self) -> Option<Curve> {
        self.output_drag
            .preview(&self.geometry)
            .or_else(|| self.input_drag.preview(&self.geometry))
    }

    /// Handle one pointer event
    pub fn pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(p) => self.press(p),
            PointerEvent::Move(_) | PointerEvent::Up(_) => {
                let ctx = GestureContext::new(&self.state, &self.geometry);
                let action = if !self.node_drag.is_idle() {
                    gesture::step(&mut self.node_drag, event, &ctx)
                } else if !self.output_drag.is_idle() {
                    gesture::step(&mut self.output_drag, event, &ctx)
                } else if !self.input_drag.is_idle() {
                    gesture::step(&mut self.input_drag, event, &ctx)
                } else {
                    None
                };
                self.apply(action);
            }
        }
    }

    fn press(&mut self, p: Pos2) {
        if self.is_editing() {
            let ctx = GestureContext::new(&self.state, &self.geometry);
            let action = gesture::step(&mut self.param_edit, PointerEvent::Down(p), &ctx);
            let blurred = self.param_edit.is_idle();
            self.apply(action);
            if blurred {
                tracing::debug!("Param edit committed on blur");
            }
            return;
        }
        if self.is_gesture_active() {
            tracing::debug!("Ignoring pointer down at {:?} during active gesture", p);
            return;
        }

        match self.geometry.hit_test(&self.state, p) {
            Hit::Close(id) => return self.apply(Some(Action::delete_node(id))),
            Hit::Header(id) | Hit::Body(id) | Hit::Param { node: id, .. } => {
                self.focus(Some(Focus::Node(id)));
            }
            Hit::Edge(id) => self.focus(Some(Focus::Edge(id))),
            Hit::Background => self.focus(None),
            Hit::Input(_) | Hit::Output(_) => {}
        }

        let event = PointerEvent::Down(p);
        let ctx = GestureContext::new(&self.state, &self.geometry);
        let action = gesture::step(&mut self.node_drag, event, &ctx)
            .or_else(|| gesture::step(&mut self.output_drag, event, &ctx))
            .or_else(|| gesture::step(&mut self.input_drag, event, &ctx))
            .or_else(|| gesture::step(&mut self.param_edit, event, &ctx));
        self.apply(action);
    }

    fn focus(&mut self, focus: Option<Focus>) {
        self.apply(Some(Action::set_focus(focus)));
    }

    /// Handle keyboard input for the param being edited
    pub fn edit(&mut self, event: EditEvent) {
        let transition = std::mem::take(&mut self.param_edit).on_edit(event);
        self.param_edit = transition.next;
        self.apply(transition.action);
    }

    /// Variant dropdown for a node
    pub fn variant_menu(&self, node: &NodeId) -> Option<VariantMenu> {
        VariantMenu::for_node(&GestureContext::new(&self.state, &self.geometry), node)
    }

    /// Switch a node to another variant of its archetype
    pub fn select_variant(&mut self, node: &NodeId, action: &str) -> Result<(), GraphError> {
        let menu = self
            .variant_menu(node)
            .ok_or_else(|| GraphError::UnknownNode(node.clone()))?;
        match menu.select(action) {
            Some(action) => self.dispatch(action),
            None => Ok(()),
        }
    }

    /// Create a node from a palette entry dropped at a pixel offset
    pub fn drop_palette_entry(
        &mut self,
        archetype: &str,
        action: &str,
        at: Pos2,
    ) -> Result<(), GraphError> {
        self.dispatch(Action::create_variant(archetype, at, action))
    }

    fn reset_gestures(&mut self) {
        self.node_drag = NodeDrag::default();
        self.output_drag = OutputDrag::default();
        self.input_drag = InputDrag::default();
        self.param_edit = ParamEdit::default();
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("state", &self.state)
            .field("node_drag", &self.node_drag)
            .field("output_drag", &self.output_drag)
            .field("input_drag", &self.input_drag)
            .field("param_edit", &self.param_edit)
            .finish_non_exhaustive()
    }
}
