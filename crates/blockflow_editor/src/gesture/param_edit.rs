// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing a node param.

use super::{Gesture, GestureContext, PointerEvent, Transition};
use blockflow_graph::{Action, Hit, NodeId};

/// Keyboard input routed to the field being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditEvent {
    /// Typed text
    Insert(String),
    /// Remove the last character
    Backspace,
    /// Replace the whole buffer
    Replace(String),
    /// Confirm the edit
    Commit,
    /// Abandon the edit
    Cancel,
}

/// Param edit controller: `Idle → Editing → Idle`
///
/// Keystrokes stay in the local buffer; only a commit (confirm or blur)
/// reaches the reducer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParamEdit {
    /// No field active
    #[default]
    Idle,
    /// A field is active
    Editing {
        /// Node owning the param
        node: NodeId,
        /// Param name
        param: String,
        /// Uncommitted text
        buffer: String,
    },
}

impl ParamEdit {
    /// Start editing with the current value in the buffer
    pub fn begin(node: NodeId, param: String, current: &str) -> Self {
        Self::Editing {
            node,
            param,
            buffer: current.to_string(),
        }
    }

    /// Uncommitted text of the active field
    pub fn buffer(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Editing { buffer, .. } => Some(buffer),
        }
    }

    /// Handle keyboard input
    pub fn on_edit(self, event: EditEvent) -> Transition<Self> {
        let Self::Editing {
            node,
            param,
            mut buffer,
        } = self
        else {
            return Transition::to(Self::Idle);
        };

        match event {
            EditEvent::Insert(text) => buffer.push_str(&text),
            EditEvent::Backspace => {
                buffer.pop();
            }
            EditEvent::Replace(text) => buffer = text,
            EditEvent::Commit => {
                return Transition::emit(Self::Idle, Action::update_param(node, param, buffer));
            }
            EditEvent::Cancel => return Transition::to(Self::Idle),
        }
        Transition::to(Self::Editing {
            node,
            param,
            buffer,
        })
    }
}

impl Gesture for ParamEdit {
    fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    fn on_pointer(self, event: PointerEvent, ctx: &GestureContext<'_>) -> Transition<Self> {
        match (self, event) {
            (Self::Idle, PointerEvent::Down(p)) => match ctx.hit(p) {
                Hit::Param { node, param } => {
                    let current = ctx
                        .state
                        .node(&node)
                        .and_then(|n| n.param(&param))
                        .unwrap_or_default()
                        .to_string();
                    Transition::to(Self::begin(node, param, &current))
                }
                _ => Transition::to(Self::Idle),
            },
            (editing @ Self::Editing { .. }, PointerEvent::Down(p)) => {
                let same_field = match (&editing, ctx.hit(p)) {
                    (Self::Editing { node, param, .. }, Hit::Param { node: n, param: q }) => {
                        *node == n && *param == q
                    }
                    _ => false,
                };
                if same_field {
                    Transition::to(editing)
                } else {
                    // Pressing elsewhere blurs the field
                    editing.on_edit(EditEvent::Commit)
                }
            }
            (state, _) => Transition::to(state),
        }
    }
}
