// SPDX-License-Identifier: MIT OR Apache-2.0
//! Kind-variant dropdown shown in a node's header.

use super::GestureContext;
use blockflow_graph::{Action, NodeId};

/// Options offered for one node's archetype
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantMenu {
    /// Node the menu belongs to
    pub node: NodeId,
    /// Archetype shared by every option
    pub archetype: String,
    /// Action of the node's current kind
    pub current: String,
    /// Selectable actions, in declaration order
    pub options: Vec<String>,
}

impl VariantMenu {
    /// Build the menu for a node, if its kind belongs to an archetype
    pub fn for_node(ctx: &GestureContext<'_>, node: &NodeId) -> Option<Self> {
        let kind = ctx.state.node(node)?;
        let group = ctx.geometry.schema().get(&kind.kind)?.group()?;
        let options = ctx
            .geometry
            .schema()
            .variants(&group.archetype)
            .map(str::to_string)
            .collect();

        Some(Self {
            node: node.clone(),
            archetype: group.archetype.clone(),
            current: group.action.clone(),
            options,
        })
    }

    /// Action for choosing an option; nothing when it is already selected
    /// or not on offer
    pub fn select(&self, action: &str) -> Option<Action> {
        if action == self.current || !self.options.iter().any(|o| o == action) {
            return None;
        }
        Some(Action::reconfigure_node(self.node.clone(), action))
    }
}
