// SPDX-License-Identifier: MIT OR Apache-2.0
//! Actions accepted by the reducer.

use crate::edge::{EdgeId, Source, Target};
use crate::focus::Focus;
use crate::node::{GridPos, NodeId};
use egui::Pos2;

/// Where to put a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Integer grid cell, clamped to the canvas
    Grid(GridPos),
    /// Raw pixel offset from the canvas origin, snapped to the grid
    Pixel(Pos2),
}

impl From<GridPos> for Placement {
    fn from(pos: GridPos) -> Self {
        Self::Grid(pos)
    }
}

impl From<Pos2> for Placement {
    fn from(pos: Pos2) -> Self {
        Self::Pixel(pos)
    }
}

/// A requested graph mutation
///
/// These are the only sanctioned way to change a [`GraphState`](crate::GraphState).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Add an unconnected node
    CreateNode {
        /// Kind name, or the archetype when `variant` is set
        kind: String,
        /// Requested position
        position: Placement,
        /// Action resolved together with `kind` as an archetype
        variant: Option<String>,
    },
    /// Remove a node and every edge touching it
    DeleteNode {
        /// Node to remove
        id: NodeId,
    },
    /// Move a node to another grid cell
    MoveNode {
        /// Node to move
        id: NodeId,
        /// Requested position
        position: Placement,
    },
    /// Connect an output to an input, replacing any edge already bound there
    CreateEdge {
        /// Output end
        source: Source,
        /// Input end
        target: Target,
    },
    /// Remove an edge
    DeleteEdge {
        /// Edge to remove
        id: EdgeId,
    },
    /// Store a param value
    UpdateParam {
        /// Node owning the param
        node: NodeId,
        /// Param name
        param: String,
        /// New value
        value: String,
    },
    /// Select a node or edge, or clear the selection
    SetFocus(Option<Focus>),
    /// Swap a node for the variant of its archetype named by `action`
    ReconfigureNode {
        /// Node to replace
        id: NodeId,
        /// Variant to switch to
        action: String,
    },
}

impl Action {
    /// Create a node of a declared kind
    pub fn create_node(kind: impl Into<String>, position: impl Into<Placement>) -> Self {
        Self::CreateNode {
            kind: kind.into(),
            position: position.into(),
            variant: None,
        }
    }

    /// Create a node resolved from an archetype/action pair
    pub fn create_variant(
        archetype: impl Into<String>,
        position: impl Into<Placement>,
        action: impl Into<String>,
    ) -> Self {
        Self::CreateNode {
            kind: archetype.into(),
            position: position.into(),
            variant: Some(action.into()),
        }
    }

    /// Delete a node
    pub fn delete_node(id: impl Into<NodeId>) -> Self {
        Self::DeleteNode { id: id.into() }
    }

    /// Move a node
    pub fn move_node(id: impl Into<NodeId>, position: impl Into<Placement>) -> Self {
        Self::MoveNode {
            id: id.into(),
            position: position.into(),
        }
    }

    /// Connect two ports
    pub fn create_edge(source: Source, target: Target) -> Self {
        Self::CreateEdge { source, target }
    }

    /// Delete an edge
    pub fn delete_edge(id: impl Into<EdgeId>) -> Self {
        Self::DeleteEdge { id: id.into() }
    }

    /// Update a param
    pub fn update_param(
        node: impl Into<NodeId>,
        param: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::UpdateParam {
            node: node.into(),
            param: param.into(),
            value: value.into(),
        }
    }

    /// Change the focus
    pub fn set_focus(focus: Option<Focus>) -> Self {
        Self::SetFocus(focus)
    }

    /// Switch a node to another variant
    pub fn reconfigure_node(id: impl Into<NodeId>, action: impl Into<String>) -> Self {
        Self::ReconfigureNode {
            id: id.into(),
            action: action.into(),
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateNode { .. } => "createNode",
            Self::DeleteNode { .. } => "deleteNode",
            Self::MoveNode { .. } => "moveNode",
            Self::CreateEdge { .. } => "createEdge",
            Self::DeleteEdge { .. } => "deleteEdge",
            Self::UpdateParam { .. } => "updateParam",
            Self::SetFocus(_) => "setFocus",
            Self::ReconfigureNode { .. } => "reconfigureNode",
        }
    }
}
