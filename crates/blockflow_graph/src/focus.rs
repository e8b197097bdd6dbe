// SPDX-License-Identifier: MIT OR Apache-2.0
//! The single selected element of the graph.

use crate::edge::EdgeId;
use crate::node::NodeId;
use crate::state::GraphState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selected node or edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Focus {
    /// A node is selected
    Node(NodeId),
    /// An edge is selected
    Edge(EdgeId),
}

impl Focus {
    /// Whether the referenced element exists in `state`
    pub fn resolves(&self, state: &GraphState) -> bool {
        match self {
            Self::Node(id) => state.node(id).is_some(),
            Self::Edge(id) => state.edge(id).is_some(),
        }
    }

    /// Whether this focus points at the node or at one of `edges`
    pub(crate) fn is_any_of(&self, node: Option<&NodeId>, edges: &[EdgeId]) -> bool {
        match self {
            Self::Node(id) => node == Some(id),
            Self::Edge(id) => edges.contains(id),
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node {id}"),
            Self::Edge(id) => write!(f, "edge {id}"),
        }
    }
}
