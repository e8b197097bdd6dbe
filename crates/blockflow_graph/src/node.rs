// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the block graph.

use crate::edge::EdgeId;
use crate::schema::KindDescriptor;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a node ID from any string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Integer grid coordinate of a node's top-left corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// Column, never negative
    pub x: i32,
    /// Row, within `[0, canvas height - 1]`
    pub y: i32,
}

impl GridPos {
    /// Create a grid position
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Clamp into the valid canvas area
    pub fn clamped(self, height: u32) -> Self {
        let max_y = i32::try_from(height.max(1) - 1).unwrap_or(i32::MAX);
        Self {
            x: self.x.max(0),
            y: self.y.clamp(0, max_y),
        }
    }
}

/// A node instance in the graph
///
/// Nodes never reference each other directly; every connection goes
/// through an edge id stored in the port bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Kind name, declared in the schema
    pub kind: String,
    /// Position on the grid
    pub position: GridPos,
    /// Incoming edge per input, at most one
    pub inputs: IndexMap<String, Option<EdgeId>>,
    /// Outgoing edges per output, in connection order
    pub outputs: IndexMap<String, Vec<EdgeId>>,
    /// Param values, kept apart from the port bindings
    #[serde(default)]
    pub params: IndexMap<String, String>,
}

impl Node {
    /// Create an unconnected node of the given kind
    pub(crate) fn new(id: NodeId, kind: &KindDescriptor, position: GridPos) -> Self {
        Self {
            id,
            kind: kind.id().to_string(),
            position,
            inputs: kind.inputs().map(|port| (port.name.clone(), None)).collect(),
            outputs: kind.outputs().map(|port| (port.name.clone(), Vec::new())).collect(),
            params: kind
                .params()
                .map(|param| (param.name.clone(), param.default.clone()))
                .collect(),
        }
    }

    /// Get the edge bound to an input
    pub fn input(&self, name: &str) -> Option<&EdgeId> {
        self.inputs.get(name).and_then(Option::as_ref)
    }

    /// Get the edges leaving an output
    pub fn output(&self, name: &str) -> &[EdgeId] {
        self.outputs.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Get a param value
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Every edge referenced by this node's ports
    pub fn edge_ids(&self) -> impl Iterator<Item = &EdgeId> {
        self.inputs
            .values()
            .flatten()
            .chain(self.outputs.values().flatten())
    }
}
