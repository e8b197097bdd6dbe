// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge definitions for the block graph.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    /// Create an edge ID from any string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EdgeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Output end of an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    /// Node owning the output
    pub id: NodeId,
    /// Output port name
    pub output: String,
}

impl Source {
    /// Create a source endpoint
    pub fn new(id: impl Into<NodeId>, output: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            output: output.into(),
        }
    }
}

/// Input end of an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Node owning the input
    pub id: NodeId,
    /// Input port name
    pub input: String,
}

impl Target {
    /// Create a target endpoint
    pub fn new(id: impl Into<NodeId>, input: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            input: input.into(),
        }
    }
}

/// A directed connection from an output to an input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique edge ID
    pub id: EdgeId,
    /// Output end
    pub source: Source,
    /// Input end
    pub target: Target,
}

impl Edge {
    /// Check if this edge touches a specific node
    pub fn involves_node(&self, node_id: &NodeId) -> bool {
        self.source.id == *node_id || self.target.id == *node_id
    }
}
