// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph state: nodes, edges and focus.

use crate::edge::{Edge, EdgeId};
use crate::error::{GraphError, Result};
use crate::focus::Focus;
use crate::layout::Layout;
use crate::node::{Node, NodeId};
use crate::schema::SchemaRegistry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of the graph
///
/// Only the reducer produces new states. Every transition returns a fresh
/// value and leaves the previous one untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphState {
    /// Nodes by ID
    #[serde(default)]
    pub(crate) nodes: IndexMap<NodeId, Node>,
    /// Edges by ID
    #[serde(default)]
    pub(crate) edges: IndexMap<EdgeId, Edge>,
    /// Selected element
    #[serde(default)]
    pub(crate) focus: Option<Focus>,
    /// Counter feeding fresh IDs
    #[serde(default)]
    pub(crate) next_id: u64,
}

impl GraphState {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a state from host-supplied tables
    ///
    /// The tables are taken as-is; call [`GraphState::validate`] to check
    /// them.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
        focus: Option<Focus>,
    ) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
            edges: edges.into_iter().map(|e| (e.id.clone(), e)).collect(),
            focus,
            next_id: 0,
        }
    }

    /// Load a state from RON
    pub fn from_ron(text: &str) -> std::result::Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Get a node by ID
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get an edge by ID
    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Selected element, if any
    pub fn focus(&self) -> Option<&Focus> {
        self.focus.as_ref()
    }

    /// Edges touching a node
    pub fn edges_for_node<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.values().filter(move |e| e.involves_node(id))
    }

    /// ID the next created node will receive
    pub fn next_node_id(&self) -> NodeId {
        NodeId(self.fresh_key("n").1)
    }

    /// ID the next created edge will receive
    pub fn next_edge_id(&self) -> EdgeId {
        EdgeId(self.fresh_key("e").1)
    }

    /// First free `<prefix><k>` at or after the counter, with the counter
    /// value that follows it
    fn fresh_key(&self, prefix: &str) -> (u64, String) {
        let mut k = self.next_id;
        loop {
            let key = format!("{prefix}{k}");
            let taken = self.nodes.contains_key(key.as_str()) || self.edges.contains_key(key.as_str());
            if !taken {
                return (k + 1, key);
            }
            k += 1;
        }
    }

    pub(crate) fn alloc_node_id(&mut self) -> NodeId {
        let (next, key) = self.fresh_key("n");
        self.next_id = next;
        NodeId(key)
    }

    pub(crate) fn alloc_edge_id(&mut self) -> EdgeId {
        let (next, key) = self.fresh_key("e");
        self.next_id = next;
        EdgeId(key)
    }

    /// Check every data model invariant against the schema
    ///
    /// The reducer assumes these hold and never repairs a broken state.
    pub fn validate(&self, schema: &SchemaRegistry, layout: &Layout) -> Result<()> {
        for (key, node) in &self.nodes {
            if *key != node.id {
                return Err(inconsistent(format!("node stored under {key} has id {}", node.id)));
            }
            let kind = schema.kind(&node.kind)?;
            if node.position != node.position.clamped(layout.height) {
                return Err(inconsistent(format!("node {} is outside the canvas", node.id)));
            }
            if node.inputs.len() != kind.input_count() || node.outputs.len() != kind.output_count() {
                return Err(inconsistent(format!("node {} ports differ from kind {}", node.id, node.kind)));
            }
            for (input, bound) in &node.inputs {
                kind.require_input(input)?;
                let Some(edge_id) = bound else { continue };
                let edge = self.edge(edge_id).ok_or_else(|| GraphError::UnknownEdge(edge_id.clone()))?;
                if edge.target.id != node.id || edge.target.input != *input {
                    return Err(inconsistent(format!("input {}.{input} is bound to {edge_id}", node.id)));
                }
            }
            for (output, edges) in &node.outputs {
                kind.require_output(output)?;
                for edge_id in edges {
                    let edge = self.edge(edge_id).ok_or_else(|| GraphError::UnknownEdge(edge_id.clone()))?;
                    if edge.source.id != node.id || edge.source.output != *output {
                        return Err(inconsistent(format!("output {}.{output} lists {edge_id}", node.id)));
                    }
                }
            }
            for param in node.params.keys() {
                if !kind.has_param(param) {
                    return Err(GraphError::UnknownParam {
                        node: node.id.clone(),
                        param: param.clone(),
                    });
                }
            }
        }

        for (key, edge) in &self.edges {
            if *key != edge.id {
                return Err(inconsistent(format!("edge stored under {key} has id {}", edge.id)));
            }
            if edge.source.id == edge.target.id {
                return Err(GraphError::InvalidEdge(format!("{} is a self-loop", edge.id)));
            }
            let source = self
                .node(&edge.source.id)
                .ok_or_else(|| GraphError::UnknownNode(edge.source.id.clone()))?;
            let target = self
                .node(&edge.target.id)
                .ok_or_else(|| GraphError::UnknownNode(edge.target.id.clone()))?;
            if target.input(&edge.target.input) != Some(&edge.id) {
                return Err(inconsistent(format!("{} is not bound at its target", edge.id)));
            }
            if !source.output(&edge.source.output).contains(&edge.id) {
                return Err(inconsistent(format!("{} is not listed at its source", edge.id)));
            }
        }

        if let Some(focus) = &self.focus {
            if !focus.resolves(self) {
                return Err(GraphError::UnknownTarget(focus.clone()));
            }
        }

        Ok(())
    }
}

fn inconsistent(reason: String) -> GraphError {
    GraphError::Inconsistent { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_fixture_is_valid() {
        let state = fixtures::state();
        state.validate(&fixtures::schema(), &Layout::default()).unwrap();
        assert_eq!(state.node_count(), 2);
        assert_eq!(state.edges_for_node(&NodeId::from("a")).count(), 1);
    }

    #[test]
    fn test_validate_detects_dangling_binding() {
        let mut state = fixtures::state();
        state.edges.clear();
        let err = state.validate(&fixtures::schema(), &Layout::default()).unwrap_err();
        assert!(matches!(err, GraphError::UnknownEdge(id) if id.as_str() == "c"));
    }

    #[test]
    fn test_validate_detects_one_sided_edge() {
        let mut state = fixtures::state();
        state.nodes.get_mut("a").unwrap().outputs.get_mut("outB").unwrap().clear();
        let err = state.validate(&fixtures::schema(), &Layout::default()).unwrap_err();
        assert!(matches!(err, GraphError::Inconsistent { .. }));
    }

    #[test]
    fn test_fresh_ids_skip_taken() {
        let mut state = GraphState::from_parts(
            [fixtures::node("n0", "source", 0, 0)],
            [],
            None,
        );
        assert_eq!(state.next_node_id().as_str(), "n1");
        assert_eq!(state.alloc_node_id().as_str(), "n1");
        assert_eq!(state.alloc_edge_id().as_str(), "e2");
    }

    #[test]
    fn test_from_ron() {
        let text = r#"(
            nodes: {
                "x": (id: "x", kind: "csv", position: (x: 1, y: 1), inputs: {"a": None}, outputs: {"outA": [], "outB": [], "outC": []}),
            },
        )"#;
        let state = GraphState::from_ron(text).unwrap();
        assert_eq!(state.node_count(), 1);
        assert!(state.focus().is_none());
        state.validate(&fixtures::schema(), &Layout::default()).unwrap();
    }
}
