// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised by the schema registry and the reducer.

use crate::edge::EdgeId;
use crate::focus::Focus;
use crate::node::NodeId;

/// Error returned when an action or lookup cannot be applied.
///
/// Every variant is raised before any mutation, so the state the action was
/// applied to is still the current one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Kind is not declared in the schema
    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    /// Node not found
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// Edge not found
    #[error("Unknown edge: {0}")]
    UnknownEdge(EdgeId),

    /// Param is not declared by the node's kind
    #[error("Unknown param {param} on node {node}")]
    UnknownParam {
        /// Node the update targeted
        node: NodeId,
        /// Param name that failed to resolve
        param: String,
    },

    /// Port is not declared by the node's kind
    #[error("Invalid port {port} for kind {kind}")]
    InvalidPort {
        /// Kind that was searched
        kind: String,
        /// Port name that failed to resolve
        port: String,
    },

    /// Structurally invalid connection
    #[error("Invalid edge: {0}")]
    InvalidEdge(String),

    /// More than one kind carries the archetype/action tag
    #[error("Multiple kinds found for {archetype}/{action}")]
    AmbiguousArchetype {
        /// Requested archetype
        archetype: String,
        /// Requested action
        action: String,
    },

    /// No kind carries the archetype/action tag
    #[error("No kind found for {archetype}/{action}")]
    UnknownArchetype {
        /// Requested archetype
        archetype: String,
        /// Requested action
        action: String,
    },

    /// Focus does not reference an existing node or edge
    #[error("Unknown focus target: {0}")]
    UnknownTarget(Focus),

    /// Host-supplied state breaks a data model invariant
    #[error("Inconsistent graph: {reason}")]
    Inconsistent {
        /// What was found
        reason: String,
    },
}

/// Error when building a schema registry from declarations
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Two declarations share a kind id
    #[error("Duplicate kind: {0}")]
    DuplicateKind(String),

    /// A port or param name is declared twice within one kind
    #[error("Duplicate {section} name {name} in kind {kind}")]
    DuplicateName {
        /// Kind being registered
        kind: String,
        /// "input", "output" or "param"
        section: &'static str,
        /// Repeated name
        name: String,
    },

    /// Declaration text could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
