// SPDX-License-Identifier: MIT OR Apache-2.0
//! Block graph model for the blockflow editor.
//!
//! This crate holds the parts of the editor that do not depend on any
//! input or rendering framework:
//! - Schema registry describing each node kind's ports and params
//! - Graph state and the reducer that moves it between consistent states
//! - Geometry engine measuring nodes, ports, outlines and connectors
//!
//! ## Architecture
//!
//! A [`GraphState`] is only ever changed by passing an [`Action`] to
//! [`Reducer::reduce`], which validates the action against the
//! [`SchemaRegistry`] and returns a new state. The graph is purely
//! structural; nothing here evaluates it.

pub mod action;
pub mod edge;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod layout;
pub mod node;
pub mod path;
pub mod reducer;
pub mod schema;
pub mod state;

#[cfg(test)]
mod fixtures;

pub use action::{Action, Placement};
pub use edge::{Edge, EdgeId, Source, Target};
pub use error::{GraphError, SchemaError};
pub use focus::Focus;
pub use geometry::{Geometry, Hit};
pub use layout::Layout;
pub use node::{GridPos, Node, NodeId};
pub use path::{Curve, PathSegment};
pub use reducer::Reducer;
pub use schema::{Group, KindDecl, KindDescriptor, ParamDecl, PortDecl, SchemaRegistry};
pub use state::GraphState;
