// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pure state transitions over [`GraphState`].
//!
//! `reduce` validates the whole action against the current state before
//! touching anything, then applies it to a copy. A failed action returns
//! the error and the caller keeps the state it already has.

use crate::action::{Action, Placement};
use crate::edge::{Edge, EdgeId, Source, Target};
use crate::error::{GraphError, Result};
use crate::focus::Focus;
use crate::geometry;
use crate::layout::Layout;
use crate::node::{GridPos, Node, NodeId};
use crate::schema::SchemaRegistry;
use crate::state::GraphState;
use std::sync::Arc;

/// Applies actions to graph states
#[derive(Debug, Clone)]
pub struct Reducer {
    schema: Arc<SchemaRegistry>,
    layout: Layout,
}

impl Reducer {
    /// Create a reducer for one schema and layout
    pub fn new(schema: Arc<SchemaRegistry>, layout: Layout) -> Self {
        Self { schema, layout }
    }

    /// Schema used for validation
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Apply an action, returning the next state
    pub fn reduce(&self, state: &GraphState, action: &Action) -> Result<GraphState> {
        let next = match action {
            Action::CreateNode {
                kind,
                position,
                variant,
            } => self.create_node(state, kind, *position, variant.as_deref())?,
            Action::DeleteNode { id } => self.delete_node(state, id)?,
            Action::MoveNode { id, position } => self.move_node(state, id, *position)?,
            Action::CreateEdge { source, target } => self.create_edge(state, source, target)?,
            Action::DeleteEdge { id } => self.delete_edge(state, id)?,
            Action::UpdateParam { node, param, value } => {
                self.update_param(state, node, param, value)?
            }
            Action::SetFocus(focus) => self.set_focus(state, focus.as_ref())?,
            Action::ReconfigureNode { id, action } => self.reconfigure_node(state, id, action)?,
        };
        tracing::debug!("Applied {}", action.name());
        Ok(next)
    }

    fn place(&self, position: Placement) -> GridPos {
        match position {
            Placement::Grid(pos) => pos.clamped(self.layout.height),
            Placement::Pixel(pos) => geometry::snap(&self.layout, pos),
        }
    }

    fn create_node(
        &self,
        state: &GraphState,
        kind: &str,
        position: Placement,
        variant: Option<&str>,
    ) -> Result<GraphState> {
        let kind = match variant {
            Some(action) => self.schema.resolve(kind, action)?,
            None => self.schema.kind(kind)?,
        };

        let mut next = state.clone();
        let id = next.alloc_node_id();
        let node = Node::new(id.clone(), kind, self.place(position));
        next.nodes.insert(id, node);
        Ok(next)
    }

    fn delete_node(&self, state: &GraphState, id: &NodeId) -> Result<GraphState> {
        let node = require_node(state, id)?;
        let touching: Vec<EdgeId> = node.edge_ids().cloned().collect();

        let mut next = state.clone();
        for edge_id in &touching {
            detach_edge(&mut next, edge_id);
        }
        next.nodes.shift_remove(id);
        if next.focus.as_ref().is_some_and(|f| f.is_any_of(Some(id), &touching)) {
            next.focus = None;
        }
        Ok(next)
    }

    fn move_node(&self, state: &GraphState, id: &NodeId, position: Placement) -> Result<GraphState> {
        require_node(state, id)?;
        let position = self.place(position);

        let mut next = state.clone();
        if let Some(node) = next.nodes.get_mut(id) {
            node.position = position;
        }
        Ok(next)
    }

    fn create_edge(&self, state: &GraphState, source: &Source, target: &Target) -> Result<GraphState> {
        let source_node = require_node(state, &source.id)?;
        let target_node = require_node(state, &target.id)?;
        self.schema.kind(&source_node.kind)?.require_output(&source.output)?;
        self.schema.kind(&target_node.kind)?.require_input(&target.input)?;
        if source.id == target.id {
            return Err(GraphError::InvalidEdge(format!(
                "self-loop on node {}",
                source.id
            )));
        }

        let mut next = state.clone();
        // An input holds at most one edge; connecting supersedes it.
        if let Some(previous) = target_node.input(&target.input) {
            detach_edge(&mut next, previous);
        }

        let id = next.alloc_edge_id();
        if let Some(list) = next
            .nodes
            .get_mut(&source.id)
            .and_then(|n| n.outputs.get_mut(&source.output))
        {
            list.push(id.clone());
        }
        if let Some(slot) = next
            .nodes
            .get_mut(&target.id)
            .and_then(|n| n.inputs.get_mut(&target.input))
        {
            *slot = Some(id.clone());
        }
        next.edges.insert(
            id.clone(),
            Edge {
                id,
                source: source.clone(),
                target: target.clone(),
            },
        );
        Ok(next)
    }

    fn delete_edge(&self, state: &GraphState, id: &EdgeId) -> Result<GraphState> {
        if state.edge(id).is_none() {
            return Err(GraphError::UnknownEdge(id.clone()));
        }

        let mut next = state.clone();
        detach_edge(&mut next, id);
        Ok(next)
    }

    fn update_param(
        &self,
        state: &GraphState,
        id: &NodeId,
        param: &str,
        value: &str,
    ) -> Result<GraphState> {
        let node = require_node(state, id)?;
        if !self.schema.kind(&node.kind)?.has_param(param) {
            return Err(GraphError::UnknownParam {
                node: id.clone(),
                param: param.to_string(),
            });
        }

        let mut next = state.clone();
        if let Some(node) = next.nodes.get_mut(id) {
            node.params.insert(param.to_string(), value.to_string());
        }
        Ok(next)
    }

    fn set_focus(&self, state: &GraphState, focus: Option<&Focus>) -> Result<GraphState> {
        if let Some(focus) = focus {
            if !focus.resolves(state) {
                return Err(GraphError::UnknownTarget(focus.clone()));
            }
        }

        let mut next = state.clone();
        next.focus = focus.cloned();
        Ok(next)
    }

    fn reconfigure_node(&self, state: &GraphState, id: &NodeId, action: &str) -> Result<GraphState> {
        let old = require_node(state, id)?;
        let current = self.schema.kind(&old.kind)?;
        let Some(group) = current.group() else {
            return Err(GraphError::UnknownArchetype {
                archetype: old.kind.clone(),
                action: action.to_string(),
            });
        };
        let kind = self.schema.resolve(&group.archetype, action)?;
        if kind.id() == current.id() {
            return Ok(state.clone());
        }

        let dropped: Vec<EdgeId> = old
            .inputs
            .iter()
            .filter(|(name, _)| !kind.has_input(name))
            .filter_map(|(_, bound)| bound.clone())
            .chain(
                old.outputs
                    .iter()
                    .filter(|(name, _)| !kind.has_output(name))
                    .flat_map(|(_, edges)| edges.iter().cloned()),
            )
            .collect();

        let mut next = state.clone();
        for edge_id in &dropped {
            detach_edge(&mut next, edge_id);
        }

        let Some(old) = next.nodes.get(id) else {
            return Err(GraphError::UnknownNode(id.clone()));
        };
        let mut node = Node::new(id.clone(), kind, old.position);
        for (name, slot) in &mut node.inputs {
            *slot = old.input(name).cloned();
        }
        for (name, edges) in &mut node.outputs {
            edges.extend_from_slice(old.output(name));
        }
        for (name, value) in &mut node.params {
            if let Some(kept) = old.param(name) {
                *value = kept.to_string();
            }
        }
        next.nodes.insert(id.clone(), node);
        Ok(next)
    }
}

fn require_node<'a>(state: &'a GraphState, id: &NodeId) -> Result<&'a Node> {
    state
        .node(id)
        .ok_or_else(|| GraphError::UnknownNode(id.clone()))
}

/// Remove an edge from the table and from both endpoint bindings
fn detach_edge(state: &mut GraphState, id: &EdgeId) -> Option<Edge> {
    let edge = state.edges.shift_remove(id)?;
    if let Some(list) = state
        .nodes
        .get_mut(&edge.source.id)
        .and_then(|n| n.outputs.get_mut(&edge.source.output))
    {
        list.retain(|e| e != id);
    }
    if let Some(slot) = state
        .nodes
        .get_mut(&edge.target.id)
        .and_then(|n| n.inputs.get_mut(&edge.target.input))
    {
        if slot.as_ref() == Some(id) {
            *slot = None;
        }
    }
    if state.focus.as_ref().is_some_and(|f| f.is_any_of(None, std::slice::from_ref(id))) {
        state.focus = None;
    }
    Some(edge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::schema::KindDecl;
    use egui::pos2;

    fn reducer() -> Reducer {
        Reducer::new(Arc::new(fixtures::schema()), Layout::default())
    }

    fn assert_consistent(state: &GraphState) {
        state
            .validate(&fixtures::schema(), &Layout::default())
            .expect("state is consistent");
    }

    #[test]
    fn test_delete_node_cascades() {
        let state = reducer()
            .reduce(&fixtures::state(), &Action::delete_node("a"))
            .unwrap();

        assert_eq!(state.node_count(), 1);
        assert_eq!(state.edge_count(), 0);
        let b = state.node(&NodeId::from("b")).unwrap();
        assert_eq!(b.input("b"), None);
        assert_consistent(&state);
    }

    #[test]
    fn test_create_edge_replaces_bound_input() {
        let action = Action::create_edge(Source::new("a", "outB"), Target::new("b", "b"));
        let state = reducer().reduce(&fixtures::state(), &action).unwrap();

        assert_eq!(state.edge_count(), 1);
        assert!(state.edge(&EdgeId::from("c")).is_none());
        let new_id = state.node(&NodeId::from("b")).unwrap().input("b").unwrap().clone();
        assert_ne!(new_id.as_str(), "c");
        assert_eq!(state.node(&NodeId::from("a")).unwrap().output("outB"), [new_id]);
        assert_consistent(&state);
    }

    #[test]
    fn test_unknown_kind_leaves_state() {
        let state = fixtures::state();
        let err = reducer()
            .reduce(&state, &Action::create_node("unknownKind", GridPos::new(0, 0)))
            .unwrap_err();

        assert_eq!(err, GraphError::UnknownKind("unknownKind".to_string()));
        assert_eq!(state, fixtures::state());
    }

    #[test]
    fn test_reduce_is_deterministic() {
        let reducer = reducer();
        let state = fixtures::state();
        let actions = [
            Action::create_node("csv", GridPos::new(2, 2)),
            Action::create_edge(Source::new("b", "outA"), Target::new("a", "a")),
            Action::move_node("a", pos2(100.4, 30.7)),
        ];

        for action in &actions {
            let first = reducer.reduce(&state, action).unwrap();
            let second = reducer.reduce(&state, action).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_create_node_defaults() {
        let state = reducer()
            .reduce(&GraphState::new(), &Action::create_node("csv", GridPos::new(-4, 99)))
            .unwrap();

        let node = state.nodes().next().unwrap();
        assert_eq!(node.position, GridPos::new(0, 23));
        assert!(node.inputs.values().all(Option::is_none));
        assert!(node.outputs.values().all(Vec::is_empty));
        assert_eq!(node.param("delimiter"), Some(","));
        assert_consistent(&state);
    }

    #[test]
    fn test_create_node_variant() {
        let reducer = reducer();
        let state = reducer
            .reduce(
                &GraphState::new(),
                &Action::create_variant("reader", GridPos::new(1, 1), "json"),
            )
            .unwrap();
        assert_eq!(state.nodes().next().unwrap().kind, "json_reader");

        let err = reducer
            .reduce(
                &GraphState::new(),
                &Action::create_variant("reader", GridPos::new(1, 1), "xml"),
            )
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownArchetype { .. }));
    }

    #[test]
    fn test_move_node_snaps_pixels() {
        let reducer = reducer();
        let state = fixtures::state();

        let moved = reducer
            .reduce(&state, &Action::move_node("a", pos2(59.0, -13.2)))
            .unwrap();
        assert_eq!(moved.node(&NodeId::from("a")).unwrap().position, GridPos::new(2, 0));

        let moved = reducer
            .reduce(&state, &Action::move_node("a", pos2(-80.0, 10_000.6)))
            .unwrap();
        assert_eq!(moved.node(&NodeId::from("a")).unwrap().position, GridPos::new(0, 23));

        let err = reducer
            .reduce(&state, &Action::move_node("gone", GridPos::new(0, 0)))
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownNode(NodeId::from("gone")));
    }

    #[test]
    fn test_create_edge_validation() {
        let reducer = reducer();
        let state = fixtures::state();

        let err = reducer
            .reduce(&state, &Action::create_edge(Source::new("a", "nope"), Target::new("b", "a")))
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidPort { ref port, .. } if port == "nope"));

        let err = reducer
            .reduce(&state, &Action::create_edge(Source::new("a", "outA"), Target::new("b", "zz")))
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::InvalidPort {
                kind: "source".into(),
                port: "zz".into()
            }
        );

        let err = reducer
            .reduce(&state, &Action::create_edge(Source::new("b", "outA"), Target::new("b", "a")))
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidEdge(_)));

        let err = reducer
            .reduce(&state, &Action::create_edge(Source::new("z", "outA"), Target::new("b", "a")))
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownNode(NodeId::from("z")));
    }

    #[test]
    fn test_output_fans_out() {
        let reducer = reducer();
        let mut state = reducer
            .reduce(&fixtures::state(), &Action::create_node("source", GridPos::new(9, 9)))
            .unwrap();
        let third = state.nodes().last().unwrap().id.clone();
        state = reducer
            .reduce(
                &state,
                &Action::create_edge(Source::new("a", "outB"), Target::new(third, "a")),
            )
            .unwrap();

        assert_eq!(state.node(&NodeId::from("a")).unwrap().output("outB").len(), 2);
        assert_consistent(&state);
    }

    #[test]
    fn test_delete_edge_clears_focus() {
        let reducer = reducer();
        let focused = reducer
            .reduce(&fixtures::state(), &Action::set_focus(Some(Focus::Edge("c".into()))))
            .unwrap();
        assert_eq!(focused.focus(), Some(&Focus::Edge("c".into())));

        let state = reducer.reduce(&focused, &Action::delete_edge("c")).unwrap();
        assert!(state.focus().is_none());
        assert_eq!(state.node(&NodeId::from("b")).unwrap().input("b"), None);
        assert!(state.node(&NodeId::from("a")).unwrap().output("outB").is_empty());

        let err = reducer.reduce(&state, &Action::delete_edge("c")).unwrap_err();
        assert_eq!(err, GraphError::UnknownEdge(EdgeId::from("c")));
    }

    #[test]
    fn test_delete_node_clears_cascaded_focus() {
        let reducer = reducer();
        let focused = reducer
            .reduce(&fixtures::state(), &Action::set_focus(Some(Focus::Edge("c".into()))))
            .unwrap();
        let state = reducer.reduce(&focused, &Action::delete_node("b")).unwrap();
        assert!(state.focus().is_none());

        let focused = reducer
            .reduce(&fixtures::state(), &Action::set_focus(Some(Focus::Node("b".into()))))
            .unwrap();
        let state = reducer.reduce(&focused, &Action::delete_node("a")).unwrap();
        assert_eq!(state.focus(), Some(&Focus::Node("b".into())));
    }

    #[test]
    fn test_delete_node_clears_own_focus() {
        let reducer = reducer();
        let focused = reducer
            .reduce(&fixtures::state(), &Action::set_focus(Some(Focus::Node("a".into()))))
            .unwrap();
        let state = reducer.reduce(&focused, &Action::delete_node("a")).unwrap();
        assert!(state.focus().is_none());
        assert!(state.node(&NodeId::from("a")).is_none());
        assert_consistent(&state);
    }

    #[test]
    fn test_set_focus_unknown_target() {
        let err = reducer()
            .reduce(&fixtures::state(), &Action::set_focus(Some(Focus::Node("q".into()))))
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownTarget(_)));
    }

    #[test]
    fn test_update_param() {
        let reducer = reducer();
        let state = reducer
            .reduce(&fixtures::state(), &Action::update_param("a", "delimiter", ";"))
            .unwrap();
        assert_eq!(state.node(&NodeId::from("a")).unwrap().param("delimiter"), Some(";"));

        let err = reducer
            .reduce(&state, &Action::update_param("b", "delimiter", ";"))
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownParam { .. }));
    }

    #[test]
    fn test_reconfigure_keeps_matching_ports() {
        let reducer = reducer();
        let mut state = GraphState::new();
        for action in [
            Action::create_variant("reader", GridPos::new(0, 0), "csv"),
            Action::create_node("source", GridPos::new(8, 0)),
        ] {
            state = reducer.reduce(&state, &action).unwrap();
        }
        let ids: Vec<NodeId> = state.nodes().map(|n| n.id.clone()).collect();
        let (reader, sink) = (&ids[0], &ids[1]);
        for action in [
            Action::create_edge(Source::new(reader.clone(), "rows"), Target::new(sink.clone(), "a")),
            Action::create_edge(Source::new(reader.clone(), "header"), Target::new(sink.clone(), "b")),
            Action::update_param(reader.clone(), "delimiter", "|"),
        ] {
            state = reducer.reduce(&state, &action).unwrap();
        }

        let state = reducer
            .reduce(&state, &Action::reconfigure_node(reader.clone(), "json"))
            .unwrap();
        let node = state.node(reader).unwrap();
        assert_eq!(node.kind, "json_reader");
        assert_eq!(node.position, GridPos::new(0, 0));
        assert_eq!(node.output("rows").len(), 1);
        assert_eq!(state.edge_count(), 1);
        assert_eq!(state.node(sink).unwrap().input("b"), None);
        assert_eq!(node.param("pointer"), Some(""));
        assert_consistent(&state);
    }

    #[test]
    fn test_reconfigure_without_group() {
        let err = reducer()
            .reduce(&fixtures::state(), &Action::reconfigure_node("a", "json"))
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownArchetype { .. }));
    }

    #[test]
    fn test_reconfigure_ungrouped_kind_named_like_archetype() {
        let schema = SchemaRegistry::new([
            KindDecl::new("reader", "Plain Reader").output("rows"),
            KindDecl::new("json_reader", "JSON Reader")
                .output("rows")
                .with_group("reader", "json"),
        ])
        .unwrap();
        let reducer = Reducer::new(Arc::new(schema), Layout::default());
        let state = reducer
            .reduce(&GraphState::new(), &Action::create_node("reader", GridPos::new(0, 0)))
            .unwrap();
        let id = state.nodes().next().unwrap().id.clone();

        let err = reducer
            .reduce(&state, &Action::reconfigure_node(id.clone(), "json"))
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownArchetype {
                archetype: "reader".into(),
                action: "json".into()
            }
        );
        assert_eq!(state.node(&id).unwrap().kind, "reader");
    }
}
