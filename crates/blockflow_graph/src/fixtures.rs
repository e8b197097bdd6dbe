// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared test fixtures.

use crate::edge::{Edge, EdgeId, Source, Target};
use crate::node::{GridPos, Node, NodeId};
use crate::schema::{KindDecl, SchemaRegistry};
use crate::state::GraphState;

/// Two plain kinds plus a `reader` archetype with two variants
pub fn schema() -> SchemaRegistry {
    SchemaRegistry::new([
        KindDecl::new("source", "Collection Export")
            .input("a")
            .input("b")
            .output("outA")
            .output("outB")
            .with_color([230, 230, 250]),
        KindDecl::new("csv", "CSV Import")
            .input("a")
            .output("outA")
            .output("outB")
            .output("outC")
            .param("delimiter", ",")
            .with_color([233, 150, 122]),
        KindDecl::new("csv_reader", "CSV Reader")
            .input("path")
            .output("rows")
            .output("header")
            .param("delimiter", ",")
            .with_group("reader", "csv"),
        KindDecl::new("json_reader", "JSON Reader")
            .input("path")
            .output("rows")
            .param("pointer", "")
            .with_image()
            .with_group("reader", "json"),
    ])
    .expect("fixture schema is valid")
}

/// Unconnected node of a fixture kind
pub fn node(id: &str, kind: &str, x: i32, y: i32) -> Node {
    let schema = schema();
    let kind = schema.get(kind).expect("fixture kind exists");
    Node::new(NodeId::from(id), kind, GridPos::new(x, y))
}

/// Node `a` (csv) feeding node `b` (source) through edge `c: a.outB -> b.b`
pub fn state() -> GraphState {
    let mut a = node("a", "csv", 1, 1);
    let mut b = node("b", "source", 5, 3);
    a.outputs.insert("outB".into(), vec![EdgeId::from("c")]);
    b.inputs.insert("b".into(), Some(EdgeId::from("c")));

    let c = Edge {
        id: EdgeId::from("c"),
        source: Source::new("a", "outB"),
        target: Target::new("b", "b"),
    };

    GraphState::from_parts([a, b], [c], None)
}
