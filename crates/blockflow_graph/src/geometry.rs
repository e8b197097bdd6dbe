// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node measurement, port placement, snapping and hit-testing.
//!
//! Everything here is a pure function of the schema, the layout and the
//! state passed in. Renderers call these to paint; gesture controllers call
//! them to decide what lies under the pointer.

use crate::edge::{EdgeId, Source, Target};
use crate::error::{GraphError, Result};
use crate::layout::Layout;
use crate::node::{GridPos, Node, NodeId};
use crate::path::{Curve, PathSegment};
use crate::schema::{KindDescriptor, SchemaRegistry};
use crate::state::GraphState;
use egui::{pos2, vec2, Pos2, Rect, Vec2};
use std::sync::Arc;

/// Convert a pixel offset from the canvas origin into a grid cell
pub fn snap(layout: &Layout, pixel: Pos2) -> GridPos {
    let max_y = layout.height.max(1) as f32 - 1.0;
    GridPos {
        x: (pixel.x / layout.unit).round().max(0.0) as i32,
        y: (pixel.y / layout.unit).round().clamp(0.0, max_y) as i32,
    }
}

/// What lies under a point on the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    /// Close glyph in a node header
    Close(NodeId),
    /// Node header
    Header(NodeId),
    /// Input port
    Input(Target),
    /// Output port
    Output(Source),
    /// Param field
    Param {
        /// Node owning the param
        node: NodeId,
        /// Param name
        param: String,
    },
    /// Anywhere else inside a node
    Body(NodeId),
    /// Edge connector
    Edge(EdgeId),
    /// Empty canvas
    Background,
}

/// Layout queries for one schema
#[derive(Debug, Clone)]
pub struct Geometry {
    schema: Arc<SchemaRegistry>,
    layout: Layout,
}

impl Geometry {
    /// Create a geometry engine
    pub fn new(schema: Arc<SchemaRegistry>, layout: Layout) -> Self {
        Self { schema, layout }
    }

    /// Layout constants in use
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Schema in use
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Node height in pixels
    pub fn node_height(&self, kind: &str) -> Result<f32> {
        Ok(self.height_of(self.schema.kind(kind)?))
    }

    /// Node width in pixels, rounded
    pub fn node_width(&self, kind: &str) -> Result<f32> {
        Ok(self.width_of(self.schema.kind(kind)?))
    }

    /// Node width and height
    pub fn footprint(&self, kind: &str) -> Result<Vec2> {
        let kind = self.schema.kind(kind)?;
        Ok(vec2(self.width_of(kind), self.height_of(kind)))
    }

    fn top_of_ports(&self, kind: &KindDescriptor) -> f32 {
        let l = &self.layout;
        let image = if kind.image() { l.image_height } else { 0.0 };
        l.header_height + image + l.dropdown_height
    }

    fn height_of(&self, kind: &KindDescriptor) -> f32 {
        let l = &self.layout;
        let top = self.top_of_ports(kind);
        let input_side = top
            + l.port_height() * kind.input_count() as f32
            + l.param_row_height() * kind.param_count() as f32;
        let output_side = top + l.port_height() * kind.output_count() as f32;
        input_side.max(output_side)
    }

    fn width_of(&self, kind: &KindDescriptor) -> f32 {
        fn longest<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
            labels.map(|label| label.chars().count()).max().unwrap_or(0)
        }
        let inputs = longest(kind.inputs().map(|p| p.label()));
        let outputs = longest(kind.outputs().map(|p| p.label()));
        let params = longest(kind.params().map(|p| p.label()));

        let chars = (inputs + outputs).max(params + outputs) as f32;
        let pad = chars * self.layout.font_size * self.layout.label_scale;
        (self.layout.min_node_width + pad).round()
    }

    /// Vertical offset of the port at `index` from the node's top edge
    pub fn port_offset_y(&self, index: usize, kind: &str) -> Result<f32> {
        Ok(self.port_y(self.schema.kind(kind)?, index))
    }

    /// Vertical offset of the param at `index`, below every input
    pub fn param_offset_y(&self, index: usize, kind: &str) -> Result<f32> {
        Ok(self.param_y(self.schema.kind(kind)?, index))
    }

    fn port_y(&self, kind: &KindDescriptor, index: usize) -> f32 {
        let l = &self.layout;
        self.top_of_ports(kind) + l.port_margin + l.port_radius + index as f32 * l.port_height()
    }

    fn param_y(&self, kind: &KindDescriptor, index: usize) -> f32 {
        self.port_y(kind, index) + kind.input_count() as f32 * self.layout.port_height()
    }

    /// Offset of an input port's center from the node origin
    pub fn input_offset(&self, kind: &str, input: &str) -> Result<Vec2> {
        let kind = self.schema.kind(kind)?;
        let index = kind.require_input(input)?;
        Ok(vec2(0.0, self.port_y(kind, index)))
    }

    /// Offset of an output port's center from the node origin
    pub fn output_offset(&self, kind: &str, output: &str) -> Result<Vec2> {
        let kind = self.schema.kind(kind)?;
        let index = kind.require_output(output)?;
        Ok(vec2(self.width_of(kind), self.port_y(kind, index)))
    }

    /// Offset of a param field's center line from the node origin
    pub fn param_offset(&self, kind: &str, param: &str) -> Result<Vec2> {
        let kind = self.schema.kind(kind)?;
        let index = kind.param_index(param).ok_or_else(|| GraphError::InvalidPort {
            kind: kind.id().to_string(),
            port: param.to_string(),
        })?;
        Ok(vec2(0.0, self.param_y(kind, index)))
    }

    /// Clip outline of a node, notched at each input port
    pub fn outline(&self, kind: &str) -> Result<Vec<PathSegment>> {
        let kind = self.schema.kind(kind)?;
        let l = &self.layout;
        let height = self.height_of(kind);
        let width = self.width_of(kind);

        let mut y = self.top_of_ports(kind);
        let mut path = vec![PathSegment::MoveTo(pos2(0.0, 0.0)), PathSegment::LineTo(pos2(0.0, y))];
        for _ in 0..kind.input_count() {
            y += l.port_margin;
            path.push(PathSegment::LineTo(pos2(0.0, y)));
            y += 2.0 * l.port_radius;
            path.push(PathSegment::Arc {
                radius: l.port_radius,
                sweep: true,
                to: pos2(0.0, y),
            });
            y += l.port_margin;
            path.push(PathSegment::LineTo(pos2(0.0, y)));
        }
        path.extend([
            PathSegment::LineTo(pos2(0.0, height)),
            PathSegment::LineTo(pos2(width, height)),
            PathSegment::LineTo(pos2(width, 0.0)),
            PathSegment::Close,
        ]);
        Ok(path)
    }

    /// Snap a pixel offset to a grid cell
    pub fn snap(&self, pixel: Pos2) -> GridPos {
        snap(&self.layout, pixel)
    }

    /// Pixel position of a grid cell plus an offset
    pub fn place(&self, position: GridPos, offset: Vec2) -> Pos2 {
        let unit = self.layout.unit;
        pos2(position.x as f32 * unit, position.y as f32 * unit) + offset
    }

    /// Pixel rectangle covered by a node
    pub fn node_rect(&self, node: &Node) -> Result<Rect> {
        let size = self.footprint(&node.kind)?;
        Ok(Rect::from_min_size(self.place(node.position, Vec2::ZERO), size))
    }

    /// Pixel position of an output port
    pub fn source_position(&self, state: &GraphState, source: &Source) -> Result<Pos2> {
        let node = state
            .node(&source.id)
            .ok_or_else(|| GraphError::UnknownNode(source.id.clone()))?;
        let offset = self.output_offset(&node.kind, &source.output)?;
        Ok(self.place(node.position, offset))
    }

    /// Pixel position of an input port
    pub fn target_position(&self, state: &GraphState, target: &Target) -> Result<Pos2> {
        let node = state
            .node(&target.id)
            .ok_or_else(|| GraphError::UnknownNode(target.id.clone()))?;
        let offset = self.input_offset(&node.kind, &target.input)?;
        Ok(self.place(node.position, offset))
    }

    /// Connector between two pixel positions
    pub fn curve(&self, from: Pos2, to: Pos2) -> Curve {
        Curve::between(from, to, self.layout.curve_extent)
    }

    /// Connector for an edge in `state`
    pub fn edge_curve(&self, state: &GraphState, id: &EdgeId) -> Result<Curve> {
        let edge = state
            .edge(id)
            .ok_or_else(|| GraphError::UnknownEdge(id.clone()))?;
        let from = self.source_position(state, &edge.source)?;
        let to = self.target_position(state, &edge.target)?;
        Ok(self.curve(from, to))
    }

    /// Canvas width needed to show every node
    pub fn canvas_width(&self, state: &GraphState) -> f32 {
        let max_x = state.nodes().map(|n| n.position.x).max().unwrap_or(0).max(0);
        self.layout.canvas_padding_right + self.layout.unit * max_x as f32
    }

    /// Find what lies under `point`
    ///
    /// Nodes painted later sit on top, so they are tested first. Ports win
    /// over the node body they overlap.
    pub fn hit_test(&self, state: &GraphState, point: Pos2) -> Hit {
        for node in state.nodes().collect::<Vec<_>>().into_iter().rev() {
            if let Some(hit) = self.hit_node(node, point) {
                return hit;
            }
        }

        let tolerance = self.layout.port_radius / 2.0;
        for edge in state.edges() {
            let Ok(curve) = self.edge_curve(state, &edge.id) else {
                continue;
            };
            if curve.distance_to(point) <= tolerance {
                return Hit::Edge(edge.id.clone());
            }
        }
        Hit::Background
    }

    fn hit_node(&self, node: &Node, point: Pos2) -> Option<Hit> {
        let kind = self.schema.get(&node.kind)?;
        let l = &self.layout;
        let origin = self.place(node.position, Vec2::ZERO);
        let width = self.width_of(kind);
        let local = point - origin;

        for (index, port) in kind.inputs().enumerate() {
            if (local - vec2(0.0, self.port_y(kind, index))).length() <= l.port_radius {
                return Some(Hit::Input(Target::new(node.id.clone(), port.name.clone())));
            }
        }
        for (index, port) in kind.outputs().enumerate() {
            if (local - vec2(width, self.port_y(kind, index))).length() <= l.port_radius {
                return Some(Hit::Output(Source::new(node.id.clone(), port.name.clone())));
            }
        }

        let rect = Rect::from_min_size(Pos2::ZERO, vec2(width, self.height_of(kind)));
        if !rect.contains(local.to_pos2()) {
            return None;
        }
        if local.y < l.header_height {
            if local.x >= width - l.close_width {
                return Some(Hit::Close(node.id.clone()));
            }
            return Some(Hit::Header(node.id.clone()));
        }
        for (index, param) in kind.params().enumerate() {
            if (local.y - self.param_y(kind, index)).abs() <= l.param_height / 2.0 {
                return Some(Hit::Param {
                    node: node.id.clone(),
                    param: param.name.clone(),
                });
            }
        }
        Some(Hit::Body(node.id.clone()))
    }
}
