// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layout constants shared by the geometry engine and the reducer.

use serde::{Deserialize, Serialize};

/// Fixed layout metrics for one editor session
///
/// Missing fields fall back to the defaults when loaded from RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Pixel size of one grid cell
    pub unit: f32,
    /// Canvas height in grid rows
    pub height: u32,
    /// Label font size
    pub font_size: f32,
    /// Width of a node with no labels
    pub min_node_width: f32,
    /// Height of the node header
    pub header_height: f32,
    /// Port circle radius
    pub port_radius: f32,
    /// Space above and below each port circle
    pub port_margin: f32,
    /// Height of a param text field
    pub param_height: f32,
    /// Space below each param row
    pub param_margin: f32,
    /// Space between a param label and its field
    pub param_text_input_margin: f32,
    /// Height of the kind-variant dropdown row
    pub dropdown_height: f32,
    /// Height of the node image
    pub image_height: f32,
    /// Space reserved right of the rightmost node
    pub canvas_padding_right: f32,
    /// Largest horizontal control-point reach of a connector curve
    pub curve_extent: f32,
    /// Width of the close glyph hit area in the header
    pub close_width: f32,
    /// Label width factor applied per character
    pub label_scale: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            unit: 24.0,
            height: 24,
            font_size: 15.0,
            min_node_width: 156.0,
            header_height: 24.0,
            port_radius: 12.0,
            port_margin: 12.0,
            param_height: 24.0,
            param_margin: 10.0,
            param_text_input_margin: 10.0,
            dropdown_height: 24.0,
            image_height: 100.0,
            canvas_padding_right: 480.0,
            curve_extent: 104.0,
            close_width: 24.0,
            label_scale: 0.1,
        }
    }
}

impl Layout {
    /// Vertical space taken by one port row
    pub fn port_height(&self) -> f32 {
        self.port_radius * 2.0 + self.port_margin * 2.0
    }

    /// Vertical space taken by one param row, label included
    pub fn param_row_height(&self) -> f32 {
        self.param_height + self.font_size + self.param_text_input_margin + self.param_margin
    }

    /// Canvas height in pixels
    pub fn canvas_height(&self) -> f32 {
        self.unit * self.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_metrics() {
        let layout = Layout::default();
        assert_eq!(layout.port_height(), 48.0);
        assert_eq!(layout.param_row_height(), 59.0);
    }

    #[test]
    fn test_partial_ron() {
        let layout: Layout = ron::from_str("(unit: 30.0, height: 12)").unwrap();
        assert_eq!(layout.unit, 30.0);
        assert_eq!(layout.height, 12);
        assert_eq!(layout.port_radius, 12.0);
    }
}
