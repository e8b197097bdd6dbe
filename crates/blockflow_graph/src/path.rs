// SPDX-License-Identifier: MIT OR Apache-2.0
//! Path primitives handed to the renderer.

use egui::{Pos2, Vec2};

/// One step of a node outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Start a subpath
    MoveTo(Pos2),
    /// Straight line
    LineTo(Pos2),
    /// Circular arc of the given radius
    Arc {
        /// Arc radius
        radius: f32,
        /// Clockwise in screen coordinates
        sweep: bool,
        /// End point
        to: Pos2,
    },
    /// Close the subpath
    Close,
}

/// Render segments as an SVG `d` attribute
pub fn to_svg(segments: &[PathSegment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            PathSegment::MoveTo(p) => format!("M {} {}", p.x, p.y),
            PathSegment::LineTo(p) => format!("L {} {}", p.x, p.y),
            PathSegment::Arc { radius, sweep, to } => format!(
                "A {radius} {radius} 0 0 {} {} {}",
                u8::from(*sweep),
                to.x,
                to.y
            ),
            PathSegment::Close => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Connector drawn between an output and an input
///
/// Two quadratic pieces joined at the midpoint; the second piece mirrors
/// the first control point, so the curve is smooth and point-symmetric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    /// Output end
    pub start: Pos2,
    /// Control point of the first piece
    pub control: Pos2,
    /// Junction of the two pieces
    pub mid: Pos2,
    /// Input end
    pub end: Pos2,
}

impl Curve {
    /// Build the connector between two points
    ///
    /// The horizontal reach of the control point is half the vertical
    /// separation capped at `extent`, or a quarter of the horizontal
    /// separation when that is larger.
    pub fn between(start: Pos2, end: Pos2, extent: f32) -> Self {
        let delta = end - start;
        let mid = start + delta / 2.0;
        let reach = extent.min((delta.y / 2.0).abs()).max(delta.x / 4.0);
        Self {
            start,
            control: Pos2::new(start.x + reach, start.y),
            mid,
            end,
        }
    }

    /// Control point of the second piece
    pub fn mirrored_control(&self) -> Pos2 {
        self.mid + (self.mid - self.control)
    }

    /// Render as an SVG `d` attribute
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} Q {} {} {} {} T {} {}",
            self.start.x,
            self.start.y,
            self.control.x,
            self.control.y,
            self.mid.x,
            self.mid.y,
            self.end.x,
            self.end.y
        )
    }

    /// Points along the curve, `segments` per piece
    pub fn sample(&self, segments: usize) -> Vec<Pos2> {
        let segments = segments.max(1);
        let second = self.mirrored_control();
        let mut points = Vec::with_capacity(segments * 2 + 1);
        for i in 0..=segments {
            points.push(quadratic(self.start, self.control, self.mid, i as f32 / segments as f32));
        }
        for i in 1..=segments {
            points.push(quadratic(self.mid, second, self.end, i as f32 / segments as f32));
        }
        points
    }

    /// Shortest distance from `point` to the sampled curve
    pub fn distance_to(&self, point: Pos2) -> f32 {
        self.sample(16)
            .windows(2)
            .map(|w| segment_distance(point, w[0], w[1]))
            .fold(f32::INFINITY, f32::min)
    }
}

fn quadratic(p0: Pos2, p1: Pos2, p2: Pos2, t: f32) -> Pos2 {
    let mt = 1.0 - t;
    let v = p0.to_vec2() * (mt * mt) + p1.to_vec2() * (2.0 * mt * t) + p2.to_vec2() * (t * t);
    v.to_pos2()
}

fn segment_distance(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab: Vec2 = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_vertical_span_uses_capped_extent() {
        let curve = Curve::between(pos2(0.0, 0.0), pos2(0.0, 400.0), 104.0);
        assert_eq!(curve.control, pos2(104.0, 0.0));
        assert_eq!(curve.mid, pos2(0.0, 200.0));

        let short = Curve::between(pos2(0.0, 0.0), pos2(0.0, 60.0), 104.0);
        assert_eq!(short.control, pos2(30.0, 0.0));
    }

    #[test]
    fn test_level_span_uses_horizontal_fraction() {
        let curve = Curve::between(pos2(0.0, 0.0), pos2(800.0, 2.0), 104.0);
        assert_eq!(curve.control, pos2(200.0, 0.0));
        assert_eq!(curve.to_svg(), "M 0 0 Q 200 0 400 1 T 800 2");
    }

    #[test]
    fn test_sample_hits_endpoints() {
        let curve = Curve::between(pos2(10.0, 10.0), pos2(300.0, 90.0), 104.0);
        let points = curve.sample(8);
        assert_eq!(points.len(), 17);
        assert_eq!(points[0], curve.start);
        assert_eq!(points[8], curve.mid);
        assert!(points[16].distance(curve.end) < 1e-3);
        assert!(curve.distance_to(curve.mid) < 1e-3);
        assert!(curve.distance_to(pos2(10.0, 300.0)) > 50.0);
    }

    #[test]
    fn test_svg_outline() {
        let d = to_svg(&[
            PathSegment::MoveTo(pos2(0.0, 0.0)),
            PathSegment::LineTo(pos2(0.0, 12.0)),
            PathSegment::Arc {
                radius: 12.0,
                sweep: true,
                to: pos2(0.0, 36.0),
            },
            PathSegment::Close,
        ]);
        assert_eq!(d, "M 0 0 L 0 12 A 12 12 0 0 1 0 36 Z");
        assert_eq!(to_svg(&[]), "");
        assert_eq!(to_svg(&[PathSegment::Close]), "Z");
    }
}
