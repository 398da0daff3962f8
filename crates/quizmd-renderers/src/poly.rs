//! `polygon` and `polyline` with optional node and edge labels.
//!
//! ```text
//! polygon: points='0,0 60,0 60,90' labels=A,B,C lengths=6,9,11 labelFill=black
//! ```
//!
//! `labels` names the nodes, one per point. `lengths` labels the edges: edge
//! `i` runs from point `i` to point `i + 1`, wrapping around, so a polyline
//! needs `n - 1` of them and a polygon `n`. Labels are placed just outside
//! the shape; when that pushes a label past the top or left border, the
//! whole figure moves right or down to make room.

use std::f64::consts::FRAC_PI_2;

use quizmd::expr::format_number;
use quizmd::{Attributes, CompileError, RenderContext, Renderer, Result};

use crate::geometry::Paint;
use crate::text_or;

const TEXT_HEIGHT: f64 = 10.0;
const CHAR_WIDTH: f64 = 15.0;
const PADDING: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyKind {
    Polygon,
    Polyline,
}

impl PolyKind {
    pub fn tag(self) -> &'static str {
        match self {
            PolyKind::Polygon => "polygon",
            PolyKind::Polyline => "polyline",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    x: f64,
    y: f64,
    label: String,
    offset: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
struct Edge {
    from: usize,
    to: usize,
    label: String,
    offset: (f64, f64),
}

/// A polygon or polyline with its labels laid out.
#[derive(Debug, Clone)]
pub struct Poly {
    kind: PolyKind,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    paint: Paint,
    label_fill: String,
}

impl Poly {
    /// Reads `points`, `labels` and `lengths` and lays out the labels.
    ///
    /// # Errors
    ///
    /// - [`CompileError::MissingAttribute`] without `points`.
    /// - [`CompileError::InvalidAttribute`] for a point that is not `x,y`,
    ///   a `labels` count other than the point count, or a `lengths` count
    ///   outside `n - 1 ..= n`.
    pub fn new(kind: PolyKind, config: &Attributes) -> Result<Self> {
        let name = kind.tag();
        let points = config
            .text("points")
            .ok_or_else(|| CompileError::missing_attribute(name, "points"))?;

        let mut nodes = points
            .split_whitespace()
            .map(|point| parse_point(name, point))
            .collect::<Result<Vec<_>>>()?;
        let n = nodes.len();

        if let Some(labels) = config.text("labels") {
            let labels: Vec<&str> = labels.split(',').collect();
            if labels.len() != n {
                return Err(CompileError::invalid_attribute(
                    name,
                    "labels",
                    format!("{} labels for {n} points", labels.len()),
                ));
            }
            for (node, label) in nodes.iter_mut().zip(labels) {
                node.label = label.to_string();
            }
        }

        let mut edges = Vec::new();
        if let Some(lengths) = config.text("lengths") {
            let lengths: Vec<&str> = lengths.split(',').collect();
            if lengths.len() + 1 < n || lengths.len() > n {
                return Err(CompileError::invalid_attribute(
                    name,
                    "lengths",
                    format!("{} lengths for {n} points", lengths.len()),
                ));
            }
            edges = lengths
                .into_iter()
                .enumerate()
                .map(|(i, label)| Edge {
                    from: i,
                    to: (i + 1) % n,
                    label: label.to_string(),
                    offset: (0.0, 0.0),
                })
                .collect();
        }

        let paint = Paint::new(config);
        let label_fill = text_or(config, "labelFill", &paint.fill).to_string();

        let mut poly = Self {
            kind,
            nodes,
            edges,
            paint,
            label_fill,
        };
        poly.place_labels();
        Ok(poly)
    }

    /// Puts each node label on the outside of the corner, bisecting the
    /// angle to its neighbors, and each edge label next to its midpoint.
    fn place_labels(&mut self) {
        let n = self.nodes.len();
        for i in 0..n {
            if self.nodes[i].label.is_empty() {
                continue;
            }
            let prev = &self.nodes[(i + n - 1) % n];
            let next = &self.nodes[(i + 1) % n];
            let node = &self.nodes[i];
            let angle = (node.y - (prev.y + next.y) / 2.0).atan2(node.x - (prev.x + next.x) / 2.0);

            let dx = if angle.abs() <= FRAC_PI_2 {
                PADDING
            } else {
                round_half_up(node.label.chars().count() as f64 * CHAR_WIDTH * angle.cos())
            };
            // Text is anchored at its baseline, so labels below need room.
            let dy = if angle > 0.0 { TEXT_HEIGHT } else { PADDING };
            self.nodes[i].offset = (dx, dy);
        }

        for edge in &mut self.edges {
            if edge.label.is_empty() {
                continue;
            }
            let from = &self.nodes[edge.from];
            let to = &self.nodes[edge.to];
            edge.offset = match (from.label.is_empty(), to.label.is_empty()) {
                (false, false) => (
                    ((from.offset.0 + to.offset.0) / 2.0).floor(),
                    ((from.offset.1 + to.offset.1) / 2.0).floor(),
                ),
                (false, true) => from.offset,
                (true, false) => to.offset,
                (true, true) => {
                    let slope = (to.y - from.y).atan2(to.x - from.x);
                    if (0.0..FRAC_PI_2).contains(&slope) || slope <= -FRAC_PI_2 {
                        (0.0, PADDING)
                    } else {
                        (0.0, -TEXT_HEIGHT - PADDING)
                    }
                }
            };
        }

        let mut min_x: f64 = 0.0;
        let mut min_y: f64 = 0.0;
        for (x, y) in self.label_positions() {
            min_x = min_x.min(x);
            min_y = min_y.min(y - TEXT_HEIGHT);
        }
        if min_x < 0.0 || min_y < 0.0 {
            tracing::trace!(min_x, min_y, "moving figure to fit its labels");
            for node in &mut self.nodes {
                node.x -= min_x;
                node.y -= min_y;
            }
        }
    }

    /// Baseline positions of every label, nodes first.
    fn label_positions(&self) -> Vec<(f64, f64)> {
        let nodes = self
            .nodes
            .iter()
            .filter(|node| !node.label.is_empty())
            .map(|node| (node.x + node.offset.0, node.y + node.offset.1));
        let edges = self
            .edges
            .iter()
            .filter(|edge| !edge.label.is_empty())
            .map(|edge| {
                let (mx, my) = self.midpoint(edge);
                (mx + edge.offset.0, my + edge.offset.1)
            });
        nodes.chain(edges).collect()
    }

    fn midpoint(&self, edge: &Edge) -> (f64, f64) {
        let from = &self.nodes[edge.from];
        let to = &self.nodes[edge.to];
        ((from.x + to.x) / 2.0, (from.y + to.y) / 2.0)
    }

    fn text(&self, out: &mut String, (x, y): (f64, f64), label: &str) {
        out.push_str(&format!(
            r#"<text x="{}" y="{}" fill="{}">{label}</text>"#,
            format_number(x),
            format_number(y),
            self.label_fill
        ));
    }
}

impl Renderer for Poly {
    fn render_opening(&self, _context: &RenderContext<'_>) -> Result<String> {
        let points = self
            .nodes
            .iter()
            .map(|node| format!("{},{}", format_number(node.x), format_number(node.y)))
            .collect::<Vec<_>>()
            .join(" ");

        let mut out = format!(r#"<{} points="{points}"{}/>"#, self.kind.tag(), self.paint);
        let labels = self
            .nodes
            .iter()
            .map(|node| &node.label)
            .chain(self.edges.iter().map(|edge| &edge.label))
            .filter(|label| !label.is_empty());
        for (position, label) in self.label_positions().into_iter().zip(labels) {
            self.text(&mut out, position, label);
        }
        Ok(out)
    }
}

fn parse_point(renderer: &str, point: &str) -> Result<Node> {
    let invalid = || {
        CompileError::invalid_attribute(renderer, "points", format!("'{point}' is not an x,y pair"))
    };
    let (x, y) = point.split_once(',').ok_or_else(invalid)?;
    Ok(Node {
        x: x.trim().parse().map_err(|_| invalid())?,
        y: y.trim().parse().map_err(|_| invalid())?,
        label: String::new(),
        offset: (0.0, 0.0),
    })
}

/// Rounds halves toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tests::{render, PAINT};

    #[test]
    fn test_polygon() {
        assert_eq!(
            render(&["polygon: points='0,0 100,100 100,200 0,100'"]).unwrap(),
            format!(r#"<polygon points="0,0 100,100 100,200 0,100"{PAINT}/>"#)
        );
    }

    #[test]
    fn test_polyline() {
        assert_eq!(
            render(&["polyline: points='0,0 100,100 100,200 0,100'"]).unwrap(),
            format!(r#"<polyline points="0,0 100,100 100,200 0,100"{PAINT}/>"#)
        );
    }

    #[test]
    fn test_points_are_required() {
        let err = render(&["polygon: fill=red"]).unwrap_err();
        assert!(matches!(
            err,
            CompileError::MissingAttribute { ref renderer, ref attribute }
                if renderer == "polygon" && attribute == "points"
        ));
    }

    #[test]
    fn test_malformed_point() {
        let err = render(&["polygon: points='0,0 5'"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "polygon: invalid attribute 'points': '5' is not an x,y pair"
        );
    }

    #[test]
    fn test_label_count_must_match() {
        let err = render(&["polygon: points='0,0 10,0 5,5' labels=A,B"]).unwrap_err();
        assert!(err.to_string().contains("2 labels for 3 points"));
    }

    #[test]
    fn test_length_count_bounds() {
        assert!(render(&["polyline: points='0,0 10,0 5,5' lengths=1"]).is_err());
        assert!(render(&["polyline: points='0,0 10,0 5,5' lengths=1,2"]).is_ok());
        assert!(render(&["polygon: points='0,0 10,0 5,5' lengths=1,2,3"]).is_ok());
        assert!(render(&["polygon: points='0,0 10,0 5,5' lengths=1,2,3,4"]).is_err());
    }

    #[test]
    fn test_node_labels_move_figure_into_view() {
        // A sits left of the figure, so everything shifts right by the width
        // of its label and down by the text height above the top edge.
        assert_eq!(
            render(&["polygon: points='0,0 100,0 50,100' labels=A,B,C labelFill=black"]).unwrap(),
            format!(
                concat!(
                    r#"<polygon points="12,8 112,8 62,108"{}/>"#,
                    r#"<text x="0" y="10" fill="black">A</text>"#,
                    r#"<text x="114" y="10" fill="black">B</text>"#,
                    r#"<text x="64" y="118" fill="black">C</text>"#,
                ),
                PAINT
            )
        );
    }

    #[test]
    fn test_edge_label_without_node_labels() {
        assert_eq!(
            render(&["polyline: points='0,0 100,0' lengths=5"]).unwrap(),
            format!(
                r#"<polyline points="0,8 100,8"{PAINT}/><text x="50" y="10" fill="none">5</text>"#
            )
        );
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(-12.48), -12.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.5), 3.0);
    }
}
