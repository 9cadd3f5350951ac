use std::fmt::Write as _;

use crate::engine::DotPrimitive;

/// One filled circle, `r = diameter / 2`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CircleShape {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl From<&DotPrimitive> for CircleShape {
    fn from(dot: &DotPrimitive) -> Self {
        Self {
            cx: dot.center.x,
            cy: dot.center.y,
            r: dot.diameter / 2.0,
        }
    }
}

/// All circles sharing one fill color.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct VectorGroup {
    pub fill: String,
    pub circles: Vec<CircleShape>,
}

/// Vector mirror of a raster render: same pixel coordinate space, same
/// geometry, one group per fill color.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct VectorDocument {
    pub width: u32,
    pub height: u32,
    pub groups: Vec<VectorGroup>,
}

impl VectorDocument {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            groups: Vec::new(),
        }
    }

    /// Single-group document for one layer.
    pub fn layer(width: u32, height: u32, fill: &str, dots: &[DotPrimitive]) -> Self {
        let mut doc = Self::new(width, height);
        doc.push_group(fill);
        doc.append_to_group(fill, dots);
        doc
    }

    /// Add an (initially empty) group for `fill`. Group order is the order of
    /// these calls, which is what the merged document uses to preserve color
    /// selection order.
    pub fn push_group(&mut self, fill: &str) {
        self.groups.push(VectorGroup {
            fill: fill.to_string(),
            circles: Vec::new(),
        });
    }

    /// Append circles to the group with a matching fill, creating it at the
    /// end if absent.
    pub fn append_to_group(&mut self, fill: &str, dots: &[DotPrimitive]) {
        if !self.groups.iter().any(|g| g.fill == fill) {
            self.push_group(fill);
        }
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.fill == fill)
            .expect("group exists after push");
        group.circles.extend(dots.iter().map(CircleShape::from));
    }

    pub fn circle_count(&self) -> usize {
        self.groups.iter().map(|g| g.circles.len()).sum()
    }

    /// Serialize as a standalone SVG document.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = self.width,
            h = self.height,
        );
        for group in &self.groups {
            let _ = write!(out, "<g fill=\"{}\">", group.fill);
            for c in &group.circles {
                let _ = write!(
                    out,
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"/>",
                    c.cx, c.cy, c.r
                );
            }
            out.push_str("</g>");
        }
        out.push_str("</svg>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn dot(x: f64, y: f64, diameter: f64) -> DotPrimitive {
        DotPrimitive {
            center: Point::new(x, y),
            diameter,
        }
    }

    #[test]
    fn layer_document_mirrors_dots_exactly() {
        let dots = [dot(1.5, 2.25, 5.0), dot(3.0, 4.0, 8.0)];
        let doc = VectorDocument::layer(10, 10, "#ee1d26", &dots);

        assert_eq!(doc.circle_count(), 2);
        let g = &doc.groups[0];
        assert_eq!(g.fill, "#ee1d26");
        assert_eq!(
            g.circles[0],
            CircleShape {
                cx: 1.5,
                cy: 2.25,
                r: 2.5
            }
        );
        assert_eq!(g.circles[1].r, 4.0);
    }

    #[test]
    fn groups_keep_insertion_order() {
        let mut doc = VectorDocument::new(4, 4);
        doc.push_group("#111111");
        doc.push_group("#222222");
        doc.append_to_group("#222222", &[dot(1.0, 1.0, 2.0)]);
        doc.append_to_group("#111111", &[dot(2.0, 2.0, 2.0)]);

        assert_eq!(doc.groups[0].fill, "#111111");
        assert_eq!(doc.groups[1].fill, "#222222");
        assert_eq!(doc.groups[0].circles.len(), 1);
        assert_eq!(doc.groups[1].circles.len(), 1);
    }

    #[test]
    fn append_creates_missing_group_at_the_end() {
        let mut doc = VectorDocument::new(4, 4);
        doc.push_group("#111111");
        doc.append_to_group("#333333", &[dot(1.0, 1.0, 2.0)]);
        assert_eq!(doc.groups.len(), 2);
        assert_eq!(doc.groups[1].fill, "#333333");
    }

    #[test]
    fn svg_string_has_expected_shape() {
        let doc = VectorDocument::layer(20, 10, "#000000", &[dot(5.0, 5.0, 4.0)]);
        let svg = doc.to_svg_string();

        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("viewBox=\"0 0 20 10\""));
        assert!(svg.contains("<g fill=\"#000000\">"));
        assert!(svg.contains("<circle cx=\"5\" cy=\"5\" r=\"2\"/>"));
        assert!(svg.ends_with("</g></svg>"));
    }
}
