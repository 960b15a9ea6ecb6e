//! Geometry helpers shared by the renderer and the annotation items.
//!
//! This module provides:
//! - [`BBox`], the axis-aligned box used for plot areas, graphics and hit tests
//! - Arrowhead geometry for path markers
//! - Crisp line snapping for thin strokes

use serde::{Deserialize, Serialize};

// ============================================================================
// Bounding Boxes
// ============================================================================

/// Axis-aligned box in chart pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a box from min/max bounds. Returns `None` when the bounds are inverted.
    pub fn from_min_max(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<Self> {
        if max_x < min_x || max_y < min_y {
            return None;
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Smallest box covering every point. `None` for an empty slice.
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let (&(x0, y0), rest) = points.split_first()?;
        let mut min_x = x0;
        let mut max_x = x0;
        let mut min_y = y0;
        let mut max_y = y0;

        for &(x, y) in rest {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        Self::from_min_max(min_x, min_y, max_x, max_y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns true if the point lies inside the box (edges included).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Returns a box that covers both input boxes.
    pub fn union(self, other: BBox) -> BBox {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = self.right().max(other.right());
        let max_y = self.bottom().max(other.bottom());
        BBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Expands the box evenly in all directions by `amount`.
    pub fn inflate(self, amount: f64) -> BBox {
        BBox::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Returns true if the box has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

// ============================================================================
// Arrowhead Geometry
// ============================================================================

/// Calculates arrowhead points for a tip at (x1, y1) pointing away from (x2, y2).
///
/// The arrowhead length is capped at 30% of the segment length so markers on
/// short segments don't swallow the line.
///
/// # Returns
/// Array of two points `[(left_x, left_y), (right_x, right_y)]` for the arrowhead wings.
/// If the segment is too short (< 1 pixel), both points equal (x1, y1).
pub fn calculate_arrowhead(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    length: f64,
    angle_degrees: f64,
) -> [(f64, f64); 2] {
    let dx = x1 - x2;
    let dy = y1 - y2;
    let line_length = (dx * dx + dy * dy).sqrt();

    if line_length < 1.0 {
        return [(x1, y1), (x1, y1)];
    }

    let ux = dx / line_length;
    let uy = dy / line_length;

    let arrow_length = length.min(line_length * 0.3);

    let angle = angle_degrees.to_radians();
    let cos_a = angle.cos();
    let sin_a = angle.sin();

    let left_x = x1 - arrow_length * (ux * cos_a - uy * sin_a);
    let left_y = y1 - arrow_length * (uy * cos_a + ux * sin_a);

    let right_x = x1 - arrow_length * (ux * cos_a + uy * sin_a);
    let right_y = y1 - arrow_length * (uy * cos_a - ux * sin_a);

    [(left_x, left_y), (right_x, right_y)]
}

// ============================================================================
// Crisp Lines
// ============================================================================

/// Snaps a coordinate shared by a vertical or horizontal segment so an odd
/// stroke width lands on whole pixels.
pub fn crisp(value: f64, stroke_width: f64) -> f64 {
    let offset = (stroke_width.round() as i64 % 2) as f64 / 2.0;
    value.round() - offset
}

/// Rounds halves up, as used when placing label and image boxes.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrowhead_caps_at_thirty_percent_of_line_length() {
        let [(lx, ly), _] = calculate_arrowhead(10.0, 10.0, 0.0, 10.0, 100.0, 30.0);
        let distance = ((10.0 - lx).powi(2) + (10.0 - ly).powi(2)).sqrt();
        assert!((distance - 3.0).abs() < 1e-9);
    }

    #[test]
    fn arrowhead_handles_degenerate_lines() {
        let [(lx, ly), (rx, ry)] = calculate_arrowhead(5.0, 5.0, 5.0, 5.0, 15.0, 45.0);
        assert_eq!((lx, ly), (5.0, 5.0));
        assert_eq!((rx, ry), (5.0, 5.0));
    }

    #[test]
    fn bbox_from_points_covers_all() {
        let bbox = BBox::from_points(&[(10.0, 20.0), (-5.0, 40.0), (3.0, 0.0)]).unwrap();
        assert_eq!(bbox, BBox::new(-5.0, 0.0, 15.0, 40.0));
        assert!(BBox::from_points(&[]).is_none());
    }

    #[test]
    fn bbox_union_and_contains() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(20.0, 5.0, 5.0, 5.0);
        let u = a.union(b);
        assert_eq!(u, BBox::new(0.0, 0.0, 25.0, 10.0));
        assert!(u.contains(22.0, 7.0));
        assert!(!a.contains(11.0, 5.0));
    }

    #[test]
    fn crisp_snaps_odd_widths_to_half_pixels() {
        assert_eq!(crisp(10.2, 1.0), 9.5);
        assert_eq!(crisp(10.2, 2.0), 10.0);
    }
}
