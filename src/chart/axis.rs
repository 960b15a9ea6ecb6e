//! Linear axes mapping data values to plot pixels and back.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Orientation of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    /// Horizontal axis, values grow to the right
    X,
    /// Vertical axis, values grow upwards
    Y,
}

/// User configuration of an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    /// Optional id that annotations can reference instead of the index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub min: f64,

    #[serde(default = "default_axis_max")]
    pub max: f64,

    /// Flip the direction of the axis
    #[serde(default)]
    pub reversed: bool,
}

fn default_axis_max() -> f64 {
    100.0
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            id: None,
            min: 0.0,
            max: default_axis_max(),
            reversed: false,
        }
    }
}

/// Reference to an axis, either by position in the axis list or by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AxisRef {
    Index(usize),
    Id(String),
}

impl From<usize> for AxisRef {
    fn from(index: usize) -> Self {
        AxisRef::Index(index)
    }
}

impl From<&str> for AxisRef {
    fn from(id: &str) -> Self {
        AxisRef::Id(id.to_string())
    }
}

/// A laid-out axis.
///
/// `pos` is the pixel offset of the axis pane inside the chart (plot left for
/// x axes, plot top for y axes) and `len` its length in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub kind: AxisKind,
    pub options: AxisOptions,
    pub pos: f64,
    pub len: f64,
}

impl Axis {
    pub fn new(kind: AxisKind, options: AxisOptions) -> Self {
        Self {
            kind,
            options,
            pos: 0.0,
            len: 0.0,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.options.id.as_deref()
    }

    /// Pixel direction is flipped for y axes (screen y grows downwards),
    /// and again for reversed axes.
    fn flipped(&self) -> bool {
        (self.kind == AxisKind::Y) != self.options.reversed
    }

    fn span(&self) -> f64 {
        self.options.max - self.options.min
    }

    /// Converts a data value to a pixel position.
    ///
    /// # Arguments
    /// * `value` - Value on this axis
    /// * `pane` - When true the result is relative to the plot area instead of the chart
    pub fn to_pixels(&self, value: f64, pane: bool) -> f64 {
        let span = self.span();
        let mut ratio = if span == 0.0 {
            0.0
        } else {
            (value - self.options.min) / span
        };
        if self.flipped() {
            ratio = 1.0 - ratio;
        }
        let pixel = ratio * self.len;
        if pane { pixel } else { pixel + self.pos }
    }

    /// Inverse of [`Axis::to_pixels`].
    pub fn to_value(&self, pixel: f64, pane: bool) -> f64 {
        let pixel = if pane { pixel } else { pixel - self.pos };
        let mut ratio = if self.len == 0.0 { 0.0 } else { pixel / self.len };
        if self.flipped() {
            ratio = 1.0 - ratio;
        }
        self.options.min + ratio * self.span()
    }

    /// Returns true if a pane-relative pixel lies on the axis.
    pub fn contains_pixel(&self, pixel: f64) -> bool {
        (0.0..=self.len).contains(&pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(kind: AxisKind, reversed: bool) -> Axis {
        let mut axis = Axis::new(
            kind,
            AxisOptions {
                reversed,
                ..Default::default()
            },
        );
        axis.pos = 50.0;
        axis.len = 200.0;
        axis
    }

    #[test]
    fn x_axis_grows_to_the_right() {
        let x = axis(AxisKind::X, false);
        assert_eq!(x.to_pixels(0.0, true), 0.0);
        assert_eq!(x.to_pixels(50.0, true), 100.0);
        assert_eq!(x.to_pixels(50.0, false), 150.0);
    }

    #[test]
    fn y_axis_grows_upwards() {
        let y = axis(AxisKind::Y, false);
        assert_eq!(y.to_pixels(0.0, true), 200.0);
        assert_eq!(y.to_pixels(100.0, true), 0.0);
        let reversed = axis(AxisKind::Y, true);
        assert_eq!(reversed.to_pixels(0.0, true), 0.0);
    }

    #[test]
    fn to_value_inverts_to_pixels() {
        for kind in [AxisKind::X, AxisKind::Y] {
            let a = axis(kind, false);
            let px = a.to_pixels(37.5, false);
            assert!((a.to_value(px, false) - 37.5).abs() < 1e-9);
        }
    }

    #[test]
    fn axis_ref_deserializes_index_or_id() {
        let index: AxisRef = serde_json::from_str("1").unwrap();
        let id: AxisRef = serde_json::from_str("\"price\"").unwrap();
        assert_eq!(index, AxisRef::Index(1));
        assert_eq!(id, AxisRef::Id("price".into()));
    }
}
