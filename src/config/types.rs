//! Configuration type definitions.

use crate::annotation::{Align, Draggable, Overflow, VerticalAlign};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Defaults applied to every annotation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationConfig {
    /// Whether annotations start visible
    #[serde(default = "default_true")]
    pub visible: bool,

    /// Drag axes: "x", "y", "xy", or "" to disable dragging
    #[serde(default = "default_draggable")]
    pub draggable: Draggable,

    /// Stacking order of annotation groups
    #[serde(default = "default_annotation_z_index")]
    pub z_index: i32,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            visible: default_true(),
            draggable: default_draggable(),
            z_index: default_annotation_z_index(),
        }
    }
}

/// Default label appearance and placement.
///
/// Colors accept `#rgb`, `#rrggbb`, `rgb(...)`, `rgba(...)`, CSS names or `none`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LabelConfig {
    /// Horizontal alignment against the anchor (left, center, right)
    #[serde(default = "default_label_align")]
    pub align: Align,

    /// Vertical alignment against the anchor (top, middle, bottom)
    #[serde(default = "default_label_vertical_align")]
    pub vertical_align: VerticalAlign,

    /// Horizontal offset from the anchor in pixels
    #[serde(default)]
    pub x: f64,

    /// Vertical offset from the anchor in pixels
    #[serde(default = "default_label_y")]
    pub y: f64,

    /// Let labels overlap other chart labels
    #[serde(default)]
    pub allow_overlap: bool,

    #[serde(default = "default_translucent_black")]
    pub background_color: String,

    #[serde(default = "default_black")]
    pub border_color: String,

    /// Corner radius of the box (valid range: 0.0 - 50.0)
    #[serde(default = "default_border_radius")]
    pub border_radius: f64,

    /// Border width (valid range: 0.0 - 20.0)
    #[serde(default = "default_one")]
    pub border_width: f64,

    #[serde(default)]
    pub class_name: String,

    /// Hide labels that would leave the plot area
    #[serde(default)]
    pub crop: bool,

    /// "justify" keeps labels inside the plot area, "none" leaves them be
    #[serde(default = "default_overflow")]
    pub overflow: Overflow,

    /// Space between text and border (valid range: 0.0 - 50.0)
    #[serde(default = "default_padding")]
    pub padding: f64,

    #[serde(default)]
    pub shadow: bool,

    /// Box shape: callout, rect, circle or connector
    #[serde(default = "default_label_shape")]
    pub shape: String,

    /// Font size in pixels (valid range: 6.0 - 72.0)
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    #[serde(default = "default_font_weight")]
    pub font_weight: String,

    /// Text color, or "contrast" to pick black or white against the background
    #[serde(default = "default_text_color")]
    pub color: String,

    #[serde(default)]
    pub use_html: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            align: default_label_align(),
            vertical_align: default_label_vertical_align(),
            x: 0.0,
            y: default_label_y(),
            allow_overlap: false,
            background_color: default_translucent_black(),
            border_color: default_black(),
            border_radius: default_border_radius(),
            border_width: default_one(),
            class_name: String::new(),
            crop: false,
            overflow: default_overflow(),
            padding: default_padding(),
            shadow: false,
            shape: default_label_shape(),
            font_size: default_font_size(),
            font_weight: default_font_weight(),
            color: default_text_color(),
            use_html: false,
        }
    }
}

/// Default shape appearance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShapeConfig {
    #[serde(default = "default_translucent_black")]
    pub stroke: String,

    /// Stroke width in pixels (valid range: 0.0 - 20.0)
    #[serde(default = "default_one")]
    pub stroke_width: f64,

    #[serde(default = "default_translucent_black")]
    pub fill: String,

    /// Circle radius / rect corner radius
    #[serde(default)]
    pub r: f64,

    /// Extra hit width on each side of paths (valid range: 0.0 - 20.0)
    #[serde(default = "default_snap")]
    pub snap: f64,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            stroke: default_translucent_black(),
            stroke_width: default_one(),
            fill: default_translucent_black(),
            r: 0.0,
            snap: default_snap(),
        }
    }
}

/// Default control point handle appearance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ControlPointConfig {
    /// Handle symbol: circle or square
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Handle width in pixels (valid range: 2.0 - 50.0)
    #[serde(default = "default_handle_size")]
    pub width: f64,

    /// Handle height in pixels (valid range: 2.0 - 50.0)
    #[serde(default = "default_handle_size")]
    pub height: f64,

    #[serde(default = "default_black")]
    pub stroke: String,

    /// Outline width (valid range: 0.0 - 10.0)
    #[serde(default = "default_handle_stroke_width")]
    pub stroke_width: f64,

    #[serde(default = "default_white")]
    pub fill: String,

    /// Show handles from the start instead of on demand
    #[serde(default)]
    pub visible: bool,
}

impl Default for ControlPointConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            width: default_handle_size(),
            height: default_handle_size(),
            stroke: default_black(),
            stroke_width: default_handle_stroke_width(),
            fill: default_white(),
            visible: false,
        }
    }
}

/// Chart-level settings of the annotation layer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChartConfig {
    /// Stacking order of the control point group
    #[serde(default = "default_control_points_z_index")]
    pub control_points_z_index: i32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            control_points_z_index: default_control_points_z_index(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_draggable() -> Draggable {
    Draggable::Xy
}

fn default_annotation_z_index() -> i32 {
    6
}

fn default_label_align() -> Align {
    Align::Center
}

fn default_label_vertical_align() -> VerticalAlign {
    VerticalAlign::Bottom
}

fn default_label_y() -> f64 {
    -16.0
}

fn default_translucent_black() -> String {
    "rgba(0, 0, 0, 0.75)".to_string()
}

fn default_black() -> String {
    "black".to_string()
}

fn default_white() -> String {
    "white".to_string()
}

fn default_border_radius() -> f64 {
    3.0
}

fn default_one() -> f64 {
    1.0
}

fn default_overflow() -> Overflow {
    Overflow::Justify
}

fn default_padding() -> f64 {
    5.0
}

fn default_label_shape() -> String {
    "callout".to_string()
}

fn default_font_size() -> f64 {
    11.0
}

fn default_font_weight() -> String {
    "normal".to_string()
}

fn default_text_color() -> String {
    "contrast".to_string()
}

fn default_snap() -> f64 {
    2.0
}

fn default_symbol() -> String {
    "circle".to_string()
}

fn default_handle_size() -> f64 {
    10.0
}

fn default_handle_stroke_width() -> f64 {
    2.0
}

fn default_control_points_z_index() -> i32 {
    99
}
