//! Declarative annotation configuration.
//!
//! Every field is optional so a user record, the configured defaults and an
//! `update()` patch can all be layered with [`Merge`]. Field names follow the
//! camelCase keys used in chart configuration files.

use super::format::LabelContext;
use crate::chart::AxisRef;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

// ============================================================================
// Merging
// ============================================================================

/// Deep merge of option records: set values of `other` win, nested records
/// merge recursively, arrays are replaced as a whole.
pub trait Merge {
    fn merge(&mut self, other: &Self);

    /// Returns `self` merged with `other`, leaving both untouched.
    fn merged(&self, other: &Self) -> Self
    where
        Self: Clone,
    {
        let mut result = self.clone();
        result.merge(other);
        result
    }
}

macro_rules! impl_merge {
    ($ty:ty { $($plain:ident),* $(,)? } nested { $($nested:ident),* $(,)? }) => {
        impl Merge for $ty {
            fn merge(&mut self, other: &Self) {
                $(
                    if other.$plain.is_some() {
                        self.$plain = other.$plain.clone();
                    }
                )*
                $(
                    if let Some(theirs) = &other.$nested {
                        self.$nested
                            .get_or_insert_with(Default::default)
                            .merge(theirs);
                    }
                )*
            }
        }
    };
}

// ============================================================================
// Points
// ============================================================================

/// Where an item is anchored: a data point id, or literal coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PointSpec {
    /// Id of a data point in any series
    Id(String),
    /// Literal coordinates, axis values when the axis resolves, plot pixels otherwise
    Coords(CoordsSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoordsSpec {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<AxisRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<AxisRef>,
}

impl PointSpec {
    /// Plot-pixel coordinates not bound to any axis.
    pub fn pixel(x: f64, y: f64) -> Self {
        PointSpec::Coords(CoordsSpec {
            x,
            y,
            x_axis: None,
            y_axis: None,
        })
    }

    /// Axis values on the given x and y axes.
    pub fn on_axes(x: f64, y: f64, x_axis: impl Into<AxisRef>, y_axis: impl Into<AxisRef>) -> Self {
        PointSpec::Coords(CoordsSpec {
            x,
            y,
            x_axis: Some(x_axis.into()),
            y_axis: Some(y_axis.into()),
        })
    }

    pub fn id(id: &str) -> Self {
        PointSpec::Id(id.to_string())
    }

    pub fn as_coords(&self) -> Option<&CoordsSpec> {
        match self {
            PointSpec::Coords(coords) => Some(coords),
            PointSpec::Id(_) => None,
        }
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Axes along which an annotation can be dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Draggable {
    #[serde(rename = "x")]
    X,
    #[serde(rename = "y")]
    Y,
    #[serde(rename = "xy")]
    Xy,
    /// Dragging disabled
    #[serde(rename = "")]
    Disabled,
}

impl Draggable {
    /// Drops the components of a drag delta that this mode does not allow.
    pub fn constrain(self, dx: f64, dy: f64) -> (f64, f64) {
        match self {
            Draggable::X => (dx, 0.0),
            Draggable::Y => (0.0, dy),
            Draggable::Xy => (dx, dy),
            Draggable::Disabled => (0.0, 0.0),
        }
    }

    pub fn is_enabled(self) -> bool {
        self != Draggable::Disabled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

/// What to do with a label that would leave the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Overflow {
    /// Move it back inside
    #[serde(rename = "justify")]
    Justify,
    /// Leave it where alignment put it
    #[serde(rename = "none")]
    Allow,
}

// ============================================================================
// Label formatter callback
// ============================================================================

/// Callback producing label text from the anchor's context.
///
/// Callbacks only exist in memory: they are skipped when options are
/// serialized, and two formatters are equal only if they are the same closure.
#[derive(Clone)]
pub struct LabelFormatter(pub Rc<dyn Fn(&LabelContext) -> String>);

impl LabelFormatter {
    pub fn new(f: impl Fn(&LabelContext) -> String + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, context: &LabelContext) -> String {
        (self.0)(context)
    }
}

impl fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LabelFormatter(..)")
    }
}

impl PartialEq for LabelFormatter {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// ============================================================================
// Control points
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlPointStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

impl_merge!(ControlPointStyle { stroke, stroke_width, fill } nested {});

/// Appearance of a control point handle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlPointOptions {
    /// `circle` or `square`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ControlPointStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl_merge!(ControlPointOptions { symbol, width, height, visible } nested { style });

// ============================================================================
// Labels
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    /// Text color, or `contrast` to pick black/white against the background
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl_merge!(TextStyle { font_size, font_weight, color } nested {});

/// Options of a label, also used as the annotation-wide `labelOptions` defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    /// When false the label is handed to the chart's overlap-avoidance pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_overlap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Hide the label if it would still leave the plot area
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<bool>,
    /// Place the label this far above (or below) the anchor, tooltip style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Template such as `{y:.2f}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip)]
    #[schemars(skip)]
    pub formatter: Option<LabelFormatter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<bool>,
    /// Box shape: `callout`, `rect`, `circle` or `connector`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<TextStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "useHTML", skip_serializing_if = "Option::is_none")]
    pub use_html: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<PointSpec>,
    /// Per-handle overrides; when absent the label gets one handle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_points: Option<Vec<ControlPointOptions>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_point_options: Option<ControlPointOptions>,
}

impl_merge!(LabelOptions {
    align,
    allow_overlap,
    background_color,
    border_color,
    border_radius,
    border_width,
    class_name,
    crop,
    distance,
    format,
    formatter,
    overflow,
    padding,
    shadow,
    shape,
    text,
    use_html,
    vertical_align,
    visible,
    x,
    y,
    z_index,
    point,
    control_points,
} nested {
    style,
    control_point_options,
});

// ============================================================================
// Shapes
// ============================================================================

/// Options of a shape, also used as the annotation-wide `shapeOptions` defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeOptions {
    /// Registered shape type: `rect`, `circle`, `path`, `image` or a custom one
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Circle radius, or corner radius of a rect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Image source path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_style: Option<String>,
    /// `arrow` or `reverse-arrow`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<String>,
    /// Extra hit width on each side of a path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<PointSpec>,
    /// Vertices of a path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<PointSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_points: Option<Vec<ControlPointOptions>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_point_options: Option<ControlPointOptions>,
}

impl_merge!(ShapeOptions {
    shape_type,
    stroke,
    stroke_width,
    fill,
    r,
    width,
    height,
    src,
    dash_style,
    marker_start,
    marker_end,
    snap,
    x,
    y,
    align,
    vertical_align,
    overflow,
    crop,
    distance,
    class_name,
    visible,
    z_index,
    point,
    points,
    control_points,
} nested {
    control_point_options,
});

impl ShapeOptions {
    pub fn of_type(shape_type: &str) -> Self {
        Self {
            shape_type: Some(shape_type.to_string()),
            ..Default::default()
        }
    }
}

// ============================================================================
// Item options
// ============================================================================

/// Anchor and handle accessors shared by label and shape options.
pub trait ItemOptions: Clone {
    /// Anchors configured on the item itself, in order.
    fn point_specs(&self) -> Vec<PointSpec>;

    /// Writes an anchor back after a drag.
    fn set_point_spec(&mut self, index: usize, spec: PointSpec);

    fn visible(&self) -> bool;

    fn control_points(&self) -> Option<&[ControlPointOptions]>;

    fn control_point_defaults(&self) -> Option<&ControlPointOptions>;

    /// Effective handle options: per-handle overrides over the item defaults,
    /// or `default_count` copies of the defaults.
    fn resolved_control_points(&self, default_count: usize) -> Vec<ControlPointOptions> {
        let defaults = self.control_point_defaults().cloned().unwrap_or_default();
        match self.control_points() {
            Some(entries) => entries.iter().map(|entry| defaults.merged(entry)).collect(),
            None => vec![defaults; default_count],
        }
    }
}

impl ItemOptions for LabelOptions {
    fn point_specs(&self) -> Vec<PointSpec> {
        self.point.iter().cloned().collect()
    }

    fn set_point_spec(&mut self, index: usize, spec: PointSpec) {
        if index == 0 {
            self.point = Some(spec);
        }
    }

    fn visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    fn control_points(&self) -> Option<&[ControlPointOptions]> {
        self.control_points.as_deref()
    }

    fn control_point_defaults(&self) -> Option<&ControlPointOptions> {
        self.control_point_options.as_ref()
    }
}

impl ItemOptions for ShapeOptions {
    fn point_specs(&self) -> Vec<PointSpec> {
        match &self.points {
            Some(points) => points.clone(),
            None => self.point.iter().cloned().collect(),
        }
    }

    fn set_point_spec(&mut self, index: usize, spec: PointSpec) {
        match &mut self.points {
            Some(points) if index < points.len() => points[index] = spec,
            Some(_) => {}
            None if index == 0 => self.point = Some(spec),
            None => {}
        }
    }

    fn visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    fn control_points(&self) -> Option<&[ControlPointOptions]> {
        self.control_points.as_deref()
    }

    fn control_point_defaults(&self) -> Option<&ControlPointOptions> {
        self.control_point_options.as_ref()
    }
}

// ============================================================================
// Annotations
// ============================================================================

/// Options of one annotation.
///
/// # Example JSON
/// ```json
/// {
///   "id": "peak",
///   "draggable": "xy",
///   "labels": [{ "point": "max", "text": "Peak {y}" }],
///   "shapes": [{ "type": "circle", "point": "max", "r": 6 }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnotationOptions {
    /// Used by `remove_annotation`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draggable: Option<Draggable>,
    /// Defaults merged under every label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_options: Option<LabelOptions>,
    /// Defaults merged under every shape
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_options: Option<ShapeOptions>,
    /// Defaults merged under every control point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_point_options: Option<ControlPointOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<LabelOptions>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shapes: Option<Vec<ShapeOptions>>,
    /// Anchor of the annotation itself, inherited by items without their own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<PointSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<PointSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_points: Option<Vec<ControlPointOptions>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

impl_merge!(AnnotationOptions {
    id,
    visible,
    draggable,
    labels,
    shapes,
    point,
    points,
    control_points,
    z_index,
} nested {
    label_options,
    shape_options,
    control_point_options,
});

impl AnnotationOptions {
    /// Built-in defaults, identical to those of an empty configuration file.
    pub fn builtin_defaults() -> Self {
        crate::config::Config::default().annotation_defaults()
    }

    /// Effective options of a label entry.
    pub fn effective_label(&self, entry: &LabelOptions) -> LabelOptions {
        let mut options = self.label_options.clone().unwrap_or_default();
        options.merge(&LabelOptions {
            control_point_options: self.control_point_options.clone(),
            ..Default::default()
        });
        options.merge(entry);
        options
    }

    /// Effective options of a shape entry.
    pub fn effective_shape(&self, entry: &ShapeOptions) -> ShapeOptions {
        let mut options = self.shape_options.clone().unwrap_or_default();
        options.merge(&ShapeOptions {
            control_point_options: self.control_point_options.clone(),
            ..Default::default()
        });
        options.merge(entry);
        options
    }

    pub fn draggable(&self) -> Draggable {
        self.draggable.unwrap_or(Draggable::Xy)
    }
}

/// The annotation's own anchors and handles.
impl ItemOptions for AnnotationOptions {
    fn point_specs(&self) -> Vec<PointSpec> {
        match &self.points {
            Some(points) => points.clone(),
            None => self.point.iter().cloned().collect(),
        }
    }

    fn set_point_spec(&mut self, index: usize, spec: PointSpec) {
        match &mut self.points {
            Some(points) if index < points.len() => points[index] = spec,
            Some(_) => {}
            None if index == 0 => self.point = Some(spec),
            None => {}
        }
    }

    fn visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    fn control_points(&self) -> Option<&[ControlPointOptions]> {
        self.control_points.as_deref()
    }

    fn control_point_defaults(&self) -> Option<&ControlPointOptions> {
        self.control_point_options.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overrides_set_fields_and_recurses() {
        let mut base = LabelOptions {
            text: Some("a".into()),
            padding: Some(5.0),
            style: Some(TextStyle {
                font_size: Some(11.0),
                color: Some("contrast".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        base.merge(&LabelOptions {
            text: Some("b".into()),
            style: Some(TextStyle {
                font_size: Some(14.0),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(base.text.as_deref(), Some("b"));
        assert_eq!(base.padding, Some(5.0));
        let style = base.style.unwrap();
        assert_eq!(style.font_size, Some(14.0));
        assert_eq!(style.color.as_deref(), Some("contrast"));
    }

    #[test]
    fn merge_replaces_arrays() {
        let mut base = AnnotationOptions {
            labels: Some(vec![LabelOptions::default(), LabelOptions::default()]),
            ..Default::default()
        };
        base.merge(&AnnotationOptions {
            labels: Some(vec![LabelOptions {
                text: Some("only".into()),
                ..Default::default()
            }]),
            ..Default::default()
        });
        assert_eq!(base.labels.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn point_spec_parses_id_and_coordinates() {
        let id: PointSpec = serde_json::from_str("\"max\"").unwrap();
        assert_eq!(id, PointSpec::id("max"));
        let coords: PointSpec =
            serde_json::from_str(r#"{"x": 1, "y": 2, "xAxis": 0, "yAxis": "price"}"#).unwrap();
        assert_eq!(coords, PointSpec::on_axes(1.0, 2.0, 0, "price"));
        let pixel: PointSpec = serde_json::from_str(r#"{"x": 10, "y": 20}"#).unwrap();
        assert_eq!(pixel, PointSpec::pixel(10.0, 20.0));
    }

    #[test]
    fn draggable_parses_empty_string_as_disabled() {
        let d: Draggable = serde_json::from_str("\"\"").unwrap();
        assert_eq!(d, Draggable::Disabled);
        assert_eq!(Draggable::X.constrain(3.0, 4.0), (3.0, 0.0));
        assert_eq!(d.constrain(3.0, 4.0), (0.0, 0.0));
        assert!(!d.is_enabled());
        assert!(Draggable::Y.is_enabled());
    }

    #[test]
    fn effective_shape_layers_defaults_under_entry() {
        let annotation = AnnotationOptions {
            shape_options: Some(ShapeOptions {
                stroke: Some("red".into()),
                stroke_width: Some(1.0),
                ..Default::default()
            }),
            control_point_options: Some(ControlPointOptions {
                width: Some(10.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let shape = annotation.effective_shape(&ShapeOptions {
            stroke_width: Some(3.0),
            ..ShapeOptions::of_type("rect")
        });
        assert_eq!(shape.stroke.as_deref(), Some("red"));
        assert_eq!(shape.stroke_width, Some(3.0));
        assert_eq!(
            shape.control_point_options.and_then(|c| c.width),
            Some(10.0)
        );
    }

    #[test]
    fn handles_default_to_item_type_count() {
        let shape = ShapeOptions {
            control_point_options: Some(ControlPointOptions {
                visible: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let handles = shape.resolved_control_points(2);
        assert_eq!(handles.len(), 2);
        assert!(handles.iter().all(|h| h.visible == Some(true)));

        let shape = ShapeOptions {
            control_points: Some(vec![ControlPointOptions {
                symbol: Some("square".into()),
                ..Default::default()
            }]),
            ..shape
        };
        let handles = shape.resolved_control_points(2);
        assert_eq!(handles.len(), 1);
        assert_eq!(handles[0].visible, Some(true));
        assert_eq!(handles[0].symbol.as_deref(), Some("square"));
    }
}
