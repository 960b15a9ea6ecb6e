//! Primitive graphic kinds and the attribute bag applied to them.

use super::color::Color;
use serde::Serialize;

/// Handle to a graphic owned by a [`Renderer`](super::Renderer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GraphicId(pub u64);

/// Kind of graphic a renderer can create.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Primitive {
    /// Container node; attributes cascade visibility to children
    Group { name: String },
    /// Clip region referenced by groups
    ClipRect,
    /// Rectangle with `x`, `y`, `width`, `height`, `r`
    Rect,
    /// Circle centred on `x`, `y` with radius `r`
    Circle,
    /// Polyline/polygon described by `d`
    Path,
    /// Raster image loaded from `src`
    Image { src: String },
    /// Text with an optional box (callout, rect, circle, connector)
    Label { shape: String },
    /// Marker symbol used by control points
    Symbol { symbol: String },
}

impl Primitive {
    pub fn group(name: impl Into<String>) -> Self {
        Primitive::Group { name: name.into() }
    }

    /// Groups and clip rects never receive pointer hits.
    pub fn is_container(&self) -> bool {
        matches!(self, Primitive::Group { .. } | Primitive::ClipRect)
    }
}

/// Single path command in chart pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Close,
}

impl PathCommand {
    pub fn point(&self) -> Option<(f64, f64)> {
        match *self {
            PathCommand::MoveTo(x, y) | PathCommand::LineTo(x, y) => Some((x, y)),
            PathCommand::Close => None,
        }
    }
}

/// Attributes applied to a graphic. `None` leaves the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attrs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Radius for circles, corner radius for rects and label boxes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<Vec<PathCommand>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Point the callout of a label box points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    /// Text color for labels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate_y: Option<f64>,
}

macro_rules! overlay {
    ($target:ident, $source:ident, $($field:ident),+ $(,)?) => {
        $(
            if $source.$field.is_some() {
                $target.$field = $source.$field.clone();
            }
        )+
    };
}

impl Attrs {
    /// Applies every set attribute of `other` on top of `self`.
    pub fn apply(&mut self, other: &Attrs) {
        overlay!(
            self,
            other,
            x,
            y,
            width,
            height,
            r,
            d,
            text,
            anchor_x,
            anchor_y,
            fill,
            stroke,
            stroke_width,
            dash_style,
            padding,
            font_size,
            font_weight,
            color,
            shadow,
            class_name,
            z_index,
            visible,
            translate_x,
            translate_y,
        );
    }

    pub fn position(x: f64, y: f64) -> Self {
        Attrs {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn visibility(visible: bool) -> Self {
        Attrs {
            visible: Some(visible),
            ..Default::default()
        }
    }

    pub fn bounds(bbox: crate::util::BBox) -> Self {
        Attrs {
            x: Some(bbox.x),
            y: Some(bbox.y),
            width: Some(bbox.width),
            height: Some(bbox.height),
            ..Default::default()
        }
    }

    /// Whether the graphic is visible; unset means visible.
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }
}
