//! Data types shared by annotations and the chart that owns them.

use serde::Serialize;
use thiserror::Error;

/// Identity of an annotation inside its chart.
///
/// Keys are handed out by the chart and never reused, so they stay valid as
/// identifiers for events and label collectors after the annotation is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AnnotationKey(pub u64);

/// Which collection of an annotation an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Shape,
    Label,
}

/// Owner of a control point: the annotation itself or one of its items.
///
/// Item indices are positions in the annotation's *options* arrays, which stay
/// stable when items are removed during a redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "owner", content = "index", rename_all = "lowercase")]
pub enum ControlPointOwner {
    Annotation,
    Shape(usize),
    Label(usize),
}

/// Part of an annotation that was hit by the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationTarget {
    /// Any graphic of a shape or label (the annotation is dragged as a whole)
    Item(ItemKind, usize),
    /// A visible control point
    ControlPoint(ControlPointOwner, usize),
}

/// Notifications emitted by the chart while annotations are manipulated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum AnnotationEvent {
    Click {
        key: AnnotationKey,
        id: Option<String>,
    },
    Drag {
        key: AnnotationKey,
        dx: f64,
        dy: f64,
    },
    ControlPointDrag {
        key: AnnotationKey,
        owner: ControlPointOwner,
        index: usize,
        dx: f64,
        dy: f64,
    },
    DragEnd {
        key: AnnotationKey,
    },
    VisibilityChanged {
        key: AnnotationKey,
        visible: bool,
    },
    Remove {
        key: AnnotationKey,
        id: Option<String>,
    },
}

/// Errors raised while building annotations from configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnnotationError {
    #[error("Unknown shape type '{0}'")]
    UnknownShapeType(String),

    #[error("Shape at index {0} has no type")]
    MissingShapeType(usize),

    #[error("Invalid option {option}: {reason}")]
    InvalidOption { option: String, reason: String },
}
