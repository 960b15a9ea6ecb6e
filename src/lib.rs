//! Annotation overlays for interactive charts.
//!
//! Annotations are declarative labels and shapes anchored to chart
//! coordinates or data points. They are drawn through the [`draw::Renderer`]
//! abstraction, can be dragged by the whole or by their control points, and
//! follow the chart when it is resized or its data changes.
//!
//! The bundled [`draw::Scene`] is a retained renderer that records graphics
//! in memory; with the `cairo` feature it can also be painted to PNG.

pub mod annotation;
pub mod chart;
pub mod config;
pub mod draw;
pub mod util;

pub use annotation::{Annotation, AnnotationError, AnnotationEvent, AnnotationOptions};
pub use chart::{Chart, ChartModel, ChartSpec};
pub use config::Config;
pub use draw::{Renderer, Scene};
