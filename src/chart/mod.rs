//! The host chart: model, renderer and the annotations drawn over them.
//!
//! [`Chart`] owns everything annotations share: the plot-box clip, the
//! control-point group, the label collector registry, the shape registry and
//! the event queue. Annotations borrow those through a
//! [`ChartContext`](crate::annotation::ChartContext) for each call.

pub mod axis;
pub mod model;

pub use axis::{Axis, AxisKind, AxisOptions, AxisRef};
pub use model::{ChartModel, DataPoint, ModelSpec, PointRef, Series};
pub use pointer::DragState;

use crate::annotation::{
    Annotation, AnnotationError, AnnotationEvent, AnnotationKey, AnnotationOptions, ChartContext,
    Merge, ShapeConstructor, ShapeRegistry,
};
use crate::config::Config;
use crate::draw::{Attrs, GraphicId, Renderer};
use crate::util::BBox;
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A chart description with its annotations, as stored in scene files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartSpec {
    #[serde(flatten)]
    pub model: ModelSpec,

    #[serde(default)]
    pub annotations: Vec<AnnotationOptions>,
}

/// Lends the chart's shared resources to an annotation. Borrows fields
/// individually so `self.annotations` stays available.
macro_rules! context {
    ($chart:expr) => {
        ChartContext {
            model: &$chart.model,
            renderer: &mut $chart.renderer,
            plot_box_clip: Some($chart.plot_box_clip),
            control_points_group: $chart.control_points_group,
            label_collectors: &mut $chart.label_collectors,
            shapes: &$chart.shapes,
        }
    };
}

mod pointer;

/// A chart with an annotation layer.
pub struct Chart<R: Renderer> {
    model: ChartModel,
    renderer: R,
    annotations: Vec<Annotation>,
    label_collectors: Vec<AnnotationKey>,
    shapes: ShapeRegistry,
    /// Merged under every annotation's user options
    defaults: AnnotationOptions,
    plot_box_clip: GraphicId,
    control_points_group: GraphicId,
    drag: DragState,
    events: Vec<AnnotationEvent>,
    next_key: u64,
}

impl<R: Renderer> Chart<R> {
    /// Creates the chart with built-in defaults and draws `annotations`.
    pub fn new(model: ChartModel, renderer: R, annotations: Vec<AnnotationOptions>) -> Self {
        Self::with_config(model, renderer, &Config::default(), annotations)
    }

    /// Creates the chart with defaults from a configuration file.
    ///
    /// Annotations that fail to build are logged and skipped; the others are
    /// drawn in order.
    pub fn with_config(
        model: ChartModel,
        mut renderer: R,
        config: &Config,
        annotations: Vec<AnnotationOptions>,
    ) -> Self {
        let plot_box_clip = renderer.clip_rect(model.plot_box());
        let control_points_group = renderer.group("annotation-control-points", None);
        renderer.attr(
            control_points_group,
            &Attrs {
                z_index: Some(config.chart.control_points_z_index),
                ..Default::default()
            },
        );
        renderer.clip(control_points_group, Some(plot_box_clip));

        let mut chart = Self {
            model,
            renderer,
            annotations: Vec::new(),
            label_collectors: Vec::new(),
            shapes: ShapeRegistry::default(),
            defaults: config.annotation_defaults(),
            plot_box_clip,
            control_points_group,
            drag: DragState::Idle,
            events: Vec::new(),
            next_key: 1,
        };

        let count = annotations.len();
        for (index, options) in annotations.into_iter().enumerate() {
            if let Err(err) = chart.init_annotation(options) {
                warn!("Skipping annotation {}: {}", index, err);
            }
        }
        chart.draw_annotations();
        info!(
            "Chart ready with {} of {} annotations",
            chart.annotations.len(),
            count
        );
        chart
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn model(&self) -> &ChartModel {
        &self.model
    }

    /// Mutable access to the data. Call [`Chart::redraw`] afterwards.
    pub fn model_mut(&mut self) -> &mut ChartModel {
        &mut self.model
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// First annotation with the given id.
    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id() == Some(id))
    }

    pub fn annotation_by_key(&self, key: AnnotationKey) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.key() == key)
    }

    /// Current options of every annotation, in registration order.
    ///
    /// This is a snapshot; edits go through [`Chart::update_annotation`].
    pub fn annotation_options(&self) -> Vec<AnnotationOptions> {
        self.annotations.iter().map(|a| a.options().clone()).collect()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn label_collector_count(&self) -> usize {
        self.label_collectors.len()
    }

    /// Makes a custom shape type available to annotations added afterwards.
    pub fn register_shape_type(&mut self, name: &str, constructor: ShapeConstructor) {
        self.shapes.register(name, constructor);
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Builds an annotation from user options merged over the chart defaults
    /// and registers it without drawing.
    pub fn init_annotation(
        &mut self,
        options: AnnotationOptions,
    ) -> Result<AnnotationKey, AnnotationError> {
        let key = AnnotationKey(self.next_key);
        self.next_key += 1;
        let merged = self.defaults.merged(&options);
        let annotation = Annotation::new(key, merged, &mut context!(self))?;
        self.annotations.push(annotation);
        Ok(key)
    }

    /// Adds an annotation, drawing it right away when `redraw` is set.
    pub fn add_annotation(
        &mut self,
        options: AnnotationOptions,
        redraw: bool,
    ) -> Result<&mut Annotation, AnnotationError> {
        self.init_annotation(options)?;
        let index = self.annotations.len() - 1;
        let annotation = &mut self.annotations[index];
        if redraw {
            annotation.redraw(&mut context!(self), false);
        }
        Ok(annotation)
    }

    /// Removes and destroys the first annotation with the given id.
    /// Unknown ids are ignored. Returns whether one was removed.
    pub fn remove_annotation(&mut self, id: &str) -> bool {
        let Some(index) = self.annotations.iter().position(|a| a.id() == Some(id)) else {
            debug!("No annotation '{}' to remove", id);
            return false;
        };
        let mut annotation = self.annotations.remove(index);
        annotation.destroy(&mut context!(self));

        let key = annotation.key();
        if self.drag.key() == Some(key) {
            self.drag = DragState::Idle;
        }
        self.events.push(AnnotationEvent::Remove {
            key,
            id: Some(id.to_string()),
        });
        true
    }

    /// Merges `partial` into an annotation's options and rebuilds it.
    /// Returns `Ok(false)` when no annotation has that id.
    pub fn update_annotation(
        &mut self,
        id: &str,
        partial: &AnnotationOptions,
    ) -> Result<bool, AnnotationError> {
        let Some(annotation) = self.annotations.iter_mut().find(|a| a.id() == Some(id)) else {
            return Ok(false);
        };
        annotation.update(partial, &mut context!(self))?;
        Ok(true)
    }

    /// Shows, hides (or with `None` toggles) an annotation.
    pub fn set_annotation_visibility(&mut self, id: &str, visible: Option<bool>) -> Option<bool> {
        let annotation = self.annotations.iter_mut().find(|a| a.id() == Some(id))?;
        let visible = annotation.set_visibility(&mut self.renderer, visible);
        self.events.push(AnnotationEvent::VisibilityChanged {
            key: annotation.key(),
            visible,
        });
        Some(visible)
    }

    /// Shows or hides every control point of an annotation.
    pub fn set_control_points_visibility(&mut self, id: &str, visible: bool) -> bool {
        let Some(annotation) = self.annotations.iter_mut().find(|a| a.id() == Some(id)) else {
            return false;
        };
        annotation.set_control_points_visibility(&mut self.renderer, visible);
        annotation.redraw(&mut context!(self), false);
        true
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Fits the clip to the current plot box and redraws every annotation.
    pub fn draw_annotations(&mut self) {
        self.draw_with(false);
    }

    /// Redraw hook: like [`Chart::draw_annotations`], animating items that
    /// were already placed.
    pub fn redraw(&mut self) {
        self.draw_with(true);
    }

    fn draw_with(&mut self, animation: bool) {
        self.renderer
            .attr(self.plot_box_clip, &Attrs::bounds(self.model.plot_box()));
        let mut ctx = context!(self);
        for annotation in &mut self.annotations {
            annotation.redraw(&mut ctx, animation);
        }
    }

    /// Moves or resizes the plot area and redraws.
    pub fn resize(&mut self, plot_box: BBox) {
        self.model.set_plot_box(plot_box);
        self.redraw();
    }

    /// Label graphics from every registered collector, for overlap avoidance.
    pub fn collect_labels(&self) -> Vec<GraphicId> {
        self.label_collectors
            .iter()
            .filter_map(|key| self.annotation_by_key(*key))
            .flat_map(Annotation::collect_labels)
            .collect()
    }

    /// Takes the queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<AnnotationEvent> {
        std::mem::take(&mut self.events)
    }

    /// Destroy hook: releases every annotation and the shared graphics,
    /// handing the renderer back.
    pub fn destroy(mut self) -> R {
        let mut annotations = std::mem::take(&mut self.annotations);
        {
            let mut ctx = context!(self);
            for annotation in &mut annotations {
                annotation.destroy(&mut ctx);
            }
        }
        self.renderer.destroy(self.control_points_group);
        self.renderer.destroy(self.plot_box_clip);
        debug!("Chart destroyed with {} annotations", annotations.len());
        self.renderer
    }
}
