//! Annotations: declarative overlays of labels and shapes bound to chart
//! coordinates or data points.
//!
//! An [`Annotation`] owns its items and their graphics. It is driven by the
//! chart through a [`ChartContext`], which lends it the model, the renderer
//! and the shared chart resources for the duration of one call.

pub mod control_point;
pub mod controllable;
pub mod format;
pub mod mock_point;
pub mod options;
pub mod types;

pub use control_point::ControlPoint;
pub use controllable::{
    Controllable, ControllableBase, ControllableCircle, ControllableImage, ControllableLabel,
    ControllablePath, ControllableRect, ShapeConstructor, ShapeItem, ShapeRegistry,
};
pub use format::{LabelContext, format_label};
pub use mock_point::{MockPoint, PointSource, ResolveMode};
pub use options::{
    Align, AnnotationOptions, ControlPointOptions, ControlPointStyle, CoordsSpec, Draggable,
    ItemOptions, LabelFormatter, LabelOptions, Merge, Overflow, PointSpec, ShapeOptions, TextStyle,
    VerticalAlign,
};
pub use types::{
    AnnotationError, AnnotationEvent, AnnotationKey, AnnotationTarget, ControlPointOwner, ItemKind,
};

use crate::chart::ChartModel;
use crate::draw::{Attrs, GraphicId, Renderer};
use log::{debug, warn};

/// Default z-index of an annotation group.
pub const DEFAULT_Z_INDEX: i32 = 6;

/// Chart resources lent to an annotation for one operation.
pub struct ChartContext<'a> {
    pub model: &'a ChartModel,
    pub renderer: &'a mut dyn Renderer,
    /// Clip rect covering the plot box; shapes are clipped to it
    pub plot_box_clip: Option<GraphicId>,
    /// Parent of every control point graphic
    pub control_points_group: GraphicId,
    /// Keys of annotations whose labels take part in overlap avoidance
    pub label_collectors: &'a mut Vec<AnnotationKey>,
    pub shapes: &'a ShapeRegistry,
}

/// One annotation: its options, its items and its graphics.
pub struct Annotation {
    key: AnnotationKey,
    options: AnnotationOptions,
    /// The annotation's own anchors and handles
    base: ControllableBase,
    shapes: Vec<ShapeItem>,
    labels: Vec<ControllableLabel>,
    graphic: Option<GraphicId>,
    shapes_group: Option<GraphicId>,
    labels_group: Option<GraphicId>,
    collector_registered: bool,
}

impl Annotation {
    /// Builds an annotation from its effective options.
    ///
    /// Nothing is drawn until the first [`Annotation::redraw`]. On error the
    /// partially built annotation is released before returning.
    pub fn new(
        key: AnnotationKey,
        options: AnnotationOptions,
        ctx: &mut ChartContext<'_>,
    ) -> Result<Self, AnnotationError> {
        let mut annotation = Self {
            key,
            options,
            base: ControllableBase::default(),
            shapes: Vec::new(),
            labels: Vec::new(),
            graphic: None,
            shapes_group: None,
            labels_group: None,
            collector_registered: false,
        };
        if let Err(err) = annotation.init(ctx) {
            annotation.destroy(ctx);
            return Err(err);
        }
        debug!(
            "Created annotation {:?} ({} shapes, {} labels)",
            annotation.options.id,
            annotation.shapes.len(),
            annotation.labels.len()
        );
        Ok(annotation)
    }

    fn init(&mut self, ctx: &mut ChartContext<'_>) -> Result<(), AnnotationError> {
        self.link_points(ctx.model);
        self.add_control_points();
        self.add_shapes(ctx.shapes)?;
        self.add_labels();
        self.set_label_collector(ctx.label_collectors);
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn key(&self) -> AnnotationKey {
        self.key
    }

    pub fn id(&self) -> Option<&str> {
        self.options.id.as_deref()
    }

    /// Current options, including every drag written back so far.
    pub fn options(&self) -> &AnnotationOptions {
        &self.options
    }

    pub fn is_visible(&self) -> bool {
        self.options.visible.unwrap_or(true)
    }

    pub fn graphic(&self) -> Option<GraphicId> {
        self.graphic
    }

    pub fn shapes(&self) -> &[ShapeItem] {
        &self.shapes
    }

    pub fn labels(&self) -> &[ControllableLabel] {
        &self.labels
    }

    /// The annotation's own resolved anchors.
    pub fn points(&self) -> &[MockPoint] {
        &self.base.points
    }

    /// The annotation's own handles.
    pub fn control_points(&self) -> &[ControlPoint] {
        &self.base.control_points
    }

    pub fn shape(&self, index: usize) -> Option<&ShapeItem> {
        self.shapes.iter().find(|s| s.base().index == index)
    }

    pub fn label(&self, index: usize) -> Option<&ControllableLabel> {
        self.labels.iter().find(|l| l.base().index == index)
    }

    // ========================================================================
    // Construction steps
    // ========================================================================

    fn link_points(&mut self, model: &ChartModel) -> bool {
        let specs = self.options.point_specs();
        self.base.link(&specs, model)
    }

    fn add_control_points(&mut self) {
        let count = self.options.point_specs().len();
        let options = self.options.resolved_control_points(count);
        self.base.add_control_points(options);
    }

    fn add_shapes(&mut self, registry: &ShapeRegistry) -> Result<(), AnnotationError> {
        let entries = self.options.shapes.clone().unwrap_or_default();
        for (index, entry) in entries.iter().enumerate() {
            let mut shape = registry.create(self.options.effective_shape(entry), index)?;
            shape.add_control_points();
            if let Some(slot) = self.options.shapes.as_mut().and_then(|s| s.get_mut(index)) {
                *slot = shape.options().clone();
            }
            self.shapes.push(shape);
        }
        Ok(())
    }

    fn add_labels(&mut self) {
        let entries = self.options.labels.clone().unwrap_or_default();
        for (index, entry) in entries.iter().enumerate() {
            let mut label = ControllableLabel::new(self.options.effective_label(entry), index);
            label.add_control_points();
            if let Some(slot) = self.options.labels.as_mut().and_then(|l| l.get_mut(index)) {
                *slot = label.options().clone();
            }
            self.labels.push(label);
        }
    }

    fn set_label_collector(&mut self, collectors: &mut Vec<AnnotationKey>) {
        if !self.collector_registered {
            collectors.push(self.key);
            self.collector_registered = true;
        }
    }

    /// Copies the live item options (after drags) back into the options arrays.
    fn sync_item_options(&mut self) {
        if let Some(entries) = self.options.shapes.as_mut() {
            for shape in &self.shapes {
                if let Some(slot) = entries.get_mut(shape.base().index) {
                    *slot = shape.options().clone();
                }
            }
        }
        if let Some(entries) = self.options.labels.as_mut() {
            for label in &self.labels {
                if let Some(slot) = entries.get_mut(label.base().index) {
                    *slot = label.options().clone();
                }
            }
        }
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    fn render(&mut self, ctx: &mut ChartContext<'_>) {
        let renderer = &mut *ctx.renderer;
        let group = renderer.group("annotation", None);
        renderer.attr(
            group,
            &Attrs {
                z_index: Some(self.options.z_index.unwrap_or(DEFAULT_Z_INDEX)),
                visible: Some(self.is_visible()),
                ..Default::default()
            },
        );

        let shapes_group = renderer.group("annotation-shapes", Some(group));
        renderer.clip(shapes_group, ctx.plot_box_clip);

        let labels_group = renderer.group("annotation-labels", Some(group));
        renderer.attr(
            labels_group,
            &Attrs {
                translate_x: Some(0.0),
                translate_y: Some(0.0),
                ..Default::default()
            },
        );

        self.graphic = Some(group);
        self.shapes_group = Some(shapes_group);
        self.labels_group = Some(labels_group);
        self.base
            .render_control_points(renderer, ctx.control_points_group);
    }

    /// Re-resolves every anchor and brings the graphics up to date.
    ///
    /// Items that can no longer be drawn are destroyed and dropped; their
    /// entries stay in the options. Both lists are walked from the end.
    pub fn redraw(&mut self, ctx: &mut ChartContext<'_>, animation: bool) {
        self.link_points(ctx.model);
        if self.graphic.is_none() {
            self.render(ctx);
        }
        let inherited = self.options.point_specs().into_iter().next();

        if let Some(group) = self.shapes_group {
            for i in (0..self.shapes.len()).rev() {
                let shape = self.shapes[i].as_mut();
                if !redraw_item(shape, ctx, group, inherited.as_ref(), animation) {
                    self.shapes.remove(i);
                }
            }
        }
        if let Some(group) = self.labels_group {
            for i in (0..self.labels.len()).rev() {
                let label = &mut self.labels[i];
                if !redraw_item(label, ctx, group, inherited.as_ref(), animation) {
                    self.labels.remove(i);
                }
            }
        }

        self.redraw_control_points(ctx.model, &mut *ctx.renderer, animation);
    }

    fn redraw_control_points(
        &mut self,
        model: &ChartModel,
        renderer: &mut dyn Renderer,
        animation: bool,
    ) {
        let positions: Vec<Option<(f64, f64)>> = self
            .base
            .control_points
            .iter()
            .map(|cp| {
                self.base
                    .points
                    .get(cp.index)
                    .filter(|p| p.series_visible)
                    .map(|p| p.absolute(model))
            })
            .collect();
        for (cp, position) in self.base.control_points.iter_mut().zip(positions) {
            cp.redraw(renderer, position, animation);
        }
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    /// Shows or hides the annotation; `None` toggles. Hiding also hides
    /// every control point. Returns the new visibility.
    pub fn set_visibility(&mut self, renderer: &mut dyn Renderer, visible: Option<bool>) -> bool {
        let visible = visible.unwrap_or(!self.is_visible());
        if let Some(group) = self.graphic {
            renderer.attr(group, &Attrs::visibility(visible));
        }
        if !visible {
            self.set_control_points_visibility(renderer, false);
        }
        self.options.visible = Some(visible);
        visible
    }

    /// Shows or hides the handles of the annotation and of all its items.
    pub fn set_control_points_visibility(&mut self, renderer: &mut dyn Renderer, visible: bool) {
        self.base.set_control_points_visibility(renderer, visible);
        for shape in &mut self.shapes {
            shape.set_control_points_visibility(renderer, visible);
        }
        for label in &mut self.labels {
            label.set_control_points_visibility(renderer, visible);
        }
    }

    // ========================================================================
    // Interaction
    // ========================================================================

    /// Drags the whole annotation by a pixel delta, constrained by `draggable`.
    ///
    /// Moves the annotation's own anchors and every item configured with
    /// anchors of its own. Items that inherit the annotation's anchor are left
    /// alone and follow it. Returns the delta actually applied.
    pub fn translate(&mut self, model: &ChartModel, dx: f64, dy: f64) -> (f64, f64) {
        let draggable = self.options.draggable();
        if !draggable.is_enabled() {
            return (0.0, 0.0);
        }
        let (dx, dy) = draggable.constrain(dx, dy);
        if dx == 0.0 && dy == 0.0 {
            return (0.0, 0.0);
        }

        for index in 0..self.base.points.len() {
            self.translate_own_point(model, index, dx, dy);
        }
        // Items that inherit the annotation's anchor follow it on redraw
        for shape in self.shapes.iter_mut().filter(|s| s.has_own_points()) {
            shape.translate(model, dx, dy);
        }
        for label in self.labels.iter_mut().filter(|l| l.has_own_points()) {
            label.translate(model, dx, dy);
        }
        self.sync_item_options();
        (dx, dy)
    }

    fn translate_own_point(&mut self, model: &ChartModel, index: usize, dx: f64, dy: f64) {
        if let Some(point) = self.base.points.get_mut(index) {
            point.translate(model, dx, dy);
            let spec = point.to_spec();
            self.options.set_point_spec(index, spec);
        }
    }

    /// Applies a drag delta to one control point. Returns false when the
    /// owner or handle no longer exists.
    pub fn drag_control_point(
        &mut self,
        model: &ChartModel,
        owner: ControlPointOwner,
        index: usize,
        dx: f64,
        dy: f64,
    ) -> bool {
        match owner {
            ControlPointOwner::Annotation => {
                if index >= self.base.points.len() {
                    return false;
                }
                self.translate_own_point(model, index, dx, dy);
            }
            ControlPointOwner::Shape(item) => {
                let Some(shape) = self.shapes.iter_mut().find(|s| s.base().index == item) else {
                    return false;
                };
                shape.drag_control_point(model, index, dx, dy);
                self.sync_item_options();
            }
            ControlPointOwner::Label(item) => {
                let Some(label) = self.labels.iter_mut().find(|l| l.base().index == item) else {
                    return false;
                };
                label.drag_control_point(model, index, dx, dy);
                self.sync_item_options();
            }
        }
        true
    }

    /// What part of this annotation, if any, is drawn by graphic `id`.
    pub fn target_of(&self, id: GraphicId) -> Option<AnnotationTarget> {
        if let Some(index) = self.base.control_point_hit(id) {
            return Some(AnnotationTarget::ControlPoint(
                ControlPointOwner::Annotation,
                index,
            ));
        }
        for shape in &self.shapes {
            let item = shape.base().index;
            if let Some(index) = shape.base().control_point_hit(id) {
                return Some(AnnotationTarget::ControlPoint(
                    ControlPointOwner::Shape(item),
                    index,
                ));
            }
            if shape.owns_graphic(id) {
                return Some(AnnotationTarget::Item(ItemKind::Shape, item));
            }
        }
        for label in &self.labels {
            let item = label.base().index;
            if let Some(index) = label.base().control_point_hit(id) {
                return Some(AnnotationTarget::ControlPoint(
                    ControlPointOwner::Label(item),
                    index,
                ));
            }
            if label.owns_graphic(id) {
                return Some(AnnotationTarget::Item(ItemKind::Label, item));
            }
        }
        None
    }

    /// Label graphics that must not overlap other chart labels.
    pub fn collect_labels(&self) -> Vec<GraphicId> {
        self.labels
            .iter()
            .filter(|label| !label.allows_overlap())
            .filter_map(|label| label.base().graphic)
            .collect()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Merges `partial` into the options and rebuilds the annotation.
    ///
    /// If the merged options cannot be built the previous options are
    /// restored, the annotation is rebuilt from them and the error returned.
    pub fn update(
        &mut self,
        partial: &AnnotationOptions,
        ctx: &mut ChartContext<'_>,
    ) -> Result<(), AnnotationError> {
        let previous = self.options.clone();
        self.options.merge(partial);
        self.destroy(ctx);

        let result = self.init(ctx);
        if let Err(err) = &result {
            warn!("Update of annotation {:?} rejected: {}", previous.id, err);
            self.destroy(ctx);
            self.options = previous;
            if let Err(restore) = self.init(ctx) {
                warn!("Could not restore annotation {:?}: {}", self.options.id, restore);
            }
        }
        self.redraw(ctx, false);
        result
    }

    /// Releases every item, handle and graphic and deregisters the label
    /// collector. Safe to call more than once.
    pub fn destroy(&mut self, ctx: &mut ChartContext<'_>) {
        let renderer = &mut *ctx.renderer;
        for shape in &mut self.shapes {
            shape.destroy(renderer);
        }
        self.shapes.clear();
        for label in &mut self.labels {
            label.destroy(renderer);
        }
        self.labels.clear();

        if self.collector_registered {
            if let Some(position) = ctx.label_collectors.iter().position(|k| *k == self.key) {
                ctx.label_collectors.remove(position);
            }
            self.collector_registered = false;
        }

        self.base.destroy_control_points(renderer);
        self.base.control_points.clear();
        self.base.points.clear();

        for id in [
            self.shapes_group.take(),
            self.labels_group.take(),
            self.graphic.take(),
        ]
        .into_iter()
        .flatten()
        {
            renderer.destroy(id);
        }
    }
}

/// One redraw step of an item. Returns false when the item was destroyed
/// and must be dropped.
fn redraw_item<C: Controllable + ?Sized>(
    item: &mut C,
    ctx: &mut ChartContext<'_>,
    parent: GraphicId,
    inherited: Option<&PointSpec>,
    animation: bool,
) -> bool {
    item.link_points(ctx.model, inherited);
    if !item.should_be_drawn() {
        item.destroy(&mut *ctx.renderer);
        return false;
    }
    if item.base().graphic.is_none() {
        item.render(&mut *ctx.renderer, parent, ctx.control_points_group);
    }
    let animated = animation && item.base().placed;
    item.redraw(ctx.model, &mut *ctx.renderer, animated);
    true
}
