//! Behaviour shared by every annotation item (labels and shapes).
//!
//! An item owns its anchors, its control points and its graphic. The
//! annotation drives it through the same cycle on every redraw:
//! link points, then render once, then redraw in place, or destroy it when
//! it can no longer be drawn.

pub mod circle;
pub mod image;
pub mod label;
pub mod path;
pub mod rect;

pub use circle::ControllableCircle;
pub use image::ControllableImage;
pub use label::{ControllableLabel, Placement, aligned_position, justified_placement, position};
pub use path::{ControllablePath, Marker};
pub use rect::ControllableRect;

use super::control_point::ControlPoint;
use super::mock_point::MockPoint;
use super::options::{ControlPointOptions, ItemOptions, PointSpec, ShapeOptions};
use super::types::AnnotationError;
use crate::chart::ChartModel;
use crate::draw::{Attrs, Color, GraphicId, Renderer, TRANSPARENT};
use std::collections::HashMap;

// ============================================================================
// Shared state
// ============================================================================

/// State every item carries, whatever its geometry.
#[derive(Debug, Clone, Default)]
pub struct ControllableBase {
    /// Anchors resolved by the last `link_points`; empty when any failed
    pub points: Vec<MockPoint>,
    pub control_points: Vec<ControlPoint>,
    pub graphic: Option<GraphicId>,
    /// Whether the last redraw found a position for the graphic
    pub placed: bool,
    /// Position of the item's entry in the annotation's options array
    pub index: usize,
}

impl ControllableBase {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// Resolves every spec. If one fails, all anchors are dropped.
    pub fn link(&mut self, specs: &[PointSpec], model: &ChartModel) -> bool {
        let resolved: Option<Vec<MockPoint>> = specs
            .iter()
            .map(|spec| MockPoint::resolve(spec, model))
            .collect();
        self.points = resolved.unwrap_or_default();
        !self.points.is_empty()
    }

    pub fn add_control_points(&mut self, options: Vec<ControlPointOptions>) {
        self.control_points = options
            .into_iter()
            .enumerate()
            .map(|(index, options)| ControlPoint::new(index, options))
            .collect();
    }

    pub fn render_control_points(&mut self, renderer: &mut dyn Renderer, group: GraphicId) {
        for control_point in &mut self.control_points {
            control_point.render(renderer, group);
        }
    }

    pub fn set_control_points_visibility(&mut self, renderer: &mut dyn Renderer, visible: bool) {
        for control_point in &mut self.control_points {
            control_point.set_visibility(renderer, visible);
        }
    }

    pub fn destroy_control_points(&mut self, renderer: &mut dyn Renderer) {
        for control_point in &mut self.control_points {
            control_point.destroy(renderer);
        }
    }

    /// Index of the visible control point drawn by `id`.
    pub fn control_point_hit(&self, id: GraphicId) -> Option<usize> {
        self.control_points
            .iter()
            .find(|cp| cp.is_hit_target(id))
            .map(|cp| cp.index)
    }
}

// ============================================================================
// Capability trait
// ============================================================================

/// An annotation item: a label or one of the shape types.
pub trait Controllable {
    type Options: ItemOptions;

    fn base(&self) -> &ControllableBase;
    fn base_mut(&mut self) -> &mut ControllableBase;
    fn options(&self) -> &Self::Options;
    fn options_mut(&mut self) -> &mut Self::Options;

    /// Type name, as used in configuration (`rect`, `label`, ...)
    fn type_name(&self) -> &str;

    /// Number of handles the item gets when none are configured.
    fn default_control_point_count(&self) -> usize;

    /// Creates the graphic under `parent` and the handles under
    /// `control_group`. Called once per graphic lifetime.
    fn render(&mut self, renderer: &mut dyn Renderer, parent: GraphicId, control_group: GraphicId);

    /// Updates the existing graphic from the current anchors and options.
    fn redraw(&mut self, model: &ChartModel, renderer: &mut dyn Renderer, animated: bool);

    /// Chart-pixel position of handle `index`.
    fn control_point_position(&self, model: &ChartModel, index: usize) -> Option<(f64, f64)>;

    /// Applies a pointer delta to whatever handle `index` edits.
    fn drag_control_point(&mut self, model: &ChartModel, index: usize, dx: f64, dy: f64);

    /// Labels that may overlap are left out of the chart's overlap pass.
    fn allows_overlap(&self) -> bool {
        true
    }

    /// Every graphic that belongs to the item, excluding handles.
    fn graphics(&self) -> Vec<GraphicId> {
        self.base().graphic.into_iter().collect()
    }

    /// Releases the item's graphics. Variants with extra graphics extend this.
    fn destroy_graphics(&mut self, renderer: &mut dyn Renderer) {
        if let Some(id) = self.base_mut().graphic.take() {
            renderer.destroy(id);
        }
    }

    // ------------------------------------------------------------------------
    // Provided behaviour
    // ------------------------------------------------------------------------

    /// Re-resolves the anchors. Items without anchors of their own use the
    /// annotation's `inherited` anchor.
    fn link_points(&mut self, model: &ChartModel, inherited: Option<&PointSpec>) -> bool {
        let mut specs = self.options().point_specs();
        if specs.is_empty() {
            specs.extend(inherited.cloned());
        }
        self.base_mut().link(&specs, model)
    }

    /// True when the item configures anchors instead of inheriting one.
    fn has_own_points(&self) -> bool {
        !self.options().point_specs().is_empty()
    }

    fn should_be_drawn(&self) -> bool {
        !self.base().points.is_empty() && self.options().visible()
    }

    fn add_control_points(&mut self) {
        let options = self
            .options()
            .resolved_control_points(self.default_control_point_count());
        self.base_mut().add_control_points(options);
    }

    fn redraw_control_points(
        &mut self,
        model: &ChartModel,
        renderer: &mut dyn Renderer,
        animated: bool,
    ) {
        let positions: Vec<Option<(f64, f64)>> = self
            .base()
            .control_points
            .iter()
            .map(|cp| self.control_point_position(model, cp.index))
            .collect();
        for (cp, position) in self.base_mut().control_points.iter_mut().zip(positions) {
            cp.redraw(renderer, position, animated);
        }
    }

    fn set_control_points_visibility(&mut self, renderer: &mut dyn Renderer, visible: bool) {
        self.base_mut()
            .set_control_points_visibility(renderer, visible);
    }

    /// Moves every anchor by a pixel delta.
    fn translate(&mut self, model: &ChartModel, dx: f64, dy: f64) {
        for index in 0..self.base().points.len() {
            self.translate_point(model, dx, dy, index);
        }
    }

    /// Moves one anchor and writes its new spec back into the options.
    fn translate_point(&mut self, model: &ChartModel, dx: f64, dy: f64, index: usize) {
        let Some(point) = self.base_mut().points.get_mut(index) else {
            return;
        };
        point.translate(model, dx, dy);
        let spec = point.to_spec();
        self.options_mut().set_point_spec(index, spec);
    }

    /// Rotates every anchor around a plot-relative centre.
    fn rotate(&mut self, model: &ChartModel, cx: f64, cy: f64, radians: f64) {
        for index in 0..self.base().points.len() {
            let Some(point) = self.base_mut().points.get_mut(index) else {
                continue;
            };
            point.rotate(model, cx, cy, radians);
            let spec = point.to_spec();
            self.options_mut().set_point_spec(index, spec);
        }
    }

    /// Scales every anchor around a plot-relative centre.
    fn scale(&mut self, model: &ChartModel, cx: f64, cy: f64, sx: f64, sy: f64) {
        for index in 0..self.base().points.len() {
            let Some(point) = self.base_mut().points.get_mut(index) else {
                continue;
            };
            point.scale(model, cx, cy, sx, sy);
            let spec = point.to_spec();
            self.options_mut().set_point_spec(index, spec);
        }
    }

    fn owns_graphic(&self, id: GraphicId) -> bool {
        self.graphics().contains(&id)
    }

    /// Releases the graphics and handles. Safe to call more than once and on
    /// items that never rendered.
    fn destroy(&mut self, renderer: &mut dyn Renderer) {
        self.base_mut().destroy_control_points(renderer);
        self.destroy_graphics(renderer);
        let base = self.base_mut();
        base.points.clear();
        base.placed = false;
        log::debug!("Destroyed {} item {}", self.type_name(), self.base().index);
    }
}

// ============================================================================
// Helpers shared by the variants
// ============================================================================

/// Sets or animates attributes depending on `animated`.
pub(crate) fn apply(renderer: &mut dyn Renderer, id: GraphicId, attrs: &Attrs, animated: bool) {
    if animated {
        renderer.animate(id, attrs);
    } else {
        renderer.attr(id, attrs);
    }
}

pub(crate) fn parse_color(value: Option<&str>) -> Option<Color> {
    value.map(|v| Color::parse_or(v, TRANSPARENT))
}

/// Paint attributes common to all shapes.
pub(crate) fn shape_style(options: &ShapeOptions) -> Attrs {
    Attrs {
        stroke: parse_color(options.stroke.as_deref()),
        stroke_width: options.stroke_width,
        fill: parse_color(options.fill.as_deref()),
        dash_style: options.dash_style.clone(),
        class_name: options.class_name.clone(),
        z_index: options.z_index,
        ..Default::default()
    }
}

/// Rejects negative sizes in a shape entry.
pub(crate) fn check_non_negative(
    index: usize,
    name: &str,
    value: Option<f64>,
) -> Result<(), AnnotationError> {
    match value {
        Some(v) if v < 0.0 || !v.is_finite() => Err(AnnotationError::InvalidOption {
            option: format!("shapes[{index}].{name}"),
            reason: format!("expected a non-negative number, got {v}"),
        }),
        _ => Ok(()),
    }
}

// ============================================================================
// Shape registry
// ============================================================================

/// A shape item behind the common interface.
pub type ShapeItem = Box<dyn Controllable<Options = ShapeOptions>>;

/// Builds a shape from its effective options and its index in the options array.
pub type ShapeConstructor = fn(ShapeOptions, usize) -> Result<ShapeItem, AnnotationError>;

/// Maps shape type names to constructors. Custom types can be registered.
#[derive(Clone)]
pub struct ShapeRegistry {
    constructors: HashMap<String, ShapeConstructor>,
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        let mut registry = Self {
            constructors: HashMap::new(),
        };
        registry.register("rect", ControllableRect::boxed);
        registry.register("circle", ControllableCircle::boxed);
        registry.register("path", ControllablePath::boxed);
        registry.register("image", ControllableImage::boxed);
        registry
    }
}

impl ShapeRegistry {
    pub fn register(&mut self, name: &str, constructor: ShapeConstructor) {
        self.constructors.insert(name.to_string(), constructor);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Builds the shape for an entry, failing on a missing or unknown type.
    pub fn create(&self, options: ShapeOptions, index: usize) -> Result<ShapeItem, AnnotationError> {
        let name = options
            .shape_type
            .clone()
            .ok_or(AnnotationError::MissingShapeType(index))?;
        let constructor = self
            .constructors
            .get(&name)
            .ok_or(AnnotationError::UnknownShapeType(name))?;
        constructor(options, index)
    }
}

#[cfg(test)]
mod tests;
