use super::{
    Controllable, ControllableBase, ShapeItem, apply, check_non_negative, shape_style,
};
use crate::annotation::options::ShapeOptions;
use crate::annotation::types::AnnotationError;
use crate::chart::ChartModel;
use crate::draw::{Attrs, GraphicId, Primitive, Renderer};

/// Rectangle whose top-left corner follows one anchor.
///
/// Handle 0 moves the anchor, handle 1 (bottom-right corner) resizes.
#[derive(Debug, Clone)]
pub struct ControllableRect {
    base: ControllableBase,
    options: ShapeOptions,
}

impl ControllableRect {
    pub fn new(options: ShapeOptions, index: usize) -> Result<Self, AnnotationError> {
        check_non_negative(index, "width", options.width)?;
        check_non_negative(index, "height", options.height)?;
        Ok(Self {
            base: ControllableBase::new(index),
            options,
        })
    }

    pub fn boxed(options: ShapeOptions, index: usize) -> Result<ShapeItem, AnnotationError> {
        Ok(Box::new(Self::new(options, index)?))
    }

    /// Top-left corner in chart pixels.
    fn origin(&self, model: &ChartModel) -> Option<(f64, f64)> {
        let (x, y) = self.base.points.first()?.absolute(model);
        Some((
            x + self.options.x.unwrap_or(0.0),
            y + self.options.y.unwrap_or(0.0),
        ))
    }

    fn size(&self) -> (f64, f64) {
        (
            self.options.width.unwrap_or(0.0),
            self.options.height.unwrap_or(0.0),
        )
    }
}

impl Controllable for ControllableRect {
    type Options = ShapeOptions;

    fn base(&self) -> &ControllableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ControllableBase {
        &mut self.base
    }

    fn options(&self) -> &ShapeOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut ShapeOptions {
        &mut self.options
    }

    fn type_name(&self) -> &str {
        "rect"
    }

    fn default_control_point_count(&self) -> usize {
        2
    }

    fn render(&mut self, renderer: &mut dyn Renderer, parent: GraphicId, control_group: GraphicId) {
        let id = renderer.create(Primitive::Rect, Some(parent));
        let mut attrs = shape_style(&self.options);
        attrs.r = self.options.r;
        renderer.attr(id, &attrs);
        self.base.graphic = Some(id);
        self.base.render_control_points(renderer, control_group);
    }

    fn redraw(&mut self, model: &ChartModel, renderer: &mut dyn Renderer, animated: bool) {
        let Some(id) = self.base.graphic else {
            return;
        };
        let (width, height) = self.size();
        match self.origin(model) {
            Some((x, y)) => {
                let attrs = Attrs {
                    x: Some(x),
                    y: Some(y),
                    width: Some(width),
                    height: Some(height),
                    visible: Some(true),
                    ..Default::default()
                };
                apply(renderer, id, &attrs, animated);
                self.base.placed = true;
            }
            None => {
                renderer.attr(id, &Attrs::visibility(false));
                self.base.placed = false;
            }
        }
        self.redraw_control_points(model, renderer, animated);
    }

    fn control_point_position(&self, model: &ChartModel, index: usize) -> Option<(f64, f64)> {
        let (x, y) = self.origin(model)?;
        let (width, height) = self.size();
        match index {
            0 => Some((x, y)),
            1 => Some((x + width, y + height)),
            _ => None,
        }
    }

    fn drag_control_point(&mut self, model: &ChartModel, index: usize, dx: f64, dy: f64) {
        match index {
            0 => self.translate_point(model, dx, dy, 0),
            1 => {
                let (width, height) = self.size();
                self.options.width = Some((width + dx).max(0.0));
                self.options.height = Some((height + dy).max(0.0));
            }
            _ => {}
        }
    }
}
