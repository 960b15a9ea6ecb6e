use super::{
    Controllable, ControllableBase, ShapeItem, apply, check_non_negative, shape_style,
};
use crate::annotation::options::ShapeOptions;
use crate::annotation::types::AnnotationError;
use crate::chart::ChartModel;
use crate::draw::{Attrs, GraphicId, Primitive, Renderer};

/// Smallest radius a drag can shrink a circle to.
const MIN_RADIUS: f64 = 1.0;

/// Circle centred on one anchor.
///
/// Handle 0 moves the centre, handle 1 (on the right edge) changes the radius.
#[derive(Debug, Clone)]
pub struct ControllableCircle {
    base: ControllableBase,
    options: ShapeOptions,
}

impl ControllableCircle {
    pub fn new(options: ShapeOptions, index: usize) -> Result<Self, AnnotationError> {
        check_non_negative(index, "r", options.r)?;
        Ok(Self {
            base: ControllableBase::new(index),
            options,
        })
    }

    pub fn boxed(options: ShapeOptions, index: usize) -> Result<ShapeItem, AnnotationError> {
        Ok(Box::new(Self::new(options, index)?))
    }

    fn radius(&self) -> f64 {
        self.options.r.unwrap_or(0.0)
    }
}

impl Controllable for ControllableCircle {
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
        "circle"
    }

    fn default_control_point_count(&self) -> usize {
        2
    }

    fn render(&mut self, renderer: &mut dyn Renderer, parent: GraphicId, control_group: GraphicId) {
        let id = renderer.create(Primitive::Circle, Some(parent));
        renderer.attr(id, &shape_style(&self.options));
        self.base.graphic = Some(id);
        self.base.render_control_points(renderer, control_group);
    }

    fn redraw(&mut self, model: &ChartModel, renderer: &mut dyn Renderer, animated: bool) {
        let Some(id) = self.base.graphic else {
            return;
        };
        match self.base.points.first().map(|p| p.absolute(model)) {
            Some((x, y)) => {
                let attrs = Attrs {
                    x: Some(x),
                    y: Some(y),
                    r: Some(self.radius()),
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
        let (x, y) = self.base.points.first()?.absolute(model);
        match index {
            0 => Some((x, y)),
            1 => Some((x + self.radius(), y)),
            _ => None,
        }
    }

    fn drag_control_point(&mut self, model: &ChartModel, index: usize, dx: f64, dy: f64) {
        match index {
            0 => self.translate_point(model, dx, dy, 0),
            1 => self.options.r = Some((self.radius() + dx).max(MIN_RADIUS)),
            _ => {}
        }
    }
}
