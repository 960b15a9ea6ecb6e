use super::label::{Placement, position};
use super::{Controllable, ControllableBase, ShapeItem, apply, check_non_negative};
use crate::annotation::options::ShapeOptions;
use crate::annotation::types::AnnotationError;
use crate::chart::ChartModel;
use crate::draw::{Attrs, GraphicId, Primitive, Renderer};

/// Raster image placed against one anchor with the label alignment rules.
#[derive(Debug, Clone)]
pub struct ControllableImage {
    base: ControllableBase,
    options: ShapeOptions,
}

impl ControllableImage {
    pub fn new(options: ShapeOptions, index: usize) -> Result<Self, AnnotationError> {
        if options.src.as_deref().is_none_or(str::is_empty) {
            return Err(AnnotationError::InvalidOption {
                option: format!("shapes[{index}].src"),
                reason: "an image needs a source".to_string(),
            });
        }
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

    fn size(&self) -> (f64, f64) {
        (
            self.options.width.unwrap_or(0.0),
            self.options.height.unwrap_or(0.0),
        )
    }
}

impl Controllable for ControllableImage {
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
        "image"
    }

    fn default_control_point_count(&self) -> usize {
        1
    }

    fn render(&mut self, renderer: &mut dyn Renderer, parent: GraphicId, control_group: GraphicId) {
        let src = self.options.src.clone().unwrap_or_default();
        let (width, height) = self.size();
        let id = renderer.create(Primitive::Image { src }, Some(parent));
        renderer.attr(
            id,
            &Attrs {
                width: Some(width),
                height: Some(height),
                class_name: self.options.class_name.clone(),
                z_index: self.options.z_index,
                ..Default::default()
            },
        );
        self.base.graphic = Some(id);
        self.base.render_control_points(renderer, control_group);
    }

    fn redraw(&mut self, model: &ChartModel, renderer: &mut dyn Renderer, animated: bool) {
        let Some(id) = self.base.graphic else {
            return;
        };
        let size = self.size();
        let placement = Placement::for_shape(&self.options);
        let placed = self
            .base
            .points
            .first()
            .and_then(|anchor| position(model, anchor, size, &placement));

        match placed {
            Some((x, y)) => {
                let attrs = Attrs {
                    x: Some(x),
                    y: Some(y),
                    width: Some(size.0),
                    height: Some(size.1),
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
        let anchor = self.base.points.first()?;
        (index == 0 && self.base.placed).then(|| anchor.absolute(model))
    }

    fn drag_control_point(&mut self, model: &ChartModel, index: usize, dx: f64, dy: f64) {
        if index == 0 {
            self.translate_point(model, dx, dy, 0);
        }
    }
}
