//! Draggable handles bound to one anchor or dimension of an item.

use super::options::ControlPointOptions;
use crate::draw::{Attrs, BLACK, Color, GraphicId, Primitive, Renderer, WHITE};

pub const DEFAULT_SIZE: f64 = 10.0;

/// A control point handle.
///
/// The owning item decides where the handle sits and what dragging it does;
/// the handle itself only owns its graphic and visibility.
#[derive(Debug, Clone)]
pub struct ControlPoint {
    pub index: usize,
    pub options: ControlPointOptions,
    graphic: Option<GraphicId>,
    visible: bool,
    placed: bool,
}

impl ControlPoint {
    pub fn new(index: usize, options: ControlPointOptions) -> Self {
        let visible = options.visible.unwrap_or(false);
        Self {
            index,
            options,
            graphic: None,
            visible,
            placed: false,
        }
    }

    pub fn graphic(&self) -> Option<GraphicId> {
        self.graphic
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Only shown, positioned handles receive pointer events.
    pub fn is_hit_target(&self, id: GraphicId) -> bool {
        self.visible && self.placed && self.graphic == Some(id)
    }

    fn size(&self) -> (f64, f64) {
        (
            self.options.width.unwrap_or(DEFAULT_SIZE),
            self.options.height.unwrap_or(DEFAULT_SIZE),
        )
    }

    /// Creates the handle graphic under the chart's control-point group.
    pub fn render(&mut self, renderer: &mut dyn Renderer, group: GraphicId) {
        if self.graphic.is_some() {
            return;
        }

        let symbol = self
            .options
            .symbol
            .clone()
            .unwrap_or_else(|| "circle".to_string());
        let style = self.options.style.clone().unwrap_or_default();
        let (width, height) = self.size();

        let id = renderer.create(Primitive::Symbol { symbol }, Some(group));
        renderer.attr(
            id,
            &Attrs {
                width: Some(width),
                height: Some(height),
                stroke: Some(
                    style
                        .stroke
                        .as_deref()
                        .map_or(BLACK, |s| Color::parse_or(s, BLACK)),
                ),
                stroke_width: Some(style.stroke_width.unwrap_or(2.0)),
                fill: Some(
                    style
                        .fill
                        .as_deref()
                        .map_or(WHITE, |s| Color::parse_or(s, WHITE)),
                ),
                visible: Some(false),
                ..Default::default()
            },
        );
        self.graphic = Some(id);
    }

    /// Centres the handle on `position` (chart pixels), hiding it when the
    /// owner has no position for it.
    pub fn redraw(
        &mut self,
        renderer: &mut dyn Renderer,
        position: Option<(f64, f64)>,
        animated: bool,
    ) {
        let Some(id) = self.graphic else {
            return;
        };
        self.placed = position.is_some();
        let mut attrs = Attrs::visibility(self.visible && self.placed);
        if let Some((x, y)) = position {
            let (width, height) = self.size();
            attrs.x = Some(x - width / 2.0);
            attrs.y = Some(y - height / 2.0);
        }
        if animated {
            renderer.animate(id, &attrs);
        } else {
            renderer.attr(id, &attrs);
        }
    }

    pub fn set_visibility(&mut self, renderer: &mut dyn Renderer, visible: bool) {
        self.visible = visible;
        if let Some(id) = self.graphic {
            renderer.attr(id, &Attrs::visibility(visible && self.placed));
        }
    }

    /// Releases the graphic. Safe to call more than once.
    pub fn destroy(&mut self, renderer: &mut dyn Renderer) {
        if let Some(id) = self.graphic.take() {
            renderer.destroy(id);
        }
        self.placed = false;
    }
}
