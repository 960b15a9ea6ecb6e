//! Text labels and the placement rules shared with images.
//!
//! A label box is aligned relative to its anchor, then justified back into
//! the plot area or cropped, depending on its options. The `distance` option
//! switches to tooltip placement: centred above the anchor, or below it when
//! there is no room.

use super::{Controllable, ControllableBase, apply, parse_color};
use crate::annotation::format::{LabelContext, format_label};
use crate::annotation::mock_point::MockPoint;
use crate::annotation::options::{Align, LabelOptions, Overflow, ShapeOptions, VerticalAlign};
use crate::chart::ChartModel;
use crate::draw::scene::DEFAULT_FONT_SIZE;
use crate::draw::{Attrs, BLACK, Color, GraphicId, Primitive, Renderer};
use crate::util::round_half_up;

// ============================================================================
// Placement
// ============================================================================

/// Alignment settings of a box placed against an anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub align: Align,
    pub vertical_align: VerticalAlign,
    /// Offset from the anchor in pixels
    pub x: f64,
    pub y: f64,
    pub overflow: Overflow,
    pub crop: bool,
    /// Tooltip-style gap between anchor and box, replaces alignment when set
    pub distance: Option<f64>,
}

impl Placement {
    /// Label placement; unset values fall back to a box centred above the anchor.
    pub fn for_label(options: &LabelOptions) -> Self {
        Self {
            align: options.align.unwrap_or(Align::Center),
            vertical_align: options.vertical_align.unwrap_or(VerticalAlign::Bottom),
            x: options.x.unwrap_or(0.0),
            y: options.y.unwrap_or(-16.0),
            overflow: options.overflow.unwrap_or(Overflow::Justify),
            crop: options.crop.unwrap_or(false),
            distance: options.distance,
        }
    }

    /// Image placement; unset values put the top-left corner on the anchor.
    pub fn for_shape(options: &ShapeOptions) -> Self {
        Self {
            align: options.align.unwrap_or(Align::Left),
            vertical_align: options.vertical_align.unwrap_or(VerticalAlign::Top),
            x: options.x.unwrap_or(0.0),
            y: options.y.unwrap_or(0.0),
            overflow: options.overflow.unwrap_or(Overflow::Allow),
            crop: options.crop.unwrap_or(false),
            distance: options.distance,
        }
    }
}

/// Top-left corner of a `width` x `height` box aligned to an anchor.
pub fn aligned_position(
    placement: &Placement,
    anchor_x: f64,
    anchor_y: f64,
    width: f64,
    height: f64,
) -> (f64, f64) {
    let mut x = anchor_x + placement.x;
    let mut y = anchor_y + placement.y;
    match placement.align {
        Align::Left => {}
        Align::Center => x -= width / 2.0,
        Align::Right => x -= width,
    }
    match placement.vertical_align {
        VerticalAlign::Top => {}
        VerticalAlign::Middle => y -= height / 2.0,
        VerticalAlign::Bottom => y -= height,
    }
    (round_half_up(x), round_half_up(y))
}

/// Adjusts a placement so a box at `position` stays inside a plot of the
/// given size.
///
/// A box hanging off the side it is aligned away from flips its alignment
/// (mirroring the offset); otherwise the offset is shifted by the overflow.
pub fn justified_placement(
    plot_width: f64,
    plot_height: f64,
    placement: &Placement,
    position: (f64, f64),
    width: f64,
    height: f64,
) -> Placement {
    let (x, y) = position;
    let mut justified = *placement;

    if x < 0.0 {
        if placement.align == Align::Right {
            justified.align = Align::Left;
            justified.x = -placement.x;
        } else {
            justified.x = placement.x - x;
        }
    } else if x + width > plot_width {
        if placement.align == Align::Left {
            justified.align = Align::Right;
            justified.x = -placement.x;
        } else {
            justified.x = placement.x - (x + width - plot_width);
        }
    }

    if y < 0.0 {
        if placement.vertical_align == VerticalAlign::Bottom {
            justified.vertical_align = VerticalAlign::Top;
            justified.y = -placement.y;
        } else {
            justified.y = placement.y - y;
        }
    } else if y + height > plot_height {
        if placement.vertical_align == VerticalAlign::Top {
            justified.vertical_align = VerticalAlign::Bottom;
            justified.y = -placement.y;
        } else {
            justified.y = placement.y - (y + height - plot_height);
        }
    }

    justified
}

fn tooltip_position(
    plot_width: f64,
    anchor_x: f64,
    anchor_y: f64,
    width: f64,
    height: f64,
    distance: f64,
) -> (f64, f64) {
    let x = (anchor_x - width / 2.0).clamp(0.0, (plot_width - width).max(0.0));
    let mut y = anchor_y - distance - height;
    if y < 0.0 {
        y = anchor_y + distance;
    }
    (round_half_up(x), round_half_up(y))
}

/// Chart-pixel top-left corner of a box placed against `anchor`, or `None`
/// when the box must be hidden.
///
/// Anchors on a hidden series or outside the axis panes are never shown;
/// with `crop` the box is also hidden if it still leaves the plot area.
pub fn position(
    model: &ChartModel,
    anchor: &MockPoint,
    size: (f64, f64),
    placement: &Placement,
) -> Option<(f64, f64)> {
    if !(anchor.series_visible && anchor.is_inside) {
        return None;
    }

    let plot = model.plot_box();
    let (width, height) = size;
    let (ax, ay) = (anchor.plot_x, anchor.plot_y);

    let (x, y) = match placement.distance {
        Some(distance) => tooltip_position(plot.width, ax, ay, width, height, distance),
        None => {
            let aligned = aligned_position(placement, ax, ay, width, height);
            if placement.overflow == Overflow::Justify {
                let justified =
                    justified_placement(plot.width, plot.height, placement, aligned, width, height);
                aligned_position(&justified, ax, ay, width, height)
            } else {
                aligned
            }
        }
    };

    if placement.crop && !(model.is_inside_plot(x, y) && model.is_inside_plot(x + width, y + height))
    {
        return None;
    }

    Some((x + plot.x, y + plot.y))
}

// ============================================================================
// Label item
// ============================================================================

/// Text box attached to one anchor, with a callout pointing at it.
#[derive(Debug, Clone)]
pub struct ControllableLabel {
    base: ControllableBase,
    options: LabelOptions,
}

impl ControllableLabel {
    pub fn new(options: LabelOptions, index: usize) -> Self {
        Self {
            base: ControllableBase::new(index),
            options,
        }
    }

    fn context(&self) -> LabelContext {
        self.base
            .points
            .first()
            .map(MockPoint::label_context)
            .unwrap_or_default()
    }

    /// Text shown by the label: `text`, `format`, `formatter`, then the
    /// anchor's default text.
    pub fn text(&self) -> String {
        let context = self.context();
        if let Some(text) = &self.options.text {
            format_label(text, &context)
        } else if let Some(format) = &self.options.format {
            format_label(format, &context)
        } else if let Some(formatter) = &self.options.formatter {
            formatter.call(&context)
        } else {
            context.default_text()
        }
    }

    fn background(&self) -> Option<Color> {
        parse_color(self.options.background_color.as_deref())
    }

    fn text_color(&self) -> Color {
        let style = self.options.style.clone().unwrap_or_default();
        match style.color.as_deref() {
            Some("contrast") | None => self.background().map_or(BLACK, |bg| {
                // Mostly transparent boxes show the plot behind them
                if bg.a < 0.5 { BLACK } else { bg.contrast() }
            }),
            Some(value) => Color::parse_or(value, BLACK),
        }
    }

    fn style_attrs(&self) -> Attrs {
        let style = self.options.style.clone().unwrap_or_default();
        Attrs {
            fill: self.background(),
            stroke: parse_color(self.options.border_color.as_deref()),
            stroke_width: self.options.border_width,
            r: self.options.border_radius,
            padding: self.options.padding,
            font_size: Some(style.font_size.unwrap_or(DEFAULT_FONT_SIZE)),
            font_weight: style.font_weight,
            color: Some(self.text_color()),
            shadow: self.options.shadow,
            class_name: self.options.class_name.clone(),
            z_index: self.options.z_index,
            ..Default::default()
        }
    }
}

impl Controllable for ControllableLabel {
    type Options = LabelOptions;

    fn base(&self) -> &ControllableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ControllableBase {
        &mut self.base
    }

    fn options(&self) -> &LabelOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut LabelOptions {
        &mut self.options
    }

    fn type_name(&self) -> &str {
        "label"
    }

    fn default_control_point_count(&self) -> usize {
        1
    }

    fn allows_overlap(&self) -> bool {
        self.options.allow_overlap.unwrap_or(false)
    }

    fn render(&mut self, renderer: &mut dyn Renderer, parent: GraphicId, control_group: GraphicId) {
        let shape = self
            .options
            .shape
            .clone()
            .unwrap_or_else(|| "callout".to_string());
        let id = renderer.create(Primitive::Label { shape }, Some(parent));
        renderer.attr(id, &self.style_attrs());
        self.base.graphic = Some(id);
        self.base.render_control_points(renderer, control_group);
    }

    fn redraw(&mut self, model: &ChartModel, renderer: &mut dyn Renderer, animated: bool) {
        let Some(id) = self.base.graphic else {
            return;
        };

        renderer.attr(
            id,
            &Attrs {
                text: Some(self.text()),
                ..Default::default()
            },
        );
        let size = renderer
            .bbox(id)
            .map_or((0.0, 0.0), |bbox| (bbox.width, bbox.height));

        let placement = Placement::for_label(&self.options);
        let placed = self.base.points.first().and_then(|anchor| {
            position(model, anchor, size, &placement).map(|pos| (pos, anchor.absolute(model)))
        });

        match placed {
            Some(((x, y), (anchor_x, anchor_y))) => {
                let attrs = Attrs {
                    x: Some(x),
                    y: Some(y),
                    anchor_x: Some(anchor_x),
                    anchor_y: Some(anchor_y),
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
