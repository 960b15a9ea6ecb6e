//! Anchors: point specs resolved against the live chart.
//!
//! A [`MockPoint`] is rebuilt from its [`PointSpec`] on every redraw, so an
//! item bound to a data point follows that point and disappears with it.

use super::format::LabelContext;
use super::options::{CoordsSpec, PointSpec};
use crate::chart::{Axis, AxisRef, ChartModel};

/// How one dimension of an anchor was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Value mapped through an axis
    Translate,
    /// Value taken as a plot-relative pixel
    Pixel,
}

/// Where the anchor's values come from.
#[derive(Debug, Clone, PartialEq)]
pub enum PointSource {
    /// Tracks a data point by id
    Linked { id: String, series_index: usize },
    /// Literal coordinates from the options
    Literal,
}

/// A resolved anchor position.
#[derive(Debug, Clone, PartialEq)]
pub struct MockPoint {
    pub source: PointSource,
    /// Axis value (or pixel in [`ResolveMode::Pixel`]) of each dimension
    pub x: f64,
    pub y: f64,
    /// Axis references as configured, written back unchanged after drags
    pub x_axis: Option<AxisRef>,
    pub y_axis: Option<AxisRef>,
    pub x_mode: ResolveMode,
    pub y_mode: ResolveMode,
    /// Position relative to the plot box
    pub plot_x: f64,
    pub plot_y: f64,
    pub series_visible: bool,
    pub series_name: Option<String>,
    /// Inside the pane of every axis the anchor is bound to
    pub is_inside: bool,
}

impl MockPoint {
    /// Resolves a point spec. Returns `None` when a referenced data point
    /// does not exist (or has no value) or its series' axes are gone.
    pub fn resolve(spec: &PointSpec, model: &ChartModel) -> Option<Self> {
        match spec {
            PointSpec::Id(id) => Self::resolve_linked(id, model),
            PointSpec::Coords(coords) => Some(Self::resolve_literal(coords, model)),
        }
    }

    fn resolve_linked(id: &str, model: &ChartModel) -> Option<Self> {
        let found = model.point(id)?;
        let y = found.point.y?;
        let x_ref = AxisRef::Index(found.series.x_axis);
        let y_ref = AxisRef::Index(found.series.y_axis);
        let x_axis = model.x_axis(&x_ref)?;
        let y_axis = model.y_axis(&y_ref)?;

        let plot_x = x_axis.to_pixels(found.point.x, true);
        let plot_y = y_axis.to_pixels(y, true);

        Some(Self {
            source: PointSource::Linked {
                id: id.to_string(),
                series_index: found.series_index,
            },
            x: found.point.x,
            y,
            x_axis: Some(x_ref),
            y_axis: Some(y_ref),
            x_mode: ResolveMode::Translate,
            y_mode: ResolveMode::Translate,
            plot_x,
            plot_y,
            series_visible: found.series.visible,
            series_name: Some(found.series.name.clone()),
            is_inside: x_axis.contains_pixel(plot_x) && y_axis.contains_pixel(plot_y),
        })
    }

    fn resolve_literal(coords: &CoordsSpec, model: &ChartModel) -> Self {
        let x_axis = coords.x_axis.as_ref().and_then(|r| model.x_axis(r));
        let y_axis = coords.y_axis.as_ref().and_then(|r| model.y_axis(r));
        let (plot_x, x_mode) = project(coords.x, x_axis);
        let (plot_y, y_mode) = project(coords.y, y_axis);

        Self {
            source: PointSource::Literal,
            x: coords.x,
            y: coords.y,
            x_axis: coords.x_axis.clone(),
            y_axis: coords.y_axis.clone(),
            x_mode,
            y_mode,
            plot_x,
            plot_y,
            series_visible: true,
            series_name: None,
            is_inside: inside_pane(x_axis, plot_x) && inside_pane(y_axis, plot_y),
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self.source, PointSource::Linked { .. })
    }

    /// Position in chart pixels.
    pub fn absolute(&self, model: &ChartModel) -> (f64, f64) {
        let plot_box = model.plot_box();
        (self.plot_x + plot_box.x, self.plot_y + plot_box.y)
    }

    /// Moves the anchor by a pixel delta and refreshes its values.
    pub fn translate(&mut self, model: &ChartModel, dx: f64, dy: f64) {
        self.detach();
        self.plot_x += dx;
        self.plot_y += dy;
        self.refresh_options(model);
    }

    /// Rotates the anchor around a plot-relative centre.
    pub fn rotate(&mut self, model: &ChartModel, cx: f64, cy: f64, radians: f64) {
        self.detach();
        let (sin, cos) = radians.sin_cos();
        let x = self.plot_x - cx;
        let y = self.plot_y - cy;
        self.plot_x = x * cos - y * sin + cx;
        self.plot_y = x * sin + y * cos + cy;
        self.refresh_options(model);
    }

    /// Scales the anchor's distance from a plot-relative centre.
    pub fn scale(&mut self, model: &ChartModel, cx: f64, cy: f64, sx: f64, sy: f64) {
        self.detach();
        self.plot_x = self.plot_x * sx + (1.0 - sx) * cx;
        self.plot_y = self.plot_y * sy + (1.0 - sy) * cy;
        self.refresh_options(model);
    }

    /// A moved data-point anchor becomes a literal on the series' axes.
    fn detach(&mut self) {
        self.source = PointSource::Literal;
    }

    fn refresh_options(&mut self, model: &ChartModel) {
        self.x = match (self.x_mode, self.x_axis.as_ref().and_then(|r| model.x_axis(r))) {
            (ResolveMode::Translate, Some(axis)) => axis.to_value(self.plot_x, true),
            _ => self.plot_x,
        };
        self.y = match (self.y_mode, self.y_axis.as_ref().and_then(|r| model.y_axis(r))) {
            (ResolveMode::Translate, Some(axis)) => axis.to_value(self.plot_y, true),
            _ => self.plot_y,
        };
    }

    /// The spec that resolves to this anchor.
    pub fn to_spec(&self) -> PointSpec {
        match &self.source {
            PointSource::Linked { id, .. } => PointSpec::Id(id.clone()),
            PointSource::Literal => PointSpec::Coords(CoordsSpec {
                x: self.x,
                y: self.y,
                x_axis: self.x_axis.clone(),
                y_axis: self.y_axis.clone(),
            }),
        }
    }

    /// Values exposed to label templates and formatters.
    pub fn label_context(&self) -> LabelContext {
        let value = |v: f64, mode: ResolveMode| (mode == ResolveMode::Translate).then_some(v);
        LabelContext {
            x: value(self.x, self.x_mode),
            y: value(self.y, self.y_mode),
            point_id: match &self.source {
                PointSource::Linked { id, .. } => Some(id.clone()),
                PointSource::Literal => None,
            },
            series_name: self.series_name.clone(),
        }
    }
}

/// Dimensions not bound to an axis are always inside.
fn inside_pane(axis: Option<&Axis>, pixel: f64) -> bool {
    axis.is_none_or(|a| a.contains_pixel(pixel))
}

fn project(value: f64, axis: Option<&Axis>) -> (f64, ResolveMode) {
    match axis {
        Some(axis) => (axis.to_pixels(value, true), ResolveMode::Translate),
        None => (value, ResolveMode::Pixel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{DataPoint, Series};
    use crate::util::BBox;

    /// Plot 100x100 at (10, 20), both axes 0..100.
    fn model() -> ChartModel {
        let mut model = ChartModel::new(BBox::new(10.0, 20.0, 100.0, 100.0));
        model.add_series(Series::new(
            "Sales",
            vec![DataPoint::new(Some("p"), 50.3, 25.0)],
        ));
        model
    }

    #[test]
    fn linked_point_keeps_sub_pixel_position() {
        let model = model();
        let point = MockPoint::resolve(&PointSpec::id("p"), &model).unwrap();
        assert!(point.is_linked());
        assert!((point.plot_x - 50.3).abs() < 1e-9);
        assert_eq!(point.plot_y, 75.0);
        let (x, y) = point.absolute(&model);
        assert!((x - 60.3).abs() < 1e-9);
        assert_eq!(y, 95.0);
        assert!(point.is_inside);
        assert_eq!(point.label_context().series_name.as_deref(), Some("Sales"));
    }

    #[test]
    fn missing_point_fails_closed() {
        let mut model = model();
        assert!(MockPoint::resolve(&PointSpec::id("nope"), &model).is_none());
        model.remove_point("p");
        assert!(MockPoint::resolve(&PointSpec::id("p"), &model).is_none());
    }

    #[test]
    fn dimensions_resolve_independently() {
        let model = model();
        let spec = PointSpec::Coords(CoordsSpec {
            x: 25.0,
            y: 40.0,
            x_axis: Some(AxisRef::Index(0)),
            y_axis: Some(AxisRef::Id("missing".into())),
        });
        let point = MockPoint::resolve(&spec, &model).unwrap();
        assert_eq!(point.x_mode, ResolveMode::Translate);
        assert_eq!(point.y_mode, ResolveMode::Pixel);
        assert_eq!((point.plot_x, point.plot_y), (25.0, 40.0));
        assert_eq!(point.label_context().y, None);
    }

    #[test]
    fn data_moves_shift_the_anchor_by_the_same_pixels() {
        let mut model = model();
        let before = MockPoint::resolve(&PointSpec::id("p"), &model).unwrap();
        model.set_point_value("p", 50.5, Some(25.0));
        let after = MockPoint::resolve(&PointSpec::id("p"), &model).unwrap();
        assert!((after.plot_x - before.plot_x - 0.2).abs() < 1e-9);
    }

    #[test]
    fn dragging_a_linked_point_adds_the_exact_delta() {
        let model = model();
        let mut point = MockPoint::resolve(&PointSpec::id("p"), &model).unwrap();
        point.translate(&model, 0.5, 0.0);
        let spec = point.to_spec();
        let coords = spec.as_coords().unwrap();
        assert!((coords.x - 50.8).abs() < 1e-9);
        assert!((coords.y - 25.0).abs() < 1e-9);
    }

    #[test]
    fn translate_refreshes_axis_values() {
        let model = model();
        let mut point = MockPoint::resolve(&PointSpec::on_axes(10.0, 10.0, 0, 0), &model).unwrap();
        point.translate(&model, 10.0, -10.0);
        let spec = point.to_spec();
        let coords = spec.as_coords().unwrap();
        assert!((coords.x - 20.0).abs() < 1e-9);
        assert!((coords.y - 20.0).abs() < 1e-9);
        assert_eq!(coords.y_axis, Some(AxisRef::Index(0)));
    }

    #[test]
    fn translating_a_linked_point_detaches_it() {
        let model = model();
        let mut point = MockPoint::resolve(&PointSpec::id("p"), &model).unwrap();
        point.translate(&model, 0.0, -5.0);
        assert!(!point.is_linked());
        let spec = point.to_spec();
        let coords = spec.as_coords().unwrap();
        assert_eq!(coords.x_axis, Some(AxisRef::Index(0)));
        assert!((coords.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn rotate_and_scale_around_a_centre() {
        let model = model();
        let mut point = MockPoint::resolve(&PointSpec::pixel(20.0, 10.0), &model).unwrap();
        point.rotate(&model, 10.0, 10.0, std::f64::consts::FRAC_PI_2);
        assert!((point.plot_x - 10.0).abs() < 1e-9);
        assert!((point.plot_y - 20.0).abs() < 1e-9);

        point.scale(&model, 10.0, 10.0, 2.0, 2.0);
        assert!((point.x - 10.0).abs() < 1e-9);
        assert!((point.y - 30.0).abs() < 1e-9);
    }
}
