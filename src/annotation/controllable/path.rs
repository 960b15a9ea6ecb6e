use super::{Controllable, ControllableBase, ShapeItem, apply, parse_color, shape_style};
use crate::annotation::options::ShapeOptions;
use crate::annotation::types::AnnotationError;
use crate::chart::ChartModel;
use crate::draw::{Attrs, BLACK, GraphicId, PathCommand, Primitive, Renderer, TRANSPARENT};
use crate::util::{calculate_arrowhead, crisp};

/// Arrow marker length in pixels.
const ARROW_LENGTH: f64 = 10.0;
/// Half-angle of the arrow markers (a 10x10 triangle).
const ARROW_ANGLE_DEGREES: f64 = 26.565;
/// Default extra hit width on each side of the line.
const DEFAULT_SNAP: f64 = 2.0;
/// Z-index of the hit tracker inside the shapes group.
const TRACKER_Z_INDEX: i32 = 2;

/// Marker drawn at an end of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Points away from the line
    Arrow,
    /// Points back along the line
    ReverseArrow,
}

impl Marker {
    fn parse(name: Option<&str>) -> Option<Marker> {
        match name? {
            "arrow" => Some(Marker::Arrow),
            "reverse-arrow" => Some(Marker::ReverseArrow),
            other => {
                log::warn!("Unknown path marker '{}', ignoring", other);
                None
            }
        }
    }

    /// Triangle for a marker whose base sits on `tip`, the line coming from `from`.
    fn triangle(self, tip: (f64, f64), from: (f64, f64)) -> Vec<PathCommand> {
        let corners = match self {
            Marker::Arrow => {
                let [left, right] =
                    calculate_arrowhead(tip.0, tip.1, from.0, from.1, ARROW_LENGTH, ARROW_ANGLE_DEGREES);
                [tip, left, right]
            }
            Marker::ReverseArrow => reverse_arrow(tip, from),
        };
        vec![
            PathCommand::MoveTo(corners[0].0, corners[0].1),
            PathCommand::LineTo(corners[1].0, corners[1].1),
            PathCommand::LineTo(corners[2].0, corners[2].1),
            PathCommand::Close,
        ]
    }
}

/// Arrow with its wings on `tip` and its point back towards `from`.
fn reverse_arrow(tip: (f64, f64), from: (f64, f64)) -> [(f64, f64); 3] {
    let dx = tip.0 - from.0;
    let dy = tip.1 - from.1;
    let line_length = (dx * dx + dy * dy).sqrt();
    if line_length < 1.0 {
        return [tip, tip, tip];
    }
    let ux = dx / line_length;
    let uy = dy / line_length;
    let length = ARROW_LENGTH.min(line_length * 0.3);
    let (sin, cos) = ARROW_ANGLE_DEGREES.to_radians().sin_cos();

    let point = (tip.0 - ux * length * cos, tip.1 - uy * length * cos);
    let left = (tip.0 - uy * length * sin, tip.1 + ux * length * sin);
    let right = (tip.0 + uy * length * sin, tip.1 - ux * length * sin);
    [point, left, right]
}

/// Snaps a straight horizontal or vertical two-point line so it renders sharp.
fn crisp_line(coords: &mut [(f64, f64)], stroke_width: f64) {
    if let [a, b] = coords {
        if a.0 == b.0 {
            a.0 = crisp(a.0, stroke_width);
            b.0 = a.0;
        }
        if a.1 == b.1 {
            a.1 = crisp(a.1, stroke_width);
            b.1 = a.1;
        }
    }
}

/// Polyline through an ordered list of anchors, with optional arrow markers.
///
/// One handle per vertex, each moving its own vertex. The path is hidden
/// while any vertex belongs to a hidden series.
#[derive(Debug, Clone)]
pub struct ControllablePath {
    base: ControllableBase,
    options: ShapeOptions,
    tracker: Option<GraphicId>,
    /// Start and end markers, parsed once when rendered
    markers: [Option<(Marker, GraphicId)>; 2],
}

impl ControllablePath {
    pub fn new(options: ShapeOptions, index: usize) -> Result<Self, AnnotationError> {
        if options.points.as_ref().is_some_and(Vec::is_empty) {
            return Err(AnnotationError::InvalidOption {
                option: format!("shapes[{index}].points"),
                reason: "a path needs at least one point".to_string(),
            });
        }
        Ok(Self {
            base: ControllableBase::new(index),
            options,
            tracker: None,
            markers: [None, None],
        })
    }

    pub fn boxed(options: ShapeOptions, index: usize) -> Result<ShapeItem, AnnotationError> {
        Ok(Box::new(Self::new(options, index)?))
    }

    /// Markers recognised at render time, start then end.
    pub fn markers(&self) -> [Option<Marker>; 2] {
        self.markers.map(|entry| entry.map(|(marker, _)| marker))
    }

    fn stroke_width(&self) -> f64 {
        self.options.stroke_width.unwrap_or(1.0)
    }

    /// Vertex positions in chart pixels, or `None` if the path must be hidden.
    fn vertices(&self, model: &ChartModel) -> Option<Vec<(f64, f64)>> {
        let points = &self.base.points;
        if points.is_empty() || points.iter().any(|p| !p.series_visible) {
            return None;
        }
        let mut coords: Vec<(f64, f64)> = points.iter().map(|p| p.absolute(model)).collect();
        crisp_line(&mut coords, self.stroke_width());
        Some(coords)
    }

    /// Path commands through the vertices: move to the first, line to the rest.
    pub fn to_d(&self, model: &ChartModel) -> Option<Vec<PathCommand>> {
        let coords = self.vertices(model)?;
        Some(
            coords
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| {
                    if i == 0 {
                        PathCommand::MoveTo(x, y)
                    } else {
                        PathCommand::LineTo(x, y)
                    }
                })
                .collect(),
        )
    }

    fn redraw_markers(
        &self,
        renderer: &mut dyn Renderer,
        coords: Option<&[(f64, f64)]>,
        animated: bool,
    ) {
        for (slot, entry) in self.markers.iter().enumerate() {
            let Some((marker, id)) = *entry else {
                continue;
            };
            let segment = coords.filter(|c| c.len() >= 2).map(|c| {
                if slot == 0 {
                    (c[0], c[1])
                } else {
                    (c[c.len() - 1], c[c.len() - 2])
                }
            });
            match segment {
                Some((tip, from)) => {
                    let attrs = Attrs {
                        d: Some(marker.triangle(tip, from)),
                        visible: Some(true),
                        ..Default::default()
                    };
                    apply(renderer, id, &attrs, animated);
                }
                None => renderer.attr(id, &Attrs::visibility(false)),
            }
        }
    }
}

impl Controllable for ControllablePath {
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
        "path"
    }

    fn default_control_point_count(&self) -> usize {
        self.options.point_specs_len().max(1)
    }

    fn render(&mut self, renderer: &mut dyn Renderer, parent: GraphicId, control_group: GraphicId) {
        let id = renderer.create(Primitive::Path, Some(parent));
        renderer.attr(id, &shape_style(&self.options));
        self.base.graphic = Some(id);

        let tracker = renderer.create(Primitive::Path, Some(parent));
        renderer.attr(
            tracker,
            &Attrs {
                stroke: Some(TRANSPARENT),
                fill: Some(TRANSPARENT),
                stroke_width: Some(
                    self.stroke_width() + self.options.snap.unwrap_or(DEFAULT_SNAP) * 2.0,
                ),
                z_index: Some(TRACKER_Z_INDEX),
                class_name: Some("annotation-tracker-line".to_string()),
                ..Default::default()
            },
        );
        self.tracker = Some(tracker);

        let marker_color = parse_color(self.options.stroke.as_deref()).unwrap_or(BLACK);
        let names = [&self.options.marker_start, &self.options.marker_end];
        for (slot, name) in names.into_iter().enumerate() {
            if let Some(marker) = Marker::parse(name.as_deref()) {
                let id = renderer.create(Primitive::Path, Some(parent));
                renderer.attr(
                    id,
                    &Attrs {
                        fill: Some(marker_color),
                        z_index: self.options.z_index,
                        ..Default::default()
                    },
                );
                self.markers[slot] = Some((marker, id));
            }
        }

        self.base.render_control_points(renderer, control_group);
    }

    fn redraw(&mut self, model: &ChartModel, renderer: &mut dyn Renderer, animated: bool) {
        let Some(id) = self.base.graphic else {
            return;
        };
        let coords = self.vertices(model);
        match self.to_d(model) {
            Some(d) => {
                let attrs = Attrs {
                    d: Some(d),
                    visible: Some(true),
                    ..Default::default()
                };
                apply(renderer, id, &attrs, animated);
                if let Some(tracker) = self.tracker {
                    renderer.attr(tracker, &attrs);
                }
                self.base.placed = true;
            }
            None => {
                renderer.attr(id, &Attrs::visibility(false));
                if let Some(tracker) = self.tracker {
                    renderer.attr(tracker, &Attrs::visibility(false));
                }
                self.base.placed = false;
            }
        }
        self.redraw_markers(renderer, coords.as_deref(), animated);
        self.redraw_control_points(model, renderer, animated);
    }

    fn control_point_position(&self, model: &ChartModel, index: usize) -> Option<(f64, f64)> {
        let point = self.base.points.get(index)?;
        point.series_visible.then(|| point.absolute(model))
    }

    fn drag_control_point(&mut self, model: &ChartModel, index: usize, dx: f64, dy: f64) {
        self.translate_point(model, dx, dy, index);
    }

    fn graphics(&self) -> Vec<GraphicId> {
        self.base
            .graphic
            .into_iter()
            .chain(self.tracker)
            .chain(self.markers.iter().flatten().map(|&(_, id)| id))
            .collect()
    }

    fn destroy_graphics(&mut self, renderer: &mut dyn Renderer) {
        for id in self.graphics() {
            renderer.destroy(id);
        }
        self.base.graphic = None;
        self.tracker = None;
        self.markers = [None, None];
    }
}

impl ShapeOptions {
    /// Number of anchors configured on the shape itself.
    fn point_specs_len(&self) -> usize {
        match &self.points {
            Some(points) => points.len(),
            None => usize::from(self.point.is_some()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crisp_line_snaps_axis_aligned_segments() {
        let mut coords = [(10.2, 5.0), (10.2, 40.0)];
        crisp_line(&mut coords, 1.0);
        assert_eq!(coords, [(9.5, 5.0), (9.5, 40.0)]);

        let mut diagonal = [(1.2, 1.2), (5.7, 9.1)];
        crisp_line(&mut diagonal, 1.0);
        assert_eq!(diagonal, [(1.2, 1.2), (5.7, 9.1)]);
    }

    #[test]
    fn arrow_marker_points_away_from_the_line() {
        let d = Marker::Arrow.triangle((100.0, 0.0), (0.0, 0.0));
        assert_eq!(d[0], PathCommand::MoveTo(100.0, 0.0));
        for command in &d[1..3] {
            let (x, _) = command.point().unwrap();
            assert!(x < 100.0);
        }
    }

    #[test]
    fn reverse_arrow_points_back_along_the_line() {
        let [point, left, right] = reverse_arrow((100.0, 0.0), (0.0, 0.0));
        assert!(point.0 < 100.0);
        assert!((left.0 - 100.0).abs() < 1e-9);
        assert!((right.0 - 100.0).abs() < 1e-9);
        assert!((left.1 + right.1).abs() < 1e-9);
    }

    #[test]
    fn empty_points_are_rejected() {
        let options = ShapeOptions {
            points: Some(Vec::new()),
            ..ShapeOptions::of_type("path")
        };
        assert!(matches!(
            ControllablePath::new(options, 3),
            Err(AnnotationError::InvalidOption { .. })
        ));
    }
}
