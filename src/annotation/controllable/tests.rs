use super::*;
use crate::annotation::options::LabelOptions;
use crate::chart::{DataPoint, Series};
use crate::draw::{PathCommand, Scene};
use crate::util::BBox;

/// Plot 200x100 at (10, 20), axes 0..100; point `a` sits at chart (110, 70).
fn model() -> ChartModel {
    let mut model = ChartModel::new(BBox::new(10.0, 20.0, 200.0, 100.0));
    model.add_series(Series::new(
        "S",
        vec![
            DataPoint::new(Some("a"), 50.0, 50.0),
            DataPoint::new(Some("b"), 75.0, 25.0),
        ],
    ));
    model
}

struct Harness {
    model: ChartModel,
    scene: Scene,
    parent: GraphicId,
    control_group: GraphicId,
}

impl Harness {
    fn new() -> Self {
        let mut scene = Scene::new();
        let parent = scene.group("annotation-shapes", None);
        let control_group = scene.group("control-points", None);
        Self {
            model: model(),
            scene,
            parent,
            control_group,
        }
    }

    /// One redraw cycle of an item: link, render once, redraw.
    fn draw<C: Controllable + ?Sized>(&mut self, item: &mut C) -> bool {
        if !item.link_points(&self.model, None) || !item.should_be_drawn() {
            return false;
        }
        if item.base().graphic.is_none() {
            item.add_control_points();
            item.render(&mut self.scene, self.parent, self.control_group);
        }
        item.redraw(&self.model, &mut self.scene, false);
        true
    }

    fn attrs(&self, id: Option<GraphicId>) -> &Attrs {
        self.scene.attrs(id.unwrap()).unwrap()
    }
}

fn shape(shape_type: &str, point: PointSpec) -> ShapeOptions {
    ShapeOptions {
        point: Some(point),
        ..ShapeOptions::of_type(shape_type)
    }
}

#[test]
fn registry_rejects_missing_and_unknown_types() {
    let registry = ShapeRegistry::default();
    assert!(matches!(
        registry.create(ShapeOptions::default(), 2),
        Err(AnnotationError::MissingShapeType(2))
    ));
    assert!(matches!(
        registry.create(ShapeOptions::of_type("star"), 0),
        Err(AnnotationError::UnknownShapeType(name)) if name == "star"
    ));
    assert!(matches!(
        registry.create(ShapeOptions::of_type("image"), 0),
        Err(AnnotationError::InvalidOption { .. })
    ));
    assert!(matches!(
        registry.create(
            ShapeOptions {
                width: Some(-1.0),
                ..ShapeOptions::of_type("rect")
            },
            0
        ),
        Err(AnnotationError::InvalidOption { .. })
    ));
}

#[test]
fn registry_accepts_custom_types() {
    let mut registry = ShapeRegistry::default();
    registry.register("box", ControllableRect::boxed);
    assert!(registry.contains("box"));
    let item = registry.create(ShapeOptions::of_type("box"), 0).unwrap();
    assert_eq!(item.type_name(), "rect");
}

#[test]
fn rect_tracks_sub_pixel_point_moves() {
    let mut h = Harness::new();
    let mut rect = ControllableRect::new(
        ShapeOptions {
            width: Some(10.0),
            height: Some(10.0),
            ..shape("rect", PointSpec::id("a"))
        },
        0,
    )
    .unwrap();

    h.model.set_point_value("a", 50.3, Some(50.0));
    assert!(h.draw(&mut rect));
    let x0 = h.attrs(rect.base().graphic).x.unwrap();

    h.model.set_point_value("a", 50.5, Some(50.0));
    assert!(h.draw(&mut rect));
    let x1 = h.attrs(rect.base().graphic).x.unwrap();
    assert!((x1 - x0 - 0.4).abs() < 1e-9, "moved {}", x1 - x0);

    // Dragging the anchor handle adds exactly the pointer delta
    rect.drag_control_point(&h.model, 0, 0.3, 0.0);
    let coords = rect.options().point.as_ref().and_then(PointSpec::as_coords).unwrap();
    assert!((coords.x - 50.65).abs() < 1e-9);
    assert!((coords.y - 50.0).abs() < 1e-9);
}

#[test]
fn rect_follows_its_anchor_with_offsets() {
    let mut h = Harness::new();
    let mut rect = ControllableRect::new(
        ShapeOptions {
            x: Some(-5.0),
            y: Some(-5.0),
            width: Some(10.0),
            height: Some(20.0),
            ..shape("rect", PointSpec::id("a"))
        },
        0,
    )
    .unwrap();
    assert!(h.draw(&mut rect));

    let attrs = h.attrs(rect.base().graphic);
    assert_eq!((attrs.x, attrs.y), (Some(105.0), Some(65.0)));
    assert_eq!((attrs.width, attrs.height), (Some(10.0), Some(20.0)));
    assert_eq!(rect.control_point_position(&h.model, 1), Some((115.0, 85.0)));
}

#[test]
fn unresolved_anchor_is_not_drawn() {
    let mut h = Harness::new();
    let mut rect = ControllableRect::new(shape("rect", PointSpec::id("missing")), 0).unwrap();
    assert!(!h.draw(&mut rect));
    assert!(rect.base().graphic.is_none());
    assert!(rect.base().points.is_empty());
}

#[test]
fn one_failed_anchor_unlinks_the_whole_path() {
    let mut h = Harness::new();
    let mut path = ControllablePath::new(
        ShapeOptions {
            points: Some(vec![PointSpec::id("a"), PointSpec::id("gone")]),
            ..ShapeOptions::of_type("path")
        },
        0,
    )
    .unwrap();
    assert!(!path.link_points(&h.model, None));
    assert!(path.base().points.is_empty());
    assert!(!h.draw(&mut path));
}

#[test]
fn rect_resize_handle_never_goes_negative() {
    let mut h = Harness::new();
    let mut rect = ControllableRect::new(
        ShapeOptions {
            width: Some(10.0),
            height: Some(10.0),
            ..shape("rect", PointSpec::pixel(20.0, 20.0))
        },
        0,
    )
    .unwrap();
    h.draw(&mut rect);
    rect.drag_control_point(&h.model, 1, 5.0, -30.0);
    assert_eq!(rect.options().width, Some(15.0));
    assert_eq!(rect.options().height, Some(0.0));
}

#[test]
fn circle_radius_handle_has_a_minimum() {
    let mut h = Harness::new();
    let mut circle = ControllableCircle::new(
        ShapeOptions {
            r: Some(8.0),
            ..shape("circle", PointSpec::id("a"))
        },
        0,
    )
    .unwrap();
    h.draw(&mut circle);
    assert_eq!(circle.control_point_position(&h.model, 1), Some((118.0, 70.0)));

    circle.drag_control_point(&h.model, 1, 4.0, 0.0);
    assert_eq!(circle.options().r, Some(12.0));
    circle.drag_control_point(&h.model, 1, -50.0, 0.0);
    assert_eq!(circle.options().r, Some(1.0));
}

#[test]
fn moving_the_anchor_writes_back_a_literal_point() {
    let mut h = Harness::new();
    let mut circle = ControllableCircle::new(shape("circle", PointSpec::pixel(20.0, 30.0)), 0).unwrap();
    h.draw(&mut circle);
    circle.drag_control_point(&h.model, 0, 7.0, -3.0);
    assert_eq!(circle.options().point, Some(PointSpec::pixel(27.0, 27.0)));

    h.draw(&mut circle);
    let attrs = h.attrs(circle.base().graphic);
    assert_eq!((attrs.x, attrs.y), (Some(37.0), Some(47.0)));
}

#[test]
fn path_draws_through_its_vertices() {
    let mut h = Harness::new();
    let mut path = ControllablePath::new(
        ShapeOptions {
            points: Some(vec![PointSpec::id("a"), PointSpec::id("b")]),
            marker_end: Some("arrow".into()),
            ..ShapeOptions::of_type("path")
        },
        0,
    )
    .unwrap();
    assert!(h.draw(&mut path));

    let d = h.attrs(path.base().graphic).d.clone().unwrap();
    assert_eq!(
        d,
        vec![PathCommand::MoveTo(110.0, 70.0), PathCommand::LineTo(160.0, 95.0)]
    );
    assert_eq!(path.base().control_points.len(), 2);
    // line, tracker and end marker
    assert_eq!(path.graphics().len(), 3);
    let marker = path.graphics()[2];
    assert!(h.scene.attrs(marker).unwrap().is_visible());
}

#[test]
fn path_markers_are_parsed_once_at_render() {
    let mut h = Harness::new();
    let mut path = ControllablePath::new(
        ShapeOptions {
            points: Some(vec![PointSpec::id("a"), PointSpec::id("b")]),
            marker_start: Some("feather".into()),
            marker_end: Some("arrow".into()),
            ..ShapeOptions::of_type("path")
        },
        0,
    )
    .unwrap();
    assert_eq!(path.markers(), [None, None]);
    assert!(h.draw(&mut path));
    assert_eq!(path.markers(), [None, Some(Marker::Arrow)]);
    // the unknown start marker gets no graphic
    assert_eq!(path.graphics().len(), 3);

    let marker = path.graphics()[2];
    let first = h.scene.attrs(marker).unwrap().d.clone();
    assert!(h.model.set_point_value("b", 80.0, Some(25.0)));
    assert!(h.draw(&mut path));
    let second = h.scene.attrs(marker).unwrap().d.clone();
    assert!(second.is_some());
    assert_ne!(first, second);
}

/// Plot-relative pixel anchors of a shape, in order.
fn pixel_points(options: &ShapeOptions) -> Vec<(f64, f64)> {
    options
        .point_specs()
        .iter()
        .map(|spec| {
            let coords = spec.as_coords().unwrap();
            (coords.x, coords.y)
        })
        .collect()
}

fn assert_near(actual: (f64, f64), expected: (f64, f64)) {
    assert!(
        (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
        "{actual:?} != {expected:?}"
    );
}

#[test]
fn rotate_turns_every_anchor_around_the_centre() {
    let mut h = Harness::new();
    let mut path = ControllablePath::new(
        ShapeOptions {
            points: Some(vec![PointSpec::pixel(20.0, 40.0), PointSpec::pixel(60.0, 40.0)]),
            ..ShapeOptions::of_type("path")
        },
        0,
    )
    .unwrap();
    assert!(h.draw(&mut path));

    path.rotate(&h.model, 40.0, 40.0, std::f64::consts::FRAC_PI_2);
    let points = pixel_points(path.options());
    assert_near(points[0], (40.0, 20.0));
    assert_near(points[1], (40.0, 60.0));
}

#[test]
fn scale_stretches_anchors_from_the_centre() {
    let mut h = Harness::new();
    let mut path = ControllablePath::new(
        ShapeOptions {
            points: Some(vec![PointSpec::pixel(20.0, 40.0), PointSpec::pixel(60.0, 80.0)]),
            ..ShapeOptions::of_type("path")
        },
        0,
    )
    .unwrap();
    assert!(h.draw(&mut path));

    path.scale(&h.model, 40.0, 60.0, 2.0, 0.5);
    let points = pixel_points(path.options());
    assert_near(points[0], (0.0, 50.0));
    assert_near(points[1], (80.0, 70.0));

    path.redraw(&h.model, &mut h.scene, false);
    let d = h.attrs(path.base().graphic).d.clone().unwrap();
    assert_eq!(d[0], PathCommand::MoveTo(10.0, 70.0));
}

#[test]
fn path_is_hidden_with_its_series() {
    let mut h = Harness::new();
    let mut path = ControllablePath::new(
        ShapeOptions {
            points: Some(vec![PointSpec::id("a"), PointSpec::pixel(0.0, 0.0)]),
            ..ShapeOptions::of_type("path")
        },
        0,
    )
    .unwrap();
    h.draw(&mut path);
    assert!(h.attrs(path.base().graphic).is_visible());

    h.model.set_series_visible(0, false);
    h.draw(&mut path);
    assert!(!h.attrs(path.base().graphic).is_visible());
    assert!(!path.base().placed);
}

#[test]
fn path_tracker_is_wider_than_the_line() {
    let mut h = Harness::new();
    let mut path = ControllablePath::new(
        ShapeOptions {
            stroke_width: Some(2.0),
            snap: Some(3.0),
            points: Some(vec![PointSpec::pixel(0.0, 0.0), PointSpec::pixel(50.0, 50.0)]),
            ..ShapeOptions::of_type("path")
        },
        0,
    )
    .unwrap();
    h.draw(&mut path);
    let tracker = path.graphics()[1];
    assert_eq!(h.scene.attrs(tracker).unwrap().stroke_width, Some(8.0));
}

#[test]
fn label_is_centred_above_its_anchor() {
    let mut h = Harness::new();
    let mut label = ControllableLabel::new(
        LabelOptions {
            text: Some("Hello".into()),
            padding: Some(5.0),
            point: Some(PointSpec::id("a")),
            ..Default::default()
        },
        0,
    );
    assert!(h.draw(&mut label));

    // 40x23 box: 5 chars at 11px plus padding
    let attrs = h.attrs(label.base().graphic);
    assert_eq!((attrs.x, attrs.y), (Some(90.0), Some(31.0)));
    assert_eq!((attrs.anchor_x, attrs.anchor_y), (Some(110.0), Some(70.0)));
    assert_eq!(attrs.text.as_deref(), Some("Hello"));
}

#[test]
fn label_text_precedence() {
    let h = Harness::new();
    let mut label = ControllableLabel::new(
        LabelOptions {
            point: Some(PointSpec::id("b")),
            ..Default::default()
        },
        0,
    );
    label.link_points(&h.model, None);
    assert_eq!(label.text(), "25");

    label.options_mut().formatter = Some(crate::annotation::options::LabelFormatter::new(|ctx| {
        format!("f:{}", ctx.series_name.clone().unwrap_or_default())
    }));
    assert_eq!(label.text(), "f:S");

    label.options_mut().format = Some("{x}".into());
    assert_eq!(label.text(), "75");

    label.options_mut().text = Some("fixed".into());
    assert_eq!(label.text(), "fixed");

    let mut pixel = ControllableLabel::new(
        LabelOptions {
            point: Some(PointSpec::pixel(5.0, 5.0)),
            ..Default::default()
        },
        0,
    );
    pixel.link_points(&h.model, None);
    assert_eq!(pixel.text(), "Annotation label");
}

#[test]
fn label_outside_the_pane_is_hidden() {
    let mut h = Harness::new();
    let mut label = ControllableLabel::new(
        LabelOptions {
            point: Some(PointSpec::on_axes(150.0, 50.0, 0, 0)),
            ..Default::default()
        },
        0,
    );
    assert!(h.draw(&mut label));
    assert!(!h.attrs(label.base().graphic).is_visible());
    assert_eq!(label.control_point_position(&h.model, 0), None);
}

#[test]
fn items_inherit_the_annotation_point() {
    let h = Harness::new();
    let mut label = ControllableLabel::new(LabelOptions::default(), 0);
    let inherited = PointSpec::id("a");
    assert!(label.link_points(&h.model, Some(&inherited)));
    assert_eq!(label.base().points.len(), 1);
    assert!(label.options().point.is_none());
}

#[test]
fn destroy_releases_every_graphic_and_is_idempotent() {
    let mut h = Harness::new();
    let mut path = ControllablePath::new(
        ShapeOptions {
            points: Some(vec![PointSpec::id("a"), PointSpec::id("b")]),
            marker_start: Some("reverse-arrow".into()),
            control_point_options: Some(ControlPointOptions {
                visible: Some(true),
                ..Default::default()
            }),
            ..ShapeOptions::of_type("path")
        },
        0,
    )
    .unwrap();
    h.draw(&mut path);
    let before = h.scene.len();
    let owned = path.graphics().len() + path.base().control_points.len();

    path.destroy(&mut h.scene);
    path.destroy(&mut h.scene);
    assert_eq!(h.scene.len(), before - owned);
    assert!(path.graphics().is_empty());
    assert!(path.base().control_points.iter().all(|cp| cp.graphic().is_none()));
}

#[test]
fn image_uses_top_left_placement() {
    let mut h = Harness::new();
    let mut image = ControllableImage::new(
        ShapeOptions {
            src: Some("logo.png".into()),
            width: Some(30.0),
            height: Some(10.0),
            ..shape("image", PointSpec::id("a"))
        },
        0,
    )
    .unwrap();
    h.draw(&mut image);
    let attrs = h.attrs(image.base().graphic);
    assert_eq!((attrs.x, attrs.y), (Some(110.0), Some(70.0)));
}
