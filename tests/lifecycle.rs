use chart_annotations::annotation::{
    AnnotationError, AnnotationEvent, AnnotationOptions, Controllable, ControllableRect,
    ControlPointOwner, LabelOptions, PointSpec, ShapeOptions,
};
use chart_annotations::chart::{Chart, ChartModel, DataPoint, DragState, Series};
use chart_annotations::draw::{GraphicId, Scene};
use chart_annotations::util::BBox;

/// Plot box (10, 20, 200, 100) with 0..100 axes: point `a` (50, 50) sits at
/// chart pixel (110, 70).
fn model() -> ChartModel {
    let mut model = ChartModel::new(BBox::new(10.0, 20.0, 200.0, 100.0));
    model.add_series(Series::new(
        "Sales",
        vec![
            DataPoint::new(Some("a"), 50.0, 50.0),
            DataPoint::new(Some("b"), 75.0, 25.0),
        ],
    ));
    model
}

fn note() -> AnnotationOptions {
    AnnotationOptions {
        id: Some("note".to_string()),
        labels: Some(vec![LabelOptions {
            point: Some(PointSpec::id("a")),
            text: Some("Peak".to_string()),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

fn chart() -> Chart<Scene> {
    Chart::new(model(), Scene::new(), vec![note()])
}

fn label_graphic(chart: &Chart<Scene>) -> GraphicId {
    chart.annotations()[0].labels()[0].graphics()[0]
}

fn label_attr(chart: &Chart<Scene>, f: impl Fn(&chart_annotations::draw::Attrs) -> Option<f64>) -> f64 {
    let attrs = chart.renderer().attrs(label_graphic(chart)).unwrap();
    f(attrs).unwrap()
}

#[test]
fn label_is_anchored_to_its_point() {
    let chart = chart();
    assert_eq!(label_attr(&chart, |a| a.anchor_x), 110.0);
    assert_eq!(label_attr(&chart, |a| a.anchor_y), 70.0);
    assert!(chart.renderer().is_visible(label_graphic(&chart)));
}

#[test]
fn dragging_a_label_moves_it_and_reports_events() {
    let mut chart = chart();
    let key = chart.annotations()[0].key();
    let x_before = label_attr(&chart, |a| a.x);

    assert!(chart.pointer_down(label_graphic(&chart), 110.0, 60.0));
    assert!(chart.pointer_move(130.0, 60.0));
    chart.pointer_up(130.0, 60.0);

    assert_eq!(label_attr(&chart, |a| a.x), x_before + 20.0);
    assert_eq!(label_attr(&chart, |a| a.anchor_x), 130.0);
    assert_eq!(chart.drag_state(), DragState::Idle);
    assert_eq!(
        chart.drain_events(),
        vec![
            AnnotationEvent::Drag {
                key,
                dx: 20.0,
                dy: 0.0
            },
            AnnotationEvent::DragEnd { key },
        ]
    );
}

#[test]
fn drag_is_written_back_to_the_options() {
    let mut chart = chart();
    chart.pointer_down(label_graphic(&chart), 110.0, 60.0);
    chart.pointer_up(130.0, 60.0);

    let options = chart.annotation_options();
    let label = &options[0].labels.as_ref().unwrap()[0];
    let coords = label.point.as_ref().and_then(PointSpec::as_coords).unwrap();
    assert_eq!(coords.x, 60.0);
    assert_eq!(coords.y, 50.0);
}

#[test]
fn moves_outside_the_plot_are_ignored() {
    let mut chart = chart();
    let key = chart.annotations()[0].key();
    let x_before = label_attr(&chart, |a| a.x);

    chart.pointer_down(label_graphic(&chart), 110.0, 60.0);
    assert!(!chart.pointer_move(500.0, 60.0));
    chart.pointer_up(500.0, 60.0);

    assert_eq!(label_attr(&chart, |a| a.x), x_before);
    assert_eq!(
        chart.drain_events(),
        vec![AnnotationEvent::Click {
            key,
            id: Some("note".to_string())
        }]
    );
}

#[test]
fn press_outside_annotations_is_not_consumed() {
    let mut chart = chart();
    assert!(!chart.pointer_down(GraphicId(9999), 50.0, 50.0));
    assert!(!chart.pointer_move(60.0, 60.0));
    assert_eq!(chart.drag_state(), DragState::Idle);
    assert!(chart.drain_events().is_empty());
}

#[test]
fn cancel_after_moving_ends_the_drag() {
    let mut chart = chart();
    let key = chart.annotations()[0].key();
    chart.pointer_down(label_graphic(&chart), 110.0, 60.0);
    chart.pointer_move(120.0, 60.0);
    chart.pointer_cancel();

    let events = chart.drain_events();
    assert_eq!(events.last(), Some(&AnnotationEvent::DragEnd { key }));
    assert_eq!(chart.drag_state(), DragState::Idle);
}

#[test]
fn control_point_drag_moves_inherited_anchor() {
    let mut chart = Chart::new(
        model(),
        Scene::new(),
        vec![AnnotationOptions {
            id: Some("note".to_string()),
            point: Some(PointSpec::id("a")),
            labels: Some(vec![LabelOptions {
                text: Some("Peak".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        }],
    );
    assert!(chart.set_control_points_visibility("note", true));
    let handle = chart.annotations()[0].control_points()[0].graphic().unwrap();

    assert!(chart.pointer_down(handle, 110.0, 70.0));
    assert!(chart.pointer_move(110.0, 50.0));
    chart.pointer_up(110.0, 50.0);

    assert_eq!(label_attr(&chart, |a| a.anchor_y), 50.0);
    let events = chart.drain_events();
    assert!(matches!(
        events[0],
        AnnotationEvent::ControlPointDrag {
            owner: ControlPointOwner::Annotation,
            index: 0,
            dy,
            ..
        } if dy == -20.0
    ));
}

#[test]
fn labels_follow_data_changes() {
    let mut chart = chart();
    chart.model_mut().set_point_value("a", 50.0, Some(75.0));
    chart.redraw();
    assert_eq!(label_attr(&chart, |a| a.anchor_y), 45.0);
    assert!(chart.renderer().animation_count() > 0);
}

#[test]
fn hidden_series_hides_its_labels() {
    let mut chart = chart();
    chart.model_mut().set_series_visible(0, false);
    chart.redraw();
    let label = chart.annotations()[0].labels()[0].graphics();
    assert!(label.iter().all(|id| !chart.renderer().is_visible(*id)));
}

#[test]
fn update_rebuilds_with_merged_options() {
    let mut chart = chart();
    let partial = AnnotationOptions {
        labels: Some(vec![LabelOptions {
            point: Some(PointSpec::id("b")),
            text: Some("Trough".to_string()),
            ..Default::default()
        }]),
        ..Default::default()
    };
    assert!(chart.update_annotation("note", &partial).unwrap());

    let annotation = chart.annotation("note").unwrap();
    assert_eq!(annotation.labels()[0].text(), "Trough");
    assert_eq!(label_attr(&chart, |a| a.anchor_x), 160.0);
    assert_eq!(label_attr(&chart, |a| a.anchor_y), 95.0);
    // Arrays are replaced, not merged per entry
    assert_eq!(chart.annotation_options()[0].labels.as_ref().map(Vec::len), Some(1));
}

#[test]
fn registered_shape_types_are_available_to_new_annotations() {
    let mut chart = chart();
    let boxed = AnnotationOptions {
        id: Some("box".to_string()),
        shapes: Some(vec![ShapeOptions {
            point: Some(PointSpec::id("b")),
            width: Some(8.0),
            height: Some(8.0),
            ..ShapeOptions::of_type("box")
        }]),
        ..Default::default()
    };
    assert!(matches!(
        chart.add_annotation(boxed.clone(), true),
        Err(AnnotationError::UnknownShapeType(ref name)) if name == "box"
    ));
    assert_eq!(chart.renderer().groups_named("annotation").len(), 1);

    chart.register_shape_type("box", ControllableRect::boxed);
    chart.add_annotation(boxed, true).unwrap();
    let shape = &chart.annotation("box").unwrap().shapes()[0];
    assert_eq!(shape.type_name(), "rect");
    let attrs = chart.renderer().attrs(shape.graphics()[0]).unwrap();
    assert_eq!((attrs.x, attrs.y), (Some(160.0), Some(95.0)));
    assert_eq!(chart.renderer().groups_named("annotation").len(), 2);
}

#[test]
fn hide_and_remove_emit_events() {
    let mut chart = chart();
    let key = chart.annotations()[0].key();

    assert_eq!(chart.set_annotation_visibility("note", None), Some(false));
    assert!(chart.remove_annotation("note"));
    assert!(chart.annotations().is_empty());
    assert_eq!(chart.label_collector_count(), 0);
    assert_eq!(
        chart.drain_events(),
        vec![
            AnnotationEvent::VisibilityChanged {
                key,
                visible: false
            },
            AnnotationEvent::Remove {
                key,
                id: Some("note".to_string())
            },
        ]
    );
}

#[test]
fn destroy_leaves_an_empty_scene() {
    let chart = Chart::new(model(), Scene::new(), vec![note(), note()]);
    assert!(chart.destroy().is_empty());
}
