//! Host chart state consumed by annotations: plot box, axes and series data.

use super::axis::{Axis, AxisKind, AxisOptions, AxisRef};
use crate::util::BBox;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single data point. Points with an id can be referenced by annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DataPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub x: f64,
    /// `None` for null points, which have no position
    #[serde(default)]
    pub y: Option<f64>,
}

impl DataPoint {
    pub fn new(id: Option<&str>, x: f64, y: f64) -> Self {
        Self {
            id: id.map(str::to_string),
            x,
            y: Some(y),
        }
    }
}

/// A data series bound to one x axis and one y axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default = "default_true")]
    pub visible: bool,

    /// Index of the x axis
    #[serde(default)]
    pub x_axis: usize,

    /// Index of the y axis
    #[serde(default)]
    pub y_axis: usize,

    #[serde(default)]
    pub data: Vec<DataPoint>,
}

fn default_true() -> bool {
    true
}

impl Series {
    pub fn new(name: &str, data: Vec<DataPoint>) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            visible: true,
            x_axis: 0,
            y_axis: 0,
            data,
        }
    }
}

/// Declarative description of the chart, as read from a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelSpec {
    #[serde(default = "default_plot_box")]
    pub plot_box: BBox,

    #[serde(default)]
    pub x_axis: Vec<AxisOptions>,

    #[serde(default)]
    pub y_axis: Vec<AxisOptions>,

    #[serde(default)]
    pub series: Vec<Series>,
}

fn default_plot_box() -> BBox {
    BBox::new(50.0, 20.0, 500.0, 300.0)
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            plot_box: default_plot_box(),
            x_axis: Vec::new(),
            y_axis: Vec::new(),
            series: Vec::new(),
        }
    }
}

/// A data point found by id, with the series it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct PointRef<'a> {
    pub series_index: usize,
    pub series: &'a Series,
    pub point: &'a DataPoint,
}

/// Live chart state: the plot box, laid-out axes and series.
#[derive(Debug, Clone)]
pub struct ChartModel {
    plot_box: BBox,
    x_axes: Vec<Axis>,
    y_axes: Vec<Axis>,
    series: Vec<Series>,
}

impl ChartModel {
    /// Creates a chart with one default x axis and one default y axis.
    pub fn new(plot_box: BBox) -> Self {
        Self::from_spec(ModelSpec {
            plot_box,
            ..Default::default()
        })
    }

    pub fn from_spec(spec: ModelSpec) -> Self {
        let axes = |kind, options: Vec<AxisOptions>| -> Vec<Axis> {
            let options = if options.is_empty() {
                vec![AxisOptions::default()]
            } else {
                options
            };
            options.into_iter().map(|o| Axis::new(kind, o)).collect()
        };
        let mut model = Self {
            plot_box: spec.plot_box,
            x_axes: axes(AxisKind::X, spec.x_axis),
            y_axes: axes(AxisKind::Y, spec.y_axis),
            series: spec.series,
        };
        model.layout_axes();
        model
    }

    pub fn plot_box(&self) -> BBox {
        self.plot_box
    }

    /// Moves/resizes the plot area and lays the axes out again.
    pub fn set_plot_box(&mut self, plot_box: BBox) {
        self.plot_box = plot_box;
        self.layout_axes();
    }

    fn layout_axes(&mut self) {
        for axis in &mut self.x_axes {
            axis.pos = self.plot_box.x;
            axis.len = self.plot_box.width;
        }
        for axis in &mut self.y_axes {
            axis.pos = self.plot_box.y;
            axis.len = self.plot_box.height;
        }
    }

    /// Adds an x axis and returns its index.
    pub fn add_x_axis(&mut self, options: AxisOptions) -> usize {
        self.x_axes.push(Axis::new(AxisKind::X, options));
        self.layout_axes();
        self.x_axes.len() - 1
    }

    /// Adds a y axis and returns its index.
    pub fn add_y_axis(&mut self, options: AxisOptions) -> usize {
        self.y_axes.push(Axis::new(AxisKind::Y, options));
        self.layout_axes();
        self.y_axes.len() - 1
    }

    pub fn x_axis(&self, reference: &AxisRef) -> Option<&Axis> {
        find_axis(&self.x_axes, reference)
    }

    pub fn y_axis(&self, reference: &AxisRef) -> Option<&Axis> {
        find_axis(&self.y_axes, reference)
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Adds a series and returns its index.
    pub fn add_series(&mut self, series: Series) -> usize {
        self.series.push(series);
        self.series.len() - 1
    }

    pub fn set_series_visible(&mut self, index: usize, visible: bool) {
        if let Some(series) = self.series.get_mut(index) {
            series.visible = visible;
        }
    }

    /// Looks up a data point by id across all series.
    pub fn point(&self, id: &str) -> Option<PointRef<'_>> {
        self.series
            .iter()
            .enumerate()
            .find_map(|(series_index, series)| {
                series
                    .data
                    .iter()
                    .find(|p| p.id.as_deref() == Some(id))
                    .map(|point| PointRef {
                        series_index,
                        series,
                        point,
                    })
            })
    }

    fn point_mut(&mut self, id: &str) -> Option<&mut DataPoint> {
        self.series
            .iter_mut()
            .flat_map(|series| series.data.iter_mut())
            .find(|p| p.id.as_deref() == Some(id))
    }

    /// Updates a point's values. Returns false if no point has that id.
    pub fn set_point_value(&mut self, id: &str, x: f64, y: Option<f64>) -> bool {
        match self.point_mut(id) {
            Some(point) => {
                point.x = x;
                point.y = y;
                true
            }
            None => false,
        }
    }

    /// Removes a point by id. Returns false if no point has that id.
    pub fn remove_point(&mut self, id: &str) -> bool {
        for series in &mut self.series {
            if let Some(index) = series.data.iter().position(|p| p.id.as_deref() == Some(id)) {
                series.data.remove(index);
                return true;
            }
        }
        false
    }

    /// Returns true if a plot-relative position lies inside the plot area.
    pub fn is_inside_plot(&self, plot_x: f64, plot_y: f64) -> bool {
        plot_x >= 0.0
            && plot_x <= self.plot_box.width
            && plot_y >= 0.0
            && plot_y <= self.plot_box.height
    }
}

fn find_axis<'a>(axes: &'a [Axis], reference: &AxisRef) -> Option<&'a Axis> {
    match reference {
        AxisRef::Index(index) => axes.get(*index),
        AxisRef::Id(id) => axes.iter().find(|axis| axis.id() == Some(id.as_str())),
    }
}
