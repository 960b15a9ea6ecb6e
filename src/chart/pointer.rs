use super::Chart;
use crate::annotation::{
    AnnotationEvent, AnnotationKey, AnnotationTarget, ChartContext, ControlPointOwner,
};
use crate::draw::{GraphicId, Renderer};
use log::debug;

/// Pointer gesture in progress over the annotation layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No button held over an annotation
    #[default]
    Idle,
    /// Dragging a whole annotation by one of its items
    Annotation {
        key: AnnotationKey,
        last_x: f64,
        last_y: f64,
        moved: bool,
    },
    /// Dragging one control point
    ControlPoint {
        key: AnnotationKey,
        owner: ControlPointOwner,
        index: usize,
        last_x: f64,
        last_y: f64,
        moved: bool,
    },
}

impl DragState {
    /// Annotation being dragged, if any.
    pub fn key(&self) -> Option<AnnotationKey> {
        match *self {
            DragState::Idle => None,
            DragState::Annotation { key, .. } | DragState::ControlPoint { key, .. } => Some(key),
        }
    }

    fn mark_moved(&mut self) {
        match self {
            DragState::Idle => {}
            DragState::Annotation { moved, .. } | DragState::ControlPoint { moved, .. } => {
                *moved = true
            }
        }
    }

    fn moved(&self) -> bool {
        match *self {
            DragState::Idle => false,
            DragState::Annotation { moved, .. } | DragState::ControlPoint { moved, .. } => moved,
        }
    }
}

impl<R: Renderer> Chart<R> {
    /// Processes a pointer press on a graphic.
    ///
    /// # Arguments
    /// * `target` - Graphic the host hit-tested under the pointer
    /// * `x` - Pointer X coordinate in chart pixels
    /// * `y` - Pointer Y coordinate in chart pixels
    ///
    /// # Behavior
    /// - On a visible control point: starts dragging that handle
    /// - On any other graphic of an annotation item: starts dragging the annotation
    /// - Anywhere else: nothing, returns false
    pub fn pointer_down(&mut self, target: GraphicId, x: f64, y: f64) -> bool {
        // Later annotations are drawn on top
        let hit = self
            .annotations
            .iter()
            .rev()
            .find_map(|a| a.target_of(target).map(|t| (a.key(), t)));
        let Some((key, target)) = hit else {
            return false;
        };

        self.drag = match target {
            AnnotationTarget::Item(..) => DragState::Annotation {
                key,
                last_x: x,
                last_y: y,
                moved: false,
            },
            AnnotationTarget::ControlPoint(owner, index) => DragState::ControlPoint {
                key,
                owner,
                index,
                last_x: x,
                last_y: y,
                moved: false,
            },
        };
        debug!("Pointer down on {:?}", self.drag);
        true
    }

    /// Processes pointer motion.
    ///
    /// # Arguments
    /// * `x` - Current pointer X coordinate in chart pixels
    /// * `y` - Current pointer Y coordinate in chart pixels
    ///
    /// # Behavior
    /// While dragging, the delta from the previous position is applied and
    /// the annotation redrawn, but only while the pointer is inside the plot
    /// box. The previous position is updated either way. Returns true when
    /// something moved.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let inside = self.model.plot_box().contains(x, y);

        let (last_x, last_y) = match &mut self.drag {
            DragState::Idle => return false,
            DragState::Annotation { last_x, last_y, .. }
            | DragState::ControlPoint { last_x, last_y, .. } => {
                let previous = (*last_x, *last_y);
                (*last_x, *last_y) = (x, y);
                previous
            }
        };
        let (dx, dy) = (x - last_x, y - last_y);
        if !inside || (dx == 0.0 && dy == 0.0) {
            return false;
        }

        let Some(key) = self.drag.key() else {
            return false;
        };
        let Some(annotation) = self.annotations.iter_mut().find(|a| a.key() == key) else {
            return false;
        };

        let event = match self.drag {
            DragState::Idle => return false,
            DragState::Annotation { .. } => {
                let (dx, dy) = annotation.translate(&self.model, dx, dy);
                if dx == 0.0 && dy == 0.0 {
                    return false;
                }
                AnnotationEvent::Drag { key, dx, dy }
            }
            DragState::ControlPoint { owner, index, .. } => {
                if !annotation.drag_control_point(&self.model, owner, index, dx, dy) {
                    return false;
                }
                AnnotationEvent::ControlPointDrag {
                    key,
                    owner,
                    index,
                    dx,
                    dy,
                }
            }
        };

        annotation.redraw(&mut context!(self), false);
        self.drag.mark_moved();
        self.events.push(event);
        true
    }

    /// Processes a pointer release.
    ///
    /// Applies the final position, then ends the gesture: a gesture that
    /// moved something emits `DragEnd`, a press on an item that did not
    /// move emits `Click`.
    pub fn pointer_up(&mut self, x: f64, y: f64) {
        self.pointer_move(x, y);
        let state = std::mem::take(&mut self.drag);
        let Some(key) = state.key() else {
            return;
        };
        if state.moved() {
            self.events.push(AnnotationEvent::DragEnd { key });
        } else if let DragState::Annotation { .. } = state {
            let id = self
                .annotation_by_key(key)
                .and_then(|a| a.id().map(str::to_string));
            self.events.push(AnnotationEvent::Click { key, id });
        }
    }

    /// Abandons the gesture. Moves already applied stay applied.
    pub fn pointer_cancel(&mut self) {
        let state = std::mem::take(&mut self.drag);
        if let Some(key) = state.key().filter(|_| state.moved()) {
            self.events.push(AnnotationEvent::DragEnd { key });
        }
    }
}
