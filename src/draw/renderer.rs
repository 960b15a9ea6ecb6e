//! Rendering seam used by annotations.
//!
//! Annotations never draw pixels themselves; they create retained graphics
//! through a [`Renderer`] and keep only the returned [`GraphicId`]s.

use super::primitive::{Attrs, GraphicId, Primitive};
use crate::util::BBox;

/// Retained-mode rendering engine consumed by the annotation layer.
pub trait Renderer {
    /// Creates a graphic under `parent` (or at the root when `None`).
    fn create(&mut self, primitive: Primitive, parent: Option<GraphicId>) -> GraphicId;

    /// Applies attributes to an existing graphic. Unknown ids are ignored.
    fn attr(&mut self, id: GraphicId, attrs: &Attrs);

    /// Applies attributes with a transition. Engines without animation just set them.
    fn animate(&mut self, id: GraphicId, attrs: &Attrs) {
        self.attr(id, attrs);
    }

    /// Clips a graphic (and its children) to a clip rect, or removes the clip.
    fn clip(&mut self, id: GraphicId, clip: Option<GraphicId>);

    /// Layout box of a graphic in chart pixels, if it exists and has a size.
    fn bbox(&self, id: GraphicId) -> Option<BBox>;

    /// Destroys a graphic and its children. Unknown ids are ignored.
    fn destroy(&mut self, id: GraphicId);

    /// Returns true while the graphic has not been destroyed.
    fn exists(&self, id: GraphicId) -> bool;

    /// Creates a group node.
    fn group(&mut self, name: &str, parent: Option<GraphicId>) -> GraphicId {
        self.create(Primitive::group(name), parent)
    }

    /// Creates a clip rect covering `bbox`.
    fn clip_rect(&mut self, bbox: BBox) -> GraphicId {
        let id = self.create(Primitive::ClipRect, None);
        self.attr(id, &Attrs::bounds(bbox));
        id
    }
}
