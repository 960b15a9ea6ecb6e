//! In-memory retained renderer.
//!
//! [`Scene`] keeps every graphic as a node with its accumulated attributes.
//! It backs the CLI and the tests, and can be painted with the Cairo
//! backend when the `cairo` feature is enabled.

use super::primitive::{Attrs, GraphicId, Primitive};
use super::renderer::Renderer;
use crate::util::BBox;
use serde::Serialize;
use std::collections::BTreeMap;

/// Default label font size in pixels when no style is applied.
pub const DEFAULT_FONT_SIZE: f64 = 11.0;
/// Approximate glyph advance as a fraction of the font size.
const CHAR_WIDTH_RATIO: f64 = 0.55;
/// Line height as a fraction of the font size.
const LINE_HEIGHT_RATIO: f64 = 1.2;

#[derive(Debug, Clone)]
struct Node {
    primitive: Primitive,
    parent: Option<GraphicId>,
    children: Vec<GraphicId>,
    attrs: Attrs,
    clip: Option<GraphicId>,
}

/// Retained scene graph implementing [`Renderer`].
#[derive(Debug, Default)]
pub struct Scene {
    nodes: BTreeMap<GraphicId, Node>,
    roots: Vec<GraphicId>,
    next_id: u64,
    created: usize,
    animations: usize,
}

/// Serializable view of a node and its subtree.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub id: GraphicId,
    #[serde(flatten)]
    pub primitive: Primitive,
    pub attrs: Attrs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<GraphicId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live graphics.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total graphics created over the scene's lifetime.
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Number of animated attribute updates received.
    pub fn animation_count(&self) -> usize {
        self.animations
    }

    pub fn attrs(&self, id: GraphicId) -> Option<&Attrs> {
        self.nodes.get(&id).map(|node| &node.attrs)
    }

    pub fn primitive(&self, id: GraphicId) -> Option<&Primitive> {
        self.nodes.get(&id).map(|node| &node.primitive)
    }

    pub fn parent(&self, id: GraphicId) -> Option<GraphicId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: GraphicId) -> &[GraphicId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn clip_of(&self, id: GraphicId) -> Option<GraphicId> {
        self.nodes.get(&id).and_then(|node| node.clip)
    }

    /// Ids of all live graphics matching `predicate`, in creation order.
    pub fn find(&self, predicate: impl Fn(&Primitive) -> bool) -> Vec<GraphicId> {
        self.nodes
            .iter()
            .filter(|(_, node)| predicate(&node.primitive))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Ids of all groups with the given name.
    pub fn groups_named(&self, name: &str) -> Vec<GraphicId> {
        self.find(|p| matches!(p, Primitive::Group { name: n } if n == name))
    }

    /// Returns true if the graphic and all its ancestors are visible.
    pub fn is_visible(&self, id: GraphicId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(&node_id) else {
                return false;
            };
            if !node.attrs.is_visible() {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Graphics in paint order: parents before children, siblings by z-index
    /// then creation order.
    pub fn paint_order(&self) -> Vec<GraphicId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        self.push_sorted(&self.roots, &mut order);
        order
    }

    fn push_sorted(&self, ids: &[GraphicId], order: &mut Vec<GraphicId>) {
        let mut sorted: Vec<GraphicId> = ids.to_vec();
        sorted.sort_by_key(|id| {
            let z = self
                .nodes
                .get(id)
                .and_then(|node| node.attrs.z_index)
                .unwrap_or(0);
            (z, *id)
        });
        for id in sorted {
            order.push(id);
            self.push_sorted(self.children(id), order);
        }
    }

    /// Effective clip box for a graphic, from the nearest clipped ancestor.
    pub fn effective_clip(&self, id: GraphicId) -> Option<BBox> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(&node_id)?;
            if let Some(clip) = node.clip {
                return self.bbox(clip);
            }
            current = node.parent;
        }
        None
    }

    /// Topmost visible, non-container graphic under the given chart position.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<GraphicId> {
        self.paint_order().into_iter().rev().find(|&id| {
            let Some(node) = self.nodes.get(&id) else {
                return false;
            };
            if node.primitive.is_container() || !self.is_visible(id) {
                return false;
            }
            let inside_clip = self
                .effective_clip(id)
                .is_none_or(|clip| clip.contains(x, y));
            inside_clip && self.bbox(id).is_some_and(|bbox| bbox.contains(x, y))
        })
    }

    /// Measured size of label text including padding.
    fn label_size(attrs: &Attrs) -> (f64, f64) {
        let font_size = attrs.font_size.unwrap_or(DEFAULT_FONT_SIZE);
        let padding = attrs.padding.unwrap_or(0.0);
        let text = attrs.text.as_deref().unwrap_or("");
        let lines = text.split('\n').count().max(1) as f64;
        let longest = text
            .split('\n')
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as f64;
        let width = (longest * font_size * CHAR_WIDTH_RATIO).round() + padding * 2.0;
        let height = (lines * font_size * LINE_HEIGHT_RATIO).round() + padding * 2.0;
        (width, height)
    }

    /// Serializable snapshot of the whole scene.
    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        self.roots.iter().filter_map(|id| self.snapshot_node(*id)).collect()
    }

    fn snapshot_node(&self, id: GraphicId) -> Option<NodeSnapshot> {
        let node = self.nodes.get(&id)?;
        Some(NodeSnapshot {
            id,
            primitive: node.primitive.clone(),
            attrs: node.attrs.clone(),
            clip: node.clip,
            children: node
                .children
                .iter()
                .filter_map(|child| self.snapshot_node(*child))
                .collect(),
        })
    }

    fn detach(&mut self, id: GraphicId, parent: Option<GraphicId>) {
        match parent {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(&parent) {
                    node.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
    }
}

impl Renderer for Scene {
    fn create(&mut self, primitive: Primitive, parent: Option<GraphicId>) -> GraphicId {
        self.next_id += 1;
        self.created += 1;
        let id = GraphicId(self.next_id);

        let parent = parent.filter(|p| self.nodes.contains_key(p));
        match parent {
            Some(p) => {
                if let Some(node) = self.nodes.get_mut(&p) {
                    node.children.push(id);
                }
            }
            None => self.roots.push(id),
        }

        self.nodes.insert(
            id,
            Node {
                primitive,
                parent,
                children: Vec::new(),
                attrs: Attrs::default(),
                clip: None,
            },
        );
        id
    }

    fn attr(&mut self, id: GraphicId, attrs: &Attrs) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.attrs.apply(attrs);
        }
    }

    fn animate(&mut self, id: GraphicId, attrs: &Attrs) {
        if self.nodes.contains_key(&id) {
            self.animations += 1;
        }
        self.attr(id, attrs);
    }

    fn clip(&mut self, id: GraphicId, clip: Option<GraphicId>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.clip = clip;
        }
    }

    fn bbox(&self, id: GraphicId) -> Option<BBox> {
        let node = self.nodes.get(&id)?;
        let a = &node.attrs;
        let x = a.x.unwrap_or(0.0);
        let y = a.y.unwrap_or(0.0);
        match &node.primitive {
            Primitive::Group { .. } => node
                .children
                .iter()
                .filter_map(|child| self.bbox(*child))
                .reduce(BBox::union),
            Primitive::ClipRect
            | Primitive::Rect
            | Primitive::Image { .. }
            | Primitive::Symbol { .. } => Some(BBox::new(
                x,
                y,
                a.width.unwrap_or(0.0),
                a.height.unwrap_or(0.0),
            )),
            Primitive::Circle => {
                let r = a.r.unwrap_or(0.0);
                Some(BBox::new(x - r, y - r, r * 2.0, r * 2.0))
            }
            Primitive::Path => {
                let points: Vec<(f64, f64)> = a
                    .d
                    .as_deref()
                    .unwrap_or(&[])
                    .iter()
                    .filter_map(|cmd| cmd.point())
                    .collect();
                let half = a.stroke_width.unwrap_or(1.0) / 2.0;
                BBox::from_points(&points).map(|bbox| bbox.inflate(half))
            }
            Primitive::Label { .. } => {
                let (width, height) = Self::label_size(a);
                Some(BBox::new(x, y, width, height))
            }
        }
    }

    fn destroy(&mut self, id: GraphicId) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        self.detach(id, node.parent);
        for child in node.children {
            self.destroy(child);
        }
        // Drop dangling clip references to a destroyed clip rect
        if matches!(node.primitive, Primitive::ClipRect) {
            for other in self.nodes.values_mut() {
                if other.clip == Some(id) {
                    other.clip = None;
                }
            }
        }
    }

    fn exists(&self, id: GraphicId) -> bool {
        self.nodes.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::PathCommand;

    #[test]
    fn destroy_removes_subtree() {
        let mut scene = Scene::new();
        let group = scene.group("g", None);
        let rect = scene.create(Primitive::Rect, Some(group));
        let inner = scene.group("inner", Some(group));
        let circle = scene.create(Primitive::Circle, Some(inner));

        scene.destroy(group);

        assert!(scene.is_empty());
        assert!(!scene.exists(rect));
        assert!(!scene.exists(circle));
        // Destroying twice is harmless
        scene.destroy(group);
    }

    #[test]
    fn label_bbox_grows_with_text_and_padding() {
        let mut scene = Scene::new();
        let label = scene.create(
            Primitive::Label {
                shape: "rect".into(),
            },
            None,
        );
        scene.attr(
            label,
            &Attrs {
                text: Some("abcd".into()),
                padding: Some(5.0),
                font_size: Some(10.0),
                ..Default::default()
            },
        );
        let bbox = scene.bbox(label).unwrap();
        assert_eq!(bbox.width, 22.0 + 10.0);
        assert_eq!(bbox.height, 12.0 + 10.0);
    }

    #[test]
    fn path_bbox_covers_points_and_stroke() {
        let mut scene = Scene::new();
        let path = scene.create(Primitive::Path, None);
        scene.attr(
            path,
            &Attrs {
                d: Some(vec![
                    PathCommand::MoveTo(10.0, 10.0),
                    PathCommand::LineTo(30.0, 50.0),
                ]),
                stroke_width: Some(2.0),
                ..Default::default()
            },
        );
        assert_eq!(scene.bbox(path), Some(BBox::new(9.0, 9.0, 22.0, 42.0)));
    }

    #[test]
    fn hit_test_skips_hidden_and_clipped_graphics() {
        let mut scene = Scene::new();
        let clip = scene.clip_rect(BBox::new(0.0, 0.0, 50.0, 50.0));
        let group = scene.group("g", None);
        scene.clip(group, Some(clip));
        let rect = scene.create(Primitive::Rect, Some(group));
        scene.attr(rect, &Attrs::bounds(BBox::new(40.0, 40.0, 20.0, 20.0)));

        assert_eq!(scene.hit_test(45.0, 45.0), Some(rect));
        assert_eq!(scene.hit_test(55.0, 55.0), None);

        scene.attr(group, &Attrs::visibility(false));
        assert_eq!(scene.hit_test(45.0, 45.0), None);
    }

    #[test]
    fn paint_order_respects_z_index() {
        let mut scene = Scene::new();
        let top = scene.group("top", None);
        scene.attr(
            top,
            &Attrs {
                z_index: Some(10),
                ..Default::default()
            },
        );
        let bottom = scene.group("bottom", None);
        assert_eq!(scene.paint_order(), vec![bottom, top]);
    }
}
