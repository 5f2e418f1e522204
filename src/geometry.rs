//! Pure geometry computation from a layout tree.
//!
//! `allocate` is a stateless function of `(tree, outer rect, config)`: it
//! never mutates the tree and never calls back into the controller. The
//! reconciler is the only caller in this crate, but nothing here depends on
//! it.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ids::PaneId;
use crate::model::{ChildSlot, Node, Orientation, Tree};

/// An axis-aligned rectangle in host-defined units (typically pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Whether `(px, py)` falls within this rectangle, inclusive of edges.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

/// The rectangle and overflow state computed for one leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneGeometry {
    pub rect: Rect,
    /// Set when the leaf's allocated rectangle is smaller than
    /// `min_leaf_size`; ratios are never mutated to compensate, so the
    /// reconciler is expected to clip instead.
    pub overflow: bool,
}

/// A split's handle rectangle, used for input routing (hit-testing a
/// resize drag) and hover rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleRect {
    pub rect: Rect,
    pub orientation: Orientation,
    /// Root-to-split path, so a host can map a drag back to a `resize` call.
    pub path: Vec<ChildSlot>,
}

/// The full geometry solution for one allocation pass.
#[derive(Debug, Clone, Default)]
pub struct GeometryMap {
    pub leaves: HashMap<PaneId, PaneGeometry>,
    pub handles: Vec<HandleRect>,
}

impl GeometryMap {
    fn empty() -> Self {
        Self {
            leaves: HashMap::new(),
            handles: Vec::new(),
        }
    }
}

/// Recursively allocates `outer` across `tree`'s nodes.
///
/// `handle_thickness` is subtracted from the long axis of every split
/// before the ratios are applied; `min_leaf_size` only affects the
/// `overflow` flag recorded per leaf, never the ratios themselves (spec:
/// ratios are only ever changed through `resize`).
pub fn allocate(
    tree: &Tree,
    outer: Rect,
    handle_thickness: f64,
    min_leaf_size: (f64, f64),
) -> GeometryMap {
    let mut map = GeometryMap::empty();
    if let Some(root) = tree.root() {
        allocate_node(root, outer, handle_thickness, min_leaf_size, &mut Vec::new(), &mut map);
    }
    map
}

fn allocate_node(
    node: &Rc<Node>,
    rect: Rect,
    handle_thickness: f64,
    min_leaf_size: (f64, f64),
    path: &mut Vec<ChildSlot>,
    map: &mut GeometryMap,
) {
    match node.as_ref() {
        Node::Leaf(leaf) => {
            let (min_w, min_h) = min_leaf_size;
            let overflow = rect.w < min_w || rect.h < min_h;
            map.leaves.insert(leaf.pane_id(), PaneGeometry { rect, overflow });
        }
        Node::Split(split) => {
            let ratios = split.ratios();
            let (rect0, rect1, handle) = match split.orientation() {
                Orientation::Horizontal => {
                    let available = (rect.w - handle_thickness).max(0.0);
                    let w0 = (available * ratios[0]).round();
                    let w1 = available - w0;
                    let rect0 = Rect::new(rect.x, rect.y, w0, rect.h);
                    let rect1 = Rect::new(rect.x + w0 + handle_thickness, rect.y, w1, rect.h);
                    let handle = Rect::new(rect.x + w0, rect.y, handle_thickness, rect.h);
                    (rect0, rect1, handle)
                }
                Orientation::Vertical => {
                    let available = (rect.h - handle_thickness).max(0.0);
                    let h0 = (available * ratios[0]).round();
                    let h1 = available - h0;
                    let rect0 = Rect::new(rect.x, rect.y, rect.w, h0);
                    let rect1 = Rect::new(rect.x, rect.y + h0 + handle_thickness, rect.w, h1);
                    let handle = Rect::new(rect.x, rect.y + h0, rect.w, handle_thickness);
                    (rect0, rect1, handle)
                }
            };

            map.handles.push(HandleRect {
                rect: handle,
                orientation: split.orientation(),
                path: path.clone(),
            });

            path.push(ChildSlot::First);
            allocate_node(split.child(ChildSlot::First), rect0, handle_thickness, min_leaf_size, path, map);
            path.pop();

            path.push(ChildSlot::Second);
            allocate_node(split.child(ChildSlot::Second), rect1, handle_thickness, min_leaf_size, path, map);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::WidgetId;
    use crate::model::Orientation as Or;

    fn two_leaf_tree(ratios: [f64; 2]) -> (Tree, PaneId, PaneId) {
        let mut tree = Tree::new(0.05);
        let a = PaneId::from_uuid(uuid::Uuid::from_u128(1));
        tree.insert_root(crate::model::LeafNode::new(a, WidgetId::new("a"))).unwrap();
        let b = PaneId::from_uuid(uuid::Uuid::from_u128(2));
        tree.split_leaf(
            a,
            crate::model::LeafNode::new(b, WidgetId::new("b")),
            Or::Horizontal,
            ChildSlot::Second,
            ratios[0],
        )
        .unwrap();
        (tree, a, b)
    }

    #[test]
    fn widths_sum_exactly_to_available_width() {
        let (tree, a, b) = two_leaf_tree([0.3, 0.7]);
        let map = allocate(&tree, Rect::new(0.0, 0.0, 1001.0, 500.0), 4.0, (20.0, 20.0));
        let ra = map.leaves[&a].rect;
        let rb = map.leaves[&b].rect;
        assert!((ra.w + rb.w + 4.0 - 1001.0).abs() < 1e-9);
        assert!(!ra.overflow && !rb.overflow);
    }

    #[test]
    fn tiny_rect_flags_overflow_without_touching_ratios() {
        let (tree, a, _b) = two_leaf_tree([0.5, 0.5]);
        let map = allocate(&tree, Rect::new(0.0, 0.0, 10.0, 10.0), 4.0, (20.0, 20.0));
        assert!(map.leaves[&a].overflow);
        let split_ratios = tree.root().unwrap().as_split().unwrap().ratios();
        assert_eq!(split_ratios, [0.5, 0.5]);
    }
}
