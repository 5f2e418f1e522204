//! The immutable node types that make up a layout tree.
//!
//! A tree is a sum type of [`LeafNode`] and [`SplitNode`], wired together
//! through `Rc` so that a mutation can build a new spine from the changed
//! leaf up to the root while every untouched subtree is shared, not copied.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{PaneId, WidgetId};

/// Axis a [`SplitNode`] divides its rectangle along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Children are arranged left/right.
    Horizontal,
    /// Children are arranged top/bottom.
    Vertical,
}

/// Which of a split's two children a path step refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildSlot {
    First,
    Second,
}

impl ChildSlot {
    pub(crate) fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    pub(crate) fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// A leaf position in the tree: one pane, displaying one widget.
///
/// `extra` carries any unrecognized JSON object members a decoded leaf had
/// on the wire (see `serialization`'s `#[serde(flatten)]` fields), so a
/// decode-then-encode round trip doesn't silently drop fields a newer
/// format version wrote. It plays no part in equality: two leaves are the
/// same pane regardless of which unknown sidecar data they're carrying.
#[derive(Debug, Clone)]
pub struct LeafNode {
    pane_id: PaneId,
    widget_id: WidgetId,
    extra: Map<String, Value>,
}

impl PartialEq for LeafNode {
    fn eq(&self, other: &Self) -> bool {
        self.pane_id == other.pane_id && self.widget_id == other.widget_id
    }
}

impl Eq for LeafNode {}

impl LeafNode {
    pub fn new(pane_id: PaneId, widget_id: WidgetId) -> Self {
        Self {
            pane_id,
            widget_id,
            extra: Map::new(),
        }
    }

    pub(crate) fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    pub fn pane_id(&self) -> PaneId {
        self.pane_id
    }

    pub fn widget_id(&self) -> &WidgetId {
        &self.widget_id
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub(crate) fn with_widget_id(&self, widget_id: WidgetId) -> Self {
        Self {
            pane_id: self.pane_id,
            widget_id,
            extra: self.extra.clone(),
        }
    }
}

/// An internal node dividing its rectangle between exactly two children.
///
/// `extra` mirrors [`LeafNode::extra`]: unrecognized JSON object members
/// from a decoded split, preserved across rebuilds so they survive a
/// decode-then-encode round trip.
#[derive(Debug, Clone)]
pub struct SplitNode {
    orientation: Orientation,
    children: [Rc<Node>; 2],
    ratios: [f64; 2],
    extra: Map<String, Value>,
}

impl SplitNode {
    /// Builds a split, normalizing neither the orientation nor the ratios —
    /// callers (the controller's commands and the decoder) are expected to
    /// have already clamped/validated `ratios` against the engine's
    /// `min_ratio`; `Tree::apply` re-validates regardless.
    pub(crate) fn new(
        orientation: Orientation,
        children: [Rc<Node>; 2],
        ratios: [f64; 2],
    ) -> Self {
        Self {
            orientation,
            children,
            ratios,
            extra: Map::new(),
        }
    }

    pub(crate) fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn children(&self) -> &[Rc<Node>; 2] {
        &self.children
    }

    pub fn child(&self, slot: ChildSlot) -> &Rc<Node> {
        &self.children[slot.index()]
    }

    pub fn ratios(&self) -> [f64; 2] {
        self.ratios
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub(crate) fn with_ratios(&self, ratios: [f64; 2]) -> Self {
        Self {
            orientation: self.orientation,
            children: self.children.clone(),
            ratios,
            extra: self.extra.clone(),
        }
    }

    pub(crate) fn with_child(&self, slot: ChildSlot, new_child: Rc<Node>) -> Self {
        let mut children = self.children.clone();
        children[slot.index()] = new_child;
        Self {
            orientation: self.orientation,
            children,
            ratios: self.ratios,
            extra: self.extra.clone(),
        }
    }
}

/// A node in the layout tree: either a pane or a two-way split.
#[derive(Debug, Clone)]
pub enum Node {
    Leaf(LeafNode),
    Split(SplitNode),
}

impl Node {
    pub fn leaf(pane_id: PaneId, widget_id: WidgetId) -> Rc<Self> {
        Rc::new(Self::Leaf(LeafNode::new(pane_id, widget_id)))
    }

    pub fn split(orientation: Orientation, children: [Rc<Node>; 2], ratios: [f64; 2]) -> Rc<Self> {
        Rc::new(Self::Split(SplitNode::new(orientation, children, ratios)))
    }

    /// Used by the decoder to restore unrecognized wire fields onto a
    /// freshly built leaf; not exposed outside the crate since ordinary
    /// commands never need to set `extra` themselves.
    pub(crate) fn leaf_with_extra(pane_id: PaneId, widget_id: WidgetId, extra: Map<String, Value>) -> Rc<Self> {
        Rc::new(Self::Leaf(LeafNode::new(pane_id, widget_id).with_extra(extra)))
    }

    pub(crate) fn split_with_extra(
        orientation: Orientation,
        children: [Rc<Node>; 2],
        ratios: [f64; 2],
        extra: Map<String, Value>,
    ) -> Rc<Self> {
        Rc::new(Self::Split(SplitNode::new(orientation, children, ratios).with_extra(extra)))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Split(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&SplitNode> {
        match self {
            Self::Split(split) => Some(split),
            Self::Leaf(_) => None,
        }
    }

    /// In-order (leftmost-first) iterator over every `PaneId` reachable from
    /// this node, lazily walked via an explicit stack rather than collected
    /// up front.
    pub fn pane_ids(self: &Rc<Self>) -> PaneIds<'_> {
        PaneIds {
            stack: vec![self.as_ref()],
        }
    }
}

/// Lazy, restartable, in-order traversal of a node's leaves.
///
/// Restartable in the sense that calling [`Node::pane_ids`] again on the
/// same `Rc<Node>` produces an equivalent fresh iterator; the iterator
/// itself is a normal single-pass `Iterator`.
pub struct PaneIds<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PaneIds<'a> {
    type Item = PaneId;

    fn next(&mut self) -> Option<PaneId> {
        loop {
            let node = self.stack.pop()?;
            match node {
                Node::Leaf(leaf) => return Some(leaf.pane_id()),
                Node::Split(split) => {
                    // Push right first so the left child pops (and is
                    // visited) first — leftmost-first, in-order.
                    self.stack.push(split.child(ChildSlot::Second));
                    self.stack.push(split.child(ChildSlot::First));
                }
            }
        }
    }
}
