//! The canonical, validated layout tree plus focus/selection state.
//!
//! `Tree` never imports rendering concerns and exposes only read-only
//! queries publicly; the mutating methods are `pub(crate)` because spec
//! places the Model's write surface behind the Controller — [`crate::controller::Engine`]
//! is the only caller.

use std::collections::BTreeSet;
use std::rc::Rc;

use crate::error::Error;
use crate::ids::{PaneId, WidgetId};

use super::invariants::{validate_focus, validate_tree};
use super::node::{ChildSlot, LeafNode, Node, Orientation, PaneIds};

/// A fully-formed description of what a mutation changed, handed back to
/// [`crate::controller::Engine`] so it can dispatch the right `Observer`
/// callbacks in the right order (`tree_changed` before `focus_changed`,
/// per spec).
#[derive(Debug, Clone)]
pub struct TreeDelta {
    pub old_root: Option<Rc<Node>>,
    pub new_root: Option<Rc<Node>>,
    pub old_focus: Option<PaneId>,
    pub new_focus: Option<PaneId>,
    pub old_selection: BTreeSet<PaneId>,
    pub new_selection: BTreeSet<PaneId>,
    pub revision: u64,
}

impl TreeDelta {
    /// Whether the tree's root actually changed identity (as opposed to
    /// only focus or selection) — the controller uses this to decide
    /// whether to run reconciliation and fire `tree_changed`.
    pub(crate) fn structural_change(&self) -> bool {
        match (&self.old_root, &self.new_root) {
            (Some(a), Some(b)) => !Rc::ptr_eq(a, b),
            (None, None) => false,
            _ => true,
        }
    }
}

/// A snapshot of everything a command needs to restore on undo/redo.
/// Cloning one is `O(1)` for the tree itself (an `Rc` bump) and `O(selection size)`
/// for the selection set — undo never re-walks or re-validates the tree it
/// is restoring, because it was a tree this `Tree` already validated once.
#[derive(Debug, Clone)]
pub struct TreeSnapshot {
    root: Option<Rc<Node>>,
    focused_pane_id: Option<PaneId>,
    selection: BTreeSet<PaneId>,
}

impl TreeSnapshot {
    pub(crate) fn root(&self) -> Option<&Rc<Node>> {
        self.root.as_ref()
    }

    pub(crate) fn focused_pane_id(&self) -> Option<PaneId> {
        self.focused_pane_id
    }

    pub(crate) fn selection(&self) -> &BTreeSet<PaneId> {
        &self.selection
    }
}

/// The layout tree: an optional root [`Node`], the focused pane, an ordered
/// selection set, and a strictly monotonic revision counter.
#[derive(Debug, Clone)]
pub struct Tree {
    root: Option<Rc<Node>>,
    focused_pane_id: Option<PaneId>,
    selection: BTreeSet<PaneId>,
    revision: u64,
    min_ratio: f64,
}

impl Tree {
    /// Creates an empty tree. `min_ratio` is the epsilon every split's
    /// ratios are validated against.
    pub fn new(min_ratio: f64) -> Self {
        Self {
            root: None,
            focused_pane_id: None,
            selection: BTreeSet::new(),
            revision: 0,
            min_ratio,
        }
    }

    // --- Read-only queries (spec 4.1) ---------------------------------

    /// The root node, if the tree is non-empty.
    pub fn root(&self) -> Option<&Rc<Node>> {
        self.root.as_ref()
    }

    /// Looks up a leaf by pane id.
    pub fn find_leaf(&self, pane_id: PaneId) -> Option<&LeafNode> {
        let root = self.root.as_ref()?;
        find_leaf(root, pane_id)
    }

    /// Looks up a pane's parent split and which slot (`First`/`Second`) it
    /// occupies there. Returns `None` for the root leaf (it has no parent)
    /// or for a pane id that doesn't exist.
    pub fn find_parent(&self, pane_id: PaneId) -> Option<(&super::node::SplitNode, ChildSlot)> {
        let path = self.path_to(pane_id)?;
        let parent_path = path.split_last()?.1;
        let slot = *path.last()?;
        let parent = node_at_path(self.root.as_ref()?, parent_path)?;
        parent.as_split().map(|split| (split, slot))
    }

    /// In-order (leftmost-first), lazy, restartable iterator over every
    /// pane id currently in the tree.
    pub fn pane_ids(&self) -> PaneIdIter<'_> {
        match &self.root {
            Some(root) => PaneIdIter::NonEmpty(root.pane_ids()),
            None => PaneIdIter::Empty,
        }
    }

    /// The widget id currently bound to `pane_id`, if it exists.
    pub fn widget_id_of(&self, pane_id: PaneId) -> Option<WidgetId> {
        self.find_leaf(pane_id).map(|leaf| leaf.widget_id().clone())
    }

    /// The currently focused pane, if any.
    pub fn focused_pane(&self) -> Option<PaneId> {
        self.focused_pane_id
    }

    /// The current selection set, in ascending id order.
    pub fn selection(&self) -> &BTreeSet<PaneId> {
        &self.selection
    }

    /// Strictly monotonic; increments on every successful mutation
    /// (including undo/redo, each of which is itself a mutation).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Epsilon this tree validates splits against.
    pub fn min_ratio(&self) -> f64 {
        self.min_ratio
    }

    pub(crate) fn path_to(&self, pane_id: PaneId) -> Option<Vec<ChildSlot>> {
        let root = self.root.as_ref()?;
        let mut path = Vec::new();
        if path_to(root, pane_id, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    // --- Snapshot / restore (used by the controller's undo/redo) -------

    pub(crate) fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            root: self.root.clone(),
            focused_pane_id: self.focused_pane_id,
            selection: self.selection.clone(),
        }
    }

    /// Restores a previously captured snapshot. Always bumps the revision
    /// (undo and redo are mutations too) rather than replaying whatever
    /// revision number the snapshot was taken at.
    pub(crate) fn restore(&mut self, snapshot: TreeSnapshot) -> TreeDelta {
        let old_root = self.root.clone();
        let old_focus = self.focused_pane_id;
        let old_selection = self.selection.clone();

        self.root = snapshot.root;
        self.focused_pane_id = snapshot.focused_pane_id;
        self.selection = snapshot.selection;
        self.revision += 1;

        TreeDelta {
            old_root,
            new_root: self.root.clone(),
            old_focus,
            new_focus: self.focused_pane_id,
            old_selection,
            new_selection: self.selection.clone(),
            revision: self.revision,
        }
    }

    // --- Mutating operations (invoked only by the controller) ----------

    /// Installs `leaf` as the root of a currently empty tree. Fails if the
    /// tree already has a root — growing an existing tree goes through
    /// [`Self::split_leaf`] instead.
    pub(crate) fn insert_root(&mut self, leaf: LeafNode) -> Result<TreeDelta, Error> {
        if self.root.is_some() {
            return Err(Error::InvariantViolation {
                which: crate::error::InvariantKind::Binary,
                detail: "insert_root called on a non-empty tree".to_string(),
            });
        }
        let pane_id = leaf.pane_id();
        let new_root = Node::leaf(pane_id, leaf.widget_id().clone());
        validate_tree(Some(&new_root), self.min_ratio)?;

        let old_root = self.root.clone();
        let old_focus = self.focused_pane_id;
        let old_selection = self.selection.clone();

        self.root = Some(new_root);
        self.focused_pane_id = Some(pane_id);
        self.revision += 1;

        Ok(TreeDelta {
            old_root,
            new_root: self.root.clone(),
            old_focus,
            new_focus: self.focused_pane_id,
            old_selection,
            new_selection: self.selection.clone(),
            revision: self.revision,
        })
    }

    /// Replaces the leaf `target` with a new split containing the original
    /// leaf and `new_leaf`. `new_leaf_slot` says which side of the new
    /// split `new_leaf` occupies.
    pub(crate) fn split_leaf(
        &mut self,
        target: PaneId,
        new_leaf: LeafNode,
        orientation: Orientation,
        new_leaf_slot: ChildSlot,
        ratio: f64,
    ) -> Result<TreeDelta, Error> {
        let path = self.path_to(target).ok_or(Error::PaneNotFound(target))?;
        let root = self.root.as_ref().expect("path_to returned Some");
        let old_leaf = node_at_path(root, &path)
            .and_then(|n| n.as_leaf())
            .cloned()
            .expect("path_to(target) always resolves to a leaf");

        let mut children = [Node::leaf(old_leaf.pane_id(), old_leaf.widget_id().clone()), Node::leaf(new_leaf.pane_id(), new_leaf.widget_id().clone())];
        let mut ratios = [ratio, 1.0 - ratio];
        if matches!(new_leaf_slot, ChildSlot::First) {
            children.swap(0, 1);
            ratios.swap(0, 1);
        }
        let new_subtree = Node::split(orientation, children, ratios);

        self.commit_replace(&path, Some(new_subtree))
    }

    /// Removes `target`'s parent split, promoting `target`'s sibling into
    /// the parent's place. If `target` is the root leaf, the tree becomes
    /// empty.
    pub(crate) fn close_pane(&mut self, target: PaneId) -> Result<TreeDelta, Error> {
        let path = self.path_to(target).ok_or(Error::PaneNotFound(target))?;

        if path.is_empty() {
            // Target is the sole root leaf.
            let old_root = self.root.clone();
            self.root = None;
            return self.finish_structural_change(old_root);
        }

        let (parent_path, sibling) = self.sibling_of(&path);
        self.commit_replace(parent_path, Some(sibling))
    }

    /// Detaches `source` (promoting its sibling, exactly like [`Self::close_pane`]'s
    /// structural step) and re-inserts it as a new split adjacent to
    /// `target`, on the side described by `orientation`/`new_source_slot`.
    pub(crate) fn move_pane(
        &mut self,
        source: PaneId,
        target: PaneId,
        orientation: Orientation,
        new_source_slot: ChildSlot,
    ) -> Result<TreeDelta, Error> {
        let source_path = self.path_to(source).ok_or(Error::PaneNotFound(source))?;
        let target_path = self.path_to(target).ok_or(Error::PaneNotFound(target))?;

        if source == target || target_path.starts_with(source_path.as_slice()) {
            return Err(Error::InvalidMove);
        }
        if source_path.is_empty() {
            // Source is the only pane; no distinct target can exist, but
            // guard explicitly rather than relying on that reasoning.
            return Err(Error::InvalidMove);
        }

        let root = self.root.as_ref().expect("path_to returned Some");
        let source_node = node_at_path(root, &source_path)
            .expect("path_to(source) resolves")
            .clone();

        let (parent_path, sibling) = self.sibling_of(&source_path);
        let parent_path = parent_path.to_vec();
        let sibling_slot = source_path.last().expect("non-empty").other();

        let detached_root = replace_subtree(self.root.as_ref(), &parent_path, Some(sibling))
            .expect("parent_path is always valid");

        let remapped_target_path =
            remap_after_detach(&parent_path, sibling_slot, &target_path);

        let target_leaf = node_at_path(
            detached_root.as_ref().expect("target still present"),
            &remapped_target_path,
        )
        .and_then(|n| n.as_leaf())
        .cloned()
        .expect("target leaf survives detach of an unrelated pane");

        let mut children = [
            Node::leaf(target_leaf.pane_id(), target_leaf.widget_id().clone()),
            source_node,
        ];
        if matches!(new_source_slot, ChildSlot::First) {
            children.swap(0, 1);
        }
        let new_subtree = Node::split(orientation, children, [0.5, 0.5]);

        let new_root = replace_subtree(detached_root.as_ref(), &remapped_target_path, Some(new_subtree))
            .expect("remapped target path is valid in the detached tree");

        self.commit_root(new_root)
    }

    /// Updates the ratios of the split at `path` (root-to-split, as a
    /// sequence of child slots), clamped to `[min_ratio, 1 - min_ratio]`.
    /// Returns the clamped ratios actually stored, so the caller (the
    /// controller) can record them for exact undo.
    pub(crate) fn set_ratios(
        &mut self,
        path: &[ChildSlot],
        ratios: [f64; 2],
    ) -> Result<([f64; 2], TreeDelta), Error> {
        let root = self.root.as_ref().ok_or_else(|| Error::InvariantViolation {
            which: crate::error::InvariantKind::Binary,
            detail: "cannot resize a split in an empty tree".to_string(),
        })?;
        let split = node_at_path(root, path)
            .and_then(|n| n.as_split())
            .ok_or_else(|| Error::InvariantViolation {
                which: crate::error::InvariantKind::Binary,
                detail: "split_path does not resolve to a split".to_string(),
            })?;

        let clamped0 = ratios[0].clamp(self.min_ratio, 1.0 - self.min_ratio);
        let clamped = [clamped0, 1.0 - clamped0];
        let new_split = Node::split(split.orientation(), split.children().clone(), clamped);

        let delta = self.commit_replace(path, Some(new_split))?;
        Ok((clamped, delta))
    }

    /// Replaces `target`'s widget id, preserving its `pane_id`. Returns the
    /// previous widget id for the command's undo state.
    pub(crate) fn replace_widget(
        &mut self,
        target: PaneId,
        new_widget_id: WidgetId,
    ) -> Result<(WidgetId, TreeDelta), Error> {
        let path = self.path_to(target).ok_or(Error::PaneNotFound(target))?;
        let root = self.root.as_ref().expect("path_to returned Some");
        let old_leaf = node_at_path(root, &path)
            .and_then(|n| n.as_leaf())
            .expect("path resolves to a leaf");
        let old_widget_id = old_leaf.widget_id().clone();
        let new_leaf = Rc::new(Node::Leaf(old_leaf.with_widget_id(new_widget_id)));

        let delta = self.commit_replace(&path, Some(new_leaf))?;
        Ok((old_widget_id, delta))
    }

    /// Sets or clears the focused pane. `Some` must name a live leaf.
    pub(crate) fn set_focus(&mut self, pane: Option<PaneId>) -> Result<TreeDelta, Error> {
        if let Some(pane) = pane {
            if self.find_leaf(pane).is_none() {
                return Err(Error::PaneNotFound(pane));
            }
        }
        let old_root = self.root.clone();
        let old_focus = self.focused_pane_id;
        let old_selection = self.selection.clone();

        self.focused_pane_id = pane;
        self.revision += 1;

        Ok(TreeDelta {
            old_root: old_root.clone(),
            new_root: old_root,
            old_focus,
            new_focus: self.focused_pane_id,
            old_selection: old_selection.clone(),
            new_selection: old_selection,
            revision: self.revision,
        })
    }

    /// Replaces the selection set wholesale.
    pub(crate) fn set_selection(&mut self, set: BTreeSet<PaneId>) -> Result<TreeDelta, Error> {
        for pane in &set {
            if self.find_leaf(*pane).is_none() {
                return Err(Error::PaneNotFound(*pane));
            }
        }
        let old_root = self.root.clone();
        let old_focus = self.focused_pane_id;
        let old_selection = self.selection.clone();

        self.selection = set;
        self.revision += 1;

        Ok(TreeDelta {
            old_root: old_root.clone(),
            new_root: old_root,
            old_focus,
            new_focus: old_focus,
            old_selection,
            new_selection: self.selection.clone(),
            revision: self.revision,
        })
    }

    /// Used only by decode: installs an already-validated tree wholesale,
    /// bypassing the incremental mutation API. `load` is all-or-nothing, so
    /// this is not exposed as a generic "replace everything" primitive —
    /// only [`crate::serialization::decode`] calls it.
    pub(crate) fn install_decoded(
        &mut self,
        root: Option<Rc<Node>>,
        focused_pane_id: Option<PaneId>,
    ) -> Result<TreeDelta, Error> {
        validate_tree(root.as_ref(), self.min_ratio)?;
        validate_focus(root.as_ref(), focused_pane_id)?;

        let old_root = self.root.clone();
        let old_focus = self.focused_pane_id;
        let old_selection = std::mem::take(&mut self.selection);

        self.root = root;
        self.focused_pane_id = focused_pane_id;
        self.revision += 1;

        Ok(TreeDelta {
            old_root,
            new_root: self.root.clone(),
            old_focus,
            new_focus: self.focused_pane_id,
            old_selection,
            new_selection: self.selection.clone(),
            revision: self.revision,
        })
    }

    // --- Internal helpers ------------------------------------------------

    /// Returns `(parent_path, sibling_subtree)` for the pane at `path`.
    fn sibling_of<'a>(&self, path: &'a [ChildSlot]) -> (&'a [ChildSlot], Rc<Node>) {
        let (slot, parent_path) = path.split_last().expect("non-empty path");
        let parent = node_at_path(self.root.as_ref().expect("non-empty tree"), parent_path)
            .and_then(|n| n.as_split())
            .expect("parent of a leaf is always a split");
        (parent_path, parent.child(slot.other()).clone())
    }

    fn commit_replace(
        &mut self,
        path: &[ChildSlot],
        new_node: Option<Rc<Node>>,
    ) -> Result<TreeDelta, Error> {
        let new_root = replace_subtree(self.root.as_ref(), path, new_node)
            .ok_or_else(|| Error::InvariantViolation {
                which: crate::error::InvariantKind::Binary,
                detail: "replacement path does not resolve in the current tree".to_string(),
            })?;
        self.commit_root(new_root)
    }

    fn commit_root(&mut self, new_root: Option<Rc<Node>>) -> Result<TreeDelta, Error> {
        validate_tree(new_root.as_ref(), self.min_ratio)?;

        let mut new_focus = self.focused_pane_id;
        if let Some(focus) = new_focus {
            let still_live = new_root
                .as_ref()
                .map(|root| root.pane_ids().any(|id| id == focus))
                .unwrap_or(false);
            if !still_live {
                new_focus = None;
            }
        }
        validate_focus(new_root.as_ref(), new_focus)?;

        let new_selection: BTreeSet<PaneId> = self
            .selection
            .iter()
            .copied()
            .filter(|id| {
                new_root
                    .as_ref()
                    .map(|root| root.pane_ids().any(|existing| existing == *id))
                    .unwrap_or(false)
            })
            .collect();

        let old_root = self.root.clone();
        let old_focus = self.focused_pane_id;
        let old_selection = std::mem::replace(&mut self.selection, new_selection.clone());

        self.root = new_root;
        self.focused_pane_id = new_focus;
        self.revision += 1;

        Ok(TreeDelta {
            old_root,
            new_root: self.root.clone(),
            old_focus,
            new_focus,
            old_selection,
            new_selection,
            revision: self.revision,
        })
    }

    fn finish_structural_change(&mut self, old_root: Option<Rc<Node>>) -> Result<TreeDelta, Error> {
        let old_focus = self.focused_pane_id;
        let old_selection = self.selection.clone();
        self.focused_pane_id = None;
        self.selection.clear();
        self.revision += 1;
        Ok(TreeDelta {
            old_root,
            new_root: self.root.clone(),
            old_focus,
            new_focus: None,
            old_selection,
            new_selection: self.selection.clone(),
            revision: self.revision,
        })
    }
}

/// Lazy iterator over a tree's pane ids; empty trees yield nothing without
/// allocating.
pub enum PaneIdIter<'a> {
    Empty,
    NonEmpty(PaneIds<'a>),
}

impl Iterator for PaneIdIter<'_> {
    type Item = PaneId;

    fn next(&mut self) -> Option<PaneId> {
        match self {
            PaneIdIter::Empty => None,
            PaneIdIter::NonEmpty(iter) => iter.next(),
        }
    }
}

fn find_leaf(node: &Rc<Node>, pane_id: PaneId) -> Option<&LeafNode> {
    match node.as_ref() {
        Node::Leaf(leaf) if leaf.pane_id() == pane_id => Some(leaf),
        Node::Leaf(_) => None,
        Node::Split(split) => split
            .children()
            .iter()
            .find_map(|child| find_leaf(child, pane_id)),
    }
}

fn path_to(node: &Rc<Node>, pane_id: PaneId, path: &mut Vec<ChildSlot>) -> bool {
    match node.as_ref() {
        Node::Leaf(leaf) => leaf.pane_id() == pane_id,
        Node::Split(split) => {
            for slot in [ChildSlot::First, ChildSlot::Second] {
                path.push(slot);
                if path_to(split.child(slot), pane_id, path) {
                    return true;
                }
                path.pop();
            }
            false
        }
    }
}

fn node_at_path<'a>(root: &'a Rc<Node>, path: &[ChildSlot]) -> Option<&'a Rc<Node>> {
    let mut current = root;
    for &slot in path {
        current = current.as_split()?.child(slot);
    }
    Some(current)
}

/// Rebuilds the spine from `root` down to `path`, replacing whatever is
/// there with `new_node` (or deleting the whole tree, if `path` is empty
/// and `new_node` is `None`). Every node off the spine is shared (`Rc`
/// clone only, no deep copy).
fn replace_subtree(
    root: Option<&Rc<Node>>,
    path: &[ChildSlot],
    new_node: Option<Rc<Node>>,
) -> Option<Option<Rc<Node>>> {
    if path.is_empty() {
        return Some(new_node);
    }
    let root = root?;
    let split = root.as_split()?;
    let (&slot, rest) = path.split_first().expect("non-empty path");
    let new_child = replace_subtree(Some(split.child(slot)), rest, new_node)??;
    Some(Some(Rc::new(Node::Split(split.with_child(slot, new_child)))))
}

/// After detaching the subtree at `parent_path` (replacing it with its
/// `sibling_slot` sibling, one level up), remaps a path that may have
/// pointed through the now-collapsed sibling indirection.
fn remap_after_detach(
    parent_path: &[ChildSlot],
    sibling_slot: ChildSlot,
    path: &[ChildSlot],
) -> Vec<ChildSlot> {
    let plen = parent_path.len();
    if path.len() > plen && path[..plen] == *parent_path && path[plen] == sibling_slot {
        let mut remapped = parent_path.to_vec();
        remapped.extend_from_slice(&path[plen + 1..]);
        remapped
    } else {
        path.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::Orientation;
    use uuid::Uuid;

    fn pid(n: u128) -> PaneId {
        PaneId::from_uuid(Uuid::from_u128(n))
    }

    fn leaf_tree(id: u128) -> Tree {
        let mut tree = Tree::new(0.05);
        tree.root = Some(Node::leaf(pid(id), WidgetId::new("a")));
        tree.focused_pane_id = Some(pid(id));
        tree
    }

    #[test]
    fn split_then_close_restores_single_leaf() {
        let mut tree = leaf_tree(1);
        tree.split_leaf(
            pid(1),
            LeafNode::new(pid(2), WidgetId::new("b")),
            Orientation::Horizontal,
            ChildSlot::Second,
            0.5,
        )
        .unwrap();
        assert_eq!(tree.pane_ids().count(), 2);

        tree.close_pane(pid(2)).unwrap();
        assert_eq!(tree.pane_ids().collect::<Vec<_>>(), vec![pid(1)]);
        assert_eq!(tree.root().unwrap().as_leaf().unwrap().pane_id(), pid(1));
    }

    #[test]
    fn close_last_pane_empties_tree_and_clears_focus() {
        let mut tree = leaf_tree(1);
        let delta = tree.close_pane(pid(1)).unwrap();
        assert!(tree.root().is_none());
        assert_eq!(delta.new_focus, None);
        assert_eq!(delta.old_focus, Some(pid(1)));
    }

    #[test]
    fn move_pane_preserves_all_ids_and_rejects_move_into_self() {
        let mut tree = leaf_tree(1);
        tree.split_leaf(
            pid(1),
            LeafNode::new(pid(2), WidgetId::new("b")),
            Orientation::Horizontal,
            ChildSlot::Second,
            0.5,
        )
        .unwrap();
        tree.split_leaf(
            pid(2),
            LeafNode::new(pid(3), WidgetId::new("c")),
            Orientation::Vertical,
            ChildSlot::Second,
            0.5,
        )
        .unwrap();

        let err = tree
            .move_pane(pid(1), pid(1), Orientation::Horizontal, ChildSlot::Second)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMove));

        tree.move_pane(pid(1), pid(3), Orientation::Vertical, ChildSlot::Second)
            .unwrap();

        let mut ids: Vec<_> = tree.pane_ids().collect();
        ids.sort();
        let mut expected = vec![pid(1), pid(2), pid(3)];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn resize_clamps_and_reports_clamped_value() {
        let mut tree = leaf_tree(1);
        tree.split_leaf(
            pid(1),
            LeafNode::new(pid(2), WidgetId::new("b")),
            Orientation::Horizontal,
            ChildSlot::Second,
            0.5,
        )
        .unwrap();

        let (clamped, _) = tree.set_ratios(&[], [0.01, 0.99]).unwrap();
        assert!((clamped[0] - 0.05).abs() < 1e-9);
        assert!((clamped[1] - 0.95).abs() < 1e-9);
    }

    #[test]
    fn snapshot_restore_round_trips_structurally() {
        let mut tree = leaf_tree(1);
        let before = tree.snapshot();
        tree.split_leaf(
            pid(1),
            LeafNode::new(pid(2), WidgetId::new("b")),
            Orientation::Horizontal,
            ChildSlot::Second,
            0.5,
        )
        .unwrap();
        assert_eq!(tree.pane_ids().count(), 2);

        tree.restore(before);
        assert_eq!(tree.pane_ids().collect::<Vec<_>>(), vec![pid(1)]);
    }
}
