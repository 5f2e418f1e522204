//! The Model layer: the immutable layout tree and the invariants it upholds.
//!
//! Nothing in this module depends on the controller or the reconciler —
//! dependencies flow strictly downward, per spec.

mod invariants;
mod node;
mod tree;

pub use invariants::RATIO_TOLERANCE;
pub use node::{ChildSlot, LeafNode, Node, Orientation, PaneIds, SplitNode};
pub use tree::{PaneIdIter, Tree, TreeDelta};

pub(crate) use tree::TreeSnapshot;

/// Callbacks a host registers with [`crate::controller::Engine`] to learn
/// about layout changes. Every method has a no-op default, the same shape
/// as a driver trait whose caller only needs to override the handful of
/// events it actually cares about.
pub trait Observer {
    /// The tree's structure changed (split, close, move, or a `load`).
    /// `revision` is the tree's new revision counter.
    fn tree_changed(&mut self, revision: u64) {
        let _ = revision;
    }

    /// The focused pane changed, possibly to `None`.
    fn focus_changed(&mut self, focused: Option<crate::ids::PaneId>) {
        let _ = focused;
    }

    /// The selection set changed.
    fn selection_changed(&mut self, selection: &std::collections::BTreeSet<crate::ids::PaneId>) {
        let _ = selection;
    }

    /// A navigation command found no pane in the requested direction.
    fn focus_navigation_blocked(&mut self, from: crate::ids::PaneId, direction: crate::focus::Direction) {
        let _ = (from, direction);
    }

    /// The widget provider declined (or failed) to produce a widget for
    /// `pane_id`; the reconciler installed a placeholder and the tree
    /// remains structurally valid. Informational, per spec §4.3/§7 — this
    /// is the observer-visible counterpart of `Error::ProviderFailure`.
    fn provider_failed(&mut self, pane_id: crate::ids::PaneId, widget_id: &crate::ids::WidgetId) {
        let _ = (pane_id, widget_id);
    }
}

/// An `Observer` that does nothing; the engine's default until a host
/// registers its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {}
