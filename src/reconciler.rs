//! Synchronizes a rendered view with the layout tree without destroying
//! widgets that should be preserved across a mutation.
//!
//! This is View-layer code: it only reads the tree through
//! [`crate::model::Tree`]'s public queries and talks to the host through
//! [`WidgetProvider`]. It never mutates the tree directly — the one
//! exception, restoring focus after a structural change drops it, goes
//! back through the same `set_focus` path [`crate::controller::Engine`]
//! uses for every other focus change.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::ids::{PaneId, WidgetId};
use crate::model::{Node, Tree};

/// Host-implemented widget creation/destruction, called synchronously by
/// the reconciler. Mirrors the engine's single-threaded, synchronous
/// discipline: no async, no executor.
pub trait WidgetProvider<H> {
    /// Called when a pane newly appears (a split, a load, or a move's
    /// destination). Returning `None` installs a placeholder; the pane
    /// remains structurally valid either way.
    fn provide_widget(&mut self, widget_id: &WidgetId, pane_id: PaneId) -> Option<H>;

    /// Called when a pane is about to disappear (a close, a load that
    /// replaces the tree, or a `replace_widget` changing its widget id).
    /// The host regains ownership of `handle`; the engine never touches it
    /// again.
    fn widget_closing(&mut self, widget_id: &WidgetId, pane_id: PaneId, handle: Option<H>);
}

/// What is currently mounted at a pane: a real widget handle, or a
/// placeholder installed because the provider declined to produce one.
/// Both cases remember the `widget_id` so a later `widget_closing` call
/// can report it.
#[derive(Debug, Clone)]
enum Slot<H> {
    Widget(WidgetId, H),
    Placeholder(WidgetId),
}

impl<H> Slot<H> {
    fn widget_id(&self) -> WidgetId {
        match self {
            Slot::Widget(id, _) => id.clone(),
            Slot::Placeholder(id) => id.clone(),
        }
    }
}

/// What a reconciliation pass learned that the controller must act on:
/// which pane to fall back focus to (step 8) and which panes the provider
/// declined to produce a widget for (spec §4.3/§7's "informational
/// notification").
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    pub fallback_focus: Option<PaneId>,
    pub failures: Vec<(PaneId, WidgetId)>,
}

/// Holds the live `PaneId -> widget handle` mapping and runs the
/// reconciliation algorithm on every structural tree change.
pub struct Reconciler<H> {
    widget_map: HashMap<PaneId, Slot<H>>,
}

impl<H> Default for Reconciler<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Reconciler<H> {
    pub fn new() -> Self {
        Self {
            widget_map: HashMap::new(),
        }
    }

    /// The handle currently mounted at `pane_id`, if any and if it is a
    /// real widget rather than a placeholder.
    pub fn widget_handle(&self, pane_id: PaneId) -> Option<&H> {
        match self.widget_map.get(&pane_id)? {
            Slot::Widget(_, handle) => Some(handle),
            Slot::Placeholder(_) => None,
        }
    }

    /// Runs steps 1-7 of the reconciliation algorithm (pane classification,
    /// detach/request/preserve, geometry is run separately by the caller
    /// through [`crate::geometry::allocate`]). Step 8, focus restoration,
    /// is reported back as the returned fallback pane rather than applied
    /// here, since only the controller is allowed to mutate focus.
    ///
    /// `old_root` is the tree's root *before* the mutation that triggered
    /// this call; `new_tree` is the tree after.
    pub fn reconcile(
        &mut self,
        old_root: Option<&Rc<Node>>,
        old_focus: Option<PaneId>,
        new_tree: &Tree,
        provider: &mut dyn WidgetProvider<H>,
    ) -> ReconcileOutcome {
        let old_panes: HashSet<PaneId> = old_root
            .map(|root| root.pane_ids().collect())
            .unwrap_or_default();
        let new_panes: HashSet<PaneId> = new_tree.pane_ids().collect();
        let mut failures = Vec::new();

        let removed = old_panes.difference(&new_panes);
        for &pane_id in removed {
            if let Some(slot) = self.widget_map.remove(&pane_id) {
                let widget_id = slot.widget_id();
                let handle = match slot {
                    Slot::Widget(_, handle) => Some(handle),
                    Slot::Placeholder(_) => None,
                };
                debug!(%pane_id, "widget closing");
                provider.widget_closing(&widget_id, pane_id, handle);
            }
        }

        for &pane_id in new_panes.difference(&old_panes) {
            let Some(widget_id) = new_tree.widget_id_of(pane_id) else {
                continue;
            };
            self.mount(pane_id, widget_id, provider, &mut failures);
        }

        // Retained panes whose widget id changed (ReplaceWidgetCommand):
        // treat as close-of-old + request-of-new, identity stays the same.
        for &pane_id in old_panes.intersection(&new_panes) {
            let Some(new_widget_id) = new_tree.widget_id_of(pane_id) else {
                continue;
            };
            let stale = match self.widget_map.get(&pane_id) {
                Some(slot) => slot.widget_id() != new_widget_id,
                None => true,
            };
            if stale {
                if let Some(slot) = self.widget_map.remove(&pane_id) {
                    let old_widget_id = slot.widget_id();
                    let handle = match slot {
                        Slot::Widget(_, handle) => Some(handle),
                        Slot::Placeholder(_) => None,
                    };
                    provider.widget_closing(&old_widget_id, pane_id, handle);
                }
                self.mount(pane_id, new_widget_id, provider, &mut failures);
            }
        }

        let fallback_focus = if new_tree.focused_pane().is_some() || old_focus.is_none() {
            None
        } else {
            // The previously focused pane is gone; pick a deterministic
            // fallback: the first surviving leaf in in-order traversal.
            new_tree.pane_ids().next()
        };

        ReconcileOutcome { fallback_focus, failures }
    }

    fn mount(&mut self, pane_id: PaneId, widget_id: WidgetId, provider: &mut dyn WidgetProvider<H>, failures: &mut Vec<(PaneId, WidgetId)>) {
        match provider.provide_widget(&widget_id, pane_id) {
            Some(handle) => {
                self.widget_map.insert(pane_id, Slot::Widget(widget_id, handle));
            }
            None => {
                warn!(%pane_id, %widget_id, "provider returned no widget, installing placeholder");
                failures.push((pane_id, widget_id.clone()));
                self.widget_map.insert(pane_id, Slot::Placeholder(widget_id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChildSlot, LeafNode, Orientation};

    struct TestProvider {
        closed: Vec<PaneId>,
        fail_for: Option<PaneId>,
    }

    impl WidgetProvider<&'static str> for TestProvider {
        fn provide_widget(&mut self, _widget_id: &WidgetId, pane_id: PaneId) -> Option<&'static str> {
            if self.fail_for == Some(pane_id) {
                None
            } else {
                Some("handle")
            }
        }

        fn widget_closing(&mut self, _widget_id: &WidgetId, pane_id: PaneId, _handle: Option<&'static str>) {
            self.closed.push(pane_id);
        }
    }

    fn pid(n: u128) -> PaneId {
        PaneId::from_uuid(uuid::Uuid::from_u128(n))
    }

    #[test]
    fn mounts_new_panes_and_closes_removed_ones() {
        let mut tree = Tree::new(0.05);
        let a = pid(1);
        tree.insert_root(LeafNode::new(a, WidgetId::new("a"))).unwrap();

        let mut reconciler: Reconciler<&'static str> = Reconciler::new();
        let mut provider = TestProvider { closed: Vec::new(), fail_for: None };
        reconciler.reconcile(None, None, &tree, &mut provider);
        assert!(reconciler.widget_handle(a).is_some());

        let b = pid(2);
        let old_root = tree.root().cloned();
        tree.split_leaf(a, LeafNode::new(b, WidgetId::new("b")), Orientation::Horizontal, ChildSlot::Second, 0.5)
            .unwrap();
        reconciler.reconcile(old_root.as_ref(), Some(a), &tree, &mut provider);
        assert!(reconciler.widget_handle(b).is_some());

        let old_root = tree.root().cloned();
        tree.close_pane(b).unwrap();
        reconciler.reconcile(old_root.as_ref(), Some(a), &tree, &mut provider);
        assert!(reconciler.widget_handle(b).is_none());
        assert_eq!(provider.closed, vec![b]);
    }

    #[test]
    fn provider_failure_installs_placeholder() {
        let mut tree = Tree::new(0.05);
        let a = pid(1);
        tree.insert_root(LeafNode::new(a, WidgetId::new("a"))).unwrap();

        let mut reconciler: Reconciler<&'static str> = Reconciler::new();
        let mut provider = TestProvider { closed: Vec::new(), fail_for: Some(a) };
        let outcome = reconciler.reconcile(None, None, &tree, &mut provider);
        assert!(reconciler.widget_handle(a).is_none());
        assert_eq!(outcome.failures, vec![(a, WidgetId::new("a"))]);
    }

    #[test]
    fn fallback_focus_is_first_surviving_leaf() {
        let mut tree = Tree::new(0.05);
        let a = pid(1);
        tree.insert_root(LeafNode::new(a, WidgetId::new("a"))).unwrap();
        let b = pid(2);
        tree.split_leaf(a, LeafNode::new(b, WidgetId::new("b")), Orientation::Horizontal, ChildSlot::Second, 0.5)
            .unwrap();

        let mut reconciler: Reconciler<&'static str> = Reconciler::new();
        let mut provider = TestProvider { closed: Vec::new(), fail_for: None };
        reconciler.reconcile(None, None, &tree, &mut provider);

        let old_root = tree.root().cloned();
        tree.close_pane(a).unwrap();
        let outcome = reconciler.reconcile(old_root.as_ref(), Some(a), &tree, &mut provider);
        assert_eq!(outcome.fallback_focus, Some(b));
    }
}
