//! The public façade: the sole writer to the [`Tree`], owner of the
//! undo/redo stacks, and the thing a host actually constructs.

use std::cell::Cell;
use std::collections::{BTreeSet, VecDeque};
use std::rc::Rc;

use tracing::warn;

use crate::config::EngineConfig;
use crate::error::Error;
use crate::focus::{self, Direction};
use crate::geometry::{self, GeometryMap, Rect};
use crate::ids::{PaneId, PaneIdGenerator, UuidPaneIdGenerator, WidgetId};
use crate::model::{ChildSlot, LeafNode, Node, NullObserver, Observer, Tree, TreeDelta, TreeSnapshot};
use crate::reconciler::{Reconciler, WidgetProvider};
use crate::serialization;

use super::command::CommandKind;
use super::transaction::Transaction;

struct UndoEntry {
    before: TreeSnapshot,
    after: TreeSnapshot,
    kind: CommandKind,
}

struct PendingTransaction {
    depth: u32,
    before: TreeSnapshot,
    kinds: Vec<CommandKind>,
}

/// Owns the layout tree, the undo/redo history, the widget reconciler, and
/// the viewport used to resolve directional navigation.
///
/// `H` is the host's widget handle type, threaded through unexamined to
/// [`WidgetProvider`].
pub struct Engine<H> {
    tree: Tree,
    config: EngineConfig,
    undo_stack: VecDeque<UndoEntry>,
    redo_stack: VecDeque<UndoEntry>,
    pending_transaction: Option<PendingTransaction>,
    reentrancy_guard: Cell<bool>,
    id_generator: Box<dyn PaneIdGenerator>,
    observer: Box<dyn Observer>,
    reconciler: Reconciler<H>,
    viewport: Rect,
}

impl<H> Engine<H> {
    /// Builds an engine with the default id generator (random UUIDv4) and
    /// no observer registered.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_id_generator(config, Box::new(UuidPaneIdGenerator))
    }

    /// Builds an engine with an explicit id generator, for deterministic
    /// tests or session replay.
    pub fn with_id_generator(config: EngineConfig, id_generator: Box<dyn PaneIdGenerator>) -> Self {
        Self {
            tree: Tree::new(config.min_ratio),
            config,
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            pending_transaction: None,
            reentrancy_guard: Cell::new(false),
            id_generator,
            observer: Box::new(NullObserver),
            reconciler: Reconciler::new(),
            viewport: Rect::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    /// Registers the host's observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: Box<dyn Observer>) {
        self.observer = observer;
    }

    /// Sets the rectangle `navigate` resolves directional probes against.
    /// Grounded in the same "engine owns the current viewport" shape other
    /// layout engines use for view-size-dependent queries.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Read-only access to the current tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The widget handle mounted at `pane_id`, if reconciliation has run
    /// and the provider supplied one.
    pub fn widget_handle(&self, pane_id: PaneId) -> Option<&H> {
        self.reconciler.widget_handle(pane_id)
    }

    /// Computes geometry for the current tree against the configured
    /// viewport.
    pub fn geometry(&self) -> GeometryMap {
        geometry::allocate(&self.tree, self.viewport, self.config.handle_thickness, self.config.min_leaf_size)
    }

    // --- Command surface (spec 6.2) -------------------------------------

    /// Creates the very first pane in an empty tree. Not itself undoable as
    /// a structural command (there is nothing to split), but it does push
    /// an undo entry like every other mutation, so `undo` after the very
    /// first call empties the tree again.
    pub fn insert_initial(&mut self, widget_id: impl Into<WidgetId>, provider: &mut dyn WidgetProvider<H>) -> Result<PaneId, Error> {
        self.guard_reentrancy()?;
        let before = self.tree.snapshot();
        let widget_id = widget_id.into();
        let pane_id = self.id_generator.generate();
        let result = self.tree.insert_root(LeafNode::new(pane_id, widget_id.clone()));
        let delta = match result {
            Ok(delta) => delta,
            Err(err) => {
                self.release_reentrancy();
                warn!(?err, "insert_initial rejected");
                return Err(err);
            }
        };
        self.record(
            before,
            CommandKind::InsertInitial {
                new_widget_id: widget_id,
                new_pane_id: pane_id,
            },
            delta,
            provider,
        );
        self.release_reentrancy();
        Ok(pane_id)
    }

    pub fn split(
        &mut self,
        target: PaneId,
        direction: Direction,
        new_widget_id: impl Into<WidgetId>,
        ratio: f64,
        provider: &mut dyn WidgetProvider<H>,
    ) -> Result<PaneId, Error> {
        self.guard_reentrancy()?;
        let before = self.tree.snapshot();
        let new_widget_id = new_widget_id.into();
        let new_pane_id = self.id_generator.generate();
        let new_leaf = LeafNode::new(new_pane_id, new_widget_id.clone());
        let result = self.tree.split_leaf(target, new_leaf, direction.orientation(), direction.child_slot(), ratio);
        let delta = match result {
            Ok(delta) => delta,
            Err(err) => {
                self.release_reentrancy();
                warn!(?err, pane = ?target, "split rejected");
                return Err(err);
            }
        };
        self.record(
            before,
            CommandKind::Split {
                target,
                direction,
                new_widget_id,
                ratio,
                new_pane_id,
            },
            delta,
            provider,
        );
        self.release_reentrancy();
        Ok(new_pane_id)
    }

    pub fn close(&mut self, target: PaneId, provider: &mut dyn WidgetProvider<H>) -> Result<(), Error> {
        self.guard_reentrancy()?;
        let before = self.tree.snapshot();
        let result = self.tree.close_pane(target);
        let delta = match result {
            Ok(delta) => delta,
            Err(err) => {
                self.release_reentrancy();
                warn!(?err, pane = ?target, "close rejected");
                return Err(err);
            }
        };
        self.record(before, CommandKind::Close { target }, delta, provider);
        self.release_reentrancy();
        Ok(())
    }

    pub fn move_pane(
        &mut self,
        source: PaneId,
        target: PaneId,
        direction: Direction,
        provider: &mut dyn WidgetProvider<H>,
    ) -> Result<(), Error> {
        self.guard_reentrancy()?;
        let before = self.tree.snapshot();
        let result = self.tree.move_pane(source, target, direction.orientation(), direction.child_slot());
        let delta = match result {
            Ok(delta) => delta,
            Err(err) => {
                self.release_reentrancy();
                warn!(?err, ?source, ?target, "move rejected");
                return Err(err);
            }
        };
        self.record(before, CommandKind::Move { source, target, direction }, delta, provider);
        self.release_reentrancy();
        Ok(())
    }

    pub fn resize(&mut self, split_path: &[ChildSlot], ratios: (f64, f64), provider: &mut dyn WidgetProvider<H>) -> Result<(), Error> {
        self.guard_reentrancy()?;
        let before = self.tree.snapshot();
        let result = self.tree.set_ratios(split_path, [ratios.0, ratios.1]);
        let (clamped, delta) = match result {
            Ok(ok) => ok,
            Err(err) => {
                self.release_reentrancy();
                warn!(?err, "resize rejected");
                return Err(err);
            }
        };
        self.record(
            before,
            CommandKind::Resize {
                split_path: split_path.to_vec(),
                ratios: clamped,
            },
            delta,
            provider,
        );
        self.release_reentrancy();
        Ok(())
    }

    pub fn replace_widget(&mut self, target: PaneId, new_widget_id: impl Into<WidgetId>, provider: &mut dyn WidgetProvider<H>) -> Result<(), Error> {
        self.guard_reentrancy()?;
        let before = self.tree.snapshot();
        let new_widget_id = new_widget_id.into();
        let result = self.tree.replace_widget(target, new_widget_id.clone());
        let (_old_widget_id, delta) = match result {
            Ok(ok) => ok,
            Err(err) => {
                self.release_reentrancy();
                warn!(?err, pane = ?target, "replace_widget rejected");
                return Err(err);
            }
        };
        self.record(before, CommandKind::ReplaceWidget { target, new_widget_id }, delta, provider);
        self.release_reentrancy();
        Ok(())
    }

    pub fn set_focus(&mut self, pane: Option<PaneId>, provider: &mut dyn WidgetProvider<H>) -> Result<(), Error> {
        self.guard_reentrancy()?;
        let before = self.tree.snapshot();
        let result = self.tree.set_focus(pane);
        let delta = match result {
            Ok(delta) => delta,
            Err(err) => {
                self.release_reentrancy();
                warn!(?err, ?pane, "set_focus rejected");
                return Err(err);
            }
        };
        self.record(before, CommandKind::SetFocus { pane }, delta, provider);
        self.release_reentrancy();
        Ok(())
    }

    pub fn set_selection(&mut self, panes: BTreeSet<PaneId>, provider: &mut dyn WidgetProvider<H>) -> Result<(), Error> {
        self.guard_reentrancy()?;
        let before = self.tree.snapshot();
        let panes_vec: Vec<PaneId> = panes.iter().copied().collect();
        let result = self.tree.set_selection(panes);
        let delta = match result {
            Ok(delta) => delta,
            Err(err) => {
                self.release_reentrancy();
                warn!(?err, "set_selection rejected");
                return Err(err);
            }
        };
        self.record(before, CommandKind::SetSelection { panes: panes_vec }, delta, provider);
        self.release_reentrancy();
        Ok(())
    }

    /// Moves focus to whichever leaf's rectangle lies in `direction` from
    /// the currently focused pane. If there is no focused pane, or no leaf
    /// lies in that direction, emits `focus_navigation_blocked` instead of
    /// an error — blocked navigation is not a failure, per spec.
    pub fn navigate(&mut self, direction: Direction, provider: &mut dyn WidgetProvider<H>) -> Result<(), Error> {
        let Some(from) = self.tree.focused_pane() else {
            return Ok(());
        };
        let geometry = self.geometry();
        match focus::navigate(&self.tree, &geometry, from, direction) {
            Some(target) => self.set_focus(Some(target), provider),
            None => {
                self.observer.focus_navigation_blocked(from, direction);
                Ok(())
            }
        }
    }

    /// Focuses the next leaf in in-order traversal, wrapping at the end.
    pub fn focus_next(&mut self, provider: &mut dyn WidgetProvider<H>) -> Result<(), Error> {
        let Some(from) = self.tree.focused_pane() else {
            return Ok(());
        };
        if let Some(target) = focus::focus_next(&self.tree, from) {
            self.set_focus(Some(target), provider)?;
        }
        Ok(())
    }

    /// Focuses the previous leaf in in-order traversal, wrapping at the start.
    pub fn focus_previous(&mut self, provider: &mut dyn WidgetProvider<H>) -> Result<(), Error> {
        let Some(from) = self.tree.focused_pane() else {
            return Ok(());
        };
        if let Some(target) = focus::focus_previous(&self.tree, from) {
            self.set_focus(Some(target), provider)?;
        }
        Ok(())
    }

    // --- Undo / redo ------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The undo stack's recorded commands, oldest first, as a replayable
    /// session log (spec §4.2: "commands are serializable for tests and
    /// optional session replay"). A committed transaction appears as one
    /// `CommandKind::Transaction` entry, matching how it undoes/redoes as a
    /// single unit.
    pub fn history(&self) -> impl Iterator<Item = &CommandKind> {
        self.undo_stack.iter().map(|entry| &entry.kind)
    }

    /// Serializes [`Self::history`] to JSON, for a host that wants to save
    /// a session's command log rather than (or alongside) a tree snapshot.
    pub fn serialize_history(&self) -> Vec<u8> {
        let kinds: Vec<&CommandKind> = self.history().collect();
        serde_json::to_vec(&kinds).expect("history only contains JSON-representable data")
    }

    pub fn undo(&mut self, provider: &mut dyn WidgetProvider<H>) -> Result<(), Error> {
        self.guard_reentrancy()?;
        let Some(entry) = self.undo_stack.pop_back() else {
            self.release_reentrancy();
            warn!("undo rejected: history is empty");
            return Err(Error::EmptyUndoRedo);
        };
        let old_root = self.tree.root().cloned();
        let old_focus = self.tree.focused_pane();
        let delta = self.tree.restore(entry.before.clone());

        self.redo_stack.push_back(entry);
        self.finish_mutation(old_root, old_focus, delta, provider);
        self.release_reentrancy();
        Ok(())
    }

    pub fn redo(&mut self, provider: &mut dyn WidgetProvider<H>) -> Result<(), Error> {
        self.guard_reentrancy()?;
        let Some(entry) = self.redo_stack.pop_back() else {
            self.release_reentrancy();
            warn!("redo rejected: history is empty");
            return Err(Error::EmptyUndoRedo);
        };
        let old_root = self.tree.root().cloned();
        let old_focus = self.tree.focused_pane();
        let delta = self.tree.restore(entry.after.clone());

        self.undo_stack.push_back(entry);
        self.finish_mutation(old_root, old_focus, delta, provider);
        self.release_reentrancy();
        Ok(())
    }

    // --- Transactions -----------------------------------------------------

    /// Opens a transaction scope. Commands executed through this same
    /// `Engine` while the returned guard is alive are grouped into a single
    /// undo entry on [`Transaction::commit`], or fully reverted if the
    /// guard is dropped (or [`Transaction::rollback`] is called) first.
    pub fn begin_transaction(&mut self) -> Transaction<'_, H> {
        Transaction::new(self)
    }

    pub(super) fn start_transaction(&mut self) {
        match &mut self.pending_transaction {
            Some(pending) => pending.depth += 1,
            None => {
                self.pending_transaction = Some(PendingTransaction {
                    depth: 1,
                    before: self.tree.snapshot(),
                    kinds: Vec::new(),
                });
            }
        }
    }

    /// Resolves the outermost transaction in a group.
    ///
    /// Reconciliation and observer callbacks are deferred for every command
    /// recorded while a transaction is open (see [`Self::record`]) and only
    /// run here, once, comparing the tree as it was when the transaction
    /// began to the tree as it stands now. A rollback restores that
    /// starting state and notifies nobody — per spec, a transaction that
    /// never commits "emits no final change", so the reconciler never even
    /// learns panes created and closed inside it ever existed.
    pub(super) fn end_transaction(&mut self, commit: bool, provider: Option<&mut dyn WidgetProvider<H>>) {
        let Some(pending) = &mut self.pending_transaction else {
            return;
        };
        pending.depth -= 1;
        if pending.depth > 0 {
            return;
        }
        let pending = self.pending_transaction.take().expect("just checked Some");

        if !commit {
            self.tree.restore(pending.before);
            return;
        }
        if pending.kinds.is_empty() {
            return;
        }

        let old_root = pending.before.root().cloned();
        let old_focus = pending.before.focused_pane_id();
        let old_selection = pending.before.selection().clone();

        match provider {
            Some(provider) if self.guard_reentrancy().is_ok() => {
                self.notify(old_root, old_focus, old_selection, provider);
                self.release_reentrancy();
            }
            Some(_) => {
                warn!("transaction commit skipped reconciliation: engine is already mutating (reentrant commit)");
            }
            None => {
                warn!("transaction committed without a provider; reconciliation and observer callbacks were skipped");
            }
        }

        let after = self.tree.snapshot();
        self.undo_stack.push_back(UndoEntry {
            before: pending.before,
            after,
            kind: CommandKind::Transaction(pending.kinds),
        });
        self.redo_stack.clear();
        self.trim_undo_stack();
    }

    fn in_transaction(&self) -> bool {
        self.pending_transaction.is_some()
    }

    // --- Persistence --------------------------------------------------

    /// Serializes the current tree. `include_focus` resolves the spec's
    /// open question explicitly rather than silently picking a default.
    pub fn save(&self, include_focus: bool) -> Vec<u8> {
        serialization::encode(&self.tree, include_focus)
    }

    /// Replaces the entire tree from a previously `save`d byte string.
    /// All-or-nothing: on failure the tree, undo stack, and redo stack are
    /// left completely untouched.
    pub fn load(&mut self, bytes: &[u8], provider: &mut dyn WidgetProvider<H>) -> Result<(), Error> {
        self.guard_reentrancy()?;
        let decoded = serialization::decode(bytes, self.config.min_ratio);
        let result = decoded.and_then(|(root, focus)| self.tree.install_decoded(root, focus));
        let delta = match result {
            Ok(delta) => delta,
            Err(err) => {
                self.release_reentrancy();
                warn!(?err, "load rejected");
                return Err(err);
            }
        };

        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending_transaction = None;
        self.finish_mutation(delta.old_root.clone(), delta.old_focus, delta, provider);
        self.release_reentrancy();
        Ok(())
    }

    // --- Internal plumbing ------------------------------------------------

    fn guard_reentrancy(&self) -> Result<(), Error> {
        if self.reentrancy_guard.get() {
            warn!("command rejected: engine is already mutating (reentrant call from a callback)");
            return Err(Error::ReentrantMutation);
        }
        self.reentrancy_guard.set(true);
        Ok(())
    }

    fn release_reentrancy(&self) {
        self.reentrancy_guard.set(false);
    }

    /// Records one executed command. While a transaction is open this only
    /// accumulates `kind` into it — reconciliation and observer callbacks
    /// are deferred to [`Self::end_transaction`], so a command applied and
    /// then rolled back inside the same transaction is never reconciled at
    /// all.
    fn record(&mut self, before: TreeSnapshot, kind: CommandKind, delta: TreeDelta, provider: &mut dyn WidgetProvider<H>) {
        if self.in_transaction() {
            if let Some(pending) = &mut self.pending_transaction {
                pending.kinds.push(kind);
            }
            return;
        }

        let old_root = delta.old_root.clone();
        let old_focus = delta.old_focus;
        let old_selection = delta.old_selection.clone();

        // notify() must run before the "after" snapshot is captured: the
        // reconciler's fallback-focus side effect (spec step 8) mutates the
        // tree, and the undo entry has to remember that mutated state, not
        // the state right after the command itself applied.
        self.notify(old_root, old_focus, old_selection, provider);

        let after = self.tree.snapshot();
        self.undo_stack.push_back(UndoEntry { before, after, kind });
        self.redo_stack.clear();
        self.trim_undo_stack();
    }

    fn finish_mutation(&mut self, old_root: Option<Rc<Node>>, old_focus: Option<PaneId>, delta: TreeDelta, provider: &mut dyn WidgetProvider<H>) {
        self.notify(old_root, old_focus, delta.old_selection, provider);
    }

    fn notify(&mut self, old_root: Option<Rc<Node>>, old_focus: Option<PaneId>, old_selection: BTreeSet<PaneId>, provider: &mut dyn WidgetProvider<H>) {
        let new_root = self.tree.root().cloned();
        let structural = match (&old_root, &new_root) {
            (Some(a), Some(b)) => !Rc::ptr_eq(a, b),
            (None, None) => false,
            _ => true,
        };

        if structural {
            let outcome = self.reconciler.reconcile(old_root.as_ref(), old_focus, &self.tree, provider);
            for (pane_id, widget_id) in &outcome.failures {
                warn!(err = %Error::ProviderFailure(*pane_id), %widget_id, "provider declined to produce a widget");
                self.observer.provider_failed(*pane_id, widget_id);
            }
            if let Some(fallback_pane) = outcome.fallback_focus {
                if let Err(err) = self.tree.set_focus(Some(fallback_pane)) {
                    warn!(?err, "failed to apply reconciliation fallback focus");
                }
            }
            self.observer.tree_changed(self.tree.revision());
        }

        if old_focus != self.tree.focused_pane() {
            self.observer.focus_changed(self.tree.focused_pane());
        }
        if old_selection != *self.tree.selection() {
            self.observer.selection_changed(self.tree.selection());
        }
    }

    fn trim_undo_stack(&mut self) {
        while self.undo_stack.len() > self.config.undo_capacity {
            self.undo_stack.pop_front();
        }
    }
}
