//! Scoped grouping of commands into a single undo entry.
//!
//! Mirrors the borrow-guard shape this codebase already uses elsewhere
//! (acquire on construction, release via an explicit consuming call or on
//! `Drop`): a [`Transaction`] borrows the engine mutably for its lifetime,
//! so no other command can execute outside the transaction while one is
//! open, and letting it fall out of scope without [`Transaction::commit`]
//! rolls everything in it back.

use std::ops::{Deref, DerefMut};

use super::engine::Engine;
use crate::reconciler::WidgetProvider;

/// An open transaction scope. Call [`Self::commit`] to keep the changes
/// made inside it as one undo entry, or let it drop (or call
/// [`Self::rollback`] explicitly) to revert them.
pub struct Transaction<'e, H> {
    engine: &'e mut Engine<H>,
    resolved: bool,
}

impl<'e, H> Transaction<'e, H> {
    pub(super) fn new(engine: &'e mut Engine<H>) -> Self {
        engine.start_transaction();
        Self {
            engine,
            resolved: false,
        }
    }

    /// Commits every command executed inside this transaction as a single
    /// undo entry, then reconciles and notifies the observer exactly once
    /// for the net change between the transaction's start and its end.
    /// Nested transactions (a transaction begun while another is already
    /// open) are flattened: only the outermost commit actually pushes an
    /// undo entry and runs reconciliation. `provider` is the same
    /// [`WidgetProvider`] every command executed inside the transaction was
    /// given.
    pub fn commit(mut self, provider: &mut dyn WidgetProvider<H>) {
        self.resolved = true;
        self.engine.end_transaction(true, Some(provider));
    }

    /// Reverts every command executed inside this transaction. The tree is
    /// restored to exactly the state it had when the transaction began, and
    /// nothing is reconciled or reported to the observer — the reconciler
    /// never learns that panes created and closed inside the transaction
    /// ever existed.
    pub fn rollback(mut self) {
        self.resolved = true;
        self.engine.end_transaction(false, None);
    }
}

impl<H> Drop for Transaction<'_, H> {
    fn drop(&mut self) {
        if !self.resolved {
            self.engine.end_transaction(false, None);
        }
    }
}

// Deref/DerefMut let callers issue ordinary commands (`txn.split(...)`,
// `txn.close(...)`) straight through the guard instead of needing a
// separate "transactional command" API; `start_transaction` is what makes
// those calls group into one undo entry rather than one each.
impl<H> Deref for Transaction<'_, H> {
    type Target = Engine<H>;

    fn deref(&self) -> &Self::Target {
        self.engine
    }
}

impl<H> DerefMut for Transaction<'_, H> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.engine
    }
}
