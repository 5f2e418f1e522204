//! Pane and widget identity.
//!
//! [`PaneId`] is the engine's own notion of identity: assigned once when a
//! leaf is created, carried unchanged through every later split, close,
//! move, or resize. [`WidgetId`] is the opposite — an opaque string the host
//! hands us and gets back unexamined. The engine never parses, hashes for
//! meaning, or otherwise interprets a `WidgetId`; it only compares and
//! copies it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length, in bytes, of a persisted [`WidgetId`] (see the decoder's
/// `DecodeError` policy).
pub const MAX_WIDGET_ID_LEN: usize = 1024;

/// Stable, globally unique identifier for a pane.
///
/// Never reused, never changes for the lifetime of the pane it names, and
/// is the only thing [`crate::model::Tree`] uses to track identity across
/// mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(Uuid);

impl PaneId {
    /// Constructs a `PaneId` from a raw `Uuid`. Exposed for generators and
    /// tests; application code should treat the result as opaque.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying `Uuid`, for hosts that want to log or key on it.
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Host-assigned, opaque key passed back to the [`crate::reconciler::WidgetProvider`]
/// to reconstruct a widget. MultiSplit's only operations on it are equality
/// and copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    /// Wraps a host-supplied string as a `WidgetId`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrows the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for WidgetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for WidgetId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Generates fresh [`PaneId`]s for newly created leaves.
///
/// Injected into [`crate::controller::Engine`] so tests can seed a
/// deterministic sequence instead of depending on real randomness; redo
/// never calls the generator again, it replays the exact id the original
/// execute recorded.
pub trait PaneIdGenerator {
    /// Returns a fresh, never-before-seen `PaneId`.
    fn generate(&mut self) -> PaneId;
}

/// The default generator: backed by random UUIDv4s.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidPaneIdGenerator;

impl PaneIdGenerator for UuidPaneIdGenerator {
    fn generate(&mut self) -> PaneId {
        PaneId(Uuid::new_v4())
    }
}

/// A deterministic generator for tests: produces ids derived from an
/// incrementing counter seeded at construction, so the same sequence of
/// commands always assigns the same pane ids.
#[derive(Debug, Clone)]
pub struct SeededPaneIdGenerator {
    next: u64,
}

impl SeededPaneIdGenerator {
    /// Creates a generator whose first id is derived from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { next: seed }
    }
}

impl Default for SeededPaneIdGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PaneIdGenerator for SeededPaneIdGenerator {
    fn generate(&mut self) -> PaneId {
        let id = self.next;
        self.next += 1;
        PaneId(Uuid::from_u128(id as u128))
    }
}
