//! Error kinds surfaced across the engine's public API.
//!
//! Validation errors never leave the model partially mutated: every
//! `Result::Err` here means the tree the caller can still observe is exactly
//! the tree it had before the call.

use thiserror::Error;

use crate::ids::PaneId;

/// Which structural invariant a rejected mutation would have broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantKind {
    /// Every split must have exactly two children.
    Binary,
    /// A split's ratios must sum to 1.0 within tolerance.
    RatioSum,
    /// Each ratio must be within `[epsilon, 1 - epsilon]`.
    RatioBounds,
    /// No `PaneId` may appear twice in the tree.
    UniqueIdentity,
    /// The tree must be a strict DAG with single parents.
    NoCycles,
    /// `focused_pane_id`, if set, must name a leaf that still exists.
    FocusedPaneLive,
}

impl std::fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Binary => "binary rule",
            Self::RatioSum => "ratio sum",
            Self::RatioBounds => "ratio bounds",
            Self::UniqueIdentity => "unique identity",
            Self::NoCycles => "no cycles",
            Self::FocusedPaneLive => "focused pane is live",
        };
        f.write_str(name)
    }
}

/// Every way a command or decode can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// A command referenced a pane that does not exist in the current tree.
    #[error("pane not found: {0}")]
    PaneNotFound(PaneId),

    /// Applying a change would have produced a tree violating an invariant.
    /// The model was left unchanged.
    #[error("invariant violation ({which}): {detail}")]
    InvariantViolation {
        which: InvariantKind,
        detail: String,
    },

    /// A move's target was the source pane itself, or a descendant of it.
    #[error("invalid move: target is the source pane or one of its descendants")]
    InvalidMove,

    /// A notification callback attempted to call back into `apply` while
    /// one was already running.
    #[error("reentrant mutation: apply() was called from within a notification callback")]
    ReentrantMutation,

    /// The widget provider failed (returned `None` or panicked) while
    /// creating a widget for `pane_id`. The reconciler installed a
    /// placeholder and the tree remains valid; this variant is informational.
    #[error("widget provider failed to produce a widget for pane {0}")]
    ProviderFailure(PaneId),

    /// Deserialization failed: malformed JSON, unsupported schema version,
    /// missing fields, or an invariant violation in the decoded tree.
    #[error("failed to decode persisted tree: {0}")]
    DecodeError(String),

    /// `undo` or `redo` was called with nothing on the corresponding stack.
    #[error("no command available to undo/redo")]
    EmptyUndoRedo,
}

/// Convenience alias used throughout the crate's public API.
pub type Result<T, E = Error> = std::result::Result<T, E>;
