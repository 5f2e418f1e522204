//! The commands the engine's public API assembles and records.
//!
//! `CommandKind` is the serializable, replayable description of a single
//! structural or focus change; it carries exactly the parameters spec's
//! command table lists, including values the engine itself resolved during
//! execution (a split's generated `PaneId`, a resize's clamped ratios) so
//! that `undo`/`redo` and session replay see the exact values that were
//! actually applied, not just the caller's request.

use serde::{Deserialize, Serialize};

use crate::focus::Direction;
use crate::ids::{PaneId, WidgetId};
use crate::model::ChildSlot;

/// One recorded mutation, or a flattened group of them (a committed
/// transaction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CommandKind {
    InsertInitial {
        new_widget_id: WidgetId,
        new_pane_id: PaneId,
    },
    Split {
        target: PaneId,
        direction: Direction,
        new_widget_id: WidgetId,
        ratio: f64,
        new_pane_id: PaneId,
    },
    Close {
        target: PaneId,
    },
    Move {
        source: PaneId,
        target: PaneId,
        direction: Direction,
    },
    Resize {
        split_path: Vec<ChildSlot>,
        /// The ratios actually stored, after clamping to `[epsilon, 1 - epsilon]`.
        ratios: [f64; 2],
    },
    ReplaceWidget {
        target: PaneId,
        new_widget_id: WidgetId,
    },
    SetFocus {
        pane: Option<PaneId>,
    },
    SetSelection {
        panes: Vec<PaneId>,
    },
    /// A committed transaction: nested transactions are flattened into one
    /// of these, in execution order.
    Transaction(Vec<CommandKind>),
}
