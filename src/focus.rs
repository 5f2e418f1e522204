//! Directional and sequential focus navigation.
//!
//! Pure functions over a [`Tree`] and a [`GeometryMap`] — nothing here
//! mutates either; [`crate::controller::Engine::navigate`] is the only
//! caller, and it turns the result into a `SetFocusCommand`.

use serde::{Deserialize, Serialize};

use crate::geometry::GeometryMap;
use crate::ids::PaneId;
use crate::model::Tree;

/// A direction for spatial navigation, move, and split placement.
///
/// Spec prose uses `{Left,Right,Top,Bottom}` for split/move placement and
/// `{Left,Right,Up,Down}` for navigation; both name the same four
/// directions, so this crate uses one enum throughout (`Top`/`Bottom` are
/// just prose synonyms for `Up`/`Down`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// The direction pointing back the way this one came from.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Whether this direction splits/navigates along the horizontal axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Whether this direction splits/navigates along the vertical axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    pub(crate) fn orientation(self) -> crate::model::Orientation {
        if self.is_horizontal() {
            crate::model::Orientation::Horizontal
        } else {
            crate::model::Orientation::Vertical
        }
    }

    /// Whether placing a new/moved pane in this direction puts it in the
    /// split's first or second slot (Left/Up come before, Right/Down come
    /// after).
    pub(crate) fn child_slot(self) -> crate::model::ChildSlot {
        match self {
            Self::Left | Self::Up => crate::model::ChildSlot::First,
            Self::Right | Self::Down => crate::model::ChildSlot::Second,
        }
    }
}

/// Finds the pane that directional navigation from `from` in `direction`
/// should focus, using `geometry` to locate rectangles.
///
/// Implements spec's probe-point algorithm: project a point just past the
/// edge of `from`'s rectangle in `direction`, then find whichever other
/// leaf's rectangle contains it. Returns `None` if no leaf contains the
/// probe point (the outer boundary was reached).
pub fn navigate(tree: &Tree, geometry: &GeometryMap, from: PaneId, direction: Direction) -> Option<PaneId> {
    let from_rect = geometry.leaves.get(&from)?.rect;

    let (px, py) = match direction {
        Direction::Left => (from_rect.x - 1.0, from_rect.y + from_rect.h / 2.0),
        Direction::Right => (from_rect.x + from_rect.w + 1.0, from_rect.y + from_rect.h / 2.0),
        Direction::Up => (from_rect.x + from_rect.w / 2.0, from_rect.y - 1.0),
        Direction::Down => (from_rect.x + from_rect.w / 2.0, from_rect.y + from_rect.h + 1.0),
    };

    for pane_id in tree.pane_ids() {
        if pane_id == from {
            continue;
        }
        if let Some(geom) = geometry.leaves.get(&pane_id) {
            if geom.rect.contains(px, py) {
                return Some(pane_id);
            }
        }
    }
    None
}

/// The leaf that follows `from` in the tree's in-order sequence, wrapping
/// to the first leaf when `from` is last. Returns `None` for an empty tree
/// or a `from` no longer present.
pub fn focus_next(tree: &Tree, from: PaneId) -> Option<PaneId> {
    let ids: Vec<PaneId> = tree.pane_ids().collect();
    let idx = ids.iter().position(|&id| id == from)?;
    Some(ids[(idx + 1) % ids.len()])
}

/// The leaf that precedes `from` in the tree's in-order sequence, wrapping
/// to the last leaf when `from` is first.
pub fn focus_previous(tree: &Tree, from: PaneId) -> Option<PaneId> {
    let ids: Vec<PaneId> = tree.pane_ids().collect();
    let idx = ids.iter().position(|&id| id == from)?;
    Some(ids[(idx + ids.len() - 1) % ids.len()])
}
