//! Structural invariant checking.
//!
//! Every successful mutation must leave the tree satisfying all of these;
//! [`validate`] is the single choke point every mutating `Tree` method
//! routes its candidate root through before committing.

use std::collections::HashSet;
use std::rc::Rc;

use crate::error::{Error, InvariantKind};
use crate::ids::PaneId;

use super::node::Node;

/// Floating-point tolerance for the ratio-sum check (spec: 1e-6).
pub const RATIO_TOLERANCE: f64 = 1e-6;

fn violation(which: InvariantKind, detail: impl Into<String>) -> Error {
    Error::InvariantViolation {
        which,
        detail: detail.into(),
    }
}

/// Walks `root`, checking the binary rule, ratio rule, and pane-id
/// uniqueness (which also rules out cycles, since a cycle would make some
/// descendant reappear as the same `Rc` pointer under an ancestor — but we
/// check it directly via id uniqueness, which is simpler to state and to
/// verify for a tree built purely from `Rc::new` calls and structural
/// sharing of *whole* subtrees).
pub(crate) fn validate_tree(root: Option<&Rc<Node>>, min_ratio: f64) -> Result<(), Error> {
    let mut seen = HashSet::new();
    if let Some(root) = root {
        walk(root, min_ratio, &mut seen)?;
    }
    Ok(())
}

fn walk(node: &Rc<Node>, min_ratio: f64, seen: &mut HashSet<PaneId>) -> Result<(), Error> {
    match node.as_ref() {
        Node::Leaf(leaf) => {
            if !seen.insert(leaf.pane_id()) {
                return Err(violation(
                    InvariantKind::UniqueIdentity,
                    format!("pane {} appears more than once in the tree", leaf.pane_id()),
                ));
            }
            Ok(())
        }
        Node::Split(split) => {
            let [r0, r1] = split.ratios();
            if (r0 + r1 - 1.0).abs() >= RATIO_TOLERANCE {
                return Err(violation(
                    InvariantKind::RatioSum,
                    format!("ratios {r0} + {r1} do not sum to 1.0"),
                ));
            }
            if r0 < min_ratio || r0 > 1.0 - min_ratio || r1 < min_ratio || r1 > 1.0 - min_ratio {
                return Err(violation(
                    InvariantKind::RatioBounds,
                    format!("ratios [{r0}, {r1}] fall outside [{min_ratio}, {}]", 1.0 - min_ratio),
                ));
            }
            for child in split.children() {
                walk(child, min_ratio, seen)?;
            }
            Ok(())
        }
    }
}

/// Checks the focused-pane-is-live invariant against an already-validated
/// tree's set of reachable panes.
pub(crate) fn validate_focus(
    root: Option<&Rc<Node>>,
    focused: Option<PaneId>,
) -> Result<(), Error> {
    let Some(focused) = focused else {
        return Ok(());
    };
    let live = root
        .map(|root| root.pane_ids().any(|id| id == focused))
        .unwrap_or(false);
    if live {
        Ok(())
    } else {
        Err(violation(
            InvariantKind::FocusedPaneLive,
            format!("focused pane {focused} does not exist in the tree"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::WidgetId;
    use crate::model::node::Orientation;
    use uuid::Uuid;

    fn leaf(id: u128) -> Rc<Node> {
        Node::leaf(PaneId::from_uuid(Uuid::from_u128(id)), WidgetId::new("w"))
    }

    #[test]
    fn rejects_duplicate_pane_ids() {
        let a = leaf(1);
        let root = Node::split(Orientation::Horizontal, [a.clone(), a], [0.5, 0.5]);
        let err = validate_tree(Some(&root), 0.05).unwrap_err();
        assert!(matches!(
            err,
            Error::InvariantViolation {
                which: InvariantKind::UniqueIdentity,
                ..
            }
        ));
    }

    #[test]
    fn rejects_ratio_sum_drift() {
        let root = Node::split(Orientation::Horizontal, [leaf(1), leaf(2)], [0.5, 0.6]);
        let err = validate_tree(Some(&root), 0.05).unwrap_err();
        assert!(matches!(
            err,
            Error::InvariantViolation {
                which: InvariantKind::RatioSum,
                ..
            }
        ));
    }

    #[test]
    fn rejects_ratio_below_epsilon() {
        let root = Node::split(Orientation::Horizontal, [leaf(1), leaf(2)], [0.01, 0.99]);
        let err = validate_tree(Some(&root), 0.05).unwrap_err();
        assert!(matches!(
            err,
            Error::InvariantViolation {
                which: InvariantKind::RatioBounds,
                ..
            }
        ));
    }
}
