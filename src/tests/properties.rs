//! Property-based tests (spec section 8, P1-P10) driving random sequences
//! of commands through the public `Engine` facade.
//!
//! `CommandOp` describes one step in a random walk; every field is a plain
//! integer so `proptest_derive::Arbitrary` can derive a strategy for it
//! without hand-written generators. The interpreter below maps those
//! integers onto whichever panes/splits currently exist, skipping a step
//! rather than failing the case when there is nothing valid to act on
//! (e.g. `Move` with fewer than two panes).

use std::collections::HashSet;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::config::EngineConfig;
use crate::controller::Engine;
use crate::focus::Direction;
use crate::geometry::{GeometryMap, Rect};
use crate::ids::WidgetId;
use crate::model::{ChildSlot, Node, Orientation, Tree};
use crate::reconciler::WidgetProvider;

struct NullProvider;

impl WidgetProvider<()> for NullProvider {
    fn provide_widget(&mut self, _widget_id: &WidgetId, _pane_id: crate::ids::PaneId) -> Option<()> {
        Some(())
    }

    fn widget_closing(&mut self, _widget_id: &WidgetId, _pane_id: crate::ids::PaneId, _handle: Option<()>) {}
}

#[derive(Debug, Clone, Arbitrary)]
enum CommandOp {
    Split {
        target_seed: u32,
        dir_seed: u8,
        ratio_seed: u8,
    },
    Close {
        target_seed: u32,
    },
    Move {
        source_seed: u32,
        target_seed: u32,
        dir_seed: u8,
    },
    Resize {
        split_seed: u32,
        ratio_seed: u8,
    },
    SetFocus {
        target_seed: u32,
    },
}

fn direction_from_seed(seed: u8) -> Direction {
    match seed % 4 {
        0 => Direction::Left,
        1 => Direction::Right,
        2 => Direction::Up,
        _ => Direction::Down,
    }
}

fn ratio_from_seed(seed: u8) -> f64 {
    0.1 + (seed as f64 / 255.0) * 0.8
}

/// Applies one `CommandOp` against `engine`, silently skipping it if there
/// is no valid target (empty tree, fewer than two panes for a move, no
/// splits yet for a resize). Returns whether a command actually executed.
fn apply_op(engine: &mut Engine<()>, op: &CommandOp) -> bool {
    let mut provider = NullProvider;
    let panes: Vec<_> = engine.tree().pane_ids().collect();
    if panes.is_empty() {
        return false;
    }

    match op {
        CommandOp::Split {
            target_seed,
            dir_seed,
            ratio_seed,
        } => {
            let target = panes[(*target_seed as usize) % panes.len()];
            let direction = direction_from_seed(*dir_seed);
            let ratio = ratio_from_seed(*ratio_seed);
            engine
                .split(target, direction, format!("w{target_seed}"), ratio, &mut provider)
                .is_ok()
        }
        CommandOp::Close { target_seed } => {
            let target = panes[(*target_seed as usize) % panes.len()];
            engine.close(target, &mut provider).is_ok()
        }
        CommandOp::Move {
            source_seed,
            target_seed,
            dir_seed,
        } => {
            if panes.len() < 2 {
                return false;
            }
            let source = panes[(*source_seed as usize) % panes.len()];
            let target = panes[(*target_seed as usize) % panes.len()];
            if source == target {
                return false;
            }
            let direction = direction_from_seed(*dir_seed);
            engine.move_pane(source, target, direction, &mut provider).is_ok()
        }
        CommandOp::Resize { split_seed, ratio_seed } => {
            let handles = engine.geometry().handles;
            if handles.is_empty() {
                return false;
            }
            let path = handles[(*split_seed as usize) % handles.len()].path.clone();
            let ratio = ratio_from_seed(*ratio_seed);
            engine
                .resize(&path, (ratio, 1.0 - ratio), &mut provider)
                .is_ok()
        }
        CommandOp::SetFocus { target_seed } => {
            let target = panes[(*target_seed as usize) % panes.len()];
            engine.set_focus(Some(target), &mut provider).is_ok()
        }
    }
}

/// Recursively collects every split's ratio pair, for P2/P3.
fn collect_ratios(node: &Node, out: &mut Vec<[f64; 2]>) {
    if let Some(split) = node.as_split() {
        out.push(split.ratios());
        for child in split.children() {
            collect_ratios(child, out);
        }
    }
}

fn assert_invariants(tree: &Tree, min_ratio: f64) {
    // P4: pane uniqueness.
    let ids: Vec<_> = tree.pane_ids().collect();
    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len(), "duplicate pane id in {ids:?}");

    // P2/P3: ratio sum and bounds.
    if let Some(root) = tree.root() {
        let mut ratios = Vec::new();
        collect_ratios(root, &mut ratios);
        for [r0, r1] in ratios {
            assert!((r0 + r1 - 1.0).abs() < 1e-6, "ratios {r0}/{r1} do not sum to 1.0");
            assert!(r0 >= min_ratio - 1e-9 && r0 <= 1.0 - min_ratio + 1e-9, "ratio {r0} out of bounds");
        }
    }

    // Focused-pane-is-live.
    if let Some(focused) = tree.focused_pane() {
        assert!(tree.find_leaf(focused).is_some(), "focused pane {focused} is not live");
    }
}

/// Structural fingerprint for undo/redo comparisons (P6/P7): the encoded
/// tree with `revision` stripped out, since revision always advances even
/// when the rest of the structure is restored exactly.
fn fingerprint(tree: &Tree) -> serde_json::Value {
    let bytes = crate::serialization::encode(tree, true);
    let mut value: serde_json::Value = serde_json::from_slice(&bytes).expect("encode always produces valid JSON");
    if let Some(obj) = value.as_object_mut() {
        obj.remove("revision");
    }
    value
}

proptest! {
    /// P1-P4 and focused-pane-liveness hold after every step of a random
    /// command sequence.
    #[test]
    fn invariants_hold_after_random_sequences(ops in prop::collection::vec(any::<CommandOp>(), 0..40)) {
        let mut engine = Engine::<()>::new(EngineConfig::default());
        let mut provider = NullProvider;
        let p1 = engine.insert_initial("seed", &mut provider).unwrap();
        prop_assert!(engine.tree().find_leaf(p1).is_some());

        for op in &ops {
            apply_op(&mut engine, op);
            assert_invariants(engine.tree(), engine.tree().min_ratio());
        }
    }

    /// P6/P7: undoing every applied command all the way back reaches the
    /// starting structure, and redoing the same number of times reaches the
    /// final structure again.
    #[test]
    fn undo_then_redo_is_the_identity_round_trip(ops in prop::collection::vec(any::<CommandOp>(), 0..30)) {
        let mut engine = Engine::<()>::new(EngineConfig::default());
        let mut provider = NullProvider;
        engine.insert_initial("seed", &mut provider).unwrap();
        let start = fingerprint(engine.tree());

        let mut applied = 0usize;
        for op in &ops {
            if apply_op(&mut engine, op) {
                applied += 1;
            }
        }
        let end = fingerprint(engine.tree());

        for _ in 0..applied {
            engine.undo(&mut provider).unwrap();
        }
        prop_assert_eq!(fingerprint(engine.tree()), start);

        for _ in 0..applied {
            engine.redo(&mut provider).unwrap();
        }
        prop_assert_eq!(fingerprint(engine.tree()), end);
        prop_assert!(!engine.can_redo());
    }

    /// P8: encode/decode round-trips an arbitrary tree's structure,
    /// widget ids, ratios, and focus exactly.
    #[test]
    fn serialization_round_trips_arbitrary_trees(ops in prop::collection::vec(any::<CommandOp>(), 0..25)) {
        let mut engine = Engine::<()>::new(EngineConfig::default());
        let mut provider = NullProvider;
        engine.insert_initial("seed", &mut provider).unwrap();
        for op in &ops {
            apply_op(&mut engine, op);
        }
        let before = fingerprint(engine.tree());

        let bytes = engine.save(true);
        let mut reloaded = Engine::<()>::new(EngineConfig::default());
        reloaded.load(&bytes, &mut provider).unwrap();

        prop_assert_eq!(fingerprint(reloaded.tree()), before);
    }

    /// P10: for every split, the children's extent along the split axis
    /// plus the handle thickness reconstructs the parent's extent exactly,
    /// all the way down to the viewport.
    #[test]
    fn geometry_sums_reconstruct_the_viewport(
        ops in prop::collection::vec(any::<CommandOp>(), 0..25),
        vw in 50.0f64..2000.0,
        vh in 50.0f64..2000.0,
    ) {
        let mut engine = Engine::<()>::new(EngineConfig::default());
        let mut provider = NullProvider;
        engine.insert_initial("seed", &mut provider).unwrap();
        for op in &ops {
            apply_op(&mut engine, op);
        }

        let config = EngineConfig::default();
        let viewport = Rect::new(0.0, 0.0, vw, vh);
        let map = crate::geometry::allocate(engine.tree(), viewport, config.handle_thickness, config.min_leaf_size);

        if let Some(root) = engine.tree().root() {
            let w = width_of(root, &map, config.handle_thickness);
            let h = height_of(root, &map, config.handle_thickness);
            prop_assert!((w - vw).abs() < 1e-6, "width {w} != viewport {vw}");
            prop_assert!((h - vh).abs() < 1e-6, "height {h} != viewport {vh}");
        }
    }
}

fn width_of(node: &Node, map: &GeometryMap, handle_thickness: f64) -> f64 {
    match node {
        Node::Leaf(leaf) => map.leaves[&leaf.pane_id()].rect.w,
        Node::Split(split) => {
            let w0 = width_of(split.child(ChildSlot::First), map, handle_thickness);
            let w1 = width_of(split.child(ChildSlot::Second), map, handle_thickness);
            match split.orientation() {
                Orientation::Horizontal => w0 + w1 + handle_thickness,
                Orientation::Vertical => w0.max(w1),
            }
        }
    }
}

fn height_of(node: &Node, map: &GeometryMap, handle_thickness: f64) -> f64 {
    match node {
        Node::Leaf(leaf) => map.leaves[&leaf.pane_id()].rect.h,
        Node::Split(split) => {
            let h0 = height_of(split.child(ChildSlot::First), map, handle_thickness);
            let h1 = height_of(split.child(ChildSlot::Second), map, handle_thickness);
            match split.orientation() {
                Orientation::Vertical => h0 + h1 + handle_thickness,
                Orientation::Horizontal => h0.max(h1),
            }
        }
    }
}
