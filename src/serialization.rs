//! Encodes and decodes a [`Tree`] to the JSON schema from spec §4.6.
//!
//! The wire types are a deliberately separate shape from [`crate::model::Node`]:
//! they carry a `kind` tag, a two-letter orientation code, and an
//! `#[serde(flatten)]` bucket for fields this version doesn't know about,
//! so that round-tripping through a newer writer never silently drops data.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::ids::{PaneId, WidgetId, MAX_WIDGET_ID_LEN};
use crate::model::{Node, Orientation};

/// Bumped on incompatible schema changes. Decoders reject anything with a
/// higher version than this.
pub const CURRENT_VERSION: u16 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum WireOrientation {
    #[serde(rename = "H")]
    Horizontal,
    #[serde(rename = "V")]
    Vertical,
}

impl From<Orientation> for WireOrientation {
    fn from(value: Orientation) -> Self {
        match value {
            Orientation::Horizontal => Self::Horizontal,
            Orientation::Vertical => Self::Vertical,
        }
    }
}

impl From<WireOrientation> for Orientation {
    fn from(value: WireOrientation) -> Self {
        match value {
            WireOrientation::Horizontal => Self::Horizontal,
            WireOrientation::Vertical => Self::Vertical,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum WireNode {
    Leaf {
        pane_id: PaneId,
        widget_id: WidgetId,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Split {
        orientation: WireOrientation,
        ratios: [f64; 2],
        children: Vec<WireNode>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct WireTree {
    version: u16,
    revision: u64,
    focused: Option<PaneId>,
    root: Option<WireNode>,
}

fn encode_node(node: &Rc<Node>) -> WireNode {
    match node.as_ref() {
        Node::Leaf(leaf) => WireNode::Leaf {
            pane_id: leaf.pane_id(),
            widget_id: leaf.widget_id().clone(),
            extra: leaf.extra().clone(),
        },
        Node::Split(split) => WireNode::Split {
            orientation: split.orientation().into(),
            ratios: split.ratios(),
            children: split.children().iter().map(encode_node).collect(),
            extra: split.extra().clone(),
        },
    }
}

fn decode_node(wire: WireNode) -> Result<Rc<Node>, Error> {
    match wire {
        WireNode::Leaf { pane_id, widget_id, extra } => {
            if widget_id.as_str().len() > MAX_WIDGET_ID_LEN {
                return Err(Error::DecodeError(format!(
                    "widget id for pane {pane_id} exceeds {MAX_WIDGET_ID_LEN} bytes"
                )));
            }
            Ok(Node::leaf_with_extra(pane_id, widget_id, extra))
        }
        WireNode::Split {
            orientation,
            ratios,
            children,
            extra,
        } => {
            let [first, second]: [WireNode; 2] = children
                .try_into()
                .map_err(|_| Error::DecodeError("split does not have exactly two children".to_string()))?;
            let children = [decode_node(first)?, decode_node(second)?];
            Ok(Node::split_with_extra(orientation.into(), children, ratios, extra))
        }
    }
}

/// Encodes `tree` to its persisted byte representation.
///
/// `include_focus` resolves spec's open question explicitly: callers that
/// want a layout-only snapshot (e.g. a saved workspace template) pass
/// `false` and get `focused: null` regardless of the live tree's focus.
pub fn encode(tree: &crate::model::Tree, include_focus: bool) -> Vec<u8> {
    let wire = WireTree {
        version: CURRENT_VERSION,
        revision: tree.revision(),
        focused: if include_focus { tree.focused_pane() } else { None },
        root: tree.root().map(encode_node),
    };
    serde_json::to_vec(&wire).expect("WireTree only contains JSON-representable data")
}

/// Decodes a previously `encode`d byte string into a root node and focus,
/// ready to hand to [`crate::model::Tree::install_decoded`] (which
/// re-validates every invariant before committing).
pub fn decode(bytes: &[u8], _min_ratio: f64) -> Result<(Option<Rc<Node>>, Option<PaneId>), Error> {
    let wire: WireTree = serde_json::from_slice(bytes).map_err(|err| Error::DecodeError(err.to_string()))?;
    if wire.version > CURRENT_VERSION {
        return Err(Error::DecodeError(format!(
            "unsupported schema version {} (supported up to {CURRENT_VERSION})",
            wire.version
        )));
    }
    let root = wire.root.map(decode_node).transpose()?;
    Ok((root, wire.focused))
}
