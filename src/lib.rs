//! MultiSplit: a recursive, binary-tree split-pane layout engine.
//!
//! The crate is organized in the same three strictly-downward layers the
//! design follows: [`model`] (the immutable tree and its invariants),
//! [`controller`] (the sole writer to the model, via [`Engine`]), and the
//! view-facing [`reconciler`] and [`geometry`] modules that read the model
//! but never mutate it. [`focus`] and [`serialization`] sit alongside the
//! view layer, as pure functions over a [`model::Tree`].
//!
//! A host embeds the engine, implements [`reconciler::WidgetProvider`] to
//! create/destroy its own widgets, and optionally implements
//! [`model::Observer`] to learn about tree/focus/selection changes.

pub mod config;
pub mod controller;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod ids;
pub mod model;
pub mod reconciler;
pub mod serialization;

#[cfg(test)]
mod tests;

pub use config::EngineConfig;
pub use controller::{CommandKind, Engine, Transaction};
pub use error::{Error, InvariantKind, Result};
pub use focus::Direction;
pub use geometry::{GeometryMap, HandleRect, PaneGeometry, Rect};
pub use ids::{PaneId, PaneIdGenerator, SeededPaneIdGenerator, UuidPaneIdGenerator, WidgetId};
pub use model::{ChildSlot, LeafNode, Node, Observer, Orientation, SplitNode, Tree};
pub use reconciler::{ReconcileOutcome, Reconciler, WidgetProvider};
