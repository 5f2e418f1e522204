//! The Controller layer: the sole writer to the Model.
//!
//! Every structural change reaches [`Tree`](crate::model::Tree) through
//! [`Engine`], which records it as a [`CommandKind`] for undo/redo and
//! drives the reconciler and observer afterward.

mod command;
mod engine;
mod transaction;

pub use command::CommandKind;
pub use engine::Engine;
pub use transaction::Transaction;
