//! The render target: an arena-backed in-memory DOM.
//!
//! - [`arena`] - slotmap node storage, structural/attribute/text operations
//! - [`mutation`] - the mutation journal (MutationObserver analog)
//! - [`ops`] - VNode-aware element creation and attribute syncing

pub mod arena;
pub mod mutation;
pub mod ops;

pub use arena::{DomArena, NodeData, NodeId};
pub use mutation::{MutationJournal, MutationRecord};
