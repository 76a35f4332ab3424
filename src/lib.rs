//! # vellum-dom
//!
//! Incremental DOM reconciliation engine for rich-text editors.
//!
//! The engine patches a live, user-editable DOM tree to match a declarative
//! VNode tree derived from a document model, applying the minimum mutations
//! needed: every superfluous write can retrigger the host's mutation and
//! selection machinery and corrupt IME composition or cursor position.
//!
//! ## Architecture
//!
//! The pipeline is a single synchronous pass per flush:
//! ```text
//! request_render → ReconcileScheduler (coalesce per container)
//!                → Reconciler (fiber walk: host-finding, stale cleanup,
//!                  text reuse, reorder, portals)
//!                → DomArena (change-gated writes + mutation journal)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - configuration, identity channels, flush policies
//! - [`dom`] - arena-backed DOM, mutation journal, element ops
//! - [`vnode`] - the VNode data contract and builder
//! - [`reconcile`] - host-finding, fiber walk, cleanup, reorder, portals
//! - [`pipeline`] - scheduler, reentrancy guard, render controller
//! - [`component`] - the external component-manager hook contract
//! - [`error`] - the component hook error type

pub mod component;
pub mod dom;
pub mod error;
pub mod pipeline;
pub mod reconcile;
pub mod types;
pub mod vnode;

// Re-export commonly used items
pub use types::{FlushPolicy, Identity, ReconcilerConfig};

pub use dom::{DomArena, MutationJournal, MutationRecord, NodeData, NodeId};

pub use vnode::{ElementData, Meta, PortalData, VNode, VNodeKind};

pub use reconcile::{PortalBinding, Reconciler};

pub use pipeline::{
    GuardState, PendingFlush, ReconcileScheduler, ReentrancyGuard, RenderController,
};

pub use component::{ComponentManager, HookContext, NoopComponents};

pub use error::ComponentError;
