//! Core types for vellum-dom.
//!
//! These types define the foundation that everything builds on: the
//! configuration threaded into every reconciler instance, the identity
//! channels used to recognize "the same logical node" across renders,
//! and the scheduler's flush policies.

use std::fmt;

// =============================================================================
// Reconciler Configuration
// =============================================================================

/// Configuration for a reconciler instance.
///
/// Identity attribute names are plain DOM attributes, not internal
/// bookkeeping: external code (overlay positioning, mutation observers)
/// queries rendered output with a standard attribute selector. They are
/// threaded explicitly so multiple independent reconciler instances
/// (e.g. one per rendering layer) never interfere through shared globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Attribute carrying the primary stable identity (unique among
    /// component nodes).
    pub sid_attr: String,
    /// Attribute carrying the decorator identity (explicitly NOT unique
    /// among siblings).
    pub decorator_attr: String,
    /// Attribute marking a portal host element inside a portal target.
    pub portal_attr: String,
    /// Portal id used when a portal VNode does not name one.
    pub default_portal_id: String,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            sid_attr: "data-sid".to_string(),
            decorator_attr: "data-decorator-id".to_string(),
            portal_attr: "data-portal-id".to_string(),
            default_portal_id: "portal-default".to_string(),
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

/// A node's identity as resolved from its VNode or its DOM attributes.
///
/// `Sid` is the primary channel and takes precedence. `Decorator` values
/// may repeat among siblings; all matching code must tolerate duplicates
/// and pair them by closest index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Primary stable identity (component-backed nodes).
    Sid(String),
    /// Secondary decorator identity (may be duplicated among siblings).
    Decorator(String),
}

impl Identity {
    /// The raw identity value, regardless of channel.
    pub fn value(&self) -> &str {
        match self {
            Identity::Sid(v) => v,
            Identity::Decorator(v) => v,
        }
    }

    /// Whether this is the primary (sid) channel.
    pub fn is_sid(&self) -> bool {
        matches!(self, Identity::Sid(_))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Sid(v) => write!(f, "sid:{v}"),
            Identity::Decorator(v) => write!(f, "decorator:{v}"),
        }
    }
}

// =============================================================================
// Flush Policy
// =============================================================================

/// When the scheduler physically runs a pending reconciliation.
///
/// The two deferred policies coalesce all requests that arrive before the
/// flush boundary into a single physical pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushPolicy {
    /// Flush on the next animation frame (driven by `run_frame`).
    #[default]
    AnimationFrame,
    /// Flush at the next microtask checkpoint (driven by `run_microtasks`).
    Microtask,
    /// Flush synchronously inside `enqueue`.
    Immediate,
}

impl FlushPolicy {
    /// Whether this policy defers work past the enqueue call.
    pub fn is_deferred(self) -> bool {
        !matches!(self, FlushPolicy::Immediate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_attrs() {
        let config = ReconcilerConfig::default();
        assert_eq!(config.sid_attr, "data-sid");
        assert_eq!(config.decorator_attr, "data-decorator-id");
        assert_eq!(config.portal_attr, "data-portal-id");
        assert_eq!(config.default_portal_id, "portal-default");
    }

    #[test]
    fn test_identity_precedence_helpers() {
        let sid = Identity::Sid("a".into());
        let dec = Identity::Decorator("a".into());
        assert!(sid.is_sid());
        assert!(!dec.is_sid());
        assert_eq!(sid.value(), dec.value());
        assert_ne!(sid, dec);
    }

    #[test]
    fn test_flush_policy_deferred() {
        assert!(FlushPolicy::AnimationFrame.is_deferred());
        assert!(FlushPolicy::Microtask.is_deferred());
        assert!(!FlushPolicy::Immediate.is_deferred());
    }
}
