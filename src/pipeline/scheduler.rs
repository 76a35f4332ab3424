//! ReconcileScheduler - per-container coalescing of render requests.
//!
//! At most one pending flush exists per container; every `enqueue` before
//! the flush boundary overwrites its `next`. The queue does not capture a
//! prev tree: flushes for a container are serialized, so the reconciler's
//! own last-applied snapshot at flush time is exactly the state the
//! window's first request saw. The eventual flush therefore diffs the true
//! last-applied state against the most recent desired state, and exactly
//! one physical reconciliation happens per window no matter how many
//! logical updates were enqueued.
//!
//! There is no cancellation primitive for an in-flight flush (flushes are
//! synchronous); cancelling a pending one reduces to overwriting its
//! `next` before the boundary.

use tracing::debug;

use crate::dom::NodeId;
use crate::types::FlushPolicy;
use crate::vnode::VNode;

/// One coalesced flush waiting for its boundary.
#[derive(Debug)]
pub struct PendingFlush {
    /// The container to flush.
    pub container: NodeId,
    /// Most recently requested desired state.
    pub next: VNode,
}

/// Coalescing queue over any number of containers.
#[derive(Debug, Default)]
pub struct ReconcileScheduler {
    policy: FlushPolicy,
    pending: Vec<PendingFlush>,
}

impl ReconcileScheduler {
    /// A scheduler flushing under `policy`.
    pub fn new(policy: FlushPolicy) -> Self {
        Self {
            policy,
            pending: Vec::new(),
        }
    }

    /// The active flush policy.
    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }

    /// Switch the flush policy at runtime. Already-pending flushes are
    /// kept; they drain at the new policy's boundary.
    pub fn set_policy(&mut self, policy: FlushPolicy) {
        self.policy = policy;
    }

    /// Record a render request for `container`. Returns `true` when this
    /// opened a new scheduling window (the caller should arm its flush
    /// boundary), `false` when an existing pending flush absorbed it.
    pub fn enqueue(&mut self, next: VNode, container: NodeId) -> bool {
        if let Some(pending) = self.pending.iter_mut().find(|p| p.container == container) {
            pending.next = next;
            debug!(?container, "coalesced render request into pending flush");
            return false;
        }
        self.pending.push(PendingFlush { container, next });
        true
    }

    /// Whether a flush is pending for `container`.
    pub fn has_pending(&self, container: NodeId) -> bool {
        self.pending.iter().any(|p| p.container == container)
    }

    /// Take the pending flush for `container`, if any. Taking nothing is
    /// a no-op for the caller, not an error.
    pub fn take_pending(&mut self, container: NodeId) -> Option<PendingFlush> {
        let index = self.pending.iter().position(|p| p.container == container)?;
        Some(self.pending.remove(index))
    }

    /// Drain every pending flush, in enqueue order.
    pub fn take_all_pending(&mut self) -> Vec<PendingFlush> {
        std::mem::take(&mut self.pending)
    }
}
