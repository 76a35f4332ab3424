//! Render pipeline - scheduling and reentrancy around the reconciler.
//!
//! - [`scheduler`] - per-container coalescing queue with three flush policies
//! - [`guard`] - the {Idle, Reconciling, PendingFlush} reentrancy machine
//! - [`RenderController`] - the consumer-facing facade tying one
//!   reconciler, one scheduler and one guard together for a container

pub mod guard;
pub mod scheduler;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::component::ComponentManager;
use crate::dom::{DomArena, NodeId};
use crate::reconcile::Reconciler;
use crate::types::{FlushPolicy, ReconcilerConfig};
use crate::vnode::VNode;

pub use guard::{GuardState, ReentrancyGuard};
pub use scheduler::{PendingFlush, ReconcileScheduler};

/// One container's complete render loop: requests go in, at most one
/// physical reconciliation per scheduling window comes out.
pub struct RenderController {
    reconciler: Reconciler,
    scheduler: ReconcileScheduler,
    guard: ReentrancyGuard,
    flush_count: u64,
}

impl RenderController {
    /// A controller for `container` flushing under `policy`.
    pub fn new(
        container: NodeId,
        config: ReconcilerConfig,
        components: Rc<RefCell<dyn ComponentManager>>,
        policy: FlushPolicy,
    ) -> Self {
        Self {
            reconciler: Reconciler::new(container, config, components),
            scheduler: ReconcileScheduler::new(policy),
            guard: ReentrancyGuard::new(),
            flush_count: 0,
        }
    }

    /// The container this controller renders into.
    pub fn container(&self) -> NodeId {
        self.reconciler.container()
    }

    /// The underlying reconciler (last-applied tree, portal bindings).
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// The active flush policy.
    pub fn policy(&self) -> FlushPolicy {
        self.scheduler.policy()
    }

    /// Switch the flush policy at runtime.
    pub fn set_policy(&mut self, policy: FlushPolicy) {
        self.scheduler.set_policy(policy);
    }

    /// Number of physical reconciliations performed so far.
    pub fn flush_count(&self) -> u64 {
        self.flush_count
    }

    /// Whether a flush is currently pending.
    pub fn has_pending(&self) -> bool {
        self.scheduler.has_pending(self.container())
    }

    /// Request that the container be brought to `next`. Under `Immediate`
    /// this flushes synchronously; under the deferred policies it
    /// coalesces until [`run_frame`](Self::run_frame) or
    /// [`run_microtasks`](Self::run_microtasks).
    pub fn request_render(&mut self, dom: &mut DomArena, next: VNode) {
        let container = self.container();
        self.scheduler.enqueue(next, container);

        if !self.guard.note_request() {
            // Absorbed: a flush is executing; the pending entry drains
            // right after it completes.
            return;
        }
        if self.scheduler.policy() == FlushPolicy::Immediate {
            self.flush_now(dom);
        }
    }

    /// Animation-frame boundary: flush the pending request, if the policy
    /// is frame-driven. A call with nothing pending is a no-op.
    pub fn run_frame(&mut self, dom: &mut DomArena) {
        if self.scheduler.policy() == FlushPolicy::AnimationFrame {
            self.flush_now(dom);
        }
    }

    /// Microtask checkpoint: flush the pending request, if the policy is
    /// microtask-driven. A call with nothing pending is a no-op.
    pub fn run_microtasks(&mut self, dom: &mut DomArena) {
        if self.scheduler.policy() == FlushPolicy::Microtask {
            self.flush_now(dom);
        }
    }

    /// Drop all engine state for this container.
    pub fn destroy(&mut self, dom: &mut DomArena) {
        self.scheduler.take_pending(self.container());
        self.reconciler.destroy(dom);
    }

    /// Flush until nothing is pending, serialized through the guard.
    /// Requests absorbed while a flush ran re-dispatch here, so flushes
    /// for one container are strictly ordered and never nested.
    fn flush_now(&mut self, dom: &mut DomArena) {
        loop {
            let Some(pending) = self.scheduler.take_pending(self.container()) else {
                return;
            };
            if !self.guard.begin() {
                return;
            }
            debug!(container = ?self.container(), "scheduler flush");
            // The reconciler diffs against its own last-applied snapshot.
            // Flushes for this container are serialized, so that snapshot
            // is exactly the state the window's first request saw.
            self.reconciler.render(dom, pending.next);
            self.flush_count += 1;
            if !self.guard.finish() {
                break;
            }
        }
    }
}
