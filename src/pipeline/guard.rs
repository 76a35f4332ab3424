//! Reentrancy guard - "ignore mutations caused by my own writes".
//!
//! The surrounding editor re-renders in response to observed DOM mutations;
//! without a guard, a reconciliation's own writes would trigger a nested
//! reconciliation. The contract is an explicit three-state machine rather
//! than a boolean plus timers, so every transition is auditable:
//!
//! ```text
//! Idle --begin--> Reconciling --finish--> Idle
//!                 Reconciling --note_request--> PendingFlush
//!                 PendingFlush --finish--> Idle (reports the absorbed request)
//! ```

use tracing::trace;

/// Where the render loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    /// No flush running, nothing absorbed.
    #[default]
    Idle,
    /// A flush is executing synchronously right now.
    Reconciling,
    /// A flush is executing and at least one render request arrived
    /// during it; it must be re-dispatched after the flush completes.
    PendingFlush,
}

/// The reentrancy state machine.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    state: GuardState,
}

impl ReentrancyGuard {
    /// A guard starting at `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Enter a flush. Returns `false` (and changes nothing) when a flush
    /// is already executing - a nested flush must never start.
    pub fn begin(&mut self) -> bool {
        match self.state {
            GuardState::Idle => {
                self.state = GuardState::Reconciling;
                true
            }
            GuardState::Reconciling | GuardState::PendingFlush => false,
        }
    }

    /// Note a render request. Returns `true` when the request may be
    /// dispatched now (the loop is idle); `false` when it was absorbed
    /// into `PendingFlush` because a flush is executing.
    pub fn note_request(&mut self) -> bool {
        match self.state {
            GuardState::Idle => true,
            GuardState::Reconciling => {
                trace!("render request absorbed during flush");
                self.state = GuardState::PendingFlush;
                false
            }
            GuardState::PendingFlush => false,
        }
    }

    /// Leave a flush. Returns `true` when a request was absorbed while
    /// the flush ran and must now be re-dispatched.
    pub fn finish(&mut self) -> bool {
        let absorbed = self.state == GuardState::PendingFlush;
        self.state = GuardState::Idle;
        absorbed
    }
}
