//! Component manager contract.
//!
//! The engine does not own component state; it notifies an external manager
//! of lifecycle transitions through this trait. Guarantees the reconciler
//! upholds:
//!
//! - `mount_component` is called exactly once per newly created
//!   component-bearing node;
//! - `update_component` is called for every matched component-bearing node;
//! - `unmount_component` is called exactly once when a node is pruned, even
//!   when no matching previous VNode exists (the reconciler synthesizes a
//!   best-effort payload from the live DOM node's attributes).
//!
//! Hook failures are caught at the call site, logged, and never propagated:
//! one broken component must not take down its siblings.

use crate::dom::NodeId;
use crate::error::ComponentError;
use crate::vnode::VNode;

/// Context handed to every lifecycle hook.
#[derive(Debug, Clone, Copy)]
pub struct HookContext {
    /// The container this reconciler instance renders into.
    pub container: NodeId,
    /// The DOM host bound to the node, when one exists at hook time.
    pub host: Option<NodeId>,
}

/// External owner of stateful leaf components.
pub trait ComponentManager {
    /// A component-bearing node was created and attached.
    fn mount_component(&mut self, vnode: &VNode, cx: &HookContext) -> Result<(), ComponentError>;

    /// A matched component-bearing node may have changed.
    fn update_component(
        &mut self,
        prev: &VNode,
        next: &VNode,
        cx: &HookContext,
    ) -> Result<(), ComponentError>;

    /// A component-bearing node was pruned. `vnode` may be a synthesized
    /// stand-in when the previous tree held no matching node.
    fn unmount_component(&mut self, vnode: &VNode, cx: &HookContext) -> Result<(), ComponentError>;

    /// Resolve a live component instance's DOM host by its sid.
    fn component_instance(&self, _sid: &str) -> Option<NodeId> {
        None
    }
}

/// Manager that ignores every notification. The default for reconcilers
/// rendering trees without component-backed nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopComponents;

impl ComponentManager for NoopComponents {
    fn mount_component(&mut self, _vnode: &VNode, _cx: &HookContext) -> Result<(), ComponentError> {
        Ok(())
    }

    fn update_component(
        &mut self,
        _prev: &VNode,
        _next: &VNode,
        _cx: &HookContext,
    ) -> Result<(), ComponentError> {
        Ok(())
    }

    fn unmount_component(
        &mut self,
        _vnode: &VNode,
        _cx: &HookContext,
    ) -> Result<(), ComponentError> {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Recording manager shared by unit and integration tests.

    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::types::ReconcilerConfig;

    /// One recorded lifecycle event.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum LifecycleEvent {
        Mount(String),
        Update(String),
        Unmount(String),
    }

    /// Manager that records every hook call, optionally failing on demand.
    #[derive(Default)]
    pub struct RecordingComponents {
        pub events: Rc<RefCell<Vec<LifecycleEvent>>>,
        /// Sids whose hooks should fail (to exercise the catch-and-log path).
        pub failing: Vec<String>,
        pub config: ReconcilerConfig,
    }

    impl RecordingComponents {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<LifecycleEvent> {
            self.events.borrow().clone()
        }

        fn identity_of(&self, vnode: &VNode) -> String {
            vnode
                .identity(&self.config)
                .map(|i| i.value().to_string())
                .unwrap_or_else(|| "<anonymous>".to_string())
        }

        fn check_failing(&self, sid: &str) -> Result<(), ComponentError> {
            if self.failing.iter().any(|f| f == sid) {
                return Err(ComponentError::hook(Some(sid), "induced test failure"));
            }
            Ok(())
        }
    }

    impl ComponentManager for RecordingComponents {
        fn mount_component(
            &mut self,
            vnode: &VNode,
            _cx: &HookContext,
        ) -> Result<(), ComponentError> {
            let sid = self.identity_of(vnode);
            self.events.borrow_mut().push(LifecycleEvent::Mount(sid.clone()));
            self.check_failing(&sid)
        }

        fn update_component(
            &mut self,
            _prev: &VNode,
            next: &VNode,
            _cx: &HookContext,
        ) -> Result<(), ComponentError> {
            let sid = self.identity_of(next);
            self.events.borrow_mut().push(LifecycleEvent::Update(sid.clone()));
            self.check_failing(&sid)
        }

        fn unmount_component(
            &mut self,
            vnode: &VNode,
            _cx: &HookContext,
        ) -> Result<(), ComponentError> {
            let sid = self.identity_of(vnode);
            self.events.borrow_mut().push(LifecycleEvent::Unmount(sid.clone()));
            self.check_failing(&sid)
        }
    }
}
