//! The reconciliation engine.
//!
//! A [`Reconciler`] instance owns rendering for exactly one container: the
//! previous-tree snapshot (the only state persisted between renders) and
//! the portal binding table. One call to [`Reconciler::render`] is one
//! complete synchronous flush; the scheduler above it decides when flushes
//! happen, the component manager beside it owns stateful leaves.
//!
//! Submodules:
//! - [`host`] - DOM node re-identification across renders
//! - [`fiber`] - the work-in-progress child walk
//! - [`text`] - primitive text and collapsed `.text` reuse
//! - [`cleanup`] - stale-identity pre-pass with unmount notification
//! - [`reorder`] - pure relocation
//! - [`portal`] - off-tree rendering redirection

pub(crate) mod cleanup;
pub(crate) mod fiber;
pub(crate) mod host;
pub(crate) mod portal;
pub(crate) mod reorder;
pub(crate) mod text;

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::component::{ComponentManager, HookContext};
use crate::dom::{DomArena, NodeId, ops};
use crate::types::ReconcilerConfig;
use crate::vnode::{VNode, VNodeKind};

pub use portal::PortalBinding;

/// Per-container reconciliation engine.
pub struct Reconciler {
    container: NodeId,
    config: ReconcilerConfig,
    components: Rc<RefCell<dyn ComponentManager>>,
    /// Deep snapshot of the last-applied tree, `meta` included. Replaced
    /// wholesale after every flush; dropped on destroy.
    prev: Option<VNode>,
    /// Tracked portal hosts, by portal id.
    portals: FxHashMap<String, PortalBinding>,
    /// Last-applied portal content, by portal id (the content subtree's
    /// own previous-tree snapshot).
    portal_prev: FxHashMap<String, VNode>,
}

impl Reconciler {
    /// Create a reconciler bound to `container`.
    pub fn new(
        container: NodeId,
        config: ReconcilerConfig,
        components: Rc<RefCell<dyn ComponentManager>>,
    ) -> Self {
        Self {
            container,
            config,
            components,
            prev: None,
            portals: FxHashMap::default(),
            portal_prev: FxHashMap::default(),
        }
    }

    /// The container this instance renders into.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The configuration this instance was built with.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// The last-applied tree snapshot, if any render has completed.
    pub fn previous(&self) -> Option<&VNode> {
        self.prev.as_ref()
    }

    /// The tracked portal binding for `portal_id`, if one is live.
    pub fn portal_binding(&self, portal_id: &str) -> Option<&PortalBinding> {
        self.portals.get(portal_id)
    }

    /// One complete flush: bring the container's subtree into agreement
    /// with `next`, diffing against the stored previous tree, then replace
    /// the snapshot with the applied `next`.
    pub fn render(&mut self, dom: &mut DomArena, mut next: VNode) {
        debug!(container = ?self.container, "flush begin");
        let prev = self.prev.take();
        let mut visited_portals = FxHashSet::default();

        if let Some(el) = next.as_element() {
            ops::sync_attributes(dom, &self.config, self.container, el);
        }
        self.reconcile_into(dom, self.container, prev.as_ref(), &mut next, &mut visited_portals);

        self.prune_portals(dom, &visited_portals);
        self.prev = Some(next);
        debug!(container = ?self.container, "flush end");
    }

    /// Drop all engine-owned state for this container: the previous-tree
    /// snapshot and every tracked portal host. The container's children are
    /// left as rendered; the caller owns the container itself.
    pub fn destroy(&mut self, dom: &mut DomArena) {
        let ids: Vec<String> = self.portals.keys().cloned().collect();
        for id in ids {
            if let Some(binding) = self.portals.remove(&id) {
                dom.despawn_subtree(binding.host);
            }
            self.portal_prev.remove(&id);
        }
        self.prev = None;
    }

    /// Reconcile a VNode's content into an already-bound host element:
    /// collapsed `.text` or the ordered child list. Attribute syncing is
    /// the caller's job (attributes are set at creation for new hosts and
    /// diffed before this call for matched ones).
    pub(crate) fn reconcile_into(
        &mut self,
        dom: &mut DomArena,
        host: NodeId,
        prev: Option<&VNode>,
        next: &mut VNode,
        visited_portals: &mut FxHashSet<String>,
    ) {
        next.meta.host = Some(host);
        match &mut next.kind {
            VNodeKind::Element(el) => {
                let prev_children: &[VNode] = prev
                    .and_then(VNode::as_element)
                    .map(|p| p.children.as_slice())
                    .unwrap_or(&[]);
                if let Some(collapsed) = el.text.clone() {
                    // Collapsing replaces the child list wholesale; any
                    // component-backed children still get their unmount.
                    self.unmount_cleared_children(dom, host, prev_children);
                    text::handle_text_property(dom, host, &collapsed);
                    return;
                }
                self.reconcile_children(dom, host, prev_children, &mut el.children, visited_portals);
            }
            VNodeKind::Text(_) | VNodeKind::Portal(_) => {
                // Roots are element-shaped; text and portals only ever
                // appear inside a parent's child list.
                warn!(?host, "non-element vnode handed to reconcile_into; ignored");
            }
        }
    }

    // =========================================================================
    // Lifecycle notification (never propagates)
    // =========================================================================

    pub(crate) fn notify_mount(&self, vnode: &VNode, host: Option<NodeId>) {
        let cx = HookContext {
            container: self.container,
            host,
        };
        if let Err(err) = self.components.borrow_mut().mount_component(vnode, &cx) {
            warn!(%err, "mount hook failed; continuing");
        }
    }

    pub(crate) fn notify_update(&self, prev: &VNode, next: &VNode, host: Option<NodeId>) {
        let cx = HookContext {
            container: self.container,
            host,
        };
        if let Err(err) = self.components.borrow_mut().update_component(prev, next, &cx) {
            warn!(%err, "update hook failed; continuing");
        }
    }

    pub(crate) fn notify_unmount(&self, vnode: &VNode, host: Option<NodeId>) {
        let cx = HookContext {
            container: self.container,
            host,
        };
        if let Err(err) = self.components.borrow_mut().unmount_component(vnode, &cx) {
            warn!(%err, "unmount hook failed; continuing");
        }
    }
}
