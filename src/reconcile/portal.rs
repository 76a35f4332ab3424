//! Portal handler - rendering a subtree into a foreign DOM target.
//!
//! A portal VNode occupies no slot in its structural parent; its single
//! content child renders into a host element resolved (or created) inside
//! the portal's target, keyed by the portal identity attribute. Moving a
//! portal's target between renders never leaves orphaned content behind:
//! the old host is detached and discarded, and the content remounts fresh
//! under the new target.

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use super::Reconciler;
use crate::dom::{DomArena, NodeId};
use crate::vnode::{VNode, VNodeKind};

/// A tracked portal: where its host element currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortalBinding {
    /// The caller-supplied target element.
    pub target: NodeId,
    /// The engine-owned host element inside the target.
    pub host: NodeId,
}

impl Reconciler {
    /// Redirect a portal VNode's content into its target. Returns `false`
    /// when `child` is not a portal, in which case the caller continues
    /// normal processing.
    pub(crate) fn handle_portal(
        &mut self,
        dom: &mut DomArena,
        child: &mut VNode,
        visited_portals: &mut FxHashSet<String>,
    ) -> bool {
        let VNodeKind::Portal(portal) = &mut child.kind else {
            return false;
        };
        let portal_id = portal
            .portal_id
            .clone()
            .unwrap_or_else(|| self.config.default_portal_id.clone());
        let target = portal.target;

        // Relocation: a host tracked under a different target is discarded
        // wholesale; its content remounts under the new target.
        let mut fresh_mount = false;
        if let Some(binding) = self.portals.get(&portal_id)
            && binding.target != target
        {
            debug!(portal_id, old = ?binding.target, new = ?target, "portal relocated");
            dom.despawn_subtree(binding.host);
            self.portals.remove(&portal_id);
            self.portal_prev.remove(&portal_id);
            fresh_mount = true;
        }

        let host = match dom.child_with_attribute(target, &self.config.portal_attr, &portal_id) {
            Some(host) => host,
            None => {
                trace!(portal_id, ?target, "creating portal host");
                let host = dom.create_element("div");
                dom.set_attribute(host, &self.config.portal_attr, &portal_id);
                dom.append_child(target, host);
                fresh_mount = true;
                host
            }
        };

        self.portals.insert(portal_id.clone(), PortalBinding { target, host });
        visited_portals.insert(portal_id.clone());
        child.meta.host = Some(host);

        // New or relocated hosts mount their content with no previous tree;
        // a stable binding diffs against the last-applied content.
        let prev_content = if fresh_mount {
            None
        } else {
            self.portal_prev.remove(&portal_id)
        };
        let prev_list: Vec<VNode> = prev_content.into_iter().collect();
        self.reconcile_children(
            dom,
            host,
            &prev_list,
            std::slice::from_mut(&mut *portal.content),
            visited_portals,
        );
        self.portal_prev.insert(portal_id, (*portal.content).clone());

        true
    }

    /// Drop tracked portals whose id was not visited in this pass: their
    /// hosts (and all content) are detached and discarded.
    pub(crate) fn prune_portals(&mut self, dom: &mut DomArena, visited: &FxHashSet<String>) {
        let abandoned: Vec<String> = self
            .portals
            .keys()
            .filter(|id| !visited.contains(*id))
            .cloned()
            .collect();
        for id in abandoned {
            if let Some(binding) = self.portals.remove(&id) {
                debug!(portal_id = %id, "pruning abandoned portal");
                dom.despawn_subtree(binding.host);
            }
            self.portal_prev.remove(&id);
        }
    }
}
