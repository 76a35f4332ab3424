//! Fiber walk - the work-in-progress traversal over a parent's children.
//!
//! For one parent, the pass correlates next VNodes, previous VNodes and
//! live DOM nodes into ephemeral [`Fiber`] entries, decides
//! create/update/portal per entry top-down, applies the decisions (and
//! recurses) bottom-up, then runs the primitive-text pass, the
//! unclaimed-child sweep, and finally reorder. Fibers exist only for the
//! duration of the pass and are never retained.

use bitflags::bitflags;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::trace;

use super::{Reconciler, cleanup, host, reorder, text};
use crate::dom::{DomArena, NodeId, ops};
use crate::vnode::{VNode, VNodeKind};

bitflags! {
    /// Change-tracking flags for one fiber.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct FiberFlags: u8 {
        /// No matching previous node; a DOM host must be created.
        const NEW = 1 << 0;
        /// A host was matched; diff attributes and recurse.
        const UPDATE = 1 << 1;
        /// Portal boundary; content redirects to a foreign target and the
        /// node occupies no slot in this parent.
        const PORTAL = 1 << 2;
    }
}

/// One work-in-progress entry: a next child correlated with its previous
/// counterpart and its (resolved or to-be-created) DOM host.
pub(crate) struct Fiber {
    /// Index into the next children list.
    pub index: usize,
    /// Index of the matched previous child, if any.
    pub prev_index: Option<usize>,
    /// The DOM host bound to this child.
    pub host: Option<NodeId>,
    /// What happens to this entry.
    pub flags: FiberFlags,
}

impl Reconciler {
    /// Reconcile `parent`'s children from `prev_children` to
    /// `next_children`, applying the minimum DOM mutations needed.
    pub(crate) fn reconcile_children(
        &mut self,
        dom: &mut DomArena,
        parent: NodeId,
        prev_children: &[VNode],
        next_children: &mut [VNode],
        visited_portals: &mut FxHashSet<String>,
    ) {
        // Deletions first, so they never interfere with ordering below.
        self.remove_stale_early(dom, parent, prev_children, next_children);

        let mut claimed: FxHashSet<NodeId> = FxHashSet::default();
        let mut claimed_prev: FxHashSet<usize> = FxHashSet::default();
        let mut fibers: SmallVec<[Fiber; 8]> = SmallVec::new();
        let mut primitive_texts: SmallVec<[usize; 8]> = SmallVec::new();

        // Top-down: classify children and resolve identities. Claims are
        // recorded immediately so duplicate identities and identical mark
        // wrappers each bind a distinct host.
        for (index, child) in next_children.iter().enumerate() {
            match &child.kind {
                VNodeKind::Text(_) => primitive_texts.push(index),
                VNodeKind::Portal(_) => fibers.push(Fiber {
                    index,
                    prev_index: None,
                    host: None,
                    flags: FiberFlags::PORTAL,
                }),
                VNodeKind::Element(_) => {
                    let prev_index = host::find_prev_child_vnode(
                        &self.config,
                        child,
                        index,
                        prev_children,
                        &claimed_prev,
                    );
                    if let Some(pi) = prev_index {
                        claimed_prev.insert(pi);
                    }
                    let found = host::find_host_for_child(
                        dom,
                        &self.config,
                        parent,
                        child,
                        index,
                        prev_children,
                        &claimed,
                    );
                    let (host, flags) = match found {
                        Some(node) => {
                            claimed.insert(node);
                            (Some(node), FiberFlags::UPDATE)
                        }
                        None => (None, FiberFlags::NEW),
                    };
                    fibers.push(Fiber {
                        index,
                        prev_index,
                        host,
                        flags,
                    });
                }
            }
        }

        // Apply: create or update each element fiber, recursing into its
        // subtree before the next sibling is touched.
        let mut wanted: SmallVec<[(usize, NodeId); 8]> = SmallVec::new();
        for fiber in &mut fibers {
            if fiber.flags.contains(FiberFlags::PORTAL) {
                self.handle_portal(dom, &mut next_children[fiber.index], visited_portals);
                continue;
            }

            if fiber.flags.contains(FiberFlags::NEW) {
                let Some(node) = ({
                    let el = next_children[fiber.index].as_element();
                    el.map(|el| ops::create_element_for(dom, &self.config, el))
                }) else {
                    continue;
                };
                trace!(?node, index = fiber.index, "mounting new child");
                claimed.insert(node);
                // Appended now; the reorder pass fixes the position.
                dom.append_child(parent, node);
                fiber.host = Some(node);

                self.reconcile_into(dom, node, None, &mut next_children[fiber.index], visited_portals);

                let child = &next_children[fiber.index];
                if child.is_component() {
                    self.notify_mount(child, Some(node));
                }
            } else {
                let Some(node) = fiber.host else { continue };
                let prev_child = fiber.prev_index.and_then(|pi| prev_children.get(pi));
                {
                    let child = &mut next_children[fiber.index];
                    if let Some(el) = child.as_element() {
                        ops::sync_attributes(dom, &self.config, node, el);
                    }
                    self.reconcile_into(dom, node, prev_child, child, visited_portals);
                }
                let child = &next_children[fiber.index];
                if child.is_component() {
                    self.notify_update(prev_child.unwrap_or(child), child, Some(node));
                }
            }

            if let Some(node) = fiber.host {
                wanted.push((fiber.index, node));
            }
        }

        // Primitive text pass, after the element-shaped children settled.
        for &index in &primitive_texts {
            let Some(content) = next_children[index].as_text().map(str::to_string) else {
                continue;
            };
            let node = text::apply_primitive_text(dom, parent, &content, index, &claimed);
            claimed.insert(node);
            next_children[index].meta.host = Some(node);
            wanted.push((index, node));
        }

        // Sweep: direct children not claimed by this pass are gone. Keyed
        // leftovers reach this point only when the stale pre-pass was
        // skipped (empty desired-identity set); they still get their
        // unmount, exactly once.
        for node in dom.children(parent).to_vec() {
            if claimed.contains(&node) {
                continue;
            }
            if ops::dom_has_identity(dom, &self.config, node) {
                let identity = ops::dom_identity(dom, &self.config, node);
                let payload = prev_children
                    .iter()
                    .find(|prev| prev.identity(&self.config) == identity)
                    .cloned()
                    .unwrap_or_else(|| cleanup::synthesize_vnode(dom, node));
                self.notify_unmount(&payload, Some(node));
            }
            trace!(?node, "sweeping unclaimed child");
            dom.despawn_subtree(node);
        }

        // Relocate retained nodes into the next order.
        wanted.sort_by_key(|&(index, _)| index);
        let order: SmallVec<[NodeId; 8]> = wanted.iter().map(|&(_, node)| node).collect();
        reorder::reorder_children(dom, parent, &order);
    }
}
