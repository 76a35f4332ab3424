//! Stale-node cleanup - the pre-pass that prunes unwanted keyed children.
//!
//! Runs before child reconciliation for a parent, so deletions never
//! interfere with the ordering work that follows. Only identity-bearing
//! DOM children are eligible: an identity outside the next children's
//! desired set means the node is gone from the document model and must be
//! unmounted and removed. Unkeyed leftovers are swept at the end of the
//! fiber walk instead.
//!
//! The unmount hook always receives a usable payload: the matching
//! previous VNode when one resolves, otherwise a minimal stand-in
//! synthesized from the DOM node's own tag and attributes. Hook failures
//! are logged and swallowed - cleanup always completes.

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use super::Reconciler;
use crate::dom::{DomArena, NodeId, ops};
use crate::types::Identity;
use crate::vnode::VNode;

impl Reconciler {
    /// Remove `parent`'s direct DOM children whose identity is absent from
    /// the identities desired by `next_children`, firing unmount for each.
    /// Skipped entirely when the desired set is empty (nothing eligible to
    /// prune by identity).
    pub(crate) fn remove_stale_early(
        &mut self,
        dom: &mut DomArena,
        parent: NodeId,
        prev_children: &[VNode],
        next_children: &[VNode],
    ) {
        let desired: FxHashSet<Identity> = next_children
            .iter()
            .filter_map(|child| child.identity(&self.config))
            .collect();
        if desired.is_empty() {
            return;
        }

        let current: Vec<NodeId> = dom.children(parent).to_vec();
        for node in current {
            let Some(identity) = ops::dom_identity(dom, &self.config, node) else {
                continue;
            };
            if desired.contains(&identity) {
                continue;
            }

            let payload = prev_children
                .iter()
                .find(|prev| prev.identity(&self.config).as_ref() == Some(&identity))
                .cloned()
                .unwrap_or_else(|| {
                    trace!(%identity, "no previous vnode; synthesizing unmount payload");
                    synthesize_vnode(dom, node)
                });

            debug!(%identity, ?node, "removing stale child");
            self.notify_unmount(&payload, Some(node));
            dom.despawn_subtree(node);
        }
    }

    /// Fire unmount for every identity-bearing direct child of `host`,
    /// resolving payloads the same way the stale pre-pass does. Used when a
    /// host's entire child list is about to be replaced wholesale (the
    /// collapse to a `.text` value), where no per-child matching happens.
    pub(crate) fn unmount_cleared_children(
        &mut self,
        dom: &DomArena,
        host: NodeId,
        prev_children: &[VNode],
    ) {
        for node in dom.children(host).to_vec() {
            let Some(identity) = ops::dom_identity(dom, &self.config, node) else {
                continue;
            };
            let payload = prev_children
                .iter()
                .find(|prev| prev.identity(&self.config).as_ref() == Some(&identity))
                .cloned()
                .unwrap_or_else(|| synthesize_vnode(dom, node));
            debug!(%identity, ?node, "unmounting cleared child");
            self.notify_unmount(&payload, Some(node));
        }
    }
}

/// Build a minimal VNode stand-in from a live DOM node, so the unmount
/// hook still receives a usable shape when the previous tree holds no
/// counterpart.
pub(crate) fn synthesize_vnode(dom: &DomArena, node: NodeId) -> VNode {
    let mut vnode = match dom.tag(node) {
        Some(tag) => VNode::element(tag),
        None => VNode::text(dom.text(node).unwrap_or_default()),
    };
    if let (Some(el), Some(attrs)) = (vnode.as_element_mut(), dom.attributes(node)) {
        el.attrs = attrs.clone();
    }
    vnode.meta.host = Some(node);
    vnode
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::component::test_support::{LifecycleEvent, RecordingComponents};
    use crate::types::ReconcilerConfig;

    fn reconciler_with_recorder(
        dom: &mut DomArena,
    ) -> (Reconciler, Rc<RefCell<Vec<LifecycleEvent>>>) {
        let container = dom.create_element("div");
        let recorder = RecordingComponents::new();
        let events = recorder.events.clone();
        let reconciler = Reconciler::new(
            container,
            ReconcilerConfig::default(),
            Rc::new(RefCell::new(recorder)),
        );
        (reconciler, events)
    }

    fn keyed_dom_child(dom: &mut DomArena, parent: NodeId, sid: &str) -> NodeId {
        let config = ReconcilerConfig::default();
        let node = dom.create_element("p");
        dom.set_attribute(node, &config.sid_attr, sid);
        dom.append_child(parent, node);
        node
    }

    #[test]
    fn test_prunes_stale_identity_with_prev_payload() {
        let mut dom = DomArena::new();
        let (mut reconciler, events) = reconciler_with_recorder(&mut dom);
        let parent = reconciler.container();
        let stale = keyed_dom_child(&mut dom, parent, "gone");
        let kept = keyed_dom_child(&mut dom, parent, "kept");

        let prev = vec![
            VNode::element("p").sid("gone"),
            VNode::element("p").sid("kept"),
        ];
        let next = vec![VNode::element("p").sid("kept")];

        reconciler.remove_stale_early(&mut dom, parent, &prev, &next);

        assert!(!dom.contains(stale));
        assert!(dom.contains(kept));
        assert_eq!(events.borrow().as_slice(), &[LifecycleEvent::Unmount("gone".into())]);
    }

    #[test]
    fn test_synthesized_payload_when_prev_missing() {
        let mut dom = DomArena::new();
        let (mut reconciler, events) = reconciler_with_recorder(&mut dom);
        let parent = reconciler.container();
        keyed_dom_child(&mut dom, parent, "orphan");

        // Previous tree knows nothing about the orphan.
        let next = vec![VNode::element("p").sid("other")];
        reconciler.remove_stale_early(&mut dom, parent, &[], &next);

        assert_eq!(events.borrow().as_slice(), &[LifecycleEvent::Unmount("orphan".into())]);
    }

    #[test]
    fn test_empty_desired_set_skips_the_pass() {
        let mut dom = DomArena::new();
        let (mut reconciler, events) = reconciler_with_recorder(&mut dom);
        let parent = reconciler.container();
        let keyed = keyed_dom_child(&mut dom, parent, "survives");

        let next = vec![VNode::element("span")]; // no identities at all
        reconciler.remove_stale_early(&mut dom, parent, &[], &next);

        assert!(dom.contains(keyed));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_hook_failure_does_not_stop_cleanup() {
        let mut dom = DomArena::new();
        let container = dom.create_element("div");
        let recorder = RecordingComponents {
            failing: vec!["bad".to_string()],
            ..RecordingComponents::new()
        };
        let events = recorder.events.clone();
        let mut reconciler = Reconciler::new(
            container,
            ReconcilerConfig::default(),
            Rc::new(RefCell::new(recorder)),
        );
        let bad = keyed_dom_child(&mut dom, container, "bad");
        let also_stale = keyed_dom_child(&mut dom, container, "also-stale");

        let next = vec![VNode::element("p").sid("kept")];
        reconciler.remove_stale_early(&mut dom, container, &[], &next);

        // Both removed despite the first hook throwing.
        assert!(!dom.contains(bad));
        assert!(!dom.contains(also_stale));
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_synthesize_shape() {
        let mut dom = DomArena::new();
        let node = dom.create_element("figure");
        dom.set_attribute(node, "data-sid", "f1");
        dom.set_attribute(node, "class", "embed");

        let vnode = synthesize_vnode(&dom, node);
        let el = vnode.as_element().unwrap();
        assert_eq!(el.tag, "figure");
        assert_eq!(el.attrs.get("class").map(String::as_str), Some("embed"));
        assert_eq!(el.attrs.get("data-sid").map(String::as_str), Some("f1"));
        assert_eq!(vnode.meta.host, Some(node));
    }
}
