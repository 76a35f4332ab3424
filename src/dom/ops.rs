//! Element/attribute creation and syncing helpers.
//!
//! Thin bridge between VNode element data and the arena. All writes go
//! through the arena's change-gated operations, so calling these with
//! already-correct state produces zero mutation records.

use tracing::trace;

use super::arena::{DomArena, NodeId};
use crate::types::{Identity, ReconcilerConfig};
use crate::vnode::ElementData;

/// Create a fresh element for `el`, with all attributes (including the
/// materialized identity channels) already set.
pub fn create_element_for(
    dom: &mut DomArena,
    config: &ReconcilerConfig,
    el: &ElementData,
) -> NodeId {
    let node = dom.create_element(&el.tag);
    for (name, value) in el.desired_attrs(config) {
        dom.set_attribute(node, &name, &value);
    }
    trace!(tag = %el.tag, ?node, "created element");
    node
}

/// Diff attributes onto an existing host: write only changed values,
/// remove attributes no longer desired.
pub fn sync_attributes(
    dom: &mut DomArena,
    config: &ReconcilerConfig,
    host: NodeId,
    next: &ElementData,
) {
    let desired = next.desired_attrs(config);

    let stale: Vec<String> = dom
        .attributes(host)
        .map(|attrs| {
            attrs
                .keys()
                .filter(|name| !desired.contains_key(*name))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    for name in stale {
        dom.remove_attribute(host, &name);
    }

    for (name, value) in &desired {
        dom.set_attribute(host, name, value);
    }
}

/// Resolve a DOM element's identity from its live attributes.
pub fn dom_identity(dom: &DomArena, config: &ReconcilerConfig, node: NodeId) -> Option<Identity> {
    if let Some(sid) = dom.attribute(node, &config.sid_attr) {
        return Some(Identity::Sid(sid.to_string()));
    }
    dom.attribute(node, &config.decorator_attr)
        .map(|d| Identity::Decorator(d.to_string()))
}

/// Whether a DOM element carries any identity attribute at all.
pub fn dom_has_identity(dom: &DomArena, config: &ReconcilerConfig, node: NodeId) -> bool {
    dom.attribute(node, &config.sid_attr).is_some()
        || dom.attribute(node, &config.decorator_attr).is_some()
}

/// A DOM element's class set, if it has a class attribute.
pub fn dom_class_set(dom: &DomArena, node: NodeId) -> Option<std::collections::BTreeSet<&str>> {
    dom.attribute(node, "class")
        .map(|c| c.split_whitespace().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnode::VNode;

    fn element_data(node: &VNode) -> &ElementData {
        node.as_element().unwrap()
    }

    #[test]
    fn test_create_sets_all_attrs() {
        let mut dom = DomArena::new();
        let config = ReconcilerConfig::default();
        let vnode = VNode::element("span").sid("s1").attr("class", "mark-bold");

        let host = create_element_for(&mut dom, &config, element_data(&vnode));
        assert_eq!(dom.tag(host), Some("span"));
        assert_eq!(dom.attribute(host, "class"), Some("mark-bold"));
        assert_eq!(dom.attribute(host, &config.sid_attr), Some("s1"));
    }

    #[test]
    fn test_sync_writes_only_changes() {
        let mut dom = DomArena::new();
        let config = ReconcilerConfig::default();
        let v1 = VNode::element("span").attr("class", "a").attr("style", "x");
        let host = create_element_for(&mut dom, &config, element_data(&v1));
        dom.take_records();

        // Same attributes: no mutation at all.
        sync_attributes(&mut dom, &config, host, element_data(&v1));
        assert!(dom.journal().is_empty());

        // One changed, one removed, one added.
        let v2 = VNode::element("span").attr("class", "b").attr("title", "t");
        sync_attributes(&mut dom, &config, host, element_data(&v2));
        let records = dom.take_records();
        assert_eq!(records.len(), 3);
        assert_eq!(dom.attribute(host, "class"), Some("b"));
        assert_eq!(dom.attribute(host, "style"), None);
        assert_eq!(dom.attribute(host, "title"), Some("t"));
    }

    #[test]
    fn test_dom_identity_channels() {
        let mut dom = DomArena::new();
        let config = ReconcilerConfig::default();

        let keyed = dom.create_element("div");
        dom.set_attribute(keyed, &config.sid_attr, "s1");
        assert_eq!(dom_identity(&dom, &config, keyed), Some(Identity::Sid("s1".into())));

        let decorated = dom.create_element("div");
        dom.set_attribute(decorated, &config.decorator_attr, "d1");
        assert_eq!(
            dom_identity(&dom, &config, decorated),
            Some(Identity::Decorator("d1".into()))
        );
        assert!(dom_has_identity(&dom, &config, decorated));

        let plain = dom.create_element("div");
        assert_eq!(dom_identity(&dom, &config, plain), None);
        assert!(!dom_has_identity(&dom, &config, plain));
    }
}
