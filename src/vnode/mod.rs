//! VNode model - the declarative description of desired DOM state.
//!
//! A VNode is one of three shapes: an element (tag + attributes + children,
//! optionally collapsed text), a primitive text run, or a portal redirecting
//! its single content child into a foreign DOM target. Modeling this as a
//! tagged union instead of an open optional-field bag removes the repeated
//! presence checks that would otherwise litter host-finding and the fiber
//! walk.
//!
//! The tree is plain data and deeply cloneable: the only DOM linkage is the
//! weak [`NodeId`] back-reference in [`Meta`], which is an arena index, not
//! an ownership edge. The engine keeps a clone of the last-applied tree as
//! its previous-tree snapshot between renders.

use std::collections::{BTreeMap, BTreeSet};

use crate::dom::NodeId;
use crate::types::{Identity, ReconcilerConfig};

// =============================================================================
// Data model
// =============================================================================

/// One desired DOM node or text run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VNode {
    /// What kind of node this describes.
    pub kind: VNodeKind,
    /// Transient per-render bookkeeping (host back-reference).
    pub meta: Meta,
}

/// The shape of a VNode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VNodeKind {
    /// An element with tag, attributes and children.
    Element(ElementData),
    /// A primitive text run (strings and stringified numbers).
    Text(String),
    /// A portal: content rendered into a foreign target element.
    Portal(PortalData),
}

impl Default for VNodeKind {
    fn default() -> Self {
        VNodeKind::Text(String::new())
    }
}

/// Element payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Tag name.
    pub tag: String,
    /// Static attributes, including the identity channels.
    pub attrs: BTreeMap<String, String>,
    /// Primary stable identity; set for component-backed nodes.
    pub sid: Option<String>,
    /// Ordered children. Empty when `text` is used instead.
    pub children: Vec<VNode>,
    /// Collapsed single-text-child optimization: when the element's only
    /// child is text, it lives here instead of in `children`.
    pub text: Option<String>,
}

/// Portal payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalData {
    /// The foreign element the content renders into. Supplied by the
    /// caller; never created or destroyed by the engine.
    pub target: NodeId,
    /// Portal identity; falls back to the configured default when absent.
    pub portal_id: Option<String>,
    /// The portal's single content subtree.
    pub content: Box<VNode>,
}

/// Transient, non-structural bookkeeping attached to a VNode.
///
/// `host` is the DOM node last bound to this VNode - a weak back-reference
/// used purely to skip re-resolution on the next pass. It may be reassigned
/// every pass and must not be read as stable beyond the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Meta {
    /// Arena handle of the bound DOM node, if any.
    pub host: Option<NodeId>,
}

// =============================================================================
// Builders
// =============================================================================

impl VNode {
    /// An element node.
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: VNodeKind::Element(ElementData {
                tag: tag.into(),
                attrs: BTreeMap::new(),
                sid: None,
                children: Vec::new(),
                text: None,
            }),
            meta: Meta::default(),
        }
    }

    /// A primitive text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: VNodeKind::Text(content.into()),
            meta: Meta::default(),
        }
    }

    /// A portal rendering `content` into `target`.
    pub fn portal(target: NodeId, portal_id: Option<&str>, content: VNode) -> Self {
        Self {
            kind: VNodeKind::Portal(PortalData {
                target,
                portal_id: portal_id.map(str::to_string),
                content: Box::new(content),
            }),
            meta: Meta::default(),
        }
    }

    /// Set an attribute (builder). No-op on non-elements.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNodeKind::Element(el) = &mut self.kind {
            el.attrs.insert(name.into(), value.into());
        }
        self
    }

    /// Set the primary stable identity (builder). No-op on non-elements.
    pub fn sid(mut self, sid: impl Into<String>) -> Self {
        if let VNodeKind::Element(el) = &mut self.kind {
            el.sid = Some(sid.into());
        }
        self
    }

    /// Append a child (builder). No-op on non-elements.
    pub fn child(mut self, child: impl Into<VNode>) -> Self {
        if let VNodeKind::Element(el) = &mut self.kind {
            el.children.push(child.into());
        }
        self
    }

    /// Append several children (builder). No-op on non-elements.
    pub fn children(mut self, children: impl IntoIterator<Item = VNode>) -> Self {
        if let VNodeKind::Element(el) = &mut self.kind {
            el.children.extend(children);
        }
        self
    }

    /// Set the collapsed text value (builder). No-op on non-elements.
    pub fn collapsed_text(mut self, text: impl Into<String>) -> Self {
        if let VNodeKind::Element(el) = &mut self.kind {
            el.text = Some(text.into());
        }
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Element payload, if this is an element.
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            VNodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutable element payload.
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.kind {
            VNodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Text content, if this is a primitive text node.
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            VNodeKind::Text(content) => Some(content),
            _ => None,
        }
    }

    /// Portal payload, if this is a portal.
    pub fn as_portal(&self) -> Option<&PortalData> {
        match &self.kind {
            VNodeKind::Portal(portal) => Some(portal),
            _ => None,
        }
    }

    /// Whether this node is component-backed (carries a top-level sid).
    pub fn is_component(&self) -> bool {
        matches!(&self.kind, VNodeKind::Element(el) if el.sid.is_some())
    }

    /// Resolve this node's identity under the given configuration.
    ///
    /// The primary channel (top-level `sid`, or the sid attribute) wins over
    /// the decorator attribute. Text and portal nodes carry no identity.
    pub fn identity(&self, config: &ReconcilerConfig) -> Option<Identity> {
        let el = self.as_element()?;
        if let Some(sid) = &el.sid {
            return Some(Identity::Sid(sid.clone()));
        }
        if let Some(sid) = el.attrs.get(&config.sid_attr) {
            return Some(Identity::Sid(sid.clone()));
        }
        el.attrs
            .get(&config.decorator_attr)
            .map(|d| Identity::Decorator(d.clone()))
    }
}

impl ElementData {
    /// The element's class set, if a class attribute is present.
    ///
    /// Whitespace-split so `"mark-bold mark-italic"` and
    /// `"mark-italic  mark-bold"` compare equal.
    pub fn class_set(&self) -> Option<BTreeSet<&str>> {
        self.attrs
            .get("class")
            .map(|c| c.split_whitespace().collect())
    }

    /// The attributes the element wants on its DOM host, with the sid
    /// identity channel materialized into the configured attribute.
    pub fn desired_attrs(&self, config: &ReconcilerConfig) -> BTreeMap<String, String> {
        let mut attrs = self.attrs.clone();
        if let Some(sid) = &self.sid {
            attrs.insert(config.sid_attr.clone(), sid.clone());
        }
        attrs
    }
}

impl From<&str> for VNode {
    fn from(s: &str) -> Self {
        VNode::text(s)
    }
}

impl From<String> for VNode {
    fn from(s: String) -> Self {
        VNode::text(s)
    }
}

impl From<i64> for VNode {
    fn from(n: i64) -> Self {
        VNode::text(n.to_string())
    }
}

impl From<f64> for VNode {
    fn from(n: f64) -> Self {
        VNode::text(n.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomArena;

    #[test]
    fn test_builder_shapes() {
        let node = VNode::element("p")
            .sid("para-1")
            .attr("class", "line")
            .child(VNode::text("hello "))
            .child(VNode::element("span").attr("class", "mark-bold").collapsed_text("world"));

        let el = node.as_element().unwrap();
        assert_eq!(el.tag, "p");
        assert_eq!(el.sid.as_deref(), Some("para-1"));
        assert_eq!(el.children.len(), 2);
        assert!(node.is_component());

        let span = el.children[1].as_element().unwrap();
        assert_eq!(span.text.as_deref(), Some("world"));
        assert!(span.children.is_empty());
    }

    #[test]
    fn test_primitive_children_from_impls() {
        let node = VNode::element("p").child("abc").child(42i64);
        let el = node.as_element().unwrap();
        assert_eq!(el.children[0].as_text(), Some("abc"));
        assert_eq!(el.children[1].as_text(), Some("42"));
    }

    #[test]
    fn test_identity_precedence() {
        let config = ReconcilerConfig::default();

        let by_sid = VNode::element("div").sid("s1");
        assert_eq!(by_sid.identity(&config), Some(Identity::Sid("s1".into())));

        let by_sid_attr = VNode::element("div").attr(&config.sid_attr, "s2");
        assert_eq!(by_sid_attr.identity(&config), Some(Identity::Sid("s2".into())));

        let by_decorator = VNode::element("div").attr(&config.decorator_attr, "d1");
        assert_eq!(
            by_decorator.identity(&config),
            Some(Identity::Decorator("d1".into()))
        );

        // sid wins over decorator when both are present
        let both = VNode::element("div")
            .sid("s3")
            .attr(&config.decorator_attr, "d2");
        assert_eq!(both.identity(&config), Some(Identity::Sid("s3".into())));

        assert_eq!(VNode::text("t").identity(&config), None);
    }

    #[test]
    fn test_class_set_order_independent() {
        let a = VNode::element("span").attr("class", "mark-bold mark-italic");
        let b = VNode::element("span").attr("class", "mark-italic  mark-bold");
        assert_eq!(
            a.as_element().unwrap().class_set(),
            b.as_element().unwrap().class_set()
        );
    }

    #[test]
    fn test_desired_attrs_materializes_sid() {
        let config = ReconcilerConfig::default();
        let node = VNode::element("div").sid("s1").attr("class", "c");
        let attrs = node.as_element().unwrap().desired_attrs(&config);
        assert_eq!(attrs.get(&config.sid_attr).map(String::as_str), Some("s1"));
        assert_eq!(attrs.get("class").map(String::as_str), Some("c"));
    }

    #[test]
    fn test_tree_is_deeply_cloneable_with_meta() {
        let mut dom = DomArena::new();
        let host = dom.create_element("p");

        let mut node = VNode::element("p").child(VNode::text("x"));
        node.meta.host = Some(host);

        let snapshot = node.clone();
        assert_eq!(snapshot.meta.host, Some(host));
        assert_eq!(snapshot, node);
    }
}
