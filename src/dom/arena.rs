//! DOM arena - slotmap-backed in-memory document tree.
//!
//! Nodes are addressed by copyable [`NodeId`] keys; the arena owns all node
//! data, so a `NodeId` held elsewhere (e.g. a VNode's `meta` back-reference)
//! is a weak handle that simply stops resolving after the node is dropped.
//!
//! All writes are change-gated: an operation that would leave the tree
//! exactly as it is performs no work and records no mutation. This is the
//! arena-level half of the engine's anti-mutation-storm guarantee.

use std::collections::BTreeMap;

use slotmap::{SecondaryMap, SlotMap, new_key_type};
use tracing::warn;

use super::mutation::{MutationJournal, MutationRecord};

new_key_type! {
    /// Stable handle to a node in the arena.
    pub struct NodeId;
}

/// Payload of one DOM node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// An element with a tag and attributes. Attributes use a BTreeMap for
    /// deterministic iteration order (stable diffs, stable test output).
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
    },
    /// A text run.
    Text { content: String },
}

/// The in-memory document tree.
#[derive(Debug, Default)]
pub struct DomArena {
    nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parents: SecondaryMap<NodeId, NodeId>,
    journal: MutationJournal,
}

impl DomArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = self.nodes.insert(NodeData::Element {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
        });
        self.children.insert(id, Vec::new());
        id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, content: &str) -> NodeId {
        let id = self.nodes.insert(NodeData::Text {
            content: content.to_string(),
        });
        self.children.insert(id, Vec::new());
        id
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether the node is still alive in the arena.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether the node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id), Some(NodeData::Element { .. }))
    }

    /// Whether the node is a text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id), Some(NodeData::Text { .. }))
    }

    /// Tag name, if the node is a live element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id)? {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text { .. } => None,
        }
    }

    /// Text content, if the node is a live text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id)? {
            NodeData::Text { content } => Some(content),
            NodeData::Element { .. } => None,
        }
    }

    /// One attribute value.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.nodes.get(id)? {
            NodeData::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            NodeData::Text { .. } => None,
        }
    }

    /// All attributes of an element.
    pub fn attributes(&self, id: NodeId) -> Option<&BTreeMap<String, String>> {
        match self.nodes.get(id)? {
            NodeData::Element { attrs, .. } => Some(attrs),
            NodeData::Text { .. } => None,
        }
    }

    /// Direct children, in document order. Empty for text and dead nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parent node, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id).copied()
    }

    /// Index of `child` within `parent`'s child list.
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// First direct element child of `parent` whose attribute `name`
    /// equals `value`.
    pub fn child_with_attribute(&self, parent: NodeId, name: &str, value: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.attribute(c, name) == Some(value))
    }

    // =========================================================================
    // Attribute and text writes (change-gated)
    // =========================================================================

    /// Set an attribute. Records a mutation only if the value changes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(NodeData::Element { attrs, .. }) = self.nodes.get_mut(id) else {
            warn!(?id, name, "set_attribute on non-element node ignored");
            return;
        };
        if attrs.get(name).map(String::as_str) == Some(value) {
            return;
        }
        attrs.insert(name.to_string(), value.to_string());
        self.journal.push(MutationRecord::AttributeChanged {
            node: id,
            name: name.to_string(),
        });
    }

    /// Remove an attribute. Records a mutation only if it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        let Some(NodeData::Element { attrs, .. }) = self.nodes.get_mut(id) else {
            return;
        };
        if attrs.remove(name).is_some() {
            self.journal.push(MutationRecord::AttributeChanged {
                node: id,
                name: name.to_string(),
            });
        }
    }

    /// Set a text node's content. Records a mutation only on difference.
    pub fn set_text(&mut self, id: NodeId, content: &str) {
        let Some(NodeData::Text { content: current }) = self.nodes.get_mut(id) else {
            warn!(?id, "set_text on non-text node ignored");
            return;
        };
        if current == content {
            return;
        }
        *current = content.to_string();
        self.journal.push(MutationRecord::CharacterData { node: id });
    }

    // =========================================================================
    // Structural writes
    // =========================================================================

    /// Append `child` as the last child of `parent`, detaching it from any
    /// current parent first. No-op (and no record) if already in place.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            warn!(?parent, ?child, "append_child with dead node ignored");
            return;
        }
        if self.parent(child) == Some(parent) && self.children(parent).last() == Some(&child) {
            return;
        }
        self.detach(child);
        if let Some(list) = self.children.get_mut(parent) {
            list.push(child);
        }
        self.parents.insert(child, parent);
        self.journal
            .push(MutationRecord::ChildInserted { parent, child });
    }

    /// Insert `child` under `parent` immediately before `reference`.
    ///
    /// A missing or foreign reference degrades to append (the "reference
    /// node vanished" case is a normal outcome, not an error). No-op if the
    /// child already sits immediately before the reference.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let Some(reference) = reference else {
            self.append_child(parent, child);
            return;
        };
        let Some(ref_index) = self.index_of(parent, reference) else {
            warn!(?parent, ?reference, "insert_before reference not a child, appending");
            self.append_child(parent, child);
            return;
        };
        if ref_index > 0 && self.children(parent).get(ref_index - 1) == Some(&child) {
            return;
        }
        self.detach(child);
        // Re-resolve: detaching may have shifted the reference position.
        let Some(ref_index) = self.index_of(parent, reference) else {
            self.append_child(parent, child);
            return;
        };
        if let Some(list) = self.children.get_mut(parent) {
            list.insert(ref_index, child);
        }
        self.parents.insert(child, parent);
        self.journal
            .push(MutationRecord::ChildInserted { parent, child });
    }

    /// Detach `child` from `parent`. The subtree stays alive in the arena.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) != Some(parent) {
            return;
        }
        self.detach_recorded(child);
    }

    /// Detach a node from its parent and drop it and all descendants from
    /// the arena. Existing `NodeId` handles to the subtree go dead.
    pub fn despawn_subtree(&mut self, id: NodeId) {
        self.detach_recorded(id);
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if let Some(kids) = self.children.remove(node) {
                stack.extend(kids);
            }
            self.parents.remove(node);
            self.nodes.remove(node);
        }
    }

    /// Detach without recording (internal move machinery).
    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.parents.remove(child)
            && let Some(list) = self.children.get_mut(parent)
            && let Some(pos) = list.iter().position(|&c| c == child)
        {
            list.remove(pos);
        }
    }

    /// Detach and record a ChildRemoved mutation if the node was attached.
    fn detach_recorded(&mut self, child: NodeId) {
        if let Some(parent) = self.parent(child) {
            self.detach(child);
            self.journal
                .push(MutationRecord::ChildRemoved { parent, child });
        }
    }

    // =========================================================================
    // Journal access
    // =========================================================================

    /// The mutation journal.
    pub fn journal(&self) -> &MutationJournal {
        &self.journal
    }

    /// Drain all accumulated mutation records.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        self.journal.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_query() {
        let mut dom = DomArena::new();
        let el = dom.create_element("span");
        let text = dom.create_text("hello");

        assert!(dom.is_element(el));
        assert!(dom.is_text(text));
        assert_eq!(dom.tag(el), Some("span"));
        assert_eq!(dom.text(text), Some("hello"));
        assert_eq!(dom.tag(text), None);
    }

    #[test]
    fn test_append_and_parent_links() {
        let mut dom = DomArena::new();
        let parent = dom.create_element("div");
        let a = dom.create_element("span");
        let b = dom.create_text("t");

        dom.append_child(parent, a);
        dom.append_child(parent, b);

        assert_eq!(dom.children(parent), &[a, b]);
        assert_eq!(dom.parent(a), Some(parent));
        assert_eq!(dom.parent(b), Some(parent));
        assert_eq!(dom.index_of(parent, b), Some(1));
    }

    #[test]
    fn test_append_is_a_move() {
        let mut dom = DomArena::new();
        let p1 = dom.create_element("div");
        let p2 = dom.create_element("div");
        let child = dom.create_element("span");

        dom.append_child(p1, child);
        dom.append_child(p2, child);

        assert_eq!(dom.children(p1), &[] as &[NodeId]);
        assert_eq!(dom.children(p2), &[child]);
        assert_eq!(dom.parent(child), Some(p2));
    }

    #[test]
    fn test_insert_before() {
        let mut dom = DomArena::new();
        let parent = dom.create_element("div");
        let a = dom.create_element("a");
        let b = dom.create_element("b");
        let c = dom.create_element("c");
        dom.append_child(parent, a);
        dom.append_child(parent, b);
        dom.append_child(parent, c);

        // Move c before a: [c, a, b]
        dom.insert_before(parent, c, Some(a));
        assert_eq!(dom.children(parent), &[c, a, b]);
    }

    #[test]
    fn test_insert_before_missing_reference_appends() {
        let mut dom = DomArena::new();
        let parent = dom.create_element("div");
        let a = dom.create_element("a");
        let stranger = dom.create_element("x");
        dom.insert_before(parent, a, Some(stranger));
        assert_eq!(dom.children(parent), &[a]);
    }

    #[test]
    fn test_set_attribute_change_gated() {
        let mut dom = DomArena::new();
        let el = dom.create_element("span");
        dom.set_attribute(el, "class", "bold");
        dom.take_records();

        // Identical write records nothing.
        dom.set_attribute(el, "class", "bold");
        assert!(dom.journal().is_empty());

        dom.set_attribute(el, "class", "italic");
        assert_eq!(dom.take_records().len(), 1);
    }

    #[test]
    fn test_set_text_change_gated() {
        let mut dom = DomArena::new();
        let text = dom.create_text("abc");
        dom.set_text(text, "abc");
        assert!(dom.journal().is_empty());

        dom.set_text(text, "abcd");
        assert_eq!(dom.journal().character_data_count(), 1);
    }

    #[test]
    fn test_despawn_subtree() {
        let mut dom = DomArena::new();
        let root = dom.create_element("div");
        let child = dom.create_element("span");
        let grandchild = dom.create_text("t");
        dom.append_child(root, child);
        dom.append_child(child, grandchild);

        dom.despawn_subtree(child);
        assert!(!dom.contains(child));
        assert!(!dom.contains(grandchild));
        assert!(dom.contains(root));
        assert_eq!(dom.children(root), &[] as &[NodeId]);
    }

    #[test]
    fn test_child_with_attribute() {
        let mut dom = DomArena::new();
        let parent = dom.create_element("div");
        let a = dom.create_element("span");
        let b = dom.create_element("span");
        dom.set_attribute(b, "data-portal-id", "overlay");
        dom.append_child(parent, a);
        dom.append_child(parent, b);

        assert_eq!(dom.child_with_attribute(parent, "data-portal-id", "overlay"), Some(b));
        assert_eq!(dom.child_with_attribute(parent, "data-portal-id", "nope"), None);
    }
}
