//! Text reuse - primitive text children and collapsed `.text` values.
//!
//! Text nodes never become fibers. Primitive children are applied after the
//! element-shaped children of a parent have been reconciled, reusing
//! existing text nodes found by a position-aligned scan (forward from the
//! target index, then backward), each claimable once per pass. Only the
//! final step writes `textContent`, and only when the value differs: the
//! host page relies on mutation silence to distinguish user input from
//! programmatic updates, so an identical write is a contract violation, not
//! an optimization miss.

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::dom::{DomArena, NodeId};

/// Find an unclaimed text node among `parent`'s current children to back
/// the primitive at `target_index`. Forward scan from the target position,
/// then backward.
pub(crate) fn find_reusable_text(
    dom: &DomArena,
    parent: NodeId,
    target_index: usize,
    claimed: &FxHashSet<NodeId>,
) -> Option<NodeId> {
    let children = dom.children(parent);
    let start = target_index.min(children.len());

    for &candidate in &children[start..] {
        if dom.is_text(candidate) && !claimed.contains(&candidate) {
            return Some(candidate);
        }
    }
    for &candidate in children[..start].iter().rev() {
        if dom.is_text(candidate) && !claimed.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Apply one primitive text child: reuse a scanned text node (writing only
/// on difference) or create and append a new one. Returns the bound node.
pub(crate) fn apply_primitive_text(
    dom: &mut DomArena,
    parent: NodeId,
    text: &str,
    target_index: usize,
    claimed: &FxHashSet<NodeId>,
) -> NodeId {
    match find_reusable_text(dom, parent, target_index, claimed) {
        Some(node) => {
            // set_text is change-gated; an equal value writes nothing.
            dom.set_text(node, text);
            node
        }
        None => {
            trace!(target_index, "creating text node");
            let node = dom.create_text(text);
            dom.append_child(parent, node);
            node
        }
    }
}

/// Apply a collapsed `.text` value: the element's entire content is a
/// single text run. Reuses an existing lone text child; otherwise clears
/// all children and creates exactly one text node.
pub(crate) fn handle_text_property(dom: &mut DomArena, host: NodeId, text: &str) {
    let children = dom.children(host);
    if let [only] = children
        && dom.is_text(*only)
    {
        let only = *only;
        dom.set_text(only, text);
        return;
    }

    for child in dom.children(host).to_vec() {
        dom.despawn_subtree(child);
    }
    let node = dom.create_text(text);
    dom.append_child(host, node);
}
