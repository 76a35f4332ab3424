//! Reorder - pure relocation of retained DOM nodes.
//!
//! Walks the wanted order left to right; at each position, if the live
//! child (re-read every iteration, since prior insertions shift the list)
//! is not the wanted node, the wanted node is moved via insert-before.
//! Never creates and never removes - removal belongs to stale cleanup.
//! O(n) moves in the worst case, typically far fewer.

use tracing::trace;

use crate::dom::{DomArena, NodeId};

/// Bring `parent`'s children into `order`. Nodes not mentioned in `order`
/// are left alone (they drift past the ordered prefix).
pub(crate) fn reorder_children(dom: &mut DomArena, parent: NodeId, order: &[NodeId]) {
    for (position, &wanted) in order.iter().enumerate() {
        let live = dom.children(parent);
        if live.get(position) == Some(&wanted) {
            continue;
        }
        let reference = live.get(position).copied();
        trace!(?wanted, position, "relocating child");
        dom.insert_before(parent, wanted, reference);
    }
}
