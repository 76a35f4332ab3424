//! Host-finding - re-identifying DOM nodes across renders.
//!
//! Given a desired child VNode, locate the existing DOM node (if any) that
//! should be reused. Resolution is React-style and strictly scoped to the
//! current parent's previous children / current DOM children - never a
//! document-wide search, so a node moved to a different parent is always
//! treated as new.
//!
//! Order:
//! 1. identity at the same index (fast path via the prev child's `meta`);
//! 2. identity at the numerically closest index (handles reordering and
//!    duplicate decorator ids; equidistant candidates resolve to the
//!    earlier index);
//!    both keyed steps also require the live tag to match - a keyed node
//!    whose element type changed is recreated, never patched in place;
//! 3. structural fallback for unkeyed nodes (tag + class-set equality),
//!    exact index first, then a full scan - skipping any candidate that
//!    carries someone else's identity attribute;
//! 4. none: the caller creates.

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::dom::{DomArena, NodeId, ops};
use crate::types::ReconcilerConfig;
use crate::vnode::{ElementData, VNode};

/// Locate the DOM node to reuse for `child` at `child_index`, or `None` if
/// the caller must create one. `claimed` holds the DOM nodes already bound
/// to earlier siblings in this pass; a claimed node is never returned, which
/// is what keeps duplicate identities and identical mark wrappers bound to
/// distinct hosts.
pub(crate) fn find_host_for_child(
    dom: &DomArena,
    config: &ReconcilerConfig,
    parent: NodeId,
    child: &VNode,
    child_index: usize,
    prev_children: &[VNode],
    claimed: &FxHashSet<NodeId>,
) -> Option<NodeId> {
    let el = child.as_element()?;

    if let Some(identity) = child.identity(config) {
        // 1. Key at the same index.
        if let Some(prev) = prev_children.get(child_index)
            && prev.identity(config).as_ref() == Some(&identity)
            && let Some(host) = live_unclaimed(dom, parent, prev.meta.host, claimed, &el.tag)
        {
            trace!(%identity, child_index, "host matched at same index");
            return Some(host);
        }

        // 2. Key at the closest index. Duplicate identities are expected
        //    (decorator ids); each caller claim removes one candidate.
        let candidates: Vec<(usize, NodeId)> = prev_children
            .iter()
            .enumerate()
            .filter(|(_, prev)| prev.identity(config).as_ref() == Some(&identity))
            .filter_map(|(j, prev)| {
                live_unclaimed(dom, parent, prev.meta.host, claimed, &el.tag)
                    .map(|host| (j, host))
            })
            .collect();
        let found = closest_by_index(&candidates, child_index);
        if found.is_some() {
            trace!(%identity, child_index, "host matched by closest index");
        }
        return found;
    }

    // 3. Structural fallback, only when the child itself is unkeyed.
    let dom_children = dom.children(parent);
    if let Some(&candidate) = dom_children.get(child_index)
        && !claimed.contains(&candidate)
        && structural_match(dom, config, candidate, el)
    {
        trace!(tag = %el.tag, child_index, "structural match at exact index");
        return Some(candidate);
    }
    for &candidate in dom_children {
        if !claimed.contains(&candidate) && structural_match(dom, config, candidate, el) {
            trace!(tag = %el.tag, child_index, "structural match by scan");
            return Some(candidate);
        }
    }
    None
}

/// Pick the previous VNode to diff `child` against, purely at the VNode
/// level (no DOM access). Same key/structural policy as host resolution;
/// returns an index into `prev_children`.
pub(crate) fn find_prev_child_vnode(
    config: &ReconcilerConfig,
    child: &VNode,
    child_index: usize,
    prev_children: &[VNode],
    claimed_prev: &FxHashSet<usize>,
) -> Option<usize> {
    let el = child.as_element()?;

    if let Some(identity) = child.identity(config) {
        if let Some(prev) = prev_children.get(child_index)
            && !claimed_prev.contains(&child_index)
            && prev.identity(config).as_ref() == Some(&identity)
        {
            return Some(child_index);
        }
        let candidates: Vec<(usize, usize)> = prev_children
            .iter()
            .enumerate()
            .filter(|(j, prev)| {
                !claimed_prev.contains(j) && prev.identity(config).as_ref() == Some(&identity)
            })
            .map(|(j, _)| (j, j))
            .collect();
        return closest_by_index(&candidates, child_index);
    }

    let matches_structure = |prev: &VNode| {
        prev.identity(config).is_none()
            && prev
                .as_element()
                .is_some_and(|p| p.tag == el.tag && p.class_set() == el.class_set())
    };

    if let Some(prev) = prev_children.get(child_index)
        && !claimed_prev.contains(&child_index)
        && matches_structure(prev)
    {
        return Some(child_index);
    }
    prev_children
        .iter()
        .enumerate()
        .find(|(j, prev)| !claimed_prev.contains(j) && matches_structure(prev))
        .map(|(j, _)| j)
}

/// Among `(index, value)` candidates, pick the value whose index is
/// numerically closest to `target`. Two equally close candidates (one
/// before, one after) resolve to the earlier index, so repeated renders
/// of the same sibling list pair deterministically.
pub(crate) fn closest_by_index<T: Copy>(candidates: &[(usize, T)], target: usize) -> Option<T> {
    candidates
        .iter()
        .min_by_key(|(j, _)| (j.abs_diff(target), *j))
        .map(|&(_, value)| value)
}

/// Whether a live DOM node can stand in for the unkeyed element `el`:
/// element, same tag, equal class sets, and carrying no identity attribute
/// (a node that carries someone else's identity is never reused).
fn structural_match(
    dom: &DomArena,
    config: &ReconcilerConfig,
    candidate: NodeId,
    el: &ElementData,
) -> bool {
    if dom.tag(candidate) != Some(el.tag.as_str()) {
        return false;
    }
    if ops::dom_has_identity(dom, config, candidate) {
        return false;
    }
    ops::dom_class_set(dom, candidate) == el.class_set()
}

/// Resolve a previous child's `meta` back-reference to a live, still-in-
/// parent, unclaimed DOM node of the wanted tag. A tag mismatch means the
/// keyed node changed element type; it is never patched in place, it is
/// recreated (and the old host falls to the sweep).
fn live_unclaimed(
    dom: &DomArena,
    parent: NodeId,
    host: Option<NodeId>,
    claimed: &FxHashSet<NodeId>,
    tag: &str,
) -> Option<NodeId> {
    let host = host?;
    if claimed.contains(&host) || dom.parent(host) != Some(parent) {
        return None;
    }
    if dom.tag(host) != Some(tag) {
        return None;
    }
    Some(host)
}
