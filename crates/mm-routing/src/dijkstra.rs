//! Label-constrained Dijkstra with deterministic tie-breaking.
//!
//! # Tie-break rule
//!
//! Two paths of equal cost are ordered by hop count (fewer wins), then by
//! the link-index sequence (lexicographically smaller wins, compared from
//! the first link).  Per node the search keeps the best `(cost, hops,
//! incoming link)` triple; on a full cost-and-hops tie the two candidate
//! prefixes are rebuilt and compared front to back, and an improvement is
//! re-pushed so it propagates to already-relaxed successors.  The result is
//! fully reproducible across runs and thread counts.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use mm_core::{LinkIndex, NodeIndex};
use mm_graph::{CostId, LabelSet, MultiLayerGraph};

use crate::{Path, RoutingError, RoutingResult};

// ── Heap entry ────────────────────────────────────────────────────────────────

/// Priority-queue entry ordered by `(cost, hops, node)`.
///
/// Costs are non-negative finite floats; `total_cmp` gives a total order and
/// the extra keys make popping order deterministic.
#[derive(Copy, Clone, Debug)]
struct HeapEntry {
    cost: f64,
    hops: u32,
    node: NodeIndex,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.hops.cmp(&other.hops))
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── Per-node search state ─────────────────────────────────────────────────────

#[derive(Copy, Clone)]
struct NodeLabel {
    cost: f64,
    hops: u32,
    prev_link: LinkIndex,
}

impl NodeLabel {
    const UNREACHED: NodeLabel = NodeLabel {
        cost: f64::INFINITY,
        hops: u32::MAX,
        prev_link: LinkIndex::INVALID,
    };
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Shortest path from `origin` to `destination` under `cost_name`, using
/// only links eligible under `labels` (empty set = no restriction).
///
/// Costs must be non-negative.  Fails with [`RoutingError::PathNotFound`]
/// when the destination is unreachable.
pub fn shortest_path(
    graph: &MultiLayerGraph,
    origin: NodeIndex,
    destination: NodeIndex,
    cost_name: &str,
    labels: LabelSet,
) -> RoutingResult<Path> {
    let col = graph.resolve_cost(cost_name)?;
    shortest_path_resolved(graph, origin, destination, col, labels)
}

/// As [`shortest_path`] but with a pre-resolved cost column — the form used
/// by the batch API so name resolution happens once per batch.
pub fn shortest_path_resolved(
    graph: &MultiLayerGraph,
    origin: NodeIndex,
    destination: NodeIndex,
    col: CostId,
    labels: LabelSet,
) -> RoutingResult<Path> {
    search(graph, origin, destination, col, labels, None, None)
        .ok_or(RoutingError::PathNotFound { origin, destination })
}

/// Constrained variant used by Yen's spur searches: `banned_links` are
/// skipped entirely, `banned_nodes` may not be entered.
pub(crate) fn shortest_path_avoiding(
    graph: &MultiLayerGraph,
    origin: NodeIndex,
    destination: NodeIndex,
    col: CostId,
    labels: LabelSet,
    banned_links: &FxHashSet<LinkIndex>,
    banned_nodes: &FxHashSet<NodeIndex>,
) -> Option<Path> {
    search(
        graph,
        origin,
        destination,
        col,
        labels,
        Some(banned_links),
        Some(banned_nodes),
    )
}

// ── Search core ───────────────────────────────────────────────────────────────

fn search(
    graph: &MultiLayerGraph,
    origin: NodeIndex,
    destination: NodeIndex,
    col: CostId,
    labels: LabelSet,
    banned_links: Option<&FxHashSet<LinkIndex>>,
    banned_nodes: Option<&FxHashSet<NodeIndex>>,
) -> Option<Path> {
    if origin == destination {
        return Some(Path { links: vec![], cost: 0.0 });
    }

    let n = graph.node_count();
    let mut best = vec![NodeLabel::UNREACHED; n];
    best[origin.index()] = NodeLabel { cost: 0.0, hops: 0, prev_link: LinkIndex::INVALID };

    let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
    heap.push(Reverse(HeapEntry { cost: 0.0, hops: 0, node: origin }));

    while let Some(Reverse(entry)) = heap.pop() {
        let node = entry.node;
        if node == destination {
            return Some(reconstruct(graph, &best, origin, destination));
        }

        // Skip stale heap entries.
        let label = best[node.index()];
        if entry.cost > label.cost || (entry.cost == label.cost && entry.hops > label.hops) {
            continue;
        }

        for link in graph.neighbors(node, labels) {
            if banned_links.is_some_and(|b| b.contains(&link)) {
                continue;
            }
            let next = graph.link_target(link);
            if banned_nodes.is_some_and(|b| b.contains(&next)) {
                continue;
            }

            let new_cost = label.cost + graph.cost_value(col, link);
            let new_hops = label.hops + 1;
            let current = best[next.index()];

            let improves = match new_cost.total_cmp(&current.cost) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => match new_hops.cmp(&current.hops) {
                    Ordering::Less => true,
                    Ordering::Greater => false,
                    // Equal cost and hops: keep the sequence that orders
                    // first.  Comparing incoming links alone would order
                    // sequences from the back, so rebuild both prefixes
                    // and compare them from the front.
                    Ordering::Equal => {
                        link != current.prev_link
                            && candidate_orders_first(graph, &best, origin, node, link, next)
                    }
                },
            };

            if improves {
                best[next.index()] = NodeLabel { cost: new_cost, hops: new_hops, prev_link: link };
                heap.push(Reverse(HeapEntry { cost: new_cost, hops: new_hops, node: next }));
            }
        }
    }

    None
}

/// `true` when `chain(origin..node) + link` orders before the link sequence
/// currently stored for `next`.  Only called on full `(cost, hops)` ties, so
/// both sequences have the same length.
fn candidate_orders_first(
    graph: &MultiLayerGraph,
    best: &[NodeLabel],
    origin: NodeIndex,
    node: NodeIndex,
    link: LinkIndex,
    next: NodeIndex,
) -> bool {
    let mut candidate = chain(graph, best, origin, node);
    candidate.push(link);
    candidate < chain(graph, best, origin, next)
}

/// The link sequence stored in `best` from `origin` to `node`, first link
/// first.
fn chain(
    graph: &MultiLayerGraph,
    best: &[NodeLabel],
    origin: NodeIndex,
    node: NodeIndex,
) -> Vec<LinkIndex> {
    let mut links = Vec::new();
    let mut cursor = node;
    while cursor != origin {
        let link = best[cursor.index()].prev_link;
        debug_assert!(link != LinkIndex::INVALID);
        links.push(link);
        cursor = graph.link_endpoints(link).0;
    }
    links.reverse();
    links
}

fn reconstruct(
    graph: &MultiLayerGraph,
    best: &[NodeLabel],
    origin: NodeIndex,
    destination: NodeIndex,
) -> Path {
    Path {
        links: chain(graph, best, origin, destination),
        cost: best[destination.index()].cost,
    }
}
