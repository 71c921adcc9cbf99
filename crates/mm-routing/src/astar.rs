//! A* over the multi-layer graph with a straight-line-distance heuristic.
//!
//! The heuristic is `euclidean_distance(node, destination) / speed_bound`.
//! It is admissible whenever the queried cost is a travel time and every
//! link satisfies `cost ≥ straight_line_length / speed_bound` — i.e.
//! `speed_bound` must be at least the fastest speed reachable anywhere in
//! the network.  The caller supplies the bound; with an inadmissible bound
//! A* degrades to a best-effort search and may return a suboptimal path.
//!
//! Use plain [`shortest_path`][crate::shortest_path] for non-time costs
//! (fares, lengths) where no geometric bound exists.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use mm_core::{LinkIndex, NodeIndex, Point};
use mm_graph::{LabelSet, MultiLayerGraph};

use crate::{Path, RoutingError, RoutingResult};

#[derive(Copy, Clone, Debug)]
struct HeapEntry {
    /// `g + h` — cost so far plus heuristic to destination.
    priority: f64,
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
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| self.hops.cmp(&other.hops))
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* shortest path under a time-like cost attribute.
///
/// `speed_bound` is in m/s and must dominate every speed in the network for
/// the result to be exact.
pub fn astar_shortest_path(
    graph: &MultiLayerGraph,
    origin: NodeIndex,
    destination: NodeIndex,
    cost_name: &str,
    labels: LabelSet,
    speed_bound: f64,
) -> RoutingResult<Path> {
    let col = graph.resolve_cost(cost_name)?;

    if origin == destination {
        return Ok(Path { links: vec![], cost: 0.0 });
    }

    let goal = graph.node_pos(destination);
    let h = |pos: Point| pos.distance(goal) / speed_bound;

    let n = graph.node_count();
    let mut g_cost = vec![f64::INFINITY; n];
    let mut prev_link = vec![LinkIndex::INVALID; n];
    g_cost[origin.index()] = 0.0;

    let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
    heap.push(Reverse(HeapEntry {
        priority: h(graph.node_pos(origin)),
        hops: 0,
        node: origin,
    }));

    while let Some(Reverse(entry)) = heap.pop() {
        let node = entry.node;
        if node == destination {
            return Ok(reconstruct(graph, &prev_link, origin, destination, g_cost[node.index()]));
        }

        // Stale check against the consistent part of the priority.
        if entry.priority - h(graph.node_pos(node)) > g_cost[node.index()] + 1e-12 {
            continue;
        }

        for link in graph.neighbors(node, labels) {
            let next = graph.link_target(link);
            let tentative = g_cost[node.index()] + graph.cost_value(col, link);
            if tentative < g_cost[next.index()] {
                g_cost[next.index()] = tentative;
                prev_link[next.index()] = link;
                heap.push(Reverse(HeapEntry {
                    priority: tentative + h(graph.node_pos(next)),
                    hops: entry.hops + 1,
                    node: next,
                }));
            }
        }
    }

    Err(RoutingError::PathNotFound { origin, destination })
}

fn reconstruct(
    graph: &MultiLayerGraph,
    prev_link: &[LinkIndex],
    origin: NodeIndex,
    destination: NodeIndex,
    cost: f64,
) -> Path {
    let mut links = Vec::new();
    let mut cursor = destination;
    while cursor != origin {
        let link = prev_link[cursor.index()];
        debug_assert!(link != LinkIndex::INVALID);
        links.push(link);
        cursor = graph.link_endpoints(link).0;
    }
    links.reverse();
    Path { links, cost }
}
