//! Yen-style k-shortest simple paths.
//!
//! Classic structure: find the shortest path, then for each accepted path
//! deviate at every node along it, running a constrained Dijkstra from the
//! deviation (spur) node with the already-used continuation links banned and
//! the root prefix's nodes excluded.  Candidates accumulate in a pool ordered
//! by cost; duplicates (identical link sequences) are dropped.
//!
//! `loop_window` bounds how far upstream of the spur node the revisit
//! exclusion reaches: `0` excludes the entire root prefix (strict simple
//! paths); a positive value excludes only the last `loop_window` nodes,
//! allowing long paths to re-enter earlier areas (useful on transit layers
//! where the same street is legitimately crossed twice far apart).

use std::cmp::Ordering;

use rustc_hash::FxHashSet;

use mm_core::NodeIndex;
use mm_graph::{CostId, LabelSet, MultiLayerGraph};

use crate::dijkstra::{shortest_path_avoiding, shortest_path_resolved};
use crate::{Path, RoutingResult};

/// The k lowest-cost simple paths from `origin` to `destination`, in
/// non-decreasing cost order, without duplicate link sequences.
///
/// Returns fewer than `k` paths when the candidate pool is exhausted; fails
/// with `PathNotFound` only when not even one path exists.
pub fn k_shortest_paths(
    graph: &MultiLayerGraph,
    origin: NodeIndex,
    destination: NodeIndex,
    cost_name: &str,
    labels: LabelSet,
    k: usize,
    loop_window: usize,
) -> RoutingResult<Vec<Path>> {
    let col = graph.resolve_cost(cost_name)?;
    k_shortest_paths_resolved(graph, origin, destination, col, labels, k, loop_window)
}

/// As [`k_shortest_paths`] but with a pre-resolved cost column — the form
/// used by the batch API.
pub fn k_shortest_paths_resolved(
    graph: &MultiLayerGraph,
    origin: NodeIndex,
    destination: NodeIndex,
    col: CostId,
    labels: LabelSet,
    k: usize,
    loop_window: usize,
) -> RoutingResult<Vec<Path>> {
    let first = shortest_path_resolved(graph, origin, destination, col, labels)?;
    if k <= 1 || first.is_trivial() {
        return Ok(vec![first]);
    }

    let mut accepted: Vec<Path> = vec![first];
    let mut pool: Vec<Path> = Vec::new();
    let mut seen: FxHashSet<Vec<mm_core::LinkIndex>> = FxHashSet::default();
    seen.insert(accepted[0].links.clone());

    while accepted.len() < k {
        let Some(prev) = accepted.last().cloned() else { break };
        let prev_nodes = prev.nodes(graph, origin);

        // Deviate at every node of the previously accepted path except the
        // destination itself.
        for spur_idx in 0..prev.links.len() {
            let spur_node = prev_nodes[spur_idx];
            let root = &prev.links[..spur_idx];

            // Ban the continuation link of every accepted path sharing this
            // root, so the spur search is forced onto a new branch.
            let mut banned_links = FxHashSet::default();
            for path in &accepted {
                if path.links.len() > spur_idx && path.links[..spur_idx] == *root {
                    banned_links.insert(path.links[spur_idx]);
                }
            }

            // Exclude (a window of) the root prefix's nodes so the spur
            // cannot loop back through them.
            let window_start = if loop_window == 0 {
                0
            } else {
                spur_idx.saturating_sub(loop_window)
            };
            let banned_nodes: FxHashSet<NodeIndex> =
                prev_nodes[window_start..spur_idx].iter().copied().collect();

            let Some(spur) =
                shortest_path_avoiding(graph, spur_node, destination, col, labels, &banned_links, &banned_nodes)
            else {
                continue;
            };

            let mut links = root.to_vec();
            links.extend_from_slice(&spur.links);
            if !seen.insert(links.clone()) {
                continue;
            }
            let root_cost: f64 = root.iter().map(|&l| graph.cost_value(col, l)).sum();
            pool.push(Path { cost: root_cost + spur.cost, links });
        }

        if pool.is_empty() {
            break;
        }

        // Pop the cheapest candidate (deterministic order: cost, hops, links).
        let mut best_idx = 0;
        for i in 1..pool.len() {
            if compare_paths(&pool[i], &pool[best_idx]) == Ordering::Less {
                best_idx = i;
            }
        }
        accepted.push(pool.swap_remove(best_idx));
    }

    Ok(accepted)
}

fn compare_paths(a: &Path, b: &Path) -> Ordering {
    a.cost
        .total_cmp(&b.cost)
        .then_with(|| a.hops().cmp(&b.hops()))
        .then_with(|| a.links.cmp(&b.links))
}
