//! Parallel batch queries.
//!
//! Every query in a batch is an independent read-only search over the same
//! graph, so the batch maps straight onto a Rayon parallel iterator: no
//! locks, no shared mutable state, results collected in input order
//! regardless of completion order.  A single query's `PathNotFound` is a
//! per-index entry, never an abort of the batch.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use mm_core::NodeIndex;
use mm_graph::{LabelSet, MultiLayerGraph};

use crate::dijkstra::shortest_path_resolved;
use crate::ksp::k_shortest_paths_resolved;
use crate::{Path, RoutingError, RoutingResult};

/// One origin/destination query with its eligibility labels.
#[derive(Copy, Clone, Debug)]
pub struct PathRequest {
    pub origin: NodeIndex,
    pub destination: NodeIndex,
    pub labels: LabelSet,
}

/// Run all `requests` in parallel under `cost_name`.
///
/// `workers = None` uses the global Rayon pool; `Some(n)` builds a dedicated
/// pool of `n` threads for this batch.  The output is aligned with the input
/// by index.  An unknown cost name fails the whole batch (it is a caller
/// bug, not a per-query outcome).
pub fn parallel_shortest_paths(
    graph: &MultiLayerGraph,
    requests: &[PathRequest],
    cost_name: &str,
    workers: Option<usize>,
) -> RoutingResult<Vec<RoutingResult<Path>>> {
    let col = graph.resolve_cost(cost_name)?;

    let run = || {
        requests
            .par_iter()
            .map(|q| shortest_path_resolved(graph, q.origin, q.destination, col, q.labels))
            .collect()
    };

    match workers {
        None => Ok(run()),
        Some(n) => {
            let pool = ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| RoutingError::WorkerPool(e.to_string()))?;
            Ok(pool.install(run))
        }
    }
}

/// Parallel k-shortest candidate generation, one candidate set per request.
///
/// The supervisor uses this to build each new traveler's choice set in one
/// batch at tick start.
pub fn parallel_k_shortest_paths(
    graph: &MultiLayerGraph,
    requests: &[PathRequest],
    cost_name: &str,
    k: usize,
    loop_window: usize,
    workers: Option<usize>,
) -> RoutingResult<Vec<RoutingResult<Vec<Path>>>> {
    let col = graph.resolve_cost(cost_name)?;

    let run = || {
        requests
            .par_iter()
            .map(|q| {
                k_shortest_paths_resolved(
                    graph,
                    q.origin,
                    q.destination,
                    col,
                    q.labels,
                    k,
                    loop_window,
                )
            })
            .collect()
    };

    match workers {
        None => Ok(run()),
        Some(n) => {
            let pool = ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| RoutingError::WorkerPool(e.to_string()))?;
            Ok(pool.install(run))
        }
    }
}
