//! Routing-subsystem error type.

use thiserror::Error;

use mm_core::NodeIndex;
use mm_graph::GraphError;

/// Errors produced by `mm-routing`.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The destination is unreachable from the origin under the query's
    /// eligibility labels.  This is a per-query outcome, never a panic: a
    /// disconnected graph is an answer, not a failure of the engine.
    #[error("no path from {origin} to {destination} under the given labels")]
    PathNotFound {
        origin: NodeIndex,
        destination: NodeIndex,
    },

    /// Bad query input (unknown cost name, unknown node).
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The batch worker pool could not be constructed.
    #[error("worker pool: {0}")]
    WorkerPool(String),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
