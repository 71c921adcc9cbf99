use mm_core::CoreError;
use mm_fleet::FleetError;
use mm_graph::GraphError;
use mm_routing::RoutingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("graph: {0}")]
    Graph(#[from] GraphError),

    #[error("routing: {0}")]
    Routing(#[from] RoutingError),

    #[error("fleet: {0}")]
    Fleet(#[from] FleetError),

    #[error(transparent)]
    Config(#[from] CoreError),

    /// `step()` on a terminated run, `run()` on a running one, and so on.
    #[error("invalid run state: {0}")]
    InvalidState(String),
}

pub type SimResult<T> = Result<T, SimError>;
