//! Graph-subsystem error type.

use thiserror::Error;

/// Errors produced by `mm-graph`.
///
/// All variants are construction-time errors, fatal to the construction
/// call that raised them: callers should fix their input rather than retry.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node or link name collides with one already in the graph.  Names
    /// must be globally unique across all layers.
    #[error("duplicate identifier {0:?}")]
    DuplicateIdentifier(String),

    #[error("unknown node {0:?}")]
    UnknownNode(String),

    #[error("unknown section {0:?}")]
    UnknownSection(String),

    #[error("unknown cost attribute {0:?}")]
    UnknownCost(String),

    /// The label registry is full (at most 64 distinct eligibility labels).
    #[error("cannot register label {0:?}: registry holds the maximum of 64 labels")]
    LabelOverflow(String),

    #[error("section {0:?} has non-positive length")]
    InvalidGeometry(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
