use mm_core::LinkIndex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    /// Every link belongs to at most one reservoir.
    #[error("link {0:?} is already covered by another reservoir")]
    LinkAlreadyCovered(LinkIndex),

    #[error("duplicate reservoir name: {0}")]
    DuplicateReservoir(String),

    #[error("unknown zone: {0}")]
    UnknownZone(String),

    /// MFD parameters must satisfy 0 < critical < jam and Pc > 0.
    #[error("invalid MFD parameters: {0}")]
    InvalidMfd(String),
}

pub type FlowResult<T> = Result<T, FlowError>;
