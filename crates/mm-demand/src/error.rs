use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemandError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    /// A malformed demand row.  Loaders log and skip these rather than
    /// aborting the load.
    #[error("demand row {line}: {reason}")]
    Parse { line: u64, reason: String },
}

pub type DemandResult<T> = Result<T, DemandError>;
