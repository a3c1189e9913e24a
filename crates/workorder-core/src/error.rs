use thiserror::Error;

/// A display value that could not be mapped back to a reference id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unknown client: {0}")]
    UnknownClient(String),

    #[error("unknown machine: {0}")]
    UnknownMachine(String),

    #[error("unknown part: {0}")]
    UnknownPart(String),
}

#[derive(Debug, Error)]
pub enum WorkOrderError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("rechange row {0} does not exist")]
    RowOutOfRange(usize),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
