use std::collections::TryReserveError;

use thiserror::Error;

/// Errors produced by [`ChainedTable`](crate::ChainedTable) and its builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The bucket array or a key buffer could not be allocated.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Doubling the bucket array would overflow `usize`.
    #[error("bucket count {0} cannot be doubled")]
    CapacityOverflow(usize),

    /// The key is not present in the table.
    #[error("key not found")]
    NotFound,

    /// Keys must contain at least one byte.
    #[error("key must not be empty")]
    EmptyKey,

    /// The builder was given parameters it cannot honour.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
