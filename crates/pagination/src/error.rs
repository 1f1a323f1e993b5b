use thiserror::Error;

/// Errors raised by the pagination layer.
///
/// Transport failures are not errors here: they are a regular
/// [`FetchOutcome::Failure`](crate::FetchOutcome::Failure).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaginationError {
    /// A request with a page or size below 1 was rejected.
    #[error("Invalid request: page {page} and size {size} must both be at least 1")]
    InvalidRequest { page: u32, size: u32 },
}

/// Result type for pagination operations.
pub type Result<T> = std::result::Result<T, PaginationError>;
