//! Error types for node selection.

use thiserror::Error;

/// Result type alias for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors raised by node selection.
///
/// Surfaced to the caller as-is; retry policy belongs to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("no live node available")]
    NoAvailableNode,
}
