use std::time::Duration;

use ipmidev_transport::TransportError;

/// Errors that can end an exchange.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// Device-level failure, including a failed privileged call.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// No response became readable within the bound.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The response did not fit the receive buffer.
    #[error("response truncated ({len} bytes, buffer holds {capacity})")]
    Truncated { len: usize, capacity: usize },

    /// The response belongs to a different request.
    #[error("response correlation id {actual} does not match request {expected}")]
    CorrelationMismatch { expected: i64, actual: i64 },

    /// The response has no completion-code byte.
    #[error("response carries no completion code")]
    MissingCompletionCode,
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
