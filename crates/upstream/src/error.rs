//! Upstream fetch error types.

use thiserror::Error;

/// Why a single upstream fetch did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The upstream answered 404 for the product.
    #[error("not found")]
    NotFound,

    /// The upstream could not be reached or answered with an unexpected status.
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// The deadline passed before the upstream answered.
    #[error("timed out")]
    Timeout,

    /// The caller's cancellation signal fired before the upstream answered.
    #[error("cancelled")]
    Cancelled,

    /// The upstream answered 2xx with a body that is not a valid record.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Classifies a `reqwest` transport error.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Malformed(err.to_string())
        } else {
            FetchError::Unreachable(err.to_string())
        }
    }

    /// Short, stable label used in metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::NotFound => "not_found",
            FetchError::Unreachable(_) => "unreachable",
            FetchError::Timeout => "timeout",
            FetchError::Cancelled => "cancelled",
            FetchError::Malformed(_) => "malformed",
        }
    }
}
