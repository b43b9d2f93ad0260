//! Error type for admin API requests.

use thiserror::Error;

/// A failed request against the admin API.
///
/// The variants only refine log output; callers treat every error as the
/// same "request failed" outcome.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),

    /// No response within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("{method} {path} returned status {status}")]
    Status {
        method: String,
        path: String,
        status: u16,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Any other transport-level failure.
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Request(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = ApiError::Status {
            method: "PATCH".to_string(),
            path: "/api/cluster/etl".to_string(),
            status: 400,
        };
        assert_eq!(err.to_string(), "PATCH /api/cluster/etl returned status 400");
    }
}
