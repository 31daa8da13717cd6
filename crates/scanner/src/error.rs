//! Transport-level errors for the check-in client.

use thiserror::Error;

/// Errors from talking to the admission API.
///
/// Business refusals never appear here; they are carried as
/// [`crate::ValidateOutcome`] / [`crate::CheckinOutcome`] variants.
#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered 401; the operator session is gone.
    #[error("Session expired")]
    SessionExpired,

    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(u16),

    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    #[error("Invalid client configuration: {0}")]
    Configuration(String),
}
