//! Gateway error taxonomy.

use thiserror::Error;

/// Errors surfaced by gateway operations.
///
/// The console treats `Rejected` (application-level `success:false`) and
/// `Http` (transport failure or non-2xx status) uniformly as operation
/// failures; the distinction exists so rejection messages reach the user
/// verbatim while transport noise gets a stable prefix.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The store processed the request and refused it. Carries the server's
    /// own message.
    #[error("{0}")]
    Rejected(String),

    /// Transport-level failure: connection error, timeout, non-2xx status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body could not be decoded even after junk truncation.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Local file access failed (upload source, download destination).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
