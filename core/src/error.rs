//! Error types for the bookshop client.
//!
//! # Design
//! Callers of the fallback operations only ever see "the request failed";
//! the variants exist so that the log line says why. `NotFound` is split out
//! of `Status` because a missing book or review is the common case.

use thiserror::Error;

/// Result type alias using `RequestError`.
pub type Result<T> = std::result::Result<T, RequestError>;

/// A single request did not produce a usable response body.
#[derive(Debug, Error)]
pub enum RequestError {
    /// No response was obtained: connection refused, DNS failure, I/O error.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
