//! Error types for nowplay-svc
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. No error here is fatal to an embedding host: the callers
//! log and continue.

use thiserror::Error;

/// Main error type for the nowplay service
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP server errors (bind failures, serve errors)
    #[error("HTTP server error: {0}")]
    Http(String),

    /// Outbound remote-fetch errors (network, timeout, bad payload)
    #[error("Remote fetch error: {0}")]
    Fetch(String),
}

/// Convenience Result type using the nowplay-svc Error
pub type Result<T> = std::result::Result<T, Error>;
