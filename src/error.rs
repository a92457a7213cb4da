//! Error handling for the zonepull library.
//!
//! This module provides centralized error handling covering the whole
//! transfer pipeline: run-level setup failures, per-zone download failures,
//! and sink persistence failures. All errors implement the standard Error
//! trait and provide context about what went wrong.

use std::io;
use thiserror::Error;

/// Errors that can happen when using zonepull.
///
/// Run-level variants ([`Error::AuthFailure`], [`Error::ListingFailure`])
/// abort a run before any job starts. Per-zone variants fail only the job
/// they belong to; the pool keeps processing the remaining zones.
#[derive(Error, Debug)]
pub enum Error {
    /// The credential exchange was rejected or the token endpoint misbehaved.
    ///
    /// Fatal: nothing can be downloaded without a bearer token.
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    /// The zone link enumeration failed.
    ///
    /// Fatal: without the link list there are no jobs to run.
    #[error("Listing zone links failed: {0}")]
    ListingFailure(String),

    /// The metadata probe did not report a usable size for a resource.
    #[error("No content length reported for \"{url}\"")]
    SizeUnavailable {
        /// URL of the resource that could not be sized.
        url: String,
    },

    /// A byte-range fetch failed, failing the whole zone download with it.
    ///
    /// Chunk fetches are never retried individually.
    #[error("Chunk {index} ({range}) failed: {reason}")]
    FetchFailure {
        /// Index of the chunk within its resource.
        index: usize,
        /// The `Range` header value that was requested.
        range: String,
        /// What went wrong.
        reason: String,
    },

    /// The sink exhausted its retry budget while persisting a zone.
    #[error("Persisting to \"{target}\" failed after {attempts} attempt(s): {reason}")]
    PersistFailed {
        /// Destination being written.
        target: String,
        /// Number of attempts made before giving up.
        attempts: u32,
        /// The last error observed.
        reason: String,
    },

    /// The shared cancellation signal fired.
    ///
    /// Not a real failure: it is reported so in-flight work can unwind
    /// cleanly, and is never logged as an error.
    #[error("Operation cancelled")]
    Cancelled,

    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// I/O Error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error raised by the HTTP middleware stack.
    #[error("Request error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },
}

impl Error {
    /// Whether this error is the cooperative cancellation marker.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result type alias for operations that can fail with a zonepull error.
pub type Result<T> = std::result::Result<T, Error>;
