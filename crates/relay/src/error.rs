//! Relay Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A relay error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote host answered, but not with success.
    #[display("upstream rejected the request with status {_0}")]
    Upstream(#[error(not(source))] u16),
    /// No usable answer arrived (connection, TLS, body read, ...).
    #[display("transport failure: {_0}")]
    Transport(#[error(not(source))] String),
    /// Path is empty or points at a different origin; nothing was sent.
    #[display("invalid path: {_0}")]
    InvalidPath(#[error(not(source))] String),
    /// A relay server answered with something that is not its wire format.
    #[display("invalid relay response: {_0}")]
    InvalidResponse(#[error(not(source))] String),
}

impl ErrorKind {
    pub(crate) fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Upstream(status) => *status == 429 || *status >= 500,
            Self::Transport(_) => true,
            Self::InvalidPath(_) | Self::InvalidResponse(_) => false,
        }
    }
}
