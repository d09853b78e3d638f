//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested entry method is not supported.
    #[display("unsupported archive method: {_0}")]
    UnsupportedMethod(#[error(not(source))] String),
    /// Writing an entry into the container failed.
    #[display("could not write archive entry {_0:?}")]
    Entry(#[error(not(source))] String),
    /// Finalizing the container (central directory) failed.
    #[display("could not finalize archive")]
    Finish,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Everything happens in memory; the same input fails the same way.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::UnsupportedMethod("bzip2".to_string()).to_string(),
            "unsupported archive method: bzip2"
        );
        assert_eq!(
            ErrorKind::Entry("Mod.zip".to_string()).to_string(),
            "could not write archive entry \"Mod.zip\""
        );
        assert!(!ErrorKind::Finish.is_retryable());
    }
}
