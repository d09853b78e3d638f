//! Bundle Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Only whole-operation failures end up
//! here; per-mod failures are data (see [`FailureReason`](crate::FailureReason)).

use derive_more::{Display, Error};

/// A bundle error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for bundle operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a whole-operation failure.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The listing page could not be fetched through the relay.
    #[display("could not fetch the listing")]
    Relay,
    /// The listing is not a modpack; nothing to bundle.
    #[display("no modpack found")]
    NotAModpack,
    /// The listing could not be parsed.
    #[display("could not extract the listing")]
    Extract,
    /// Assembling the container failed.
    #[display("could not build the bundle")]
    Archive,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Relay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::NotAModpack.to_string(), "no modpack found");
        assert_eq!(ErrorKind::Archive.to_string(), "could not build the bundle");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Relay.is_retryable());
        assert!(!ErrorKind::NotAModpack.is_retryable());
        assert!(!ErrorKind::Archive.is_retryable());
    }
}
