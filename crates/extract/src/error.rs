//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The listing page has no "Modpacks" badge. Whatever it is, there is
    /// nothing to bundle.
    #[display("not a modpack listing")]
    NotAModpack,
    /// The detail page did not contain the download button where expected.
    #[display("malformed detail page: found {_0} download button(s)")]
    MalformedDetailPage(#[error(not(source))] usize),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Same markup in, same answer out.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::NotAModpack.to_string(), "not a modpack listing");
        assert_eq!(
            ErrorKind::MalformedDetailPage(1).to_string(),
            "malformed detail page: found 1 download button(s)"
        );
    }

    #[test]
    fn error_kind_never_retryable() {
        assert!(!ErrorKind::NotAModpack.is_retryable());
        assert!(!ErrorKind::MalformedDetailPage(0).is_retryable());
    }
}
