//! Application Error Types
//!
//! Every library crate's error tree is raised into one of these, so `main`
//! can decide how much of it to show.

use derive_more::{Display, Error};

/// An application error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for commands.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("invalid configuration")]
    Config,
    /// Shown on its own, without the error tree.
    #[display("No modpack found")]
    NotAModpack,
    #[display("could not read the modpack listing")]
    Listing,
    #[display("could not bundle the modpack")]
    Bundle,
    #[display("could not write {_0}")]
    Output(#[error(not(source))] String),
    #[display("relay server failed")]
    Server,
}
