//! Bundling of many payloads into a single zip container.
//!
//! Every entry is a `{name, bytes}` pair; the container holds one file per
//! distinct name, called `name` plus a fixed extension. See
//! [`ArchiveBuilder`] for the details and [`build_archive`] for the
//! defaults.

mod builder;
mod construct;
pub mod error;

pub use crate::builder::{ArchiveBuilder, DEFAULT_EXTENSION, Entry};
use crate::error::Result;

/// How each entry is stored inside the container.
///
/// Defaults to [`Stored`](Self::Stored): mod payloads are already zip
/// archives, so compressing them again costs time and saves nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Method {
    /// No compression.
    #[default]
    Stored,
    /// Deflate compression.
    Deflated,
}

/// Builds a container with the default method and extension.
pub fn build_archive(entries: impl IntoIterator<Item = Entry>) -> Result<Vec<u8>> {
    ArchiveBuilder::default().build(entries)
}

#[cfg(test)]
mod tests {
    use crate::Method;

    #[test]
    fn method_default() {
        assert_eq!(Method::default(), Method::Stored);
    }
}
