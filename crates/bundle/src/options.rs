use std::num::NonZeroUsize;
use std::time::Duration;

use tmd_archive::{ArchiveBuilder, DEFAULT_EXTENSION, Method};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Tunables of a [`Bundler`](crate::Bundler) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    /// Budget for each network step of a single mod (detail page, archive).
    pub timeout: Duration,
    /// Upper bound on mods attempted at once; `None` attempts all at once.
    pub concurrency: Option<NonZeroUsize>,
    pub method: Method,
    pub extension: String,
}
impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            concurrency: None,
            method: Method::default(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}
impl BundleOptions {
    pub(crate) fn archive_builder(&self) -> ArchiveBuilder {
        ArchiveBuilder::default()
            .with_method(self.method)
            .with_extension(&self.extension)
    }
}
