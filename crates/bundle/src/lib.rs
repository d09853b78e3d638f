//! Turns a modpack listing into a single bundle of mod archives.
//!
//! [`fetch_listing`] reads the listing, [`Bundler`] resolves and fetches every
//! mod concurrently, tracking [`ProgressState`] as it goes, and hands the
//! successful downloads to [`tmd_archive`].

mod bundler;
pub mod error;
#[cfg(test)]
mod fixtures;
mod models;
mod options;
mod progress;
mod resolve;
mod search;

pub use crate::bundler::{BundleEvent, Bundler};
pub use crate::models::{Attempt, Bundle, FailureReason, FetchOutcome, ItemError, ResolvedDownload};
pub use crate::options::{BundleOptions, DEFAULT_TIMEOUT};
pub use crate::progress::ProgressState;
pub use crate::resolve::resolve_download;
pub use crate::search::fetch_listing;
