//! Extraction of mod references and download links from Thunderstore HTML.

mod detail;
mod listing;

pub use self::detail::DetailPage;
pub use self::listing::Listing;
use crate::error::Result;
use crate::models::ModReference;

/// Turns a listing page into the references of the mods it bundles.
///
/// Implementations must be synchronous: parsed documents are not `Send`
/// and must never be held across an await point.
pub trait ListingExtractor: Send + Sync {
    fn extract_listing(&self, html: &str) -> Result<Vec<ModReference>>;
}

/// Turns a mod detail page into the absolute URL of its archive.
pub trait DetailExtractor: Send + Sync {
    fn extract_binary_url(&self, html: &str) -> Result<String>;
}

/// Extractor for the markup served by thunderstore.io.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThunderstoreExtractor;

impl ListingExtractor for ThunderstoreExtractor {
    fn extract_listing(&self, html: &str) -> Result<Vec<ModReference>> {
        crate::extract_modpack_listing(html)
    }
}

impl DetailExtractor for ThunderstoreExtractor {
    fn extract_binary_url(&self, html: &str) -> Result<String> {
        crate::extract_binary_url(html)
    }
}
