use exn::ResultExt;
use tmd_extract::ListingExtractor;
use tmd_extract::error::ErrorKind as ExtractErrorKind;
use tmd_extract::models::ModReference;
use tmd_relay::Relay;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Fetches a listing page and extracts the mods it bundles.
///
/// Both a relay failure and a page that is not a modpack fail the whole
/// operation.
#[instrument(skip(relay, extractor), fields(relay = relay.name()))]
pub async fn fetch_listing(relay: &dyn Relay, extractor: &dyn ListingExtractor, url: &str) -> Result<Vec<ModReference>> {
    let html = relay.fetch_html(url).await.or_raise(|| ErrorKind::Relay)?;
    match extractor.extract_listing(&html) {
        Ok(references) => {
            tracing::info!(count = references.len(), "found modpack");
            Ok(references)
        },
        Err(err) if *err == ExtractErrorKind::NotAModpack => Err(err.raise(ErrorKind::NotAModpack)),
        Err(err) => Err(err.raise(ErrorKind::Extract)),
    }
}
