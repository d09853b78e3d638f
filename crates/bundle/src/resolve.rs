use tmd_extract::DetailExtractor;
use tmd_extract::models::ModReference;
use tmd_relay::Relay;
use tracing::instrument;

use crate::models::ResolvedDownload;

/// Looks up the archive URL of one mod.
///
/// Never fails: a missing reference, an unreachable detail page and a page
/// without a download button all resolve to `binary_url: None`. Only the
/// latter two touch the relay, and are logged.
#[instrument(skip_all, fields(reference = reference.reference.as_deref()))]
pub async fn resolve_download(
    relay: &dyn Relay,
    extractor: &dyn DetailExtractor,
    reference: &ModReference,
) -> ResolvedDownload {
    let title = reference.display_title();
    let Some(path) = reference.reference.as_deref() else {
        return ResolvedDownload { title, binary_url: None };
    };
    let binary_url = match relay.fetch_html(path).await {
        Ok(html) => match extractor.extract_binary_url(&html) {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::warn!(title = %title, error = %*err, "no download link on detail page");
                None
            },
        },
        Err(err) => {
            tracing::warn!(title = %title, error = %*err, "could not fetch detail page");
            None
        },
    };
    ResolvedDownload { title, binary_url }
}
