mod consts;
pub mod error;
mod extract;
pub mod models;

use tracing::instrument;

use crate::error::Result;
pub use crate::extract::{DetailExtractor, DetailPage, Listing, ListingExtractor, ThunderstoreExtractor};
use crate::models::ModReference;

/// Easy, top-level entrypoint for extracting the mods bundled by a modpack
/// listing page. See [`Listing`] for more details.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn extract_modpack_listing(html: &str) -> Result<Vec<ModReference>> {
    Listing::from_html(html).references()
}

/// Easy, top-level entrypoint for extracting the archive URL from a mod
/// detail page. See [`DetailPage`] for more details.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn extract_binary_url(html: &str) -> Result<String> {
    DetailPage::from_html(html).binary_url()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const LISTING: &str = r#"<html><body>
        <span class="badge badge-pill"> Modpacks </span>
        <div class="list-group-item flex-column align-items-start media">
            <a href="/c/lc/p/BepInEx/BepInExPack/">
                BepInExPack
            </a>
        </div>
        <div class="list-group-item flex-column align-items-start media">
            <a href="/c/lc/p/x/MoreCompany/">More Company</a>
        </div>
    </body></html>"#;

    const DETAIL: &str = r#"<html><body>
        <a class="btn btn-primary w-100 text-large" href="ror2mm://v1/install/x">Install</a>
        <a class="btn btn-primary w-100 text-large" href="https://thunderstore.io/package/download/x/1.0.0/">Download</a>
    </body></html>"#;

    #[test]
    fn test_extract_modpack_listing() {
        let references = extract_modpack_listing(LISTING).unwrap();
        assert_eq!(
            references,
            vec![
                ModReference::new(Some("BepInExPack"), Some("/c/lc/p/BepInEx/BepInExPack/")),
                ModReference::new(Some("MoreCompany"), Some("/c/lc/p/x/MoreCompany/")),
            ]
        );
    }

    #[test]
    fn test_extract_modpack_listing_rejects_plain_mods() {
        let err = extract_modpack_listing(&LISTING.replace("Modpacks", "Mods")).unwrap_err();
        assert_eq!(*err, ErrorKind::NotAModpack);
    }

    #[test]
    fn test_extract_binary_url() {
        assert_eq!(
            extract_binary_url(DETAIL).unwrap(),
            "https://thunderstore.io/package/download/x/1.0.0/"
        );
        let err = extract_binary_url("<html><body></body></html>").unwrap_err();
        assert_eq!(*err, ErrorKind::MalformedDetailPage(0));
    }

    #[test]
    fn test_thunderstore_extractor_delegates() {
        let extractor = ThunderstoreExtractor;
        assert_eq!(extractor.extract_listing(LISTING).unwrap().len(), 2);
        assert_eq!(
            extractor.extract_binary_url(DETAIL).unwrap(),
            "https://thunderstore.io/package/download/x/1.0.0/"
        );
    }
}
