use exn::bail;
use scraper::{ElementRef, Html};
use tracing::instrument;

use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::models::ModReference;

/// A parsed package listing page.
#[derive(Debug)]
pub struct Listing {
    document: Html,
}
impl Listing {
    pub fn from_document(document: Html) -> Self {
        Self { document }
    }

    pub fn from_html(html: &str) -> Self {
        Self::from_document(Html::parse_document(html))
    }

    /// A listing is a modpack when any badge reads exactly "Modpacks"
    /// (surrounding whitespace ignored).
    pub fn is_modpack(&self) -> bool {
        self.document
            .select(&consts::BADGE_SELECTOR)
            .any(|badge| badge.text().collect::<String>().trim() == consts::MODPACK_BADGE_TEXT)
    }

    /// Every entry in the listing, in document order, without the modpack check.
    pub fn entries(&self) -> Vec<ModReference> {
        self.document
            .select(&consts::LISTING_ENTRY_SELECTOR)
            .map(entry_reference)
            .collect()
    }

    /// Extracts the bundled mod references.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::NotAModpack`] if the page carries no modpack badge.
    #[instrument(skip(self))]
    pub fn references(&self) -> Result<Vec<ModReference>> {
        if !self.is_modpack() {
            bail!(ErrorKind::NotAModpack);
        }
        let entries = self.entries();
        tracing::debug!(count = entries.len(), "extracted listing entries");
        Ok(entries)
    }
}
impl From<Html> for Listing {
    fn from(document: Html) -> Self {
        Self::from_document(document)
    }
}

fn entry_reference(entry: ElementRef<'_>) -> ModReference {
    match entry.select(&consts::ANCHOR_SELECTOR).next() {
        Some(anchor) => ModReference::new(Some(anchor.text().collect::<String>()), anchor.value().attr("href")),
        None => {
            tracing::warn!("listing entry without an anchor");
            ModReference::default()
        },
    }
}
