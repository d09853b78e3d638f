use exn::OptionExt;
use scraper::Html;
use tracing::instrument;

use crate::consts;
use crate::error::{ErrorKind, Result};

/// A parsed mod detail page.
#[derive(Debug)]
pub struct DetailPage {
    document: Html,
}
impl DetailPage {
    pub fn from_document(document: Html) -> Self {
        Self { document }
    }

    pub fn from_html(html: &str) -> Self {
        Self::from_document(Html::parse_document(html))
    }

    /// Link target of the direct download button.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::MalformedDetailPage`] when the page has fewer download
    /// buttons than expected or the button has no `href`.
    #[instrument(skip(self))]
    pub fn binary_url(&self) -> Result<String> {
        let buttons: Vec<_> = self.document.select(&consts::DOWNLOAD_BUTTON_SELECTOR).collect();
        buttons
            .get(consts::DOWNLOAD_BUTTON_POSITION)
            .and_then(|button| button.value().attr("href"))
            .map(ToString::to_string)
            .ok_or_raise(|| ErrorKind::MalformedDetailPage(buttons.len()))
    }
}
impl From<Html> for DetailPage {
    fn from(document: Html) -> Self {
        Self::from_document(document)
    }
}
