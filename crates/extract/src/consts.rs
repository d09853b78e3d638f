use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

/// Exact badge text that classifies a package page as a modpack.
pub(crate) const MODPACK_BADGE_TEXT: &str = "Modpacks";
/// The detail page renders two identical primary buttons; the first opens the
/// mod manager, the second is the direct archive download. Nothing in the
/// markup distinguishes them apart from position.
pub(crate) const DOWNLOAD_BUTTON_POSITION: usize = 1;

selector!(BADGE_SELECTOR, ".badge");
selector!(LISTING_ENTRY_SELECTOR, ".list-group-item.flex-column.align-items-start.media");
selector!(ANCHOR_SELECTOR, "a");
selector!(DOWNLOAD_BUTTON_SELECTOR, ".btn.btn-primary.w-100.text-large");
