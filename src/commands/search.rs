use tmd_bundle::error::ErrorKind as BundleErrorKind;
use tmd_bundle::fetch_listing;
use tmd_config::Config;
use tmd_extract::ThunderstoreExtractor;
use tmd_extract::models::ModReference;
use tmd_relay::{Origin, Relay};

use crate::error::{ErrorKind, Result};

pub async fn run(config: &Config, url: &str) -> Result<()> {
    let relay = super::relay(config)?;
    let mods = listing(relay.as_ref(), url).await?;
    let origin = Origin::parse(&config.origin).ok();
    for reference in &mods {
        println!("{}", describe(reference, origin.as_ref()));
    }
    Ok(())
}

/// The listing's mods, with "not a modpack" kept apart from other failures.
pub(crate) async fn listing(relay: &dyn Relay, url: &str) -> Result<Vec<ModReference>> {
    fetch_listing(relay, &ThunderstoreExtractor, url).await.map_err(|err| {
        let kind = match *err {
            BundleErrorKind::NotAModpack => ErrorKind::NotAModpack,
            _ => ErrorKind::Listing,
        };
        err.raise(kind)
    })
}

fn describe(reference: &ModReference, origin: Option<&Origin>) -> String {
    let title = reference.display_title();
    let link = reference.reference.as_deref().map(|path| match origin.map(|origin| origin.join(path)) {
        Some(Ok(url)) => url.to_string(),
        _ => path.to_string(),
    });
    match link {
        Some(link) => format!("{title}\t{link}"),
        None => title,
    }
}
