//! Relay trait and implementations.
//!
//! A relay is the only way the rest of the workspace talks to Thunderstore:
//! either directly ([`DirectRelay`]) or through a relay server speaking the
//! [`wire`](crate::wire) format ([`ProxyRelay`]).

mod direct;
#[cfg(feature = "mock")]
mod mock;
mod proxy;

pub use self::direct::DirectRelay;
#[cfg(feature = "mock")]
pub use self::mock::MockRelay;
pub use self::proxy::ProxyRelay;
use crate::error::Result;
use async_trait::async_trait;

pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches remote pages and archives by path.
///
/// Paths may be relative to the configured origin or absolute URLs on it;
/// anything else fails with [`InvalidPath`](crate::error::ErrorKind::InvalidPath)
/// before a request is made. A failed fetch never returns partial content.
///
/// # Examples
///
/// ```
/// use tmd_relay::{Relay, error::Result};
///
/// async fn listing_size(relay: &dyn Relay) -> Result<usize> {
///     let html = relay.fetch_html("/c/lethal-company/p/Owner/Pack/").await?;
///     Ok(html.len())
/// }
/// ```
#[async_trait]
pub trait Relay: Send + Sync {
    /// Name of the relay, used for logging only.
    fn name(&self) -> &str;

    /// Fetch an HTML page.
    ///
    /// Fails with [`Upstream`](crate::error::ErrorKind::Upstream) when the
    /// site answers with a non-success status and with
    /// [`Transport`](crate::error::ErrorKind::Transport) when no answer
    /// could be read.
    async fn fetch_html(&self, path: &str) -> Result<String>;

    /// Fetch a binary payload (a mod archive), same failure semantics as
    /// [`fetch_html()`](Self::fetch_html).
    async fn fetch_binary(&self, path: &str) -> Result<Vec<u8>>;
}
