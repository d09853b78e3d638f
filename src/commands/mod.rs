pub mod download;
pub mod search;
pub mod serve;

use std::sync::Arc;

use exn::{OptionExt, ResultExt};
use tmd_config::{Config, RelayMode};
use tmd_relay::{DirectRelay, Origin, ProxyRelay, RelayHandle};

use crate::error::{ErrorKind, Result};

/// Relay selected by the configuration.
pub fn relay(config: &Config) -> Result<RelayHandle> {
    let origin = Origin::parse(&config.origin).or_raise(|| ErrorKind::Config)?;
    let user_agent = &config.relay.user_agent;
    let relay: RelayHandle = match config.relay.mode {
        RelayMode::Direct => Arc::new(DirectRelay::with_user_agent(origin, user_agent).or_raise(|| ErrorKind::Config)?),
        RelayMode::Proxy => {
            let endpoint = config.relay.proxy_url.as_deref().ok_or_raise(|| ErrorKind::Config)?;
            Arc::new(ProxyRelay::with_user_agent(endpoint, origin, user_agent).or_raise(|| ErrorKind::Config)?)
        },
    };
    tracing::debug!(relay = relay.name(), "relay ready");
    Ok(relay)
}
