//! Layered configuration.
//!
//! Values come from, in increasing priority:
//!
//! 1. built-in defaults ([`Config::default`]),
//! 2. `config.toml`, `config.yaml` or `config.json` in the platform
//!    configuration directory (`~/.config/tmd/` on Linux),
//! 3. an explicitly requested file,
//! 4. `TMD_*` environment variables, nested keys separated by `__`
//!    (`TMD_DOWNLOAD__TIMEOUT_SECS=20`),
//! 5. command-line overrides.
//!
//! See [`ConfigLoader`].

pub mod error;
mod load;
mod method;

use std::net::{Ipv4Addr, SocketAddr};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tmd_archive::Method;

pub use crate::load::{ConfigLoader, ENV_PREFIX, user_config_dir};
use crate::error::{ErrorKind, Result};

pub const DEFAULT_ORIGIN: &str = "https://thunderstore.io";
pub const DEFAULT_OUTPUT: &str = "Modpack.zip";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site every listing and mod path is relative to.
    pub origin: String,
    pub relay: RelayConfig,
    pub download: DownloadConfig,
    pub server: ServerConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            relay: RelayConfig::default(),
            download: DownloadConfig::default(),
            server: ServerConfig::default(),
        }
    }
}
impl Config {
    /// Checks constraints that span several values.
    pub fn validate(&self) -> Result<()> {
        if self.origin.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("origin must not be empty".to_string()));
        }
        if self.relay.mode == RelayMode::Proxy && self.relay.proxy_url.is_none() {
            exn::bail!(ErrorKind::Invalid("relay.proxy_url is required in proxy mode".to_string()));
        }
        if self.download.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid("download.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayMode {
    /// Fetch from the origin directly.
    #[default]
    Direct,
    /// Fetch through a relay server at `proxy_url`.
    Proxy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub mode: RelayMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    pub user_agent: String,
}
impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            mode: RelayMode::default(),
            proxy_url: None,
            user_agent: concat!("tmd/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Per-mod budget for each network step.
    pub timeout_secs: u64,
    /// Upper bound on mods fetched at once; unbounded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<NonZeroUsize>,
    /// Extension given to every file inside the bundle.
    pub extension: String,
    #[serde(with = "method")]
    pub method: Method,
    /// Where the bundle is written.
    pub output: PathBuf,
}
impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 8,
            concurrency: None,
            extension: tmd_archive::DEFAULT_EXTENSION.to_string(),
            method: Method::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}
impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
        }
    }
}
