use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use tmd_archive::Method;
use tmd_config::{ConfigLoader, RelayMode};

/// Download every mod of a Thunderstore modpack as a single archive.
#[derive(Debug, Parser)]
#[command(name = "tmd", version, about)]
pub struct Cli {
    /// Configuration file (toml, yaml or json), on top of the user configuration.
    #[arg(long, global = true, env = "TMD_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Fetch through the relay server at URL instead of directly.
    #[arg(long, global = true, value_name = "URL")]
    pub relay: Option<String>,
    /// More output; repeat for even more. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the mods of a modpack.
    Search {
        /// Modpack page, absolute or relative to the origin.
        url: String,
    },
    /// Download every mod of a modpack into one archive.
    Download(DownloadArgs),
    /// Run a relay server for clients that cannot reach the origin.
    Serve {
        #[arg(long, value_name = "ADDR")]
        listen: Option<SocketAddr>,
    },
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Modpack page, absolute or relative to the origin.
    pub url: String,
    /// Where to write the bundle [default: Modpack.zip]
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
    /// Seconds allowed for each network step of a single mod [default: 8]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
    /// Mods fetched at once [default: all]
    #[arg(long, value_name = "N")]
    pub concurrency: Option<NonZeroUsize>,
    /// How mods are stored in the bundle: stored or deflated [default: stored]
    #[arg(long, value_parser = parse_method)]
    pub method: Option<Method>,
}

fn parse_method(s: &str) -> Result<Method, String> {
    s.parse::<Method>().map_err(|err| (*err).to_string())
}

/// Command-line layer of the configuration; unset flags serialize to nothing.
#[derive(Debug, Default, Serialize)]
struct Overrides {
    relay: RelayOverrides,
    download: DownloadOverrides,
    server: ServerOverrides,
}

#[derive(Debug, Default, Serialize)]
struct RelayOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<RelayMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy_url: Option<String>,
}

#[derive(Debug, Default, Serialize)]
struct DownloadOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    concurrency: Option<NonZeroUsize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
}

#[derive(Debug, Default, Serialize)]
struct ServerOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    listen: Option<SocketAddr>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let mut overrides = Overrides::default();
        if let Some(url) = &self.relay {
            overrides.relay.mode = Some(RelayMode::Proxy);
            overrides.relay.proxy_url = Some(url.clone());
        }
        match &self.command {
            Command::Download(args) => {
                overrides.download.output = args.output.clone();
                overrides.download.timeout_secs = args.timeout;
                overrides.download.concurrency = args.concurrency;
                overrides.download.method = args.method.map(|method| method.to_string());
            },
            Command::Serve { listen } => overrides.server.listen = *listen,
            Command::Search { .. } => {},
        }
        overrides
    }

    /// Every configuration layer, this command line on top.
    pub fn config_loader(&self) -> ConfigLoader {
        ConfigLoader::default()
            .with_file(self.config.as_ref())
            .with_overrides(self.overrides())
    }
}
