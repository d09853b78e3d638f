use std::io;
use std::sync::Arc;

use exn::ResultExt;
use tmd_config::Config;
use tmd_relay::{DirectRelay, Origin, RelayHandle, server};
use tokio::net::TcpListener;

use crate::error::{ErrorKind, Result};

/// Runs the relay server until Ctrl-C. The server always fetches directly;
/// a configured proxy relay is ignored.
pub async fn run(config: &Config) -> Result<()> {
    let origin = Origin::parse(&config.origin).or_raise(|| ErrorKind::Config)?;
    let relay: RelayHandle =
        Arc::new(DirectRelay::with_user_agent(origin, &config.relay.user_agent).or_raise(|| ErrorKind::Config)?);
    let listener = TcpListener::bind(config.server.listen)
        .await
        .or_raise(|| ErrorKind::Server)?;
    println!("Relay listening on http://{}", config.server.listen);
    server::serve(listener, relay, shutdown_signal())
        .await
        .or_raise(|| ErrorKind::Server)
}

async fn shutdown_signal() {
    shutdown_on(tokio::signal::ctrl_c()).await;
}

/// Resolves once `signal` fires. A signal that cannot be registered never
/// resolves, leaving the server running.
async fn shutdown_on(signal: impl Future<Output = io::Result<()>>) {
    if let Err(err) = signal.await {
        tracing::error!(%err, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
