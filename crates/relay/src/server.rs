//! HTTP relay server.
//!
//! Exposes a [`Relay`](crate::Relay) over the [`wire`](crate::wire) format so clients that
//! cannot reach the origin themselves (or should not, like a browser front
//! end) can use [`ProxyRelay`](crate::ProxyRelay).

use std::future::Future;

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use exn::ResultExt;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::RelayHandle;
use crate::error::{ErrorKind, Result};
use crate::wire::{self, BinaryFailure, HtmlEnvelope};

#[derive(Debug, Default, Deserialize)]
pub struct RelayQuery {
    thunderstore_url: Option<String>,
}
impl RelayQuery {
    fn path(&self) -> Option<&str> {
        self.thunderstore_url.as_deref().map(str::trim).filter(|path| !path.is_empty())
    }
}

fn missing_path() -> ErrorKind {
    ErrorKind::InvalidPath(format!("missing {} query", wire::PATH_PARAM))
}

pub fn router(relay: RelayHandle) -> Router {
    Router::new()
        .route(wire::HTML_ENDPOINT, get(get_html))
        .route(wire::BINARY_ENDPOINT, get(get_binary))
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

/// Serve until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    relay: RelayHandle,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    if let Ok(address) = listener.local_addr() {
        tracing::info!(%address, relay = relay.name(), "relay server listening");
    }
    axum::serve(listener, router(relay))
        .with_graceful_shutdown(shutdown)
        .await
        .or_raise(|| ErrorKind::transport("relay server stopped unexpectedly"))
}

async fn get_html(State(relay): State<RelayHandle>, Query(query): Query<RelayQuery>) -> Response {
    let Some(path) = query.path() else {
        return (StatusCode::BAD_REQUEST, Json(HtmlEnvelope::failure(&missing_path()))).into_response();
    };
    match relay.fetch_html(path).await {
        Ok(html) => Json(HtmlEnvelope::success(html)).into_response(),
        Err(err) => {
            tracing::warn!(path, error = %*err, "could not fetch page");
            let status = match &*err {
                ErrorKind::Upstream(_) => StatusCode::BAD_GATEWAY,
                ErrorKind::InvalidPath(_) => StatusCode::BAD_REQUEST,
                ErrorKind::Transport(_) | ErrorKind::InvalidResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(HtmlEnvelope::failure(&err))).into_response()
        },
    }
}

async fn get_binary(State(relay): State<RelayHandle>, Query(query): Query<RelayQuery>) -> Response {
    let Some(path) = query.path() else {
        return (StatusCode::BAD_REQUEST, Json(BinaryFailure::new(&missing_path()))).into_response();
    };
    match relay.fetch_binary(path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/zip".to_string()),
                (header::CONTENT_LENGTH, bytes.len().to_string()),
                (header::CONTENT_DISPOSITION, "attachment".to_string()),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => {
            tracing::warn!(path, error = %*err, "could not fetch archive");
            let status = match &*err {
                ErrorKind::InvalidPath(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(BinaryFailure::new(&err))).into_response()
        },
    }
}
