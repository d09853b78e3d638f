use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::{DEFAULT_USER_AGENT, Relay};
use crate::error::{ErrorKind, Result};
use crate::path::Origin;
use crate::wire::{self, BinaryFailure, HtmlEnvelope};

/// Fetches through a relay server (see [`server`](crate::server) when the
/// `server` feature is enabled).
#[derive(Debug, Clone)]
pub struct ProxyRelay {
    name: String,
    client: Client,
    endpoint: Url,
    origin: Origin,
}
impl ProxyRelay {
    /// `endpoint` is the base URL of the relay server; paths are validated
    /// against `origin` locally before being forwarded.
    pub fn new(endpoint: &str, origin: Origin) -> Result<Self> {
        Self::with_user_agent(endpoint, origin, DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(endpoint: &str, origin: Origin, user_agent: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).or_raise(|| ErrorKind::InvalidPath(endpoint.to_string()))?;
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .or_raise(|| ErrorKind::transport("could not build HTTP client"))?;
        Ok(Self {
            name: "proxy".to_string(),
            client,
            endpoint,
            origin,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    async fn call(&self, endpoint: &str, path: &str) -> Result<Response> {
        let relative = self.origin.relative(path)?;
        let mut url = self
            .endpoint
            .join(endpoint)
            .or_raise(|| ErrorKind::InvalidPath(self.endpoint.to_string()))?;
        url.query_pairs_mut().append_pair(wire::PATH_PARAM, &relative);
        match self.client.get(url).send().await {
            Ok(response) => Ok(response),
            Err(err) => exn::bail!(ErrorKind::transport(err)),
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(err) => exn::bail!(ErrorKind::transport(err)),
    };
    serde_json::from_slice(&body).or_raise(|| ErrorKind::InvalidResponse(format!("status {status}, undecodable body")))
}

#[async_trait]
impl Relay for ProxyRelay {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(relay = %self.name))]
    async fn fetch_html(&self, path: &str) -> Result<String> {
        let response = self.call(wire::HTML_ENDPOINT, path).await?;
        // Failures come back as the same envelope with a non-200 status.
        let envelope: HtmlEnvelope = decode(response).await?;
        match envelope.error {
            true => exn::bail!(wire::failure_kind(&envelope.message, envelope.status)),
            false => Ok(envelope.html),
        }
    }

    #[instrument(skip(self), fields(relay = %self.name))]
    async fn fetch_binary(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.call(wire::BINARY_ENDPOINT, path).await?;
        if !response.status().is_success() {
            let failure: BinaryFailure = decode(response).await?;
            exn::bail!(wire::failure_kind(&failure.message, failure.status));
        }
        match response.bytes().await {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(err) => exn::bail!(ErrorKind::transport(err)),
        }
    }
}
