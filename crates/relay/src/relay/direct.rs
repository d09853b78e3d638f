use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Client, Response};
use tracing::instrument;

use super::{DEFAULT_USER_AGENT, Relay};
use crate::error::{ErrorKind, Result};
use crate::path::Origin;

/// Talks to the origin itself.
#[derive(Debug, Clone)]
pub struct DirectRelay {
    name: String,
    client: Client,
    origin: Origin,
}
impl DirectRelay {
    pub fn new(origin: Origin) -> Result<Self> {
        Self::with_user_agent(origin, DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(origin: Origin, user_agent: &str) -> Result<Self> {
        // Redirects are followed by default; download links bounce to a CDN.
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .or_raise(|| ErrorKind::transport("could not build HTTP client"))?;
        Ok(Self {
            name: "direct".to_string(),
            client,
            origin,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let url = self.origin.join(path)?;
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => exn::bail!(ErrorKind::transport(err)),
        };
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "upstream rejected request");
            exn::bail!(ErrorKind::Upstream(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl Relay for DirectRelay {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(relay = %self.name))]
    async fn fetch_html(&self, path: &str) -> Result<String> {
        match self.get(path).await?.text().await {
            Ok(html) => Ok(html),
            Err(err) => exn::bail!(ErrorKind::transport(err)),
        }
    }

    #[instrument(skip(self), fields(relay = %self.name))]
    async fn fetch_binary(&self, path: &str) -> Result<Vec<u8>> {
        match self.get(path).await?.bytes().await {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(err) => exn::bail!(ErrorKind::transport(err)),
        }
    }
}
