//! In-memory relay for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::Relay;
use crate::error::{ErrorKind, Result};
use crate::path::Origin;

#[derive(Debug, Clone)]
enum Canned {
    Body(Vec<u8>),
    Failure(ErrorKind),
}

/// In-memory relay for testing.
///
/// Responses are registered per path (relative or absolute on the origin) up
/// front; unknown paths answer with `Upstream(404)`. Every call is counted,
/// including calls rejected for an invalid path, and the highest number of
/// simultaneously pending calls is tracked.
///
/// # Examples
///
/// ```
/// use tmd_relay::{MockRelay, Relay};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let relay = MockRelay::default()
///     .with_html("/c/lc/p/Owner/Pack/", "<html>...</html>")
///     .with_binary("https://thunderstore.io/package/download/Owner/Mod/1.0.0/", b"PK");
/// assert_eq!(relay.fetch_html("/c/lc/p/Owner/Pack/").await?, "<html>...</html>");
/// assert_eq!(relay.binary_calls(), 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MockRelay {
    name: String,
    origin: Origin,
    html: HashMap<String, Canned>,
    binary: HashMap<String, Canned>,
    delays: HashMap<String, Duration>,
    html_calls: AtomicUsize,
    binary_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockRelay {
    pub fn new(origin: Origin) -> Self {
        Self {
            name: "mock".to_string(),
            origin,
            html: HashMap::new(),
            binary: HashMap::new(),
            delays: HashMap::new(),
            html_calls: AtomicUsize::new(0),
            binary_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_html(mut self, path: &str, html: impl Into<String>) -> Self {
        let key = self.key(path);
        self.html.insert(key, Canned::Body(html.into().into_bytes()));
        self
    }

    pub fn with_binary(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        let key = self.key(path);
        self.binary.insert(key, Canned::Body(bytes.into()));
        self
    }

    /// Make both operations fail for `path`.
    pub fn with_failure(mut self, path: &str, kind: ErrorKind) -> Self {
        let key = self.key(path);
        self.html.insert(key.clone(), Canned::Failure(kind.clone()));
        self.binary.insert(key, Canned::Failure(kind));
        self
    }

    /// Delay every answer for `path`, successful or not.
    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        let key = self.key(path);
        self.delays.insert(key, delay);
        self
    }

    pub fn html_calls(&self) -> usize {
        self.html_calls.load(Ordering::SeqCst)
    }

    pub fn binary_calls(&self) -> usize {
        self.binary_calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were pending at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Relative paths of every valid call, in call order.
    pub async fn requested(&self) -> Vec<String> {
        self.requested.lock().await.clone()
    }

    fn key(&self, path: &str) -> String {
        // The panic here is DELIBERATE. If test setup is wrong, then the test
        // should not pass.
        match self.origin.relative(path) {
            Ok(key) => key,
            Err(err) => panic!("MockRelay: invalid path {path:?}: {}", *err),
        }
    }

    async fn answer(&self, responses: &HashMap<String, Canned>, path: &str) -> Result<Vec<u8>> {
        let _pending = Pending::enter(self);
        let key = self.origin.relative(path)?;
        self.requested.lock().await.push(key.clone());
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        match responses.get(&key) {
            Some(Canned::Body(bytes)) => Ok(bytes.clone()),
            Some(Canned::Failure(kind)) => exn::bail!(kind.clone()),
            None => exn::bail!(ErrorKind::Upstream(404)),
        }
    }
}
impl Default for MockRelay {
    fn default() -> Self {
        Self::new(Origin::default())
    }
}

/// Keeps the in-flight counter right even when the caller drops the future
/// (a timeout, for example).
struct Pending<'a>(&'a MockRelay);
impl<'a> Pending<'a> {
    fn enter(relay: &'a MockRelay) -> Self {
        let now = relay.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        relay.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(relay)
    }
}
impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Relay for MockRelay {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_html(&self, path: &str) -> Result<String> {
        self.html_calls.fetch_add(1, Ordering::SeqCst);
        let bytes = self.answer(&self.html, path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn fetch_binary(&self, path: &str) -> Result<Vec<u8>> {
        self.binary_calls.fetch_add(1, Ordering::SeqCst);
        self.answer(&self.binary, path).await
    }
}
