//! Concurrent fetching and bundling.
//!
//! The primary entry point is [`Bundler::run`], which streams
//! [`BundleEvent`]s while every mod is resolved and fetched, then assembles
//! the successful ones into a single container. [`Bundler::bundle_all`]
//! drives that stream to completion for callers that only want the result.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_stream::stream;
use exn::ResultExt;
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt, pin_mut};
use tmd_archive::Entry;
use tmd_extract::models::ModReference;
use tmd_extract::{DetailExtractor, ThunderstoreExtractor};
use tmd_relay::RelayHandle;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::models::{Attempt, Bundle, FailureReason, FetchOutcome};
use crate::options::BundleOptions;
use crate::progress::ProgressState;
use crate::resolve::resolve_download;

/// Progress events emitted by [`Bundler::run`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started) exactly once, after progress was reset.
/// 2. [`Attempted`](Self::Attempted) once per mod, in completion order.
/// 3. [`Complete`](Self::Complete) exactly once, after every attempt
///    finished.
///
/// A run that is a no-op (no mods, or another run still active) emits
/// nothing at all. An archive failure ends the stream with an `Err` instead
/// of [`Complete`](Self::Complete).
#[derive(Debug)]
pub enum BundleEvent {
    Started { total: usize },
    Attempted(Attempt),
    Complete(Bundle),
}

/// Bundles the mods of a modpack, one run at a time.
pub struct Bundler {
    relay: RelayHandle,
    detail: Arc<dyn DetailExtractor>,
    options: BundleOptions,
    active: AtomicBool,
    progress: watch::Sender<ProgressState>,
}

impl Bundler {
    pub fn new(relay: RelayHandle) -> Self {
        Self {
            relay,
            detail: Arc::new(ThunderstoreExtractor),
            options: BundleOptions::default(),
            active: AtomicBool::new(false),
            progress: watch::channel(ProgressState::default()).0,
        }
    }

    pub fn with_options(mut self, options: BundleOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_detail_extractor(mut self, extractor: Arc<dyn DetailExtractor>) -> Self {
        self.detail = extractor;
        self
    }

    pub fn options(&self) -> &BundleOptions {
        &self.options
    }

    /// Subscribe to progress changes. The receiver sees the current state
    /// immediately.
    pub fn progress(&self) -> watch::Receiver<ProgressState> {
        self.progress.subscribe()
    }

    pub fn snapshot(&self) -> ProgressState {
        self.progress.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Streams [`BundleEvent`]s for a run over `mods`.
    ///
    /// Every mod is attempted concurrently (up to the configured cap, the
    /// rest queued in order). An attempt resolves the mod's download link
    /// and fetches its archive, each step bounded by the configured timeout.
    /// Failures are recorded per mod and never stop the run. Progress is
    /// updated once per finished attempt. Only when all attempts finished
    /// is the container built, off the async scheduler.
    ///
    /// The run holds the bundler until the stream finishes or is dropped.
    pub fn run(&self, mods: Vec<ModReference>) -> impl Stream<Item = Result<BundleEvent>> + '_ {
        // `rustfmt` does not format macros that use braces. Wrap in parentheses!
        stream!({
            if mods.is_empty() {
                tracing::debug!("nothing to bundle");
                return;
            }
            let Some(_guard) = RunGuard::acquire(&self.active) else {
                tracing::warn!("a bundle run is already active, ignoring");
                return;
            };
            let total = mods.len();
            self.progress.send_replace(ProgressState::new(total));
            yield Ok(BundleEvent::Started { total });

            let cap = self.options.concurrency.map_or(total, |cap| cap.get());
            let mut queued: VecDeque<_> = mods.into_iter().map(|reference| self.attempt(reference)).collect();
            let mut in_flight = FuturesUnordered::new();
            in_flight.extend(queued.drain(..cap.min(queued.len())));

            let mut entries = Vec::new();
            while let Some(outcome) = in_flight.next().await {
                // FIFO refill.
                if let Some(next) = queued.pop_front() {
                    in_flight.push(next);
                }
                self.progress.send_modify(|progress| progress.record(&outcome));
                let attempt = Attempt::from(&outcome);
                if let FetchOutcome::Fetched { title, bytes } = outcome {
                    entries.push(Entry::new(title, bytes));
                }
                yield Ok(BundleEvent::Attempted(attempt));
            }

            let builder = self.options.archive_builder();
            let count = entries.len();
            let built = tokio::task::spawn_blocking(move || builder.build(entries)).await;
            let bytes = match built.or_raise(|| ErrorKind::Archive).and_then(|result| result.or_raise(|| ErrorKind::Archive)) {
                Ok(bytes) => bytes,
                Err(err) => {
                    yield Err(err);
                    return;
                },
            };
            let errors = self.snapshot().errors;
            tracing::info!(entries = count, failed = errors.len(), size = bytes.len(), "bundle complete");
            yield Ok(BundleEvent::Complete(Bundle {
                bytes,
                entries: count,
                errors,
            }));
        })
    }

    /// Runs to completion and returns the bundle, or `None` when the run was
    /// a no-op.
    pub async fn bundle_all(&self, mods: Vec<ModReference>) -> Result<Option<Bundle>> {
        let events = self.run(mods);
        pin_mut!(events);
        while let Some(event) = events.next().await {
            if let BundleEvent::Complete(bundle) = event? {
                return Ok(Some(bundle));
            }
        }
        Ok(None)
    }

    #[instrument(skip_all, fields(title = %reference.display_title()))]
    async fn attempt(&self, reference: ModReference) -> FetchOutcome {
        let title = reference.display_title();
        if reference.reference.is_none() {
            tracing::debug!("no reference, skipping");
            return FetchOutcome::Skipped { title };
        }
        match self.fetch(&reference).await {
            Ok(bytes) => FetchOutcome::Fetched { title, bytes },
            Err(reason) => FetchOutcome::Failed { title, reason },
        }
    }

    async fn fetch(&self, reference: &ModReference) -> std::result::Result<Vec<u8>, FailureReason> {
        let limit = self.options.timeout;
        let resolved = timeout(limit, resolve_download(self.relay.as_ref(), self.detail.as_ref(), reference))
            .await
            .map_err(|_| FailureReason::Timeout(limit))?;
        let binary_url = resolved.binary_url.ok_or(FailureReason::Unresolved)?;
        match timeout(limit, self.relay.fetch_binary(&binary_url)).await {
            Ok(Ok(bytes)) => {
                tracing::debug!(size = bytes.len(), "fetched");
                Ok(bytes)
            },
            Ok(Err(err)) => {
                tracing::warn!(error = %*err, "could not fetch archive");
                Err(FailureReason::Relay((*err).to_string()))
            },
            Err(_) => {
                tracing::warn!(?limit, "archive fetch timed out");
                Err(FailureReason::Timeout(limit))
            },
        }
    }
}

/// Marks the bundler busy for as long as it lives.
struct RunGuard<'a>(&'a AtomicBool);
impl<'a> RunGuard<'a> {
    fn acquire(active: &'a AtomicBool) -> Option<Self> {
        active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(active))
    }
}
impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::search::fetch_listing;
    use std::io::Cursor;
    use std::num::NonZeroUsize;
    use std::time::Duration;
    use tmd_relay::MockRelay;
    use tmd_relay::error::ErrorKind as RelayErrorKind;
    use zip::ZipArchive;

    fn reference(name: &str) -> ModReference {
        ModReference::new(Some(name), Some(format!("/c/lc/p/Owner/{name}/")))
    }

    /// A relay that knows a detail page and an archive for every name.
    fn relay_with(names: &[&str]) -> MockRelay {
        names.iter().fold(MockRelay::default(), |relay, name| {
            let download = format!("/package/download/Owner/{name}/1.0.0/");
            relay
                .with_html(&format!("/c/lc/p/Owner/{name}/"), fixtures::detail(&download))
                .with_binary(&download, name.as_bytes().to_vec())
        })
    }

    fn file_names(bundle: &Bundle) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bundle.bytes.clone())).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let relay = relay_with(&["Alpha", "Beta"])
            .with_html(
                "/c/lc/p/Owner/Pack/",
                fixtures::listing(&[
                    ("Alpha", Some("/c/lc/p/Owner/Alpha/")),
                    ("Beta", Some("/c/lc/p/Owner/Beta/")),
                    ("Gamma", Some("/c/lc/p/Owner/Gamma/")),
                ]),
            )
            .with_html("/c/lc/p/Owner/Gamma/", "<html>no download here</html>");
        let relay = Arc::new(relay);
        let mods = fetch_listing(relay.as_ref(), &ThunderstoreExtractor, "/c/lc/p/Owner/Pack/")
            .await
            .unwrap();
        let bundler = Bundler::new(relay.clone());

        let bundle = bundler.bundle_all(mods).await.unwrap().unwrap();

        let progress = bundler.snapshot();
        assert_eq!((progress.completed, progress.total), (3, 3));
        assert_eq!(progress.errors.len(), 1);
        assert_eq!(progress.errors[0].title, "Gamma");
        assert_eq!(progress.errors[0].reason, FailureReason::Unresolved);
        assert_eq!(bundle.entries, 2);
        assert_eq!(bundle.errors, progress.errors);
        let mut names = file_names(&bundle);
        names.sort();
        assert_eq!(names, ["Alpha.zip", "Beta.zip"]);
        assert!(!bundler.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_outcomes() {
        let relay = relay_with(&["Ok", "Slow"])
            .with_html("/c/lc/p/Owner/Broken/", fixtures::detail("/package/download/Owner/Broken/1.0.0/"))
            .with_failure("/package/download/Owner/Broken/1.0.0/", RelayErrorKind::Upstream(404))
            .with_delay("/package/download/Owner/Slow/1.0.0/", Duration::from_secs(10));
        let bundler = Bundler::new(Arc::new(relay));
        let mods = vec![
            reference("Ok"),
            reference("Slow"),
            reference("Broken"),
            ModReference::new(Some("NoLink"), None::<String>),
        ];

        let bundle = bundler.bundle_all(mods).await.unwrap().unwrap();

        let progress = bundler.snapshot();
        assert_eq!((progress.completed, progress.total), (4, 4));
        let mut errors: Vec<_> = progress.errors.iter().map(|e| (e.title.as_str(), e.reason.clone())).collect();
        errors.sort_by_key(|(title, _)| *title);
        assert_eq!(
            errors,
            [
                (
                    "Broken",
                    FailureReason::Relay("upstream rejected the request with status 404".into())
                ),
                ("Slow", FailureReason::Timeout(Duration::from_secs(8))),
            ]
        );
        assert_eq!(file_names(&bundle), ["Ok.zip"]);
    }

    #[tokio::test]
    async fn test_event_order() {
        let bundler = Bundler::new(Arc::new(relay_with(&["A", "B"])));
        let events: Vec<_> = bundler
            .run(vec![reference("A"), reference("B")])
            .map(|event| event.unwrap())
            .collect()
            .await;
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], BundleEvent::Started { total: 2 }));
        assert!(matches!(events[1], BundleEvent::Attempted(Attempt::Fetched { size: 1, .. })));
        assert!(matches!(events[2], BundleEvent::Attempted(Attempt::Fetched { size: 1, .. })));
        assert!(matches!(&events[3], BundleEvent::Complete(bundle) if bundle.entries == 2));
    }

    #[tokio::test]
    async fn test_empty_input_is_a_no_op() {
        let relay = Arc::new(MockRelay::default());
        let bundler = Bundler::new(relay.clone());
        assert_eq!(bundler.bundle_all(vec![]).await.unwrap(), None);
        assert_eq!(bundler.snapshot(), ProgressState::default());
        assert_eq!(relay.html_calls(), 0);
    }

    #[tokio::test]
    async fn test_skipped_only_run_builds_empty_bundle() {
        let relay = Arc::new(MockRelay::default());
        let bundler = Bundler::new(relay.clone());
        let mods = vec![ModReference::default(), ModReference::new(Some("X"), None::<String>)];
        let bundle = bundler.bundle_all(mods).await.unwrap().unwrap();
        assert_eq!(bundle.entries, 0);
        assert!(bundle.errors.is_empty());
        assert!(file_names(&bundle).is_empty());
        assert_eq!(relay.html_calls() + relay.binary_calls(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_start_is_a_no_op() {
        let bundler = Bundler::new(Arc::new(relay_with(&["A"])));
        let first = bundler.run(vec![reference("A")]);
        pin_mut!(first);
        assert!(matches!(first.next().await, Some(Ok(BundleEvent::Started { total: 1 }))));
        assert!(bundler.is_active());

        let second = bundler.run(vec![reference("A"), reference("A")]);
        pin_mut!(second);
        assert!(second.next().await.is_none());
        assert_eq!(bundler.snapshot().total, 1);

        while first.next().await.is_some() {}
        assert!(!bundler.is_active());
    }

    #[tokio::test]
    async fn test_dropped_run_releases_bundler() {
        let bundler = Bundler::new(Arc::new(relay_with(&["A"])));
        {
            let run = bundler.run(vec![reference("A")]);
            pin_mut!(run);
            run.next().await;
            assert!(bundler.is_active());
        }
        assert!(!bundler.is_active());
        assert!(bundler.bundle_all(vec![reference("A")]).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rerun_resets_progress() {
        let bundler = Bundler::new(Arc::new(relay_with(&["A"])));
        bundler.bundle_all(vec![reference("A"), reference("Missing")]).await.unwrap();
        assert_eq!(bundler.snapshot().errors.len(), 1);
        assert_eq!(bundler.snapshot().completed, 2);

        let run = bundler.run(vec![reference("A")]);
        pin_mut!(run);
        run.next().await;
        assert_eq!(bundler.snapshot(), ProgressState::new(1));
        while run.next().await.is_some() {}
        assert_eq!(bundler.snapshot().completed, 1);
        assert!(bundler.snapshot().errors.is_empty());
    }

    #[tokio::test]
    async fn test_progress_subscription() {
        let bundler = Bundler::new(Arc::new(relay_with(&["A", "B", "C"])));
        let mut progress = bundler.progress();
        progress.mark_unchanged();
        bundler
            .bundle_all(vec![reference("A"), reference("B"), reference("C")])
            .await
            .unwrap();
        assert!(progress.has_changed().unwrap());
        let seen = progress.borrow_and_update().clone();
        assert_eq!((seen.completed, seen.total, seen.percent()), (3, 3, 100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_cap() {
        let names = ["A", "B", "C", "D", "E"];
        let relay = names.iter().fold(relay_with(&names), |relay, name| {
            relay.with_delay(&format!("/package/download/Owner/{name}/1.0.0/"), Duration::from_secs(1))
        });
        let relay = Arc::new(relay);
        let options = BundleOptions {
            concurrency: NonZeroUsize::new(2),
            ..BundleOptions::default()
        };
        let bundler = Bundler::new(relay.clone()).with_options(options);
        let bundle = bundler
            .bundle_all(names.iter().map(|name| reference(name)).collect())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bundle.entries, 5);
        assert_eq!(relay.peak_in_flight(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_by_default() {
        let names = ["A", "B", "C", "D"];
        let relay = names.iter().fold(relay_with(&names), |relay, name| {
            relay.with_delay(&format!("/package/download/Owner/{name}/1.0.0/"), Duration::from_secs(1))
        });
        let relay = Arc::new(relay);
        let bundler = Bundler::new(relay.clone());
        bundler
            .bundle_all(names.iter().map(|name| reference(name)).collect())
            .await
            .unwrap();
        assert_eq!(relay.peak_in_flight(), 4);
    }
}
