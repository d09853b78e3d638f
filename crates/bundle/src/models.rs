use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

/// A mod reference after its detail page has been consulted.
///
/// `binary_url` is `None` when resolution failed; the title is kept so the
/// failure can be reported against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub title: String,
    pub binary_url: Option<String>,
}

/// Why a single mod did not make it into the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The detail page yielded no download link.
    Unresolved,
    /// The attempt exceeded its time budget.
    Timeout(Duration),
    /// The relay failed to deliver the archive.
    Relay(String),
}
impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Unresolved => write!(f, "download link could not be resolved"),
            Self::Timeout(limit) => write!(f, "timed out after {}s", limit.as_secs_f32()),
            Self::Relay(message) => write!(f, "{message}"),
        }
    }
}

/// Result of one mod's attempt; exactly one per input reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched { title: String, bytes: Vec<u8> },
    Failed { title: String, reason: FailureReason },
    /// The listing entry had no reference to follow. Not a failure.
    Skipped { title: String },
}
impl FetchOutcome {
    pub fn title(&self) -> &str {
        match self {
            Self::Fetched { title, .. } | Self::Failed { title, .. } | Self::Skipped { title } => title,
        }
    }

    /// The error entry this outcome contributes, if any.
    pub fn error(&self) -> Option<ItemError> {
        match self {
            Self::Failed { title, reason } => Some(ItemError {
                title: title.clone(),
                reason: reason.clone(),
            }),
            Self::Fetched { .. } | Self::Skipped { .. } => None,
        }
    }
}

/// A per-mod failure as recorded in the progress state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    pub title: String,
    pub reason: FailureReason,
}
impl Display for ItemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.title, self.reason)
    }
}

/// Outcome of one attempt as reported to stream consumers, without the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Fetched { title: String, size: usize },
    Failed(ItemError),
    Skipped { title: String },
}
impl From<&FetchOutcome> for Attempt {
    fn from(outcome: &FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Fetched { title, bytes } => Self::Fetched {
                title: title.clone(),
                size: bytes.len(),
            },
            FetchOutcome::Failed { title, reason } => Self::Failed(ItemError {
                title: title.clone(),
                reason: reason.clone(),
            }),
            FetchOutcome::Skipped { title } => Self::Skipped { title: title.clone() },
        }
    }
}

/// The finished container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Complete zip container, possibly without entries.
    pub bytes: Vec<u8>,
    /// Number of files in the container.
    pub entries: usize,
    /// Every failed mod, in completion order.
    pub errors: Vec<ItemError>,
}
