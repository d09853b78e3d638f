use crate::models::{FetchOutcome, ItemError};

/// Progress of the current (or last) run.
///
/// Owned by the [`Bundler`](crate::Bundler); callers only ever see copies,
/// either via [`snapshot()`](crate::Bundler::snapshot) or a
/// [`progress()`](crate::Bundler::progress) subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub completed: usize,
    pub total: usize,
    pub errors: Vec<ItemError>,
}
impl ProgressState {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
            errors: Vec::new(),
        }
    }

    /// One completed attempt: exactly one increment, at most one error.
    pub(crate) fn record(&mut self, outcome: &FetchOutcome) {
        self.completed = (self.completed + 1).min(self.total);
        if let Some(error) = outcome.error() {
            self.errors.push(error);
        }
    }

    /// Whole-number completion, 0 to 100. An empty run is complete.
    pub fn percent(&self) -> u8 {
        match self.total {
            0 => 100,
            total => u8::try_from(self.completed * 100 / total).unwrap_or(100),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}
