//! Debounced recomputation of metrics and diffs while the user types.
//!
//! Each input change is parked in a single pending slot; the host calls
//! [`Recompute::tick`] once per scheduling tick and only the latest input is
//! computed. Inputs superseded before the tick are dropped, never computed.

use tracing::trace;

use crate::diff::{self, DiffResult};
use crate::metrics::{self, TextMetricsResult};

/// Single-slot pending computation.
pub struct Recompute<I, O> {
    compute: fn(&I) -> O,
    pending: Option<I>,
    latest: Option<O>,
    superseded: u64,
}

impl<I, O> Recompute<I, O> {
    pub fn new(compute: fn(&I) -> O) -> Self {
        Recompute {
            compute,
            pending: None,
            latest: None,
            superseded: 0,
        }
    }

    /// Park `input` for the next tick, replacing any input still pending.
    pub fn submit(&mut self, input: I) {
        if self.pending.replace(input).is_some() {
            self.superseded += 1;
            trace!(superseded = self.superseded, "dropped superseded input");
        }
    }

    /// Drop the pending input without computing it.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Compute the pending input, if any. Returns whether a computation ran.
    pub fn tick(&mut self) -> bool {
        match self.pending.take() {
            Some(input) => {
                self.latest = Some((self.compute)(&input));
                true
            }
            None => false,
        }
    }

    /// Set the result directly, discarding anything pending.
    pub fn settle(&mut self, output: O) {
        self.pending = None;
        self.latest = Some(output);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Result of the most recent computation.
    pub fn latest(&self) -> Option<&O> {
        self.latest.as_ref()
    }

    /// How many inputs were dropped because a newer one arrived first.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

fn compute_metrics(text: &String) -> TextMetricsResult {
    metrics::compute(text)
}

fn compute_diff(pair: &(String, String)) -> DiffResult {
    diff::diff(&pair.0, &pair.1)
}

/// Counter pane and diff panes of an editor, recomputed once per tick.
pub struct AnalysisSession {
    text: String,
    before: String,
    after: String,
    metrics: Recompute<String, TextMetricsResult>,
    diff: Recompute<(String, String), DiffResult>,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        let mut metrics = Recompute::new(compute_metrics as fn(&String) -> TextMetricsResult);
        metrics.settle(TextMetricsResult::default());
        let mut diff = Recompute::new(compute_diff as fn(&(String, String)) -> DiffResult);
        diff.settle(DiffResult::default());

        AnalysisSession {
            text: String::new(),
            before: String::new(),
            after: String::new(),
            metrics,
            diff,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.metrics.submit(self.text.clone());
    }

    pub fn set_before(&mut self, before: impl Into<String>) {
        self.before = before.into();
        self.schedule_diff();
    }

    pub fn set_after(&mut self, after: impl Into<String>) {
        self.after = after.into();
        self.schedule_diff();
    }

    /// Run whatever is pending. Returns whether anything was recomputed.
    pub fn tick(&mut self) -> bool {
        let metrics = self.metrics.tick();
        let diff = self.diff.tick();
        metrics || diff
    }

    pub fn is_pending(&self) -> bool {
        self.metrics.is_pending() || self.diff.is_pending()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metrics(&self) -> TextMetricsResult {
        self.metrics.latest().copied().unwrap_or_default()
    }

    pub fn diff(&self) -> Option<&DiffResult> {
        self.diff.latest()
    }

    fn schedule_diff(&mut self) {
        // two empty panes clear immediately
        if self.before.is_empty() && self.after.is_empty() {
            self.diff.settle(DiffResult::default());
        } else {
            self.diff.submit((self.before.clone(), self.after.clone()));
        }
    }
}
