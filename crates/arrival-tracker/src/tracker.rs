//! Snapshot diffing for fit triggers and highlight windows.

use std::collections::HashSet;

use alert_core::AlertEvent;
use indexmap::IndexSet;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::config::{ExpiryMode, TrackerConfig};
use crate::highlight::HighlightState;

/// Whether the view should re-fit to the current alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitSignal {
    Fit,
    NoFit,
}

/// What changed in one [`NewArrivalTracker::update`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerUpdate {
    pub fit: FitSignal,
    /// Ids that just became active, in snapshot order.
    pub highlight_added: Vec<String>,
    /// Ids dropped from the highlight set because their alert left the feed.
    pub highlight_removed: Vec<String>,
}

/// Diffs successive snapshots.
///
/// Owns the previous region keys, the previous active ids, and the pending
/// expiry timers. Timers are spawned on the ambient tokio runtime; without one,
/// highlights are added but never expire on their own.
pub struct NewArrivalTracker {
    config: TrackerConfig,
    prev_region_keys: HashSet<String>,
    prev_active_ids: HashSet<String>,
    highlights: HighlightState,
    pending: Vec<JoinHandle<()>>,
}

impl NewArrivalTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            prev_region_keys: HashSet::new(),
            prev_active_ids: HashSet::new(),
            highlights: HighlightState::new(),
            pending: Vec::new(),
        }
    }

    /// A handle to the highlight state, for readers.
    pub fn highlights(&self) -> HighlightState {
        self.highlights.clone()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Number of expiry timers that have not fired or been cancelled.
    pub fn pending_timers(&self) -> usize {
        self.pending.iter().filter(|task| !task.is_finished()).count()
    }

    /// Diff a new snapshot against the previous one.
    pub fn update(&mut self, snapshot: &[AlertEvent]) -> TrackerUpdate {
        let fit = self.diff_regions(snapshot);
        let just_appeared = self.diff_active(snapshot);

        let highlight_removed = if snapshot.is_empty() {
            self.cancel_pending();
            self.highlights.clear()
        } else {
            let present: HashSet<&str> = snapshot.iter().map(|a| a.id.as_str()).collect();
            self.highlights.retain(|id| present.contains(id))
        };

        if !just_appeared.is_empty() {
            let deadline = Instant::now() + self.config.highlight_window;
            self.highlights.insert_batch(&just_appeared, deadline);
            self.schedule_expiry(just_appeared.clone(), deadline);
        }

        TrackerUpdate {
            fit,
            highlight_added: just_appeared,
            highlight_removed,
        }
    }

    /// Cancel pending timers. The tracker must not be used afterwards.
    pub fn dispose(&mut self) {
        self.cancel_pending();
        debug!("Arrival tracker disposed");
    }

    fn diff_regions(&mut self, snapshot: &[AlertEvent]) -> FitSignal {
        if snapshot.is_empty() {
            self.prev_region_keys.clear();
            return FitSignal::NoFit;
        }

        let has_new = snapshot
            .iter()
            .any(|alert| !self.prev_region_keys.contains(&alert.region_key));
        self.prev_region_keys = snapshot.iter().map(|a| a.region_key.clone()).collect();

        if has_new {
            FitSignal::Fit
        } else {
            FitSignal::NoFit
        }
    }

    fn diff_active(&mut self, snapshot: &[AlertEvent]) -> Vec<String> {
        let current: IndexSet<&str> = snapshot
            .iter()
            .filter(|alert| alert.status.is_active())
            .map(|alert| alert.id.as_str())
            .collect();

        let just_appeared = current
            .iter()
            .filter(|id| !self.prev_active_ids.contains(**id))
            .map(|id| id.to_string())
            .collect();

        self.prev_active_ids = current.into_iter().map(str::to_string).collect();
        just_appeared
    }

    fn schedule_expiry(&mut self, batch: Vec<String>, deadline: Instant) {
        let Ok(runtime) = Handle::try_current() else {
            warn!("No tokio runtime, highlight expiry not scheduled");
            return;
        };

        match self.config.expiry_mode {
            ExpiryMode::Coalesced => self.cancel_pending(),
            ExpiryMode::PerBatch => self.pending.retain(|task| !task.is_finished()),
        }

        let highlights = self.highlights.clone();
        debug!(
            count = batch.len(),
            "Scheduling highlight expiry in {:?}", self.config.highlight_window
        );

        self.pending.push(runtime.spawn(async move {
            sleep_until(deadline).await;
            let removed = highlights.remove_batch(&batch, deadline);
            debug!(removed, "Highlight window elapsed");
        }));
    }

    fn cancel_pending(&mut self) {
        for task in self.pending.drain(..) {
            task.abort();
        }
    }
}

impl Drop for NewArrivalTracker {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl std::fmt::Debug for NewArrivalTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewArrivalTracker")
            .field("config", &self.config)
            .field("prev_region_keys", &self.prev_region_keys.len())
            .field("prev_active_ids", &self.prev_active_ids.len())
            .field("highlighted", &self.highlights.len())
            .field("pending_timers", &self.pending_timers())
            .finish()
    }
}
