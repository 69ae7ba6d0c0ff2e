//! Shared highlight state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use tokio::sync::watch;
use tokio::time::Instant;

type Entries = IndexMap<String, Instant>;

/// Alert id to the expiry deadline of the batch it arrived in.
///
/// Cloning yields another handle to the same state. Only the tracker and its
/// expiry timers mutate it; everyone else reads.
///
/// A deadline is the one scheduled when the id was highlighted. Under
/// [`ExpiryMode::Coalesced`](crate::ExpiryMode::Coalesced) a later batch can
/// cancel that timer, leaving the id highlighted past its deadline.
#[derive(Debug, Clone)]
pub struct HighlightState {
    entries: Arc<Mutex<Entries>>,
    version: Arc<watch::Sender<u64>>,
}

impl Default for HighlightState {
    fn default() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            entries: Arc::default(),
            version: Arc::new(version),
        }
    }
}

impl HighlightState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receiver notified whenever the set of highlighted ids changes,
    /// including when an expiry timer fires between snapshots.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Highlighted ids in the order they were highlighted.
    pub fn ids(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    pub fn deadline(&self, id: &str) -> Option<Instant> {
        self.lock().get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub(crate) fn insert_batch(&self, ids: &[String], deadline: Instant) {
        {
            let mut entries = self.lock();
            for id in ids {
                entries.insert(id.clone(), deadline);
            }
        }
        if !ids.is_empty() {
            self.bump();
        }
    }

    /// Remove the ids of a batch that still carry its deadline. Ids highlighted
    /// again by a later batch keep their newer deadline. Returns how many were
    /// removed.
    pub(crate) fn remove_batch(&self, ids: &[String], deadline: Instant) -> usize {
        let removed = {
            let mut entries = self.lock();
            ids.iter()
                .filter(|id| {
                    if entries.get(id.as_str()) == Some(&deadline) {
                        entries.shift_remove(id.as_str());
                        true
                    } else {
                        false
                    }
                })
                .count()
        };
        if removed > 0 {
            self.bump();
        }
        removed
    }

    /// Keep only ids for which `keep` returns true. Returns the removed ids.
    pub(crate) fn retain(&self, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let removed: Vec<String> = {
            let mut entries = self.lock();
            let removed: Vec<String> = entries
                .keys()
                .filter(|id| !keep(id.as_str()))
                .cloned()
                .collect();
            for id in &removed {
                entries.shift_remove(id);
            }
            removed
        };
        if !removed.is_empty() {
            self.bump();
        }
        removed
    }

    pub(crate) fn clear(&self) -> Vec<String> {
        let removed: Vec<String> = self.lock().drain(..).map(|(id, _)| id).collect();
        if !removed.is_empty() {
            self.bump();
        }
        removed
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_batch_insert_and_remove() {
        let state = HighlightState::new();
        let deadline = Instant::now() + Duration::from_secs(5);

        state.insert_batch(&ids(&["a", "b"]), deadline);
        state.insert_batch(&ids(&["c"]), deadline);
        assert_eq!(state.ids(), ids(&["a", "b", "c"]));
        assert_eq!(state.deadline("a"), Some(deadline));

        assert_eq!(state.remove_batch(&ids(&["a", "c", "zzz"]), deadline), 2);
        assert_eq!(state.ids(), ids(&["b"]));
    }

    #[test]
    fn test_remove_batch_keeps_newer_deadline() {
        let state = HighlightState::new();
        let first = Instant::now() + Duration::from_secs(5);
        let second = first + Duration::from_secs(2);

        state.insert_batch(&ids(&["a", "b"]), first);
        state.insert_batch(&ids(&["a"]), second);

        assert_eq!(state.remove_batch(&ids(&["a", "b"]), first), 1);
        assert_eq!(state.ids(), ids(&["a"]));
        assert_eq!(state.deadline("a"), Some(second));

        assert_eq!(state.remove_batch(&ids(&["a"]), second), 1);
        assert!(state.is_empty());
    }

    #[test]
    fn test_handles_share_state() {
        let state = HighlightState::new();
        let other = state.clone();
        state.insert_batch(&ids(&["a"]), Instant::now());
        assert!(other.contains("a"));

        assert_eq!(other.clear(), ids(&["a"]));
        assert!(state.is_empty());
    }

    #[test]
    fn test_retain() {
        let state = HighlightState::new();
        state.insert_batch(&ids(&["a", "b", "c"]), Instant::now());
        let removed = state.retain(|id| id != "b");
        assert_eq!(removed, ids(&["b"]));
        assert_eq!(state.ids(), ids(&["a", "c"]));
    }

    #[test]
    fn test_subscribers_see_changes_only() {
        let state = HighlightState::new();
        let mut rx = state.subscribe();
        assert!(!rx.has_changed().unwrap());

        state.insert_batch(&ids(&["a"]), Instant::now());
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        assert_eq!(state.remove_batch(&ids(&["zzz"]), Instant::now()), 0);
        assert!(state.retain(|_| true).is_empty());
        assert!(!rx.has_changed().unwrap());

        state.clear();
        assert!(rx.has_changed().unwrap());
    }
}
