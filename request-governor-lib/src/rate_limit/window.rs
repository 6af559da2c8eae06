use ahash::AHashMap;
use std::collections::VecDeque;

/// Per-key admitted-request timestamps, oldest first.
///
/// Plain data: no clock and no locking. Entries are only appended in
/// non-decreasing time order, so pruning pops from the front.
#[derive(Debug, Default)]
pub struct WindowStore {
    windows: AHashMap<String, VecDeque<u64>>,
}

impl WindowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch (or create) the window for `key` and drop every entry that is
    /// `window_ms` or more older than `now_ms`. The pruned window is kept.
    pub fn pruned(&mut self, key: &str, now_ms: u64, window_ms: u64) -> &mut VecDeque<u64> {
        let window = self.windows.entry(key.to_owned()).or_default();
        while let Some(&oldest) = window.front() {
            if now_ms.saturating_sub(oldest) < window_ms {
                break;
            }
            window.pop_front();
        }
        window
    }

    /// Timestamps currently stored for `key`, without pruning.
    pub fn entries(&self, key: &str) -> Option<&VecDeque<u64>> {
        self.windows.get(key)
    }

    /// Drop the window for `key`. Returns whether one existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.windows.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.windows.clear();
    }

    /// Number of keys with a window.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pruned_creates_empty_window() {
        let mut store = WindowStore::new();
        assert!(store.pruned("k", 0, 1000).is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn pruned_drops_entries_at_or_past_window_edge() {
        let mut store = WindowStore::new();
        store.pruned("k", 0, 1000).extend([0, 400, 999]);

        let window = store.pruned("k", 1000, 1000);
        assert_eq!(window.iter().copied().collect::<Vec<_>>(), vec![400, 999]);

        // Pruning is written back, not a filtered view.
        assert_eq!(store.entries("k").map(VecDeque::len), Some(2));
    }

    #[test]
    fn remove_and_clear() {
        let mut store = WindowStore::new();
        store.pruned("a", 0, 10).push_back(0);
        store.pruned("b", 0, 10).push_back(0);

        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }
}
