use chrono::Utc;
use tracing::{debug, info, warn};

use super::backend::KeyValueStore;
use super::types::HistoryEntry;
use crate::analyzer::FeedbackRecord;
use crate::error::Result;

/// Key the serialized history array is stored under.
pub const HISTORY_KEY: &str = "prompy-history";

/// Maximum number of entries kept; older ones are evicted on insert.
pub const DEFAULT_CAPACITY: usize = 50;

/// Bounded, most-recent-first log of analyzed prompts.
///
/// The whole log is written to the backing store after every mutation, and
/// the in-memory copy only changes once that write has succeeded.
pub struct PromptHistory<S: KeyValueStore> {
    store: S,
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl<S: KeyValueStore> PromptHistory<S> {
    /// Open the history held in `store`, recovering from corrupt content.
    pub fn open(store: S) -> Self {
        Self::with_capacity(store, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(store: S, capacity: usize) -> Self {
        let mut history = Self {
            store,
            entries: Vec::new(),
            capacity: capacity.max(1),
        };
        history.load();
        history
    }

    /// Re-read the persisted log, most recent first.
    ///
    /// Unparseable content is treated as an empty history and the persisted
    /// value is reset to an empty array. A failed read also yields an empty
    /// history but leaves the stored value untouched.
    pub fn load(&mut self) -> Vec<HistoryEntry> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read history, starting empty: {}", e);
                self.entries.clear();
                return Vec::new();
            }
        };

        self.entries = match raw {
            None => Vec::new(),
            Some(json) => match serde_json::from_str::<Vec<HistoryEntry>>(&json) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Failed to parse history, resetting: {}", e);
                    self.reset_corrupt();
                    Vec::new()
                }
            },
        };

        debug!("Loaded {} history entries", self.entries.len());
        self.entries.clone()
    }

    fn reset_corrupt(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.set(HISTORY_KEY, "[]") {
            warn!("Failed to reset corrupt history: {}", e);
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Prepend `entry`, evict anything beyond capacity, persist.
    pub fn add(&mut self, entry: HistoryEntry) -> Result<()> {
        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(entry);
        next.extend(self.entries.iter().cloned());

        if next.len() > self.capacity {
            let evicted = next.len() - self.capacity;
            next.truncate(self.capacity);
            info!("Evicted {} oldest history entries", evicted);
        }

        self.persist(&next)?;
        self.entries = next;
        Ok(())
    }

    /// Create an entry for a fresh analysis and add it.
    ///
    /// The id is the current time in epoch milliseconds, bumped past the
    /// newest entry's id so ids stay strictly increasing.
    pub fn record(&mut self, prompt: &str, feedback: FeedbackRecord) -> Result<HistoryEntry> {
        let now = Utc::now().timestamp_millis();
        let newest = self
            .entries
            .first()
            .and_then(|e| e.id.parse::<i64>().ok())
            .unwrap_or(i64::MIN);
        let id = now.max(newest.saturating_add(1));

        let entry = HistoryEntry::new(id.to_string(), prompt, feedback);
        self.add(entry.clone())?;
        info!("Recorded history entry {} (score {})", entry.id, entry.feedback.score);
        Ok(entry)
    }

    /// Delete the entry with `id`. Returns false, and writes nothing, if absent.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        if self.get(id).is_none() {
            debug!("No history entry {} to remove", id);
            return Ok(false);
        }

        let next: Vec<HistoryEntry> = self.entries.iter().filter(|e| e.id != id).cloned().collect();
        self.persist(&next)?;
        self.entries = next;
        info!("Removed history entry {}", id);
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.persist(&[])?;
        let cleared = self.entries.len();
        self.entries.clear();
        info!("Cleared {} history entries", cleared);
        Ok(())
    }

    fn persist(&mut self, entries: &[HistoryEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.store.set(HISTORY_KEY, &json)
    }

    /// Direct access to the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PromptyError;
    use crate::history::{JsonFileStore, MemoryStore};
    use tempfile::TempDir;

    /// Store whose reads always fail; counts attempted writes.
    #[derive(Default)]
    struct UnreadableStore {
        writes: usize,
    }

    impl KeyValueStore for UnreadableStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(PromptyError::Storage("database is locked".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            self.writes += 1;
            Ok(())
        }
    }

    fn feedback(score: f64) -> FeedbackRecord {
        FeedbackRecord {
            score,
            strengths: vec!["Clear objective".into(), "Good starting point".into()],
            improvements: vec!["Add more detail".into(), "Add examples".into()],
            tags: vec!["coding".into(), "design".into(), "writing".into()],
            summary: "Adequate prompt".into(),
        }
    }

    fn entry(id: &str) -> HistoryEntry {
        HistoryEntry::new(id, format!("prompt {}", id), feedback(5.0))
    }

    #[test]
    fn test_add_prepends() {
        let mut history = PromptHistory::open(MemoryStore::new());
        history.add(entry("1")).unwrap();
        history.add(entry("2")).unwrap();

        let loaded = history.load();
        assert_eq!(loaded[0].id, "2");
        assert_eq!(loaded[1].id, "1");
    }

    #[test]
    fn test_eviction_keeps_fifty_newest() {
        let mut history = PromptHistory::open(MemoryStore::new());
        for i in 0..51 {
            history.add(entry(&i.to_string())).unwrap();
        }

        let loaded = history.load();
        assert_eq!(loaded.len(), 50);
        assert_eq!(loaded[0].id, "50");
        assert_eq!(loaded[49].id, "1");
        assert!(history.get("0").is_none());
    }

    #[test]
    fn test_custom_capacity() {
        let mut history = PromptHistory::with_capacity(MemoryStore::new(), 2);
        for id in ["a", "b", "c"] {
            history.add(entry(id)).unwrap();
        }
        let ids: Vec<&str> = history.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut history = PromptHistory::open(MemoryStore::new());
        for id in ["1", "2", "3"] {
            history.add(entry(id)).unwrap();
        }

        assert!(history.remove("2").unwrap());
        let ids: Vec<String> = history.load().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut history = PromptHistory::open(MemoryStore::new());
        history.add(entry("1")).unwrap();
        let before = history.store().get(HISTORY_KEY).unwrap();

        assert!(!history.remove("nope").unwrap());
        assert_eq!(history.len(), 1);
        assert_eq!(history.store().get(HISTORY_KEY).unwrap(), before);
    }

    #[test]
    fn test_clear_persists_empty_array() {
        let mut history = PromptHistory::open(MemoryStore::new());
        history.add(entry("1")).unwrap();
        history.clear().unwrap();

        assert!(history.is_empty());
        assert_eq!(history.store().get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
        assert!(history.load().is_empty());
    }

    #[test]
    fn test_corrupt_history_resets() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "{definitely not an array").unwrap();

        let history = PromptHistory::open(store);
        assert!(history.is_empty());
        assert_eq!(history.store().get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_read_failure_does_not_overwrite() {
        let mut history = PromptHistory::open(UnreadableStore::default());
        assert!(history.is_empty());
        assert_eq!(history.store().writes, 0);

        assert!(history.load().is_empty());
        assert_eq!(history.store().writes, 0);
    }

    #[test]
    fn test_wrong_shape_resets() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, r#"[{"id": 1}]"#).unwrap();

        let history = PromptHistory::open(store);
        assert!(history.is_empty());
        assert_eq!(history.store().get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_record_ids_strictly_increase() {
        let mut history = PromptHistory::open(MemoryStore::new());
        let mut last = i64::MIN;
        for _ in 0..10 {
            let e = history.record("same millisecond", feedback(6.0)).unwrap();
            let id: i64 = e.id.parse().unwrap();
            assert!(id > last);
            last = id;
        }
        assert_eq!(history.len(), 10);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        {
            let mut history = PromptHistory::open(JsonFileStore::new(&path));
            history.record("Build a CLI", feedback(7.0)).unwrap();
        }

        let history = PromptHistory::open(JsonFileStore::new(&path));
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].prompt, "Build a CLI");
        assert_eq!(history.entries()[0].feedback.score, 7.0);
    }
}
