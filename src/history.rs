use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::RewardItem;
use crate::error::StorageError;
use crate::storage::Storage;

/// Saved progress: lifetime total plus the most recent photos, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryRecord {
    #[serde(rename = "count", deserialize_with = "null_as_default")]
    pub lifetime_count: u64,
    #[serde(rename = "photos", deserialize_with = "null_as_default")]
    pub recent_draws: Vec<RewardItem>,
}

/// A `null` field reads the same as a missing one.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl HistoryRecord {
    fn push(&mut self, item: RewardItem, limit: usize) {
        self.recent_draws.push(item);
        self.truncate(limit);
        self.lifetime_count = self.lifetime_count.saturating_add(1);
    }

    fn truncate(&mut self, limit: usize) {
        if self.recent_draws.len() > limit {
            let excess = self.recent_draws.len() - limit;
            self.recent_draws.drain(..excess);
        }
    }
}

/// Sole owner of the persisted [`HistoryRecord`].
#[derive(Debug)]
pub struct HistoryStore<S> {
    storage: S,
    key: String,
    limit: usize,
    current: HistoryRecord,
}

impl<S: Storage> HistoryStore<S> {
    pub fn new(storage: S, key: impl Into<String>, limit: usize) -> Self {
        Self {
            storage,
            key: key.into(),
            limit,
            current: HistoryRecord::default(),
        }
    }

    /// Re-reads saved state. Missing or unreadable data yields an empty record.
    pub fn load(&mut self) -> HistoryRecord {
        let mut record = match self.storage.read(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<HistoryRecord>(&raw) {
                Ok(record) => record,
                Err(err) => {
                    log::warn!("discarding unreadable history under {}: {err}", self.key);
                    HistoryRecord::default()
                }
            },
            Ok(None) => HistoryRecord::default(),
            Err(err) => {
                log::warn!("history unavailable: {err}");
                HistoryRecord::default()
            }
        };
        record.truncate(self.limit);
        self.current = record.clone();
        record
    }

    /// Appends `item`, persists, and returns the updated record.
    pub fn record(&mut self, item: RewardItem) -> HistoryRecord {
        self.current.push(item, self.limit);
        if let Err(err) = self.persist() {
            log::error!("failed to save history: {err}");
        }
        self.current.clone()
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.current)?;
        self.storage.write(&self.key, &json)
    }

    pub fn current(&self) -> &HistoryRecord {
        &self.current
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::DEFAULT_STORAGE_KEY;
    use crate::storage::{FileStorage, MemoryStorage};
    use tempfile::TempDir;

    fn numbered(n: usize) -> RewardItem {
        let mut item = Catalog::builtin().items()[n % 6].clone();
        item.id = format!("frame-{n}");
        item
    }

    fn store(storage: MemoryStorage) -> HistoryStore<MemoryStorage> {
        HistoryStore::new(storage, DEFAULT_STORAGE_KEY, 10)
    }

    #[test]
    fn fifteen_records_keep_the_last_ten_in_order() {
        let mut history = store(MemoryStorage::default());
        let mut last = HistoryRecord::default();
        for n in 0..15 {
            last = history.record(numbered(n));
        }
        let ids: Vec<String> = last.recent_draws.iter().map(|i| i.id.clone()).collect();
        let expected: Vec<String> = (5..15).map(|n| format!("frame-{n}")).collect();
        assert_eq!(ids, expected);
        assert_eq!(last.lifetime_count, 15);
    }

    #[test]
    fn lifetime_count_matches_records_from_zero() {
        for k in [0, 1, 10, 11, 37] {
            let mut history = store(MemoryStorage::default());
            for n in 0..k {
                history.record(numbered(n));
            }
            assert_eq!(history.current().lifetime_count, k as u64);
            assert!(history.current().recent_draws.len() <= 10);
        }
    }

    #[test]
    fn corrupt_payload_loads_as_empty() {
        for raw in ["not json", "{\"count\": \"many\"}", "[1,2,3]", ""] {
            let mut history = store(MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, raw));
            assert_eq!(history.load(), HistoryRecord::default(), "payload {raw:?}");
        }
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let mut history = store(MemoryStorage::with_entry(
            DEFAULT_STORAGE_KEY,
            r#"{"count": 4, "extra": true}"#,
        ));
        let record = history.load();
        assert_eq!(record.lifetime_count, 4);
        assert!(record.recent_draws.is_empty());
    }

    #[test]
    fn null_photos_keep_the_count() {
        let mut history = store(MemoryStorage::with_entry(
            DEFAULT_STORAGE_KEY,
            r#"{"count": 7, "photos": null}"#,
        ));
        let record = history.load();
        assert_eq!(record.lifetime_count, 7);
        assert!(record.recent_draws.is_empty());

        let record = history.record(numbered(0));
        assert_eq!(record.lifetime_count, 8);
    }

    #[test]
    fn null_count_keeps_the_photos() {
        let raw = format!(
            r#"{{"count": null, "photos": [{}]}}"#,
            serde_json::to_string(&numbered(3)).unwrap()
        );
        let mut history = store(MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, &raw));
        let record = history.load();
        assert_eq!(record.lifetime_count, 0);
        assert_eq!(record.recent_draws[0].id, "frame-3");
    }

    #[test]
    fn persisted_layout_uses_count_and_photos() {
        let mut history = store(MemoryStorage::default());
        history.record(numbered(2));
        let raw = history.storage().get(DEFAULT_STORAGE_KEY).unwrap();
        let json: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["photos"][0]["id"], "frame-2");
        assert_eq!(json["photos"][0]["rarity"], "rare");
    }

    #[test]
    fn oversized_saved_list_is_trimmed_on_load() {
        let record = HistoryRecord {
            lifetime_count: 20,
            recent_draws: (0..14).map(numbered).collect(),
        };
        let raw = serde_json::to_string(&record).unwrap();
        let mut history = store(MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, &raw));
        let loaded = history.load();
        assert_eq!(loaded.recent_draws.len(), 10);
        assert_eq!(loaded.recent_draws[0].id, "frame-4");
        assert_eq!(loaded.lifetime_count, 20);
    }

    #[test]
    fn history_survives_a_new_store_on_disk() {
        let dir = TempDir::new().unwrap();
        {
            let mut history = HistoryStore::new(FileStorage::new(dir.path()), "photos", 10);
            history.load();
            history.record(numbered(0));
            history.record(numbered(1));
        }
        let mut reopened = HistoryStore::new(FileStorage::new(dir.path()), "photos", 10);
        let record = reopened.load();
        assert_eq!(record.lifetime_count, 2);
        assert_eq!(record.recent_draws[1].id, "frame-1");
    }
}
