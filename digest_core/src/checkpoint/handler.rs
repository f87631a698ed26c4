use async_trait::async_trait;

use crate::checkpoint::cache::CacheTier;
use crate::checkpoint::dto::ThreadKey;
use crate::error::DigestResult;
use crate::summarizer::dto::SummaryState;

/// Processing cursor and persisted summary state of each chat thread.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn get_cursor(&self, key: ThreadKey) -> DigestResult<Option<i64>>;

    /// Returns the cursor actually stored, which never moves backwards.
    async fn set_cursor(&self, key: ThreadKey, message_id: i64) -> DigestResult<i64>;

    async fn get_summary_state(&self, key: ThreadKey) -> DigestResult<Option<SummaryState>>;

    async fn set_summary_state(&self, key: ThreadKey, state: &SummaryState) -> DigestResult<()>;

    /// Stores the run's summary state and advances the cursor as one durable
    /// write. Returns the cursor actually stored.
    async fn commit(
        &self,
        key: ThreadKey,
        state: &SummaryState,
        message_id: i64,
    ) -> DigestResult<i64>;
}

/// Cache-aside cursor on top of a durable store. Cache failures are logged
/// and never surface; the durable store stays the source of truth.
pub struct TieredCheckpoints<D, C> {
    durable: D,
    cache: C,
}

impl<D, C> TieredCheckpoints<D, C>
where
    D: CheckpointStore,
    C: CacheTier,
{
    pub fn new(durable: D, cache: C) -> Self {
        Self { durable, cache }
    }

    async fn write_cache(&self, key: ThreadKey, cursor: i64) {
        let cache_key = key.cache_key();
        if let Err(e) = self.cache.set(&cache_key, cursor.to_string()).await {
            log::warn!("Cache set failed for {}: {}", key, e);
            // an older cursor left behind would be served on the next read
            if let Err(e) = self.cache.delete(&cache_key).await {
                log::warn!("Cache delete failed for {}, cached cursor may be stale: {}", key, e);
            }
        }
    }
}

#[async_trait]
impl<D, C> CheckpointStore for TieredCheckpoints<D, C>
where
    D: CheckpointStore,
    C: CacheTier,
{
    async fn get_cursor(&self, key: ThreadKey) -> DigestResult<Option<i64>> {
        match self.cache.get(&key.cache_key()).await {
            Ok(Some(cached)) => match cached.parse::<i64>() {
                Ok(cursor) => return Ok(Some(cursor)),
                Err(e) => log::warn!("Ignoring unparseable cached cursor for {}: {}", key, e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Cache get failed for {}, falling back to store: {}", key, e),
        }

        let cursor = self.durable.get_cursor(key).await?;
        if let Some(cursor) = cursor {
            self.write_cache(key, cursor).await;
        }
        Ok(cursor)
    }

    async fn set_cursor(&self, key: ThreadKey, message_id: i64) -> DigestResult<i64> {
        let stored = self.durable.set_cursor(key, message_id).await?;
        self.write_cache(key, stored).await;
        Ok(stored)
    }

    async fn get_summary_state(&self, key: ThreadKey) -> DigestResult<Option<SummaryState>> {
        self.durable.get_summary_state(key).await
    }

    async fn set_summary_state(&self, key: ThreadKey, state: &SummaryState) -> DigestResult<()> {
        self.durable.set_summary_state(key, state).await
    }

    async fn commit(
        &self,
        key: ThreadKey,
        state: &SummaryState,
        message_id: i64,
    ) -> DigestResult<i64> {
        let stored = self.durable.commit(key, state, message_id).await?;
        self.write_cache(key, stored).await;
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::cache::CacheError;
    use crate::checkpoint::storage::SledStore;
    use crate::error::DigestError;
    use dashmap::DashMap;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct MemoryCache {
        entries: Arc<DashMap<String, String>>,
    }

    #[async_trait]
    impl CacheTier for MemoryCache {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            Ok(self.entries.get(key).map(|v| v.value().clone()))
        }

        async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
            self.entries.insert(key.to_string(), value);
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.entries.remove(key);
            Ok(())
        }
    }

    /// Reachable for reads and deletes, but rejects writes.
    #[derive(Clone, Default)]
    struct ReadOnlyCache {
        inner: MemoryCache,
    }

    #[async_trait]
    impl CacheTier for ReadOnlyCache {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            self.inner.get(key).await
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("read only replica".to_string()))
        }

        async fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.inner.delete(key).await
        }
    }

    struct DownStore;

    fn disk_gone() -> DigestError {
        DigestError::Durable(sled::Error::Io(std::io::Error::other("disk gone")))
    }

    #[async_trait]
    impl CheckpointStore for DownStore {
        async fn get_cursor(&self, _key: ThreadKey) -> DigestResult<Option<i64>> {
            Err(disk_gone())
        }

        async fn set_cursor(&self, _key: ThreadKey, _message_id: i64) -> DigestResult<i64> {
            Err(disk_gone())
        }

        async fn get_summary_state(&self, _key: ThreadKey) -> DigestResult<Option<SummaryState>> {
            Err(disk_gone())
        }

        async fn set_summary_state(&self, _key: ThreadKey, _state: &SummaryState) -> DigestResult<()> {
            Err(disk_gone())
        }

        async fn commit(
            &self,
            _key: ThreadKey,
            _state: &SummaryState,
            _message_id: i64,
        ) -> DigestResult<i64> {
            Err(disk_gone())
        }
    }

    struct DownCache;

    #[async_trait]
    impl CacheTier for DownCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }
    }

    fn sled_store() -> (SledStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = sled::open(temp_dir.path()).unwrap();
        (SledStore::new(&db).unwrap(), temp_dir)
    }

    #[tokio::test]
    async fn test_cache_hit_short_circuits_store() {
        let (durable, _temp) = sled_store();
        let cache = MemoryCache::default();
        let key = ThreadKey::new(9, None);

        durable.set_cursor(key, 10).await.unwrap();
        cache.entries.insert(key.cache_key(), "12".to_string());

        let store = TieredCheckpoints::new(durable, cache);
        assert_eq!(store.get_cursor(key).await.unwrap(), Some(12));
    }

    #[tokio::test]
    async fn test_cache_miss_repopulates_cache() {
        let (durable, _temp) = sled_store();
        let cache = MemoryCache::default();
        let key = ThreadKey::new(9, Some(3));
        durable.set_cursor(key, 55).await.unwrap();

        let store = TieredCheckpoints::new(durable, cache.clone());
        assert_eq!(store.get_cursor(key).await.unwrap(), Some(55));
        assert_eq!(
            cache.entries.get(&key.cache_key()).map(|v| v.value().clone()),
            Some("55".to_string())
        );
    }

    #[tokio::test]
    async fn test_write_goes_through_both_tiers() {
        let (durable, _temp) = sled_store();
        let cache = MemoryCache::default();
        let key = ThreadKey::new(9, None);

        let store = TieredCheckpoints::new(durable.clone(), cache.clone());
        store.set_cursor(key, 77).await.unwrap();

        assert_eq!(durable.get_cursor(key).await.unwrap(), Some(77));
        assert_eq!(
            cache.entries.get(&key.cache_key()).map(|v| v.value().clone()),
            Some("77".to_string())
        );
    }

    #[tokio::test]
    async fn test_unavailable_cache_keeps_cursor_monotonic() {
        let (durable, _temp) = sled_store();
        let store = TieredCheckpoints::new(durable, DownCache);
        let key = ThreadKey::new(-5, Some(1));

        for id in [3, 8, 21, 34] {
            store.set_cursor(key, id).await.unwrap();
        }
        assert_eq!(store.get_cursor(key).await.unwrap(), Some(34));
    }

    #[tokio::test]
    async fn test_garbage_in_cache_falls_back_to_store() {
        let (durable, _temp) = sled_store();
        let cache = MemoryCache::default();
        let key = ThreadKey::new(1, None);
        durable.set_cursor(key, 4).await.unwrap();
        cache.entries.insert(key.cache_key(), "four".to_string());

        let store = TieredCheckpoints::new(durable, cache);
        assert_eq!(store.get_cursor(key).await.unwrap(), Some(4));
    }

    #[tokio::test]
    async fn test_summary_state_skips_cache() {
        let (durable, _temp) = sled_store();
        let store = TieredCheckpoints::new(durable, DownCache);
        let key = ThreadKey::new(1, None);

        let mut state = SummaryState::new();
        state.insert("Builds".to_string(), "- green again".to_string());
        store.set_summary_state(key, &state).await.unwrap();

        assert_eq!(store.get_summary_state(key).await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn test_durable_failure_is_fatal() {
        let cache = MemoryCache::default();
        let store = TieredCheckpoints::new(DownStore, cache.clone());
        let key = ThreadKey::new(8, None);

        assert!(matches!(store.get_cursor(key).await, Err(DigestError::Durable(_))));
        assert!(matches!(store.set_cursor(key, 12).await, Err(DigestError::Durable(_))));
        assert!(matches!(
            store.commit(key, &SummaryState::new(), 12).await,
            Err(DigestError::Durable(_))
        ));
        assert!(matches!(store.get_summary_state(key).await, Err(DigestError::Durable(_))));
        assert!(cache.entries.is_empty());
    }

    #[tokio::test]
    async fn test_commit_writes_through_to_cache() {
        let (durable, _temp) = sled_store();
        let cache = MemoryCache::default();
        let key = ThreadKey::new(9, Some(4));

        let mut state = SummaryState::new();
        state.insert("Backups".to_string(), "- nightly job fixed".to_string());

        let store = TieredCheckpoints::new(durable.clone(), cache.clone());
        assert_eq!(store.commit(key, &state, 19).await.unwrap(), 19);

        assert_eq!(durable.get_cursor(key).await.unwrap(), Some(19));
        assert_eq!(durable.get_summary_state(key).await.unwrap(), Some(state));
        assert_eq!(
            cache.entries.get(&key.cache_key()).map(|v| v.value().clone()),
            Some("19".to_string())
        );
    }

    #[tokio::test]
    async fn test_failed_cache_write_drops_stale_cursor() {
        let (durable, _temp) = sled_store();
        let cache = ReadOnlyCache::default();
        let key = ThreadKey::new(9, None);
        cache.inner.entries.insert(key.cache_key(), "3".to_string());

        let store = TieredCheckpoints::new(durable, cache.clone());
        store.set_cursor(key, 40).await.unwrap();

        assert!(cache.inner.entries.get(&key.cache_key()).is_none());
        assert_eq!(store.get_cursor(key).await.unwrap(), Some(40));
    }
}
