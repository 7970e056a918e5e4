//! Frequency-ranked (LFU) cache over a remote store.

use crate::remote::RemoteStore;
use meridian_core::MeridianResult;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default ranking index name.
pub const LFU_RANK_INDEX: &str = "meridian:cache:lfu:rank";

/// Capacity-bounded cache that prefers retaining frequently accessed
/// entries. Reads and writes both count as an access.
///
/// Every key in the value store has a score entry in the ranking index and
/// vice versa; an orphan on either side is a bug, not a transient state.
///
/// The capacity check and the subsequent write are separate remote
/// operations, so concurrent `set` calls can transiently push cardinality
/// past `capacity` until the next check pops the excess. The overshoot is
/// bounded and self-correcting; there is no cross-operation lock and this
/// type does not claim strict atomicity for the check-then-write sequence.
///
/// Values also carry a fixed TTL independent of ranked eviction: an entry
/// may expire before eviction would have chosen it.
pub struct LfuCache {
    store: Arc<dyn RemoteStore>,
    index: String,
    capacity: i64,
    ttl: Duration,
}

impl LfuCache {
    /// Creates a new LFU cache with the default ranking index.
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore>, capacity: i64, ttl: Duration) -> Self {
        Self::with_index(store, LFU_RANK_INDEX, capacity, ttl)
    }

    /// Creates a new LFU cache with a custom ranking index name.
    #[must_use]
    pub fn with_index(
        store: Arc<dyn RemoteStore>,
        index: impl Into<String>,
        capacity: i64,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            index: index.into(),
            capacity,
            ttl,
        }
    }

    /// Writes a value and counts the write as an access.
    ///
    /// The capacity check runs first; if eviction fails the write fails too,
    /// so the capacity bound is never silently skipped.
    pub async fn set(&self, key: &str, value: &str) -> MeridianResult<()> {
        self.evict_to_capacity().await?;

        self.store.set(key, value, self.ttl).await?;
        self.store.increment_score(&self.index, key, 1.0).await?;

        Ok(())
    }

    /// Reads a value, counting a hit as an access.
    ///
    /// Returns `None` when the key is absent or has expired; callers fall
    /// through to the backing store on that result.
    pub async fn get(&self, key: &str) -> MeridianResult<Option<String>> {
        let Some(value) = self.store.get(key).await? else {
            debug!("Cache miss for key '{}'", key);
            return Ok(None);
        };

        // The rank update is synchronous: a failed increment surfaces as an
        // error rather than silently skewing eviction order.
        self.store.increment_score(&self.index, key, 1.0).await?;

        debug!("Cache hit for key '{}'", key);
        Ok(Some(value))
    }

    /// Removes a value and its ranking entry.
    ///
    /// A ranking-removal failure after the value removal surfaces as an
    /// error so the caller never observes a silent orphan rank entry.
    pub async fn delete(&self, key: &str) -> MeridianResult<()> {
        self.evict_to_capacity().await?;

        self.store.delete(key).await?;
        self.store.remove_from_index(&self.index, key).await?;

        Ok(())
    }

    /// Pops and fully deletes the lowest-scored entries until the index is
    /// strictly below capacity (leaving room for one incoming entry).
    async fn evict_to_capacity(&self) -> MeridianResult<()> {
        let cardinality = self.store.cardinality(&self.index).await?;
        if cardinality < self.capacity {
            return Ok(());
        }

        let count = cardinality - self.capacity + 1;
        let victims = self.store.pop_lowest_scored(&self.index, count).await?;

        for (key, score) in victims {
            debug!("Evicting key '{}' with score {}", key, score);
            // The pop already removed the rank entry; only the value remains.
            self.store.delete(&key).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use meridian_core::MeridianError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory remote store with an insertion-order tie-break, mirroring
    /// the stable ordering the production ranking structure provides.
    #[derive(Default)]
    struct InMemoryRemoteStore {
        values: Mutex<HashMap<String, String>>,
        // insertion order doubles as the tie-break
        ranks: Mutex<Vec<(String, f64)>>,
        fail_pop: AtomicBool,
    }

    impl InMemoryRemoteStore {
        fn new() -> Self {
            Self::default()
        }

        fn fail_next_pop(&self) {
            self.fail_pop.store(true, Ordering::SeqCst);
        }

        fn contains_value(&self, key: &str) -> bool {
            self.values.lock().unwrap().contains_key(key)
        }
    }

    #[async_trait]
    impl RemoteStore for InMemoryRemoteStore {
        async fn set(&self, key: &str, value: &str, _ttl: Duration) -> MeridianResult<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn get(&self, key: &str) -> MeridianResult<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn delete(&self, key: &str) -> MeridianResult<()> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }

        async fn increment_score(
            &self,
            _index: &str,
            key: &str,
            delta: f64,
        ) -> MeridianResult<f64> {
            let mut ranks = self.ranks.lock().unwrap();
            if let Some(entry) = ranks.iter_mut().find(|(k, _)| k == key) {
                entry.1 += delta;
                return Ok(entry.1);
            }
            ranks.push((key.to_string(), delta));
            Ok(delta)
        }

        async fn cardinality(&self, _index: &str) -> MeridianResult<i64> {
            Ok(self.ranks.lock().unwrap().len() as i64)
        }

        async fn pop_lowest_scored(
            &self,
            _index: &str,
            count: i64,
        ) -> MeridianResult<Vec<(String, f64)>> {
            if self.fail_pop.swap(false, Ordering::SeqCst) {
                return Err(MeridianError::Cache("pop min unavailable".to_string()));
            }

            let mut ranks = self.ranks.lock().unwrap();
            let mut popped = Vec::new();
            for _ in 0..count {
                let mut lowest: Option<usize> = None;
                for (i, (_, score)) in ranks.iter().enumerate() {
                    match lowest {
                        // strict comparison keeps the earliest-inserted key on ties
                        Some(j) if *score >= ranks[j].1 => {}
                        _ => lowest = Some(i),
                    }
                }
                match lowest {
                    Some(i) => popped.push(ranks.remove(i)),
                    None => break,
                }
            }
            Ok(popped)
        }

        async fn remove_from_index(&self, _index: &str, key: &str) -> MeridianResult<()> {
            self.ranks.lock().unwrap().retain(|(k, _)| k != key);
            Ok(())
        }
    }

    fn cache_over(store: &Arc<InMemoryRemoteStore>, capacity: i64) -> LfuCache {
        LfuCache::new(
            Arc::clone(store) as Arc<dyn RemoteStore>,
            capacity,
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_set_then_get_round_trips() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let cache = cache_over(&store, 10);

        cache.set("user:1", "{\"name\":\"Ada\"}").await.unwrap();
        let value = cache.get("user:1").await.unwrap();
        assert_eq!(value.as_deref(), Some("{\"name\":\"Ada\"}"));
    }

    #[tokio::test]
    async fn test_get_miss_returns_none() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let cache = cache_over(&store, 10);

        assert!(cache.get("user:absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cardinality_never_exceeds_capacity() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let cache = cache_over(&store, 3);

        for i in 0..8 {
            cache.set(&format!("key:{}", i), "v").await.unwrap();
            let cardinality = store.cardinality("").await.unwrap();
            assert!(cardinality <= 3, "cardinality {} after set {}", cardinality, i);
        }
    }

    #[tokio::test]
    async fn test_lowest_scored_key_evicted_first() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let cache = cache_over(&store, 3);

        cache.set("a", "1").await.unwrap();
        cache.set("b", "2").await.unwrap();
        cache.set("c", "3").await.unwrap();

        // a's score climbs to 3; b and c stay tied at 1
        cache.get("a").await.unwrap();
        cache.get("a").await.unwrap();

        cache.set("d", "4").await.unwrap();

        // one of the tied-lowest keys is evicted; the tie-break is the
        // index's own stable order, not something this layer dictates
        assert!(store.contains_value("a"));
        assert!(store.contains_value("d"));
        let survivors = ["b", "c"]
            .iter()
            .filter(|k| store.contains_value(k))
            .count();
        assert_eq!(survivors, 1);
        assert_eq!(store.cardinality("").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete_removes_value_and_rank() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let cache = cache_over(&store, 10);

        cache.set("user:1", "v").await.unwrap();
        cache.delete("user:1").await.unwrap();

        assert!(cache.get("user:1").await.unwrap().is_none());
        assert_eq!(store.cardinality("").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_of_absent_key_is_harmless() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let cache = cache_over(&store, 10);

        cache.delete("user:never-set").await.unwrap();
    }

    #[tokio::test]
    async fn test_set_fails_when_eviction_fails() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let cache = cache_over(&store, 2);

        cache.set("a", "1").await.unwrap();
        cache.set("b", "2").await.unwrap();

        store.fail_next_pop();
        let err = cache.set("c", "3").await.unwrap_err();
        assert!(matches!(err, MeridianError::Cache(_)));
        // the failed set wrote nothing
        assert!(!store.contains_value("c"));
    }
}
