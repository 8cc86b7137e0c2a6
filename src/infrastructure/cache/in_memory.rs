//! In-memory memo cache using moka

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::MemoCache;

/// Configuration for the in-memory memo cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
    /// Entries not read for this long are evicted
    pub time_to_idle: Option<Duration>,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            time_to_idle: None,
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn with_time_to_idle(mut self, tti: Duration) -> Self {
        self.time_to_idle = Some(tti);
        self
    }
}

/// Bounded, thread-safe memo cache.
///
/// Eviction follows moka's TinyLFU admission with LRU ordering, so rarely
/// requested entries leave first once capacity is reached.
#[derive(Debug, Clone)]
pub struct InMemoryCache {
    cache: MokaCache<String, String>,
    config: InMemoryCacheConfig,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let mut builder = MokaCache::builder().max_capacity(config.max_capacity);

        if let Some(tti) = config.time_to_idle {
            builder = builder.time_to_idle(tti);
        }

        Self {
            cache: builder.build(),
            config,
        }
    }

    pub fn config(&self) -> &InMemoryCacheConfig {
        &self.config
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemoCache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).await
    }

    async fn put(&self, key: &str, value: String) {
        self.cache.insert(key.to_string(), value).await;
    }

    async fn len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = InMemoryCache::new();

        cache.put("summary:slug:intro", "A short abstract.".to_string()).await;

        assert_eq!(
            cache.get("summary:slug:intro").await,
            Some("A short abstract.".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_missing() {
        let cache = InMemoryCache::new();

        assert!(cache.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let cache = InMemoryCache::new();

        cache.put("key", "first".to_string()).await;
        cache.put("key", "second".to_string()).await;

        assert_eq!(cache.get("key").await, Some("second".to_string()));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let cache = InMemoryCache::with_config(InMemoryCacheConfig::default().with_max_capacity(10));

        for i in 0..100 {
            cache.put(&format!("key{}", i), format!("value{}", i)).await;
        }

        assert!(cache.len().await <= 10);
    }

    #[tokio::test]
    async fn test_time_to_idle_evicts() {
        let cache = InMemoryCache::with_config(
            InMemoryCacheConfig::default().with_time_to_idle(Duration::from_millis(50)),
        );

        cache.put("key", "value".to_string()).await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get("key").await.is_none());
    }

    #[test]
    fn test_config() {
        let config = InMemoryCacheConfig::default()
            .with_max_capacity(100)
            .with_time_to_idle(Duration::from_secs(60));

        let cache = InMemoryCache::with_config(config);

        assert_eq!(cache.config().max_capacity, 100);
        assert_eq!(cache.config().time_to_idle, Some(Duration::from_secs(60)));
    }
}
