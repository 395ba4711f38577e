use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaObjectCache);

/// 进程内缓存，TTL 在创建时统一设置
pub struct MokaObjectCache {
    inner: Cache<String, String>,
}

impl MokaObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Self::with_limits(config.cache.memory.max_capacity, config.cache.default_ttl)
    }

    pub fn with_limits(max_capacity: u64, ttl_secs: u64) -> Result<Self, String> {
        if ttl_secs == 0 {
            return Err("cache.default_ttl must be greater than zero".to_string());
        }

        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        debug!(
            "MokaObjectCache initialized (capacity: {}, ttl: {}s)",
            max_capacity, ttl_secs
        );
        Ok(Self { inner })
    }
}

#[async_trait]
impl ObjectCache for MokaObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value),
            None => CacheResult::NotFound,
        }
    }

    // 单条 TTL 不生效，统一使用创建时的 TTL
    async fn insert_raw(&self, key: String, value: String, _ttl: u64) {
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaObjectCache::with_limits(100, 60).unwrap();
        assert_eq!(cache.get_raw("user:abc").await, CacheResult::NotFound);

        cache
            .insert_raw("user:abc".to_string(), "{}".to_string(), 60)
            .await;
        assert_eq!(
            cache.get_raw("user:abc").await,
            CacheResult::Found("{}".to_string())
        );

        cache.remove("user:abc").await;
        assert_eq!(cache.get_raw("user:abc").await, CacheResult::NotFound);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        assert!(MokaObjectCache::with_limits(100, 0).is_err());
    }
}
