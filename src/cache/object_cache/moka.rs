use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;
use crate::errors::Result;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new() -> std::result::Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_capacity(config.cache.memory.max_capacity))
    }

    /// 条目永不过期；超出容量时 Moka 会淘汰条目，容量需大于学生数加固定文档数
    pub fn with_capacity(max_capacity: u64) -> Self {
        debug!(
            "MokaCacheWrapper initialized with max capacity: {}",
            max_capacity
        );
        Self {
            inner: Cache::builder().max_capacity(max_capacity).build(),
        }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        if let Some(value) = self.inner.get(key).await {
            debug!("Successfully retrieved key: {}", key);
            CacheResult::Found(value)
        } else {
            debug!("Key not found in cache: {}", key);
            CacheResult::NotFound
        }
    }

    async fn insert_raw(&self, key: String, value: String) -> Result<()> {
        self.inner.insert(key, value).await;
        Ok(())
    }
}
