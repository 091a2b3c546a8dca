use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;
use crate::errors::{Result, SchoolAdminError};

declare_object_cache_plugin!("redis", RedisObjectCache);

pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
}

impl RedisObjectCache {
    pub fn new() -> std::result::Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        debug!(
            "RedisObjectCache created with prefix: '{}'",
            redis_config.key_prefix
        );

        let client = redis::Client::open(redis_config.url.clone())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        // 测试 Redis 连接 - 使用同步连接进行简单测试
        let mut conn = client.get_connection().map_err(|e| {
            error!(
                "Failed to connect to Redis server: {}. Check Redis server status and URL: {}",
                e, redis_config.url
            );
            format!("Redis connection failed: {e}")
        })?;
        let response: String = redis::cmd("PING").query(&mut conn).map_err(|e| {
            error!("Failed to ping Redis server: {}", e);
            format!("Redis ping failed: {e}")
        })?;
        debug!("Redis connection test successful: {}", response);

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
        })
    }

    async fn get_connection(&self) -> redis::RedisResult<MultiplexedConnection> {
        self.client.get_multiplexed_async_connection().await
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let redis_key = self.make_key(key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return CacheResult::ExistsButNoValue;
            }
        };

        let result: redis::RedisResult<Option<String>> = conn.get(redis_key).await;

        match result {
            Ok(Some(data)) => {
                debug!("Successfully retrieved key: {}", key);
                CacheResult::Found(data)
            }
            Ok(None) => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String) -> Result<()> {
        let redis_key = self.make_key(&key);

        let mut conn = self.get_connection().await.map_err(|e| {
            error!("Failed to get Redis connection: {}", e);
            SchoolAdminError::cache_connection(format!("Failed to get Redis connection: {e}"))
        })?;

        conn.set::<String, String, ()>(redis_key, value)
            .await
            .map_err(|e| {
                error!("Failed to insert key '{}' into cache: {}", key, e);
                SchoolAdminError::cache_connection(format!("Failed to write key '{key}': {e}"))
            })?;

        debug!("Successfully inserted key into cache: {}", key);
        Ok(())
    }
}
