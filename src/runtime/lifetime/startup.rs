use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{Result, SchoolAdminError};
use crate::storage::Storage;
use crate::storage::local_cache::FIXED_DOCUMENTS;
use crate::storage::seed::{SeedDocument, seed_if_empty};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 按名称创建缓存后端
///
/// 缓存即仓储，配置的后端不可用时直接失败，不回退到空的内存缓存。
async fn create_cache(cache_type: &str) -> Result<Arc<dyn ObjectCache>> {
    info!("Attempting to create {} cache backend", cache_type);

    let constructor = get_object_cache_plugin(cache_type).ok_or_else(|| {
        SchoolAdminError::cache_plugin_not_found(format!(
            "Cache backend '{cache_type}' not found in registry"
        ))
    })?;
    let cache = constructor().await?;

    info!("Successfully created {} cache backend", cache_type);
    Ok(Arc::from(cache))
}

/// 内存缓存接近容量上限时的提示，超出后 Moka 会淘汰仓储条目
fn capacity_warning(max_capacity: u64, student_count: usize) -> Option<String> {
    let entries = student_count as u64 + FIXED_DOCUMENTS;
    (entries.saturating_mul(10) >= max_capacity.saturating_mul(9)).then(|| {
        format!(
            "Repository holds {entries} entries, close to cache.memory.max_capacity = {max_capacity}; raise it to avoid evicting records"
        )
    })
}

/// 仓储为空时导入种子数据
async fn seed_repository(storage: &Arc<dyn Storage>) {
    let Some(path) = AppConfig::get().seed_file() else {
        debug!("No seed file configured, skipping seed");
        return;
    };

    let document = match SeedDocument::from_file(path) {
        Ok(document) => document,
        Err(e) => {
            warn!("Failed to read seed file {}: {}, skipping seed", path, e);
            return;
        }
    };

    match seed_if_empty(storage, document).await {
        Ok(true) => info!("Repository seeded from {}", path),
        Ok(false) => {}
        Err(e) => warn!("Failed to seed repository from {}: {}", path, e),
    }
}

/// 准备服务器启动的上下文
/// 包括缓存、仓储和种子数据
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    crate::cache::register_builtin_plugins();
    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let config = AppConfig::get();

    // 创建缓存实例
    let cache = create_cache(&config.cache.cache_type)
        .await
        .expect("Failed to create cache");
    warn!("Cache backend initialized");

    let storage = crate::storage::create_storage(cache.clone())
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized");

    seed_repository(&storage).await;

    if config.cache.cache_type == "moka" {
        match storage.count_students().await {
            Ok(count) => {
                if let Some(message) = capacity_warning(config.cache.memory.max_capacity, count) {
                    warn!("{}", message);
                }
            }
            Err(e) => warn!("Failed to count students: {}", e),
        }
    }

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_cache_backend_fails() {
        crate::cache::register_builtin_plugins();
        let err = create_cache("memcached").await.err().unwrap();
        assert_eq!(err.code(), "E002");
    }

    #[test]
    fn test_capacity_warning_near_limit() {
        assert!(capacity_warning(100_000, 40).is_none());
        assert!(capacity_warning(100, 85).is_some());
        assert!(capacity_warning(100, 92).is_some());
    }
}
