//! 键值缓存层
//!
//! `ObjectCache` 是一个最小化的字符串键值接口，本地仓储在其之上以 JSON 文档形式
//! 保存数据。具体后端（Moka / Redis）通过插件注册表按名称构造。
//!
//! 缓存即仓储，条目不设过期时间；写入失败必须返回错误。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::errors::{Result, SchoolAdminError};

/// 缓存读取结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，键可能存在但无法读取
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String) -> Result<()>;
}

/// 基于 JSON 的类型化读写
impl dyn ObjectCache {
    pub async fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.get_raw(key).await {
            CacheResult::Found(json) => Ok(Some(serde_json::from_str(&json)?)),
            CacheResult::NotFound => Ok(None),
            CacheResult::ExistsButNoValue => Err(SchoolAdminError::cache_connection(format!(
                "Cache backend failed to read key '{key}'"
            ))),
        }
    }

    pub async fn insert_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value)?;
        self.insert_raw(key.to_string(), json).await
    }
}

/// 声明缓存插件：为类型生成注册函数
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        pub fn register() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        match <$ty>::new() {
                            Ok(cache) => Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>),
                            Err(e) => Err($crate::errors::SchoolAdminError::cache_connection(e)),
                        }
                    })
                }),
            );
        }
    };
}

/// 注册内置缓存插件
pub fn register_builtin_plugins() {
    object_cache::moka::register();
    object_cache::redis::register();
}
