//! Key-value persistence for user state
//!
//! Values are opaque JSON strings; `records` knows which keys hold what.

use std::sync::Arc;

use crate::{
    config::{Config, StoreBackend},
    error::AppResult,
};

pub mod file;
pub mod memory;
pub mod records;
pub mod redis;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;
pub use self::records::{RecordKey, UserState};
pub use self::redis::RedisStore;

/// String-keyed, string-valued storage backend
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key has never been written
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Replaces the whole value stored under `key`
    async fn set(&self, key: &str, value: String) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Builds the store selected by configuration
pub async fn create_store(config: &Config) -> AppResult<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.store_backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::File => Arc::new(FileStore::open(&config.data_dir).await?),
        StoreBackend::Redis => Arc::new(RedisStore::connect(&config.redis_url).await?),
    };

    tracing::info!(backend = store.name(), "Store initialized");

    Ok(store)
}
