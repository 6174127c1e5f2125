use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::{error::AppResult, store::KeyValueStore};

/// Namespace prepended to every key written to Redis
const KEY_PREFIX: &str = "reelmatch:";

/// Redis-backed store using plain `GET`/`SET` without expiry
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis
    ///
    /// The connection manager reconnects transparently after drops.
    pub async fn connect(redis_url: &str) -> AppResult<Self> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    fn namespaced(key: &str) -> String {
        format!("{}{}", KEY_PREFIX, key)
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(Self::namespaced(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(Self::namespaced(key), value).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

// Round-trip tests need a live server: REDIS_URL=redis://... cargo test -- --ignored

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_key() {
        assert_eq!(
            RedisStore::namespaced("user-ratings"),
            "reelmatch:user-ratings"
        );
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_round_trip() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let store = RedisStore::connect(&redis_url).await.unwrap();

        store
            .set("test-round-trip", r#"["a","b"]"#.to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get("test-round-trip").await.unwrap().as_deref(),
            Some(r#"["a","b"]"#)
        );

        let mut conn = store.conn.clone();
        let _: () = conn.del(RedisStore::namespaced("test-round-trip")).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_missing_key() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let store = RedisStore::connect(&redis_url).await.unwrap();
        assert_eq!(store.get("nonexistent_key_12345").await.unwrap(), None);
    }
}
