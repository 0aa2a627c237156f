use std::sync::Mutex;
use std::time::Duration;

use redis::{Commands, ConnectionLike};

use super::KeyValueStore;
use crate::error::{AppError, Result};

/// A store backed by plain Redis string keys.
///
/// Uses the blocking client; callers on an async runtime go through
/// `spawn_blocking`. Every key carries an expiry so namespaces of clients
/// that never return are reclaimed by Redis itself.
pub struct RedisStore {
    client: redis::Client,
    conn: Mutex<redis::Connection>,
    retention: Duration,
}

impl RedisStore {
    /// Connects to the Redis server at `url`.
    ///
    /// # Arguments
    ///
    /// * `url` - A `redis://` connection URL.
    /// * `retention` - Expiry applied to keys written without their own TTL.
    ///
    /// # Returns
    ///
    /// A `Result` containing the connected `RedisStore`.
    pub fn connect(url: &str, retention: Duration) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection()?;
        tracing::info!("✅ Redis connection established");

        Ok(Self {
            client,
            conn: Mutex::new(conn),
            retention,
        })
    }

    fn with_conn<T>(&self, op: impl Fn(&mut redis::Connection) -> redis::RedisResult<T>) -> Result<T> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| AppError::Storage(format!("Lock error: {}", e)))?;

        if !conn.is_open() {
            tracing::warn!("⚠️  Redis connection closed, reconnecting");
            *conn = self.client.get_connection()?;
        }

        match op(&mut *conn) {
            Ok(value) => Ok(value),
            Err(e) if e.is_connection_dropped() || e.is_io_error() => {
                tracing::warn!("⚠️  Redis connection lost ({}), retrying once", e);
                *conn = self.client.get_connection()?;
                op(&mut *conn).map_err(|e| {
                    tracing::error!("❌ Redis command failed after reconnect: {}", e);
                    AppError::Redis(e)
                })
            }
            Err(e) => {
                tracing::error!("❌ Redis command failed: {}", e);
                Err(AppError::Redis(e))
            }
        }
    }
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| conn.get(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let seconds = self.retention.as_secs().max(1);
        self.with_conn(|conn| conn.set_ex(key, value, seconds))
    }

    fn set_with_ttl(&self, key: &str, value: &str, ttl_ms: u64) -> Result<()> {
        let ttl_ms = ttl_ms.max(1);
        self.with_conn(|conn| conn.pset_ex(key, value, ttl_ms))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| conn.del(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_store() -> RedisStore {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string());
        RedisStore::connect(&url, Duration::from_secs(60)).unwrap()
    }

    // Needs a running server: REDIS_URL=redis://127.0.0.1:6379 cargo test -- --ignored
    #[test]
    #[ignore]
    fn round_trip_against_live_server() {
        let store = live_store();

        store.set("lazorkey:test:key", "value").unwrap();
        assert_eq!(store.get("lazorkey:test:key").unwrap().as_deref(), Some("value"));
        store.remove("lazorkey:test:key").unwrap();
        assert_eq!(store.get("lazorkey:test:key").unwrap(), None);
    }

    #[test]
    #[ignore]
    fn keys_expire_on_the_server() {
        let store = live_store();

        store.set_with_ttl("lazorkey:test:ttl", "value", 50).unwrap();
        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(store.get("lazorkey:test:ttl").unwrap(), None);

        store.set("lazorkey:test:retained", "value").unwrap();
        let ttl: i64 = store.with_conn(|conn| conn.ttl("lazorkey:test:retained")).unwrap();
        assert!(ttl > 0 && ttl <= 60);
        store.remove("lazorkey:test:retained").unwrap();
    }
}
