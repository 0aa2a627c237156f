//! Persistence substrate for client-side records.
//!
//! Values are opaque strings (JSON or encrypted payloads) under fixed keys,
//! the same shape as browser local storage.

pub mod memory;
pub mod redis_store;
pub mod scoped;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;
pub use self::scoped::ScopedStore;

use std::time::Duration;

use crate::error::Result;

/// Key under which the session record is stored.
pub const SESSION_KEY: &str = "lazorkey:session";
/// Key under which the user preferences are stored.
pub const PREFERENCES_KEY: &str = "lazorkey:preferences";
/// Key under which the encrypted credential identifier is stored.
pub const CREDENTIAL_KEY: &str = "lazorkey:credential";

/// How long a client namespace outlives its last write. Matches the lifetime
/// of the client cookie, after which nobody can address the namespace.
pub const CLIENT_RETENTION: Duration = Duration::from_secs(365 * 24 * 3600);

/// A synchronous string key/value store.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Stores `value` under `key` with a hint that it is useless after
    /// `ttl_ms` milliseconds. Backends without native expiry just store it.
    fn set_with_ttl(&self, key: &str, value: &str, ttl_ms: u64) -> Result<()> {
        let _ = ttl_ms;
        self.set(key, value)
    }

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
