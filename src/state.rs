use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::crypto::encryptor::LocalEncryptor;
use crate::crypto::kdf::DeviceFingerprint;
use crate::error::{AppError, Result};
use crate::middleware_layer::client::ClientScope;
use crate::services::credential::CredentialVault;
use crate::services::preferences::PreferencesStore;
use crate::services::session::SessionStore;
use crate::storage::{KeyValueStore, MemoryStore, RedisStore, ScopedStore, CLIENT_RETENTION};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The shared store every client namespace lives in.
    pub store: Arc<dyn KeyValueStore>,
    /// The time source for session expiry.
    pub clock: Arc<dyn Clock>,
    /// The application's configuration.
    pub config: Config,
    /// PBKDF2 round count for credential payloads.
    pub kdf_iterations: u32,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = match config.redis_url.clone() {
            Some(url) => {
                let store = tokio::task::spawn_blocking(move || RedisStore::connect(&url, CLIENT_RETENTION))
                    .await
                    .map_err(|e| AppError::Internal(format!("Redis connect task failed: {}", e)))??;
                tracing::info!("✅ Redis store initialized");
                Arc::new(store)
            }
            None => {
                tracing::warn!("⚠️  REDIS_URL not set, using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::from_parts(config.clone(), store, Arc::new(SystemClock)))
    }

    /// Assembles a state from explicit parts.
    pub fn from_parts(config: Config, store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            config,
            kdf_iterations: crate::crypto::kdf::PBKDF2_ITERATIONS,
        }
    }

    /// Overrides the PBKDF2 round count.
    pub fn with_kdf_iterations(mut self, iterations: u32) -> Self {
        self.kdf_iterations = iterations;
        self
    }

    fn scoped(&self, scope: &ClientScope) -> Arc<dyn KeyValueStore> {
        Arc::new(ScopedStore::new(self.store.clone(), scope.to_string()))
    }

    /// The session store of one client.
    pub fn sessions(&self, scope: &ClientScope) -> SessionStore {
        SessionStore::new(self.scoped(scope), self.clock.clone())
    }

    /// The preferences of one client.
    pub fn preferences(&self, scope: &ClientScope) -> PreferencesStore {
        PreferencesStore::new(self.scoped(scope))
    }

    /// The credential vault of one client on one device.
    pub fn credentials(&self, scope: &ClientScope, fingerprint: DeviceFingerprint) -> CredentialVault {
        let encryptor = LocalEncryptor::with_iterations(fingerprint, self.kdf_iterations);
        CredentialVault::new(self.scoped(scope), encryptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn without_redis_url_uses_memory_store() {
        let state = AppState::new(&Config::default()).await.unwrap();
        state.store.set("k", "v").unwrap();
        assert_eq!(state.store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn bad_redis_url_fails_off_the_runtime_thread() {
        let config = Config {
            redis_url: Some("not-a-redis-url".to_string()),
            ..Config::default()
        };
        assert!(AppState::new(&config).await.is_err());
    }
}
