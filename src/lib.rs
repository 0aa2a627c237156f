//! Local core of the LazorKey passkey wallet demo: device-bound credential
//! obscuring, an expiring wallet session store, user preferences and the
//! HTTP host that exposes them to the browser front end.

pub mod clock;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;

pub mod crypto {
    pub mod aes;
    pub mod encryptor;
    pub mod kdf;
}

pub mod models {
    pub mod preferences;
    pub mod session;
}

pub mod services {
    pub mod credential;
    pub mod error_messages;
    pub mod preferences;
    pub mod session;
}

pub mod handlers {
    pub mod blocking;
    pub mod credential;
    pub mod errors;
    pub mod preferences;
    pub mod session;
}

pub mod middleware_layer {
    pub mod client;
    pub mod fingerprint;
}

pub mod validation {
    pub mod wallet;
}

pub use clock::{Clock, ManualClock, SystemClock};
pub use crypto::encryptor::LocalEncryptor;
pub use crypto::kdf::DeviceFingerprint;
pub use error::{AppError, Result};
pub use models::preferences::{Theme, UserPreferences};
pub use models::session::{SessionRecord, SessionStatus};
pub use services::credential::CredentialVault;
pub use services::error_messages::{classify_error, ErrorCategory};
pub use services::preferences::PreferencesStore;
pub use services::session::SessionStore;
pub use storage::{KeyValueStore, MemoryStore, RedisStore, ScopedStore};
