use std::sync::Arc;

use crate::crypto::encryptor::LocalEncryptor;
use crate::error::Result;
use crate::storage::{KeyValueStore, CREDENTIAL_KEY};

/// Keeps the passkey credential identifier encrypted at rest.
#[derive(Clone)]
pub struct CredentialVault {
    store: Arc<dyn KeyValueStore>,
    encryptor: LocalEncryptor,
}

impl CredentialVault {
    pub fn new(store: Arc<dyn KeyValueStore>, encryptor: LocalEncryptor) -> Self {
        Self { store, encryptor }
    }

    /// Encrypts `credential_id` for this device and stores it, replacing any
    /// previous payload.
    pub fn store_credential(&self, credential_id: &str) -> Result<()> {
        let payload = self.encryptor.encrypt(credential_id)?;
        self.store.set(CREDENTIAL_KEY, &payload)?;
        tracing::info!(
            fingerprint = %self.encryptor.fingerprint().digest_hex(),
            "🔐 Credential stored"
        );
        Ok(())
    }

    /// Returns the stored credential when it can be recovered on this device.
    ///
    /// `None` means "prompt re-authentication"; the cause is not reported.
    pub fn load_credential(&self) -> Option<String> {
        let payload = match self.store.get(CREDENTIAL_KEY) {
            Ok(payload) => payload?,
            Err(e) => {
                tracing::warn!("⚠️  Credential read failed: {}", e);
                return None;
            }
        };

        self.encryptor.decrypt(&payload)
    }

    pub fn forget_credential(&self) -> Result<()> {
        self.store.remove(CREDENTIAL_KEY)?;
        tracing::info!("🗑️  Credential removed");
        Ok(())
    }
}
