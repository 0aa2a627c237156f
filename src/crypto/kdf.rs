use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::crypto::aes::{SecureKey, KEY_SIZE};

/// PBKDF2 iteration count used for device-bound keys.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
/// The size of the random PBKDF2 salt in bytes.
pub const SALT_SIZE: usize = 16;

/// Characteristics of the device a payload is bound to.
///
/// The derivation input is the user agent immediately followed by the
/// platform name, with no separator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceFingerprint {
    user_agent: String,
    platform: String,
}

impl DeviceFingerprint {
    pub fn new(user_agent: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            platform: platform.into(),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// The string fed to the key derivation.
    pub fn material(&self) -> String {
        format!("{}{}", self.user_agent, self.platform)
    }

    /// Short SHA-256 digest of the fingerprint, safe to put in logs.
    pub fn digest_hex(&self) -> String {
        let digest = Sha256::digest(self.material().as_bytes());
        hex::encode(&digest[..8])
    }
}

/// Generates a new random salt.
pub fn generate_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derives the AES-256 key for a device fingerprint and salt using
/// PBKDF2-HMAC-SHA256.
///
/// # Arguments
///
/// * `fingerprint` - The device the key is bound to.
/// * `salt` - The salt stored next to the ciphertext.
/// * `iterations` - The PBKDF2 round count.
pub fn derive_key(fingerprint: &DeviceFingerprint, salt: &[u8], iterations: u32) -> SecureKey {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2_hmac::<Sha256>(fingerprint.material().as_bytes(), salt, iterations, &mut key);
    let secure = SecureKey::new(key);
    zeroize::Zeroize::zeroize(&mut key);
    secure
}
