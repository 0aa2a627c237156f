//! Device-bound obscuring of short strings kept in client-side storage.
//!
//! Payload format: `base64(iv) "." base64(salt) "." base64(ciphertext)`.
//! Keys are never stored; they are re-derived from the device fingerprint and
//! the salt carried in the payload, so a payload only opens on the device that
//! produced it. This is obscurity for low-sensitivity identifiers, not secret
//! storage: the only entropy is the fingerprint.

use base64::{engine::general_purpose, Engine as _};
use zeroize::Zeroizing;

use crate::crypto::aes::{self, NONCE_SIZE};
use crate::crypto::kdf::{self, DeviceFingerprint, PBKDF2_ITERATIONS};
use crate::error::{AppError, Result};

const SEPARATOR: char = '.';

/// Encrypts and decrypts payloads bound to one device fingerprint.
#[derive(Clone, Debug)]
pub struct LocalEncryptor {
    fingerprint: DeviceFingerprint,
    iterations: u32,
}

impl LocalEncryptor {
    /// Creates an encryptor using the standard PBKDF2 round count.
    pub fn new(fingerprint: DeviceFingerprint) -> Self {
        Self::with_iterations(fingerprint, PBKDF2_ITERATIONS)
    }

    /// Creates an encryptor with a custom PBKDF2 round count.
    ///
    /// Payloads only open under the same round count they were sealed with.
    pub fn with_iterations(fingerprint: DeviceFingerprint, iterations: u32) -> Self {
        Self {
            fingerprint,
            iterations: iterations.max(1),
        }
    }

    pub fn fingerprint(&self) -> &DeviceFingerprint {
        &self.fingerprint
    }

    /// Encrypts `plaintext` under a fresh IV and salt.
    ///
    /// Two calls with the same plaintext never produce the same payload.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let iv = aes::generate_nonce();
        let salt = kdf::generate_salt();
        let key = kdf::derive_key(&self.fingerprint, &salt, self.iterations);

        let ciphertext = aes::encrypt(&key, &iv, plaintext.as_bytes())?;

        let engine = general_purpose::STANDARD;
        Ok(format!(
            "{}{sep}{}{sep}{}",
            engine.encode(iv),
            engine.encode(salt),
            engine.encode(ciphertext),
            sep = SEPARATOR,
        ))
    }

    /// Decrypts a payload produced by [`LocalEncryptor::encrypt`].
    ///
    /// Returns `None` for every failure: malformed payload, bad base64, a
    /// payload from another device, tampering or non UTF-8 plaintext. The
    /// reason is only logged.
    pub fn decrypt(&self, payload: &str) -> Option<String> {
        match self.open(payload) {
            Ok(plaintext) => Some(plaintext),
            Err(e) => {
                tracing::debug!(
                    fingerprint = %self.fingerprint.digest_hex(),
                    "🔒 Local payload could not be recovered: {}",
                    e
                );
                None
            }
        }
    }

    fn open(&self, payload: &str) -> Result<String> {
        let segments = split_payload(payload)?;

        let iv: [u8; NONCE_SIZE] = segments.iv.as_slice().try_into().map_err(|_| {
            AppError::Validation(format!("IV must be {} bytes", NONCE_SIZE))
        })?;
        if segments.salt.is_empty() {
            return Err(AppError::Validation("Empty salt".to_string()));
        }

        let key = kdf::derive_key(&self.fingerprint, &segments.salt, self.iterations);
        let plaintext = Zeroizing::new(aes::decrypt(&key, &iv, &segments.ciphertext)?);

        String::from_utf8(plaintext.to_vec())
            .map_err(|_| AppError::Encryption("Plaintext is not valid UTF-8".to_string()))
    }
}

struct PayloadSegments {
    iv: Vec<u8>,
    salt: Vec<u8>,
    ciphertext: Vec<u8>,
}

fn split_payload(payload: &str) -> Result<PayloadSegments> {
    let parts: Vec<&str> = payload.split(SEPARATOR).collect();
    let [iv, salt, ciphertext] = parts[..] else {
        return Err(AppError::Validation(format!(
            "Expected 3 payload segments, found {}",
            parts.len()
        )));
    };

    let decode = |segment: &str| {
        general_purpose::STANDARD
            .decode(segment)
            .map_err(|e| AppError::Validation(format!("Invalid base64 segment: {}", e)))
    };

    Ok(PayloadSegments {
        iv: decode(iv)?,
        salt: decode(salt)?,
        ciphertext: decode(ciphertext)?,
    })
}
