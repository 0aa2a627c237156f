use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use aes_gcm::aead::rand_core::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};
use crate::error::{AppError, Result};

pub const KEY_SIZE: usize = 32;
/// IV length carried in the first payload segment.
pub const NONCE_SIZE: usize = 12;

/// A PBKDF2-derived payload key. Wiped from memory when dropped; never
/// persisted, since it can always be re-derived from fingerprint and salt.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecureKey([u8; KEY_SIZE]);

impl SecureKey {
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Draws a fresh IV for one payload.
///
/// Every payload also gets its own salt and therefore its own key, so IV
/// reuse across payloads cannot pair two messages under one key.
pub fn generate_nonce() -> [u8; NONCE_SIZE] {
    let mut iv = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Encrypts a plaintext using AES-256-GCM under the given nonce.
///
/// The caller owns the nonce because it travels next to the ciphertext.
///
/// # Arguments
///
/// * `key` - The AES-256 key.
/// * `nonce` - A nonce that has never been used with `key`.
/// * `plaintext` - The data to encrypt.
///
/// # Returns
///
/// The ciphertext with the 16-byte authentication tag appended.
pub fn encrypt(key: &SecureKey, nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let nonce = Nonce::from(*nonce);

    cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| AppError::Encryption(format!("Encryption failed: {}", e)))
}

/// Decrypts a ciphertext using AES-256-GCM.
///
/// # Arguments
///
/// * `key` - The AES-256 key.
/// * `nonce` - The nonce used for encryption.
/// * `ciphertext` - The data to decrypt, tag included.
///
/// # Returns
///
/// The decrypted plaintext.
pub fn decrypt(key: &SecureKey, nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let nonce = Nonce::from(*nonce);

    cipher
        .decrypt(&nonce, ciphertext)
        .map_err(|e| AppError::Encryption(format!("Decryption failed: {}", e)))
}
