use crate::error::{AppError, Result};

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// The longest session duration a client may request (30 days).
pub const MAX_DURATION_MS: u64 = 30 * 24 * 3600 * 1000;
/// The longest accepted credential identifier.
pub const MAX_CREDENTIAL_ID_LEN: usize = 1024;

/// Validates a Solana wallet address.
///
/// # Arguments
///
/// * `address` - The base58 address to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the address is valid.
pub fn validate_wallet_address(address: &str) -> Result<()> {
    if address.len() < 32 || address.len() > 44 {
        return Err(AppError::Validation(
            "Wallet address must be 32 to 44 characters long".to_string(),
        ));
    }

    if !address.chars().all(|c| BASE58_ALPHABET.contains(c)) {
        return Err(AppError::Validation(
            "Wallet address must be base58 encoded".to_string(),
        ));
    }

    Ok(())
}

/// Validates a passkey credential identifier (base64 or base64url text).
pub fn validate_credential_id(credential_id: &str) -> Result<()> {
    if credential_id.is_empty() {
        return Err(AppError::Validation(
            "Credential id cannot be empty".to_string(),
        ));
    }

    if credential_id.len() > MAX_CREDENTIAL_ID_LEN {
        return Err(AppError::Validation(format!(
            "Credential id must be at most {} characters",
            MAX_CREDENTIAL_ID_LEN
        )));
    }

    if !credential_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '/' | '='))
    {
        return Err(AppError::Validation(
            "Credential id must be base64 or base64url text".to_string(),
        ));
    }

    Ok(())
}

/// Validates a duration in milliseconds.
pub fn validate_duration_ms(field: &str, ms: u64) -> Result<()> {
    if ms == 0 {
        return Err(AppError::Validation(format!("{} must be positive", field)));
    }

    if ms > MAX_DURATION_MS {
        return Err(AppError::Validation(format!(
            "{} must be at most 30 days",
            field
        )));
    }

    Ok(())
}
