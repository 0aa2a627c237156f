use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    crypto::kdf::DeviceFingerprint,
    error::{AppError, Result},
    handlers::blocking::run_blocking,
    middleware_layer::client::ClientScope,
    state::AppState,
    validation::wallet::validate_credential_id,
};

/// The payload carrying a passkey credential identifier.
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPayload {
    pub credential_id: String,
}

/// Returns the stored credential if this device can recover it.
///
/// Every failure answers 404 so callers cannot tell a missing credential from
/// one sealed on another device.
#[axum::debug_handler]
pub async fn get_credential(
    State(state): State<AppState>,
    Extension(scope): Extension<ClientScope>,
    fingerprint: DeviceFingerprint,
) -> Result<Json<CredentialPayload>> {
    let vault = state.credentials(&scope, fingerprint);
    let credential_id = run_blocking(move || Ok(vault.load_credential()))
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(CredentialPayload { credential_id }))
}

#[axum::debug_handler]
pub async fn put_credential(
    State(state): State<AppState>,
    Extension(scope): Extension<ClientScope>,
    fingerprint: DeviceFingerprint,
    Json(payload): Json<CredentialPayload>,
) -> Result<StatusCode> {
    validate_credential_id(&payload.credential_id)?;

    let vault = state.credentials(&scope, fingerprint);
    run_blocking(move || vault.store_credential(&payload.credential_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn delete_credential(
    State(state): State<AppState>,
    Extension(scope): Extension<ClientScope>,
    fingerprint: DeviceFingerprint,
) -> Result<StatusCode> {
    let vault = state.credentials(&scope, fingerprint);
    run_blocking(move || vault.forget_credential()).await?;
    Ok(StatusCode::NO_CONTENT)
}
