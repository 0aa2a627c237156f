use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    handlers::blocking::run_blocking,
    middleware_layer::client::ClientScope,
    models::session::{SessionRecord, SessionStatus},
    state::AppState,
    validation::wallet::{validate_duration_ms, validate_wallet_address},
};

/// The request payload for connecting a wallet.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub wallet_address: String,
    /// Overrides the configured session lifetime.
    pub expiry_ms: Option<u64>,
}

/// The request payload for extending a session.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ExtendRequest {
    pub additional_ms: u64,
}

/// Query parameters for ending a session.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClearQuery {
    #[serde(default)]
    pub keep_preferences: bool,
}

/// Handles a wallet connection: reuses the current session for the same
/// wallet or starts a new one.
#[axum::debug_handler]
pub async fn connect(
    State(state): State<AppState>,
    Extension(scope): Extension<ClientScope>,
    Json(payload): Json<ConnectRequest>,
) -> Result<Json<SessionRecord>> {
    tracing::info!("🔌 Connect attempt for client {} - wallet: {}", scope, payload.wallet_address);
    validate_wallet_address(&payload.wallet_address)?;

    let expiry_ms = payload.expiry_ms.unwrap_or(state.config.session_expiry_ms);
    validate_duration_ms("expiryMs", expiry_ms)?;

    let sessions = state.sessions(&scope);
    let record = run_blocking(move || sessions.ensure_session(&payload.wallet_address, expiry_ms)).await?;

    Ok(Json(record))
}

/// Returns the session together with its remaining time.
#[axum::debug_handler]
pub async fn status(
    State(state): State<AppState>,
    Extension(scope): Extension<ClientScope>,
) -> Result<Json<SessionStatus>> {
    let sessions = state.sessions(&scope);
    let threshold = state.config.session_warning_ms;
    let status = run_blocking(move || Ok(sessions.status(threshold))).await?;

    Ok(Json(status))
}

/// Records user activity on the current session.
#[axum::debug_handler]
pub async fn touch(
    State(state): State<AppState>,
    Extension(scope): Extension<ClientScope>,
) -> Result<StatusCode> {
    let sessions = state.sessions(&scope);
    run_blocking(move || {
        sessions.update_last_activity();
        Ok(())
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Extends the current session.
#[axum::debug_handler]
pub async fn extend(
    State(state): State<AppState>,
    Extension(scope): Extension<ClientScope>,
    Json(payload): Json<ExtendRequest>,
) -> Result<Json<SessionRecord>> {
    validate_duration_ms("additionalMs", payload.additional_ms)?;

    let sessions = state.sessions(&scope);
    let record = run_blocking(move || Ok(sessions.extend_session(payload.additional_ms)))
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(record))
}

/// Ends the session and drops the stored credential.
#[axum::debug_handler]
pub async fn disconnect(
    State(state): State<AppState>,
    Extension(scope): Extension<ClientScope>,
    Query(query): Query<ClearQuery>,
) -> Result<StatusCode> {
    tracing::info!("👋 Disconnect for client {}", scope);

    let sessions = state.sessions(&scope);
    run_blocking(move || {
        sessions.clear_all_session_data(query.keep_preferences);
        Ok(())
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
