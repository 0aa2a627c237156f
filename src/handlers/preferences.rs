use axum::{extract::State, http::StatusCode, Extension, Json};

use crate::{
    error::Result,
    handlers::blocking::run_blocking,
    middleware_layer::client::ClientScope,
    models::preferences::UserPreferences,
    state::AppState,
};

#[axum::debug_handler]
pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(scope): Extension<ClientScope>,
) -> Result<Json<UserPreferences>> {
    let preferences = state.preferences(&scope);
    let loaded = run_blocking(move || Ok(preferences.load())).await?;
    Ok(Json(loaded))
}

#[axum::debug_handler]
pub async fn put_preferences(
    State(state): State<AppState>,
    Extension(scope): Extension<ClientScope>,
    Json(payload): Json<UserPreferences>,
) -> Result<Json<UserPreferences>> {
    let preferences = state.preferences(&scope);
    let saved = run_blocking(move || {
        preferences.save(&payload)?;
        Ok(payload)
    })
    .await?;

    Ok(Json(saved))
}

#[axum::debug_handler]
pub async fn delete_preferences(
    State(state): State<AppState>,
    Extension(scope): Extension<ClientScope>,
) -> Result<StatusCode> {
    let preferences = state.preferences(&scope);
    run_blocking(move || preferences.clear()).await?;
    Ok(StatusCode::NO_CONTENT)
}
