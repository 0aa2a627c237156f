use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use http::{header, HeaderValue, Method};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    error::{AppError, Result},
    handlers, middleware_layer,
    state::AppState,
};

/// Request bodies here are tiny JSON documents.
const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("⚠️  Ignoring invalid CORS origin {}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
            header::USER_AGENT,
            header::HeaderName::from_static(middleware_layer::fingerprint::PLATFORM_HEADER),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400))
}

/// Builds the full application router.
///
/// Client routes are rate limited per peer address, so the server must be
/// run with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn router(state: AppState) -> Result<Router> {
    let client_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(state.config.rate_limit_replenish_ms)
            .burst_size(state.config.rate_limit_burst)
            .use_headers()
            .finish()
            .ok_or_else(|| AppError::Internal("Rate limit must be positive".to_string()))?,
    );

    let client_routes = Router::new()
        .route(
            "/api/session",
            post(handlers::session::connect)
                .get(handlers::session::status)
                .delete(handlers::session::disconnect),
        )
        .route("/api/session/activity", post(handlers::session::touch))
        .route("/api/session/extend", post(handlers::session::extend))
        .route(
            "/api/preferences",
            get(handlers::preferences::get_preferences)
                .put(handlers::preferences::put_preferences)
                .delete(handlers::preferences::delete_preferences),
        )
        .route(
            "/api/credential",
            get(handlers::credential::get_credential)
                .put(handlers::credential::put_credential)
                .delete(handlers::credential::delete_credential),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::client::assign_client,
        ))
        .layer(GovernorLayer::new(client_governor_conf))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/errors/classify", post(handlers::errors::classify));

    let app = Router::new()
        .merge(client_routes)
        .merge(public_routes)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::default())
                        .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                        .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
                )
                .layer(CookieManagerLayer::new())
                .layer(cors_layer(&state.config.allowed_origins))
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        );

    Ok(app)
}
