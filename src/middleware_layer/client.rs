use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::{cookie::time::Duration, cookie::SameSite, Cookie, Cookies};
use uuid::Uuid;

use crate::state::AppState;
use crate::storage::CLIENT_RETENTION;

/// Name of the cookie carrying the client namespace.
pub const CLIENT_COOKIE: &str = "lazorkey_client";


/// The storage namespace of the calling client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientScope(pub Uuid);

impl std::fmt::Display for ClientScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Extracts the client id from the request cookies.
fn extract_client_id(cookies: &Cookies) -> Option<Uuid> {
    cookies
        .get(CLIENT_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

fn client_cookie(client_id: Uuid, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(CLIENT_COOKIE, client_id.to_string());
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(Duration::seconds(CLIENT_RETENTION.as_secs() as i64));
    cookie.set_path("/");
    cookie
}

/// A middleware that resolves the caller's namespace, issuing a new client
/// cookie on first contact.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
pub async fn assign_client(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let client_id = match extract_client_id(&cookies) {
        Some(id) => {
            tracing::debug!("🔑 Found client id: {}", id);
            id
        }
        None => {
            let id = Uuid::new_v4();
            cookies.add(client_cookie(id, state.config.secure_cookies));
            tracing::info!("🆕 Issued client id: {}", id);
            id
        }
    };

    request.extensions_mut().insert(ClientScope(client_id));

    next.run(request).await
}
