use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use http::header::{HeaderMap, USER_AGENT};

use crate::crypto::kdf::DeviceFingerprint;

/// Client hint carrying the platform name, e.g. `"macOS"` (quoted).
pub const PLATFORM_HEADER: &str = "sec-ch-ua-platform";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// Builds the device fingerprint of the calling browser from its headers.
pub fn fingerprint_from_headers(headers: &HeaderMap) -> DeviceFingerprint {
    let user_agent = header_str(headers, USER_AGENT.as_str());
    let platform = header_str(headers, PLATFORM_HEADER).trim().trim_matches('"');
    DeviceFingerprint::new(user_agent, platform)
}

impl<S> FromRequestParts<S> for DeviceFingerprint
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(fingerprint_from_headers(&parts.headers))
    }
}
