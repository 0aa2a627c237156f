use std::env;
use std::net::SocketAddr;
use anyhow::{Context, Result};

use crate::validation::wallet::MAX_DURATION_MS;

/// Default session lifetime when a client does not ask for one.
pub const DEFAULT_SESSION_EXPIRY_HOURS: u64 = 24;
/// Default lead time for the "session expiring soon" warning.
pub const DEFAULT_SESSION_WARNING_MINUTES: u64 = 5;
/// Default number of client requests allowed in a burst.
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 30;
/// Default interval after which one more request is allowed.
pub const DEFAULT_RATE_LIMIT_REPLENISH_MS: u64 = 200;

const MS_PER_HOUR: u64 = 3600 * 1000;
const MS_PER_MINUTE: u64 = 60 * 1000;

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The socket address the HTTP host binds to.
    pub bind_addr: SocketAddr,
    /// The URL of the Redis server. `None` selects the in-memory store.
    pub redis_url: Option<String>,
    /// The lifetime of a new session in milliseconds.
    pub session_expiry_ms: u64,
    /// The remaining-time threshold below which a session is "expiring soon".
    pub session_warning_ms: u64,
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
    /// Whether cookies are marked `Secure`.
    pub secure_cookies: bool,
    /// Requests a single peer may send back to back on client routes.
    pub rate_limit_burst: u32,
    /// Milliseconds after which a peer earns one more request.
    pub rate_limit_replenish_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            redis_url: None,
            session_expiry_ms: DEFAULT_SESSION_EXPIRY_HOURS * MS_PER_HOUR,
            session_warning_ms: DEFAULT_SESSION_WARNING_MINUTES * MS_PER_MINUTE,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            secure_cookies: false,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
            rate_limit_replenish_ms: DEFAULT_RATE_LIMIT_REPLENISH_MS,
        }
    }
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(addr) => addr.parse::<SocketAddr>().context("BIND_ADDR must be a socket address")?,
            Err(_) => defaults.bind_addr,
        };

        let redis_url = env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty());

        let expiry_hours: u64 = env::var("SESSION_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_SESSION_EXPIRY_HOURS.to_string())
            .parse()
            .context("Invalid SESSION_EXPIRY_HOURS")?;

        if expiry_hours == 0 {
            anyhow::bail!("SESSION_EXPIRY_HOURS must be greater than zero");
        }
        let session_expiry_ms = duration_ms("SESSION_EXPIRY_HOURS", expiry_hours, MS_PER_HOUR)?;

        let warning_minutes: u64 = env::var("SESSION_WARNING_MINUTES")
            .unwrap_or_else(|_| DEFAULT_SESSION_WARNING_MINUTES.to_string())
            .parse()
            .context("Invalid SESSION_WARNING_MINUTES")?;
        let session_warning_ms = duration_ms("SESSION_WARNING_MINUTES", warning_minutes, MS_PER_MINUTE)?;

        let rate_limit_burst: u32 = env::var("RATE_LIMIT_BURST")
            .unwrap_or_else(|_| DEFAULT_RATE_LIMIT_BURST.to_string())
            .parse()
            .context("Invalid RATE_LIMIT_BURST")?;

        let rate_limit_replenish_ms: u64 = env::var("RATE_LIMIT_REPLENISH_MS")
            .unwrap_or_else(|_| DEFAULT_RATE_LIMIT_REPLENISH_MS.to_string())
            .parse()
            .context("Invalid RATE_LIMIT_REPLENISH_MS")?;

        if rate_limit_burst == 0 || rate_limit_replenish_ms == 0 {
            anyhow::bail!("RATE_LIMIT_BURST and RATE_LIMIT_REPLENISH_MS must be greater than zero");
        }

        let allowed_origins = match env::var("ALLOWED_ORIGINS") {
            Ok(raw) => parse_origins(&raw),
            Err(_) => defaults.allowed_origins,
        };

        let is_production = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string()) == "production";

        Ok(Self {
            bind_addr,
            redis_url,
            session_expiry_ms,
            session_warning_ms,
            allowed_origins,
            secure_cookies: is_production,
            rate_limit_burst,
            rate_limit_replenish_ms,
        })
    }
}

/// Converts `value` units of `unit_ms` into milliseconds, refusing anything
/// beyond the longest duration a request may ask for.
fn duration_ms(name: &str, value: u64, unit_ms: u64) -> Result<u64> {
    match value.checked_mul(unit_ms) {
        Some(ms) if ms <= MAX_DURATION_MS => Ok(ms),
        _ => anyhow::bail!(
            "{} must not exceed {} ms ({} given)",
            name,
            MAX_DURATION_MS,
            value
        ),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.session_expiry_ms, 86_400_000);
        assert_eq!(config.session_warning_ms, 300_000);
        assert!(config.redis_url.is_none());
        assert!(!config.secure_cookies);
    }

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        let origins = parse_origins(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn durations_are_capped_at_the_request_limit() {
        assert_eq!(duration_ms("SESSION_EXPIRY_HOURS", 24, MS_PER_HOUR).unwrap(), 86_400_000);
        assert_eq!(duration_ms("SESSION_EXPIRY_HOURS", 720, MS_PER_HOUR).unwrap(), MAX_DURATION_MS);
        assert!(duration_ms("SESSION_EXPIRY_HOURS", 744, MS_PER_HOUR).is_err());
        assert!(duration_ms("SESSION_WARNING_MINUTES", 43_201, MS_PER_MINUTE).is_err());
    }

    #[test]
    fn oversized_duration_is_an_error_not_a_panic() {
        let err = duration_ms("SESSION_EXPIRY_HOURS", 18_446_744_073_709_551, MS_PER_HOUR).unwrap_err();
        assert!(err.to_string().contains("SESSION_EXPIRY_HOURS"));
    }

    #[test]
    fn default_expiry_passes_request_validation() {
        let config = Config::default();
        assert!(crate::validation::wallet::validate_duration_ms("expiryMs", config.session_expiry_ms).is_ok());
    }
}
