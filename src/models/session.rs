use serde::{Deserialize, Serialize};

/// Represents one connected wallet session.
///
/// All timestamps are milliseconds since the Unix epoch. Stored as JSON with
/// camelCase keys (`walletAddress`, `createdAt`, `expiresAt`, `lastActivity`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// The address of the connected wallet.
    pub wallet_address: String,
    /// When the session was created.
    pub created_at: i64,
    /// When the session stops being valid.
    pub expires_at: i64,
    /// The last time activity was recorded.
    pub last_activity: i64,
}

impl SessionRecord {
    /// Creates a record starting at `now` that lasts `expiry_ms`.
    pub fn new(wallet_address: impl Into<String>, now: i64, expiry_ms: i64) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            created_at: now,
            expires_at: now.saturating_add(expiry_ms),
            last_activity: now,
        }
    }

    /// A record is valid strictly before its expiry instant.
    pub fn is_valid_at(&self, now: i64) -> bool {
        now < self.expires_at
    }

    /// Milliseconds left before expiry, never negative.
    pub fn remaining_at(&self, now: i64) -> i64 {
        (self.expires_at - now).max(0)
    }
}

/// Snapshot of the session and its derived queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub session: Option<SessionRecord>,
    pub valid: bool,
    pub remaining_ms: i64,
    pub expiring_soon: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let record = SessionRecord::new("Addr123", 1_000, 500);
        let json = sonic_rs::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"walletAddress":"Addr123","createdAt":1000,"expiresAt":1500,"lastActivity":1000}"#
        );
    }

    #[test]
    fn validity_boundary_is_exclusive() {
        let record = SessionRecord::new("Addr123", 0, 1_000);
        assert!(record.is_valid_at(999));
        assert!(!record.is_valid_at(1_000));
        assert_eq!(record.remaining_at(1_200), 0);
        assert_eq!(record.remaining_at(400), 600);
    }
}
