use std::sync::Arc;

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::session::{SessionRecord, SessionStatus};
use crate::storage::{KeyValueStore, CREDENTIAL_KEY, PREFERENCES_KEY, SESSION_KEY};

/// Persistent, lazily-expiring wallet session.
///
/// Expiry is only checked when the record is read; nothing runs in the
/// background. Missing, expired and corrupt records all read as "no session".
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Creates a new `SessionStore`.
    ///
    /// # Arguments
    ///
    /// * `store` - Where the session record lives.
    /// * `clock` - The time source for expiry decisions.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Writes a fresh session for `wallet_address`, replacing any existing one.
    ///
    /// # Arguments
    ///
    /// * `wallet_address` - The connected wallet.
    /// * `expiry_ms` - Lifetime of the session in milliseconds. Must be positive.
    ///
    /// # Returns
    ///
    /// A `Result` containing the stored `SessionRecord`.
    pub fn create_session(&self, wallet_address: &str, expiry_ms: u64) -> Result<SessionRecord> {
        if wallet_address.trim().is_empty() {
            return Err(AppError::Validation("Wallet address cannot be empty".to_string()));
        }
        if expiry_ms == 0 {
            return Err(AppError::Validation("Session expiry must be positive".to_string()));
        }

        let now = self.clock.now_ms();
        let record = SessionRecord::new(wallet_address, now, to_millis(expiry_ms));
        self.write(&record)?;

        tracing::info!(
            "✅ Session created for {} (expires at {})",
            record.wallet_address,
            record.expires_at
        );
        Ok(record)
    }

    /// Reuses a valid session for the same wallet, otherwise creates one.
    ///
    /// A reused session gets its activity timestamp refreshed; its expiry is
    /// left alone.
    pub fn ensure_session(&self, wallet_address: &str, expiry_ms: u64) -> Result<SessionRecord> {
        if let Some(mut existing) = self.get_session() {
            if existing.wallet_address == wallet_address {
                existing.last_activity = self.clock.now_ms().max(existing.last_activity);
                self.write(&existing)?;
                tracing::debug!("🔁 Reusing session for {}", wallet_address);
                return Ok(existing);
            }
            tracing::info!(
                "🔄 Wallet changed from {} to {}, replacing session",
                existing.wallet_address,
                wallet_address
            );
        }

        self.create_session(wallet_address, expiry_ms)
    }

    /// Returns the current session, or `None` if absent, expired or unreadable.
    ///
    /// An expired or corrupt record is deleted as a side effect.
    pub fn get_session(&self) -> Option<SessionRecord> {
        let raw = match self.store.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("⚠️  Session read failed, treating as absent: {}", e);
                return None;
            }
        };

        let record: SessionRecord = match sonic_rs::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("⚠️  Corrupt session record discarded: {}", e);
                self.discard();
                return None;
            }
        };

        if !record.is_valid_at(self.clock.now_ms()) {
            tracing::info!("⌛ Session expired for {}", record.wallet_address);
            self.discard();
            return None;
        }

        Some(record)
    }

    /// Marks activity now. Does not move the expiry. No-op without a session.
    pub fn update_last_activity(&self) {
        let Some(mut record) = self.get_session() else {
            return;
        };

        record.last_activity = self.clock.now_ms().max(record.last_activity);
        if let Err(e) = self.write(&record) {
            tracing::warn!("⚠️  Failed to record session activity: {}", e);
        }
    }

    /// Pushes the expiry back by `additional_ms`.
    ///
    /// # Returns
    ///
    /// The updated record, or `None` if there is no session (or it could not
    /// be written back).
    pub fn extend_session(&self, additional_ms: u64) -> Option<SessionRecord> {
        let mut record = self.get_session()?;
        record.expires_at = record.expires_at.saturating_add(to_millis(additional_ms));

        match self.write(&record) {
            Ok(()) => {
                tracing::info!(
                    "⏩ Session for {} extended to {}",
                    record.wallet_address,
                    record.expires_at
                );
                Some(record)
            }
            Err(e) => {
                tracing::warn!("⚠️  Failed to extend session: {}", e);
                None
            }
        }
    }

    /// Deletes the session record.
    pub fn clear_session(&self) {
        self.discard();
        tracing::info!("👋 Session cleared");
    }

    /// Deletes the session record and the stored credential, plus the
    /// preferences unless `keep_preferences` is set.
    pub fn clear_all_session_data(&self, keep_preferences: bool) {
        self.discard();
        self.remove_quietly(CREDENTIAL_KEY);
        if !keep_preferences {
            self.remove_quietly(PREFERENCES_KEY);
        }
        tracing::info!("🧹 Session data cleared (preferences kept: {})", keep_preferences);
    }

    pub fn has_valid_session(&self) -> bool {
        self.get_session().is_some()
    }

    /// Milliseconds until expiry, `0` without a valid session.
    pub fn get_session_time_remaining(&self) -> i64 {
        self.get_session()
            .map(|record| record.remaining_at(self.clock.now_ms()))
            .unwrap_or(0)
    }

    /// True when some time remains but less than `threshold_ms`.
    pub fn is_session_expiring_soon(&self, threshold_ms: u64) -> bool {
        expiring_soon(self.get_session_time_remaining(), threshold_ms)
    }

    /// All derived queries answered from a single read of the record.
    pub fn status(&self, threshold_ms: u64) -> SessionStatus {
        let session = self.get_session();
        let remaining_ms = session
            .as_ref()
            .map(|record| record.remaining_at(self.clock.now_ms()))
            .unwrap_or(0);

        SessionStatus {
            valid: session.is_some(),
            remaining_ms,
            expiring_soon: expiring_soon(remaining_ms, threshold_ms),
            session,
        }
    }

    /// Persists `record`; the backend may drop it once it has expired.
    fn write(&self, record: &SessionRecord) -> Result<()> {
        let json = sonic_rs::to_string(record)?;
        let ttl_ms = u64::try_from(record.remaining_at(self.clock.now_ms())).unwrap_or(0).max(1);
        self.store.set_with_ttl(SESSION_KEY, &json, ttl_ms)
    }

    fn discard(&self) {
        self.remove_quietly(SESSION_KEY);
    }

    fn remove_quietly(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!("⚠️  Failed to remove {}: {}", key, e);
        }
    }
}

fn to_millis(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}

fn expiring_soon(remaining_ms: i64, threshold_ms: u64) -> bool {
    remaining_ms > 0 && remaining_ms < to_millis(threshold_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;

    /// A backend that is down: every call fails.
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(AppError::Storage("backend unavailable".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(AppError::Storage("backend unavailable".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(AppError::Storage("backend unavailable".to_string()))
        }
    }

    /// Remembers the TTL hint of every write.
    #[derive(Default)]
    struct TtlRecordingStore {
        inner: MemoryStore,
        ttls: Mutex<Vec<u64>>,
    }

    impl KeyValueStore for TtlRecordingStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value)
        }

        fn set_with_ttl(&self, key: &str, value: &str, ttl_ms: u64) -> Result<()> {
            self.ttls.lock().unwrap().push(ttl_ms);
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    fn setup() -> (SessionStore, Arc<MemoryStore>, ManualClock) {
        let store = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(1_700_000_000_000);
        let sessions = SessionStore::new(store.clone(), Arc::new(clock.clone()));
        (sessions, store, clock)
    }

    #[test]
    fn create_rejects_empty_address_and_zero_expiry() {
        let (sessions, _, _) = setup();
        assert!(matches!(sessions.create_session("", 1_000), Err(AppError::Validation(_))));
        assert!(matches!(sessions.create_session("Addr123", 0), Err(AppError::Validation(_))));
        assert!(!sessions.has_valid_session());
    }

    #[test]
    fn corrupt_record_reads_as_absent_and_is_removed() {
        let (sessions, store, _) = setup();
        store.set(SESSION_KEY, "{not json").unwrap();

        assert_eq!(sessions.get_session(), None);
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn expired_record_is_deleted_on_read() {
        let (sessions, store, clock) = setup();
        sessions.create_session("Addr123", 1_000).unwrap();
        clock.advance(1_000);

        assert_eq!(sessions.get_session(), None);
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn update_last_activity_keeps_expiry() {
        let (sessions, _, clock) = setup();
        let created = sessions.create_session("Addr123", 10_000).unwrap();
        clock.advance(2_500);

        sessions.update_last_activity();
        let updated = sessions.get_session().unwrap();
        assert_eq!(updated.last_activity, created.created_at + 2_500);
        assert_eq!(updated.expires_at, created.expires_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn update_last_activity_without_session_is_noop() {
        let (sessions, store, _) = setup();
        sessions.update_last_activity();
        assert!(store.is_empty());
    }

    #[test]
    fn extend_without_session_returns_none() {
        let (sessions, _, _) = setup();
        assert_eq!(sessions.extend_session(5_000), None);
    }

    #[test]
    fn ensure_session_reuses_matching_wallet() {
        let (sessions, _, clock) = setup();
        let first = sessions.ensure_session("Addr123", 10_000).unwrap();
        clock.advance(1_000);

        let second = sessions.ensure_session("Addr123", 99_000).unwrap();
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.expires_at, first.expires_at);
        assert_eq!(second.last_activity, first.created_at + 1_000);
    }

    #[test]
    fn ensure_session_replaces_other_wallet() {
        let (sessions, _, clock) = setup();
        sessions.ensure_session("Addr123", 10_000).unwrap();
        clock.advance(1_000);

        let replaced = sessions.ensure_session("Other456", 20_000).unwrap();
        assert_eq!(replaced.wallet_address, "Other456");
        assert_eq!(replaced.expires_at, replaced.created_at + 20_000);
    }

    #[test]
    fn status_reports_from_one_read() {
        let (sessions, _, clock) = setup();
        assert_eq!(
            sessions.status(300_000),
            SessionStatus { session: None, valid: false, remaining_ms: 0, expiring_soon: false }
        );

        sessions.create_session("Addr123", 600_000).unwrap();
        clock.advance(400_000);
        let status = sessions.status(300_000);
        assert!(status.valid);
        assert_eq!(status.remaining_ms, 200_000);
        assert!(status.expiring_soon);
    }

    #[test]
    fn clear_all_respects_keep_preferences() {
        let (sessions, store, _) = setup();
        sessions.create_session("Addr123", 10_000).unwrap();
        store.set(PREFERENCES_KEY, "{}").unwrap();
        store.set(CREDENTIAL_KEY, "payload").unwrap();

        sessions.clear_all_session_data(true);
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
        assert_eq!(store.get(CREDENTIAL_KEY).unwrap(), None);
        assert_eq!(store.get(PREFERENCES_KEY).unwrap().as_deref(), Some("{}"));

        sessions.clear_all_session_data(false);
        assert!(store.is_empty());
    }

    #[test]
    fn unavailable_store_degrades_to_no_session() {
        let sessions = SessionStore::new(Arc::new(FailingStore), Arc::new(ManualClock::new(0)));

        assert!(matches!(sessions.create_session("Addr123", 1_000), Err(AppError::Storage(_))));
        assert!(matches!(sessions.ensure_session("Addr123", 1_000), Err(AppError::Storage(_))));
        assert_eq!(sessions.get_session(), None);
        assert!(!sessions.has_valid_session());
        assert_eq!(sessions.get_session_time_remaining(), 0);
        assert!(!sessions.is_session_expiring_soon(300_000));
        assert_eq!(sessions.extend_session(5_000), None);
        assert!(!sessions.status(300_000).valid);

        sessions.update_last_activity();
        sessions.clear_session();
        sessions.clear_all_session_data(false);
    }

    #[test]
    fn writes_carry_the_remaining_lifetime() {
        let store = Arc::new(TtlRecordingStore::default());
        let clock = ManualClock::new(1_700_000_000_000);
        let sessions = SessionStore::new(store.clone(), Arc::new(clock.clone()));

        sessions.create_session("Addr123", 10_000).unwrap();
        clock.advance(4_000);
        sessions.update_last_activity();
        sessions.extend_session(5_000).unwrap();

        assert_eq!(*store.ttls.lock().unwrap(), vec![10_000, 6_000, 11_000]);
    }
}
