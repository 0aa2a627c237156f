use std::sync::Arc;

use crate::error::Result;
use crate::models::preferences::UserPreferences;
use crate::storage::{KeyValueStore, PREFERENCES_KEY};

/// Stores display preferences independently of the session.
#[derive(Clone)]
pub struct PreferencesStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferencesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the saved preferences, falling back to defaults when nothing
    /// readable is stored.
    pub fn load(&self) -> UserPreferences {
        match self.store.get(PREFERENCES_KEY) {
            Ok(Some(raw)) => sonic_rs::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("⚠️  Corrupt preferences ignored: {}", e);
                UserPreferences::default()
            }),
            Ok(None) => UserPreferences::default(),
            Err(e) => {
                tracing::warn!("⚠️  Preferences read failed, using defaults: {}", e);
                UserPreferences::default()
            }
        }
    }

    pub fn save(&self, preferences: &UserPreferences) -> Result<()> {
        let json = sonic_rs::to_string(preferences)?;
        self.store.set(PREFERENCES_KEY, &json)?;
        tracing::debug!("✅ Preferences saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(PREFERENCES_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preferences::Theme;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_when_missing_or_corrupt() {
        let store = Arc::new(MemoryStore::new());
        let prefs = PreferencesStore::new(store.clone());
        assert_eq!(prefs.load(), UserPreferences::default());

        store.set(PREFERENCES_KEY, "][").unwrap();
        assert_eq!(prefs.load(), UserPreferences::default());
    }

    #[test]
    fn save_load_clear() {
        let prefs = PreferencesStore::new(Arc::new(MemoryStore::new()));
        let custom = UserPreferences {
            theme: Theme::Dark,
            hide_balances: true,
            ..UserPreferences::default()
        };

        prefs.save(&custom).unwrap();
        assert_eq!(prefs.load(), custom);

        prefs.clear().unwrap();
        assert_eq!(prefs.load(), UserPreferences::default());
    }
}
