use std::sync::Arc;

use super::KeyValueStore;
use crate::error::Result;

/// A view of a shared store where every key is prefixed with a namespace.
///
/// One namespace plays the role of one browser's local storage.
#[derive(Clone)]
pub struct ScopedStore {
    inner: Arc<dyn KeyValueStore>,
    scope: String,
}

impl ScopedStore {
    pub fn new(inner: Arc<dyn KeyValueStore>, scope: impl Into<String>) -> Self {
        Self {
            inner,
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    fn scoped_key(&self, key: &str) -> String {
        format!("client:{}:{}", self.scope, key)
    }
}

impl KeyValueStore for ScopedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(&self.scoped_key(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(&self.scoped_key(key), value)
    }

    fn set_with_ttl(&self, key: &str, value: &str, ttl_ms: u64) -> Result<()> {
        self.inner.set_with_ttl(&self.scoped_key(key), value, ttl_ms)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(&self.scoped_key(key))
    }
}
