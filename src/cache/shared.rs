//! Shared Cache Handle
//!
//! Cloneable, thread-safe handle around a [`CacheStore`]. Every clone sees
//! the same entries.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cache::{CacheStats, CacheStore, Invalidate};

// == Shared Cache ==
/// A named, shareable cache of `V` values.
///
/// Locks are taken for the duration of a single store operation and never
/// held across an `.await`.
#[derive(Debug)]
pub struct SharedCache<V> {
    name: Arc<str>,
    inner: Arc<RwLock<CacheStore<V>>>,
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone> SharedCache<V> {
    /// Creates a new cache labelled `name` (used in logs and stats).
    pub fn new(name: impl Into<Arc<str>>, default_ttl: Duration) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(RwLock::new(CacheStore::new(default_ttl))),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheStore<V>> {
        self.inner.read()
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheStore<V>> {
        self.inner.write()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.write().get(key)
    }

    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.write().set(key, value, ttl);
    }

    #[cfg(test)]
    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    pub fn delete(&self, key: &str) -> bool {
        self.write().delete(key)
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn delete_by_prefix(&self, prefix: &str) -> usize {
        self.write().delete_by_prefix(prefix)
    }

    pub fn sweep_expired(&self) -> usize {
        self.write().sweep_expired()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.read().stats()
    }
}

impl<V> Invalidate for SharedCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        SharedCache::name(self)
    }

    fn len(&self) -> usize {
        SharedCache::len(self)
    }

    fn clear(&self) {
        SharedCache::clear(self);
    }

    fn delete_by_prefix(&self, prefix: &str) -> usize {
        SharedCache::delete_by_prefix(self, prefix)
    }

    fn sweep_expired(&self) -> usize {
        SharedCache::sweep_expired(self)
    }

    fn stats(&self) -> CacheStats {
        SharedCache::stats(self)
    }
}
