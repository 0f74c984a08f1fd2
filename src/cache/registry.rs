//! Cache Registry
//!
//! Each resource family gets its own typed cache. The registry ties them back
//! together for operations that cut across families: prefix invalidation,
//! clearing and the periodic sweep.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::CacheStats;

// == Invalidate ==
/// The type-erased subset of cache operations the registry needs.
pub trait Invalidate: Send + Sync {
    fn name(&self) -> &str;
    fn len(&self) -> usize;
    fn clear(&self);
    fn delete_by_prefix(&self, prefix: &str) -> usize;
    fn sweep_expired(&self) -> usize;
    fn stats(&self) -> CacheStats;
}

/// Stats for one registered cache.
#[derive(Debug, Clone, Serialize)]
pub struct NamedStats {
    pub name: String,
    #[serde(flatten)]
    pub stats: CacheStats,
}

// == Cache Registry ==
/// Cloneable list of every cache in the process.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    caches: Arc<RwLock<Vec<Arc<dyn Invalidate>>>>,
}

impl fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.each(|cache| cache.name().to_string());
        f.debug_struct("CacheRegistry").field("caches", &names).finish()
    }
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cache to the registry. Registering a clone of an already
    /// registered cache is harmless but counts its entries twice in totals.
    pub fn register<C>(&self, cache: C)
    where
        C: Invalidate + 'static,
    {
        debug!(cache = cache.name(), "Registering cache");
        self.caches.write().push(Arc::new(cache));
    }

    fn each<T>(&self, f: impl Fn(&dyn Invalidate) -> T) -> Vec<T> {
        self.caches
            .read()
            .iter()
            .map(|cache| f(cache.as_ref()))
            .collect()
    }

    // == Invalidate Prefix ==
    /// Removes every entry, in every cache, whose key starts with `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let removed: usize = self
            .each(|cache| cache.delete_by_prefix(prefix))
            .into_iter()
            .sum();
        info!(prefix, removed, "Invalidated cache entries by prefix");
        removed
    }

    // == Clear All ==
    pub fn clear_all(&self) {
        self.each(|cache| cache.clear());
        info!("Cleared all caches");
    }

    // == Sweep Expired ==
    /// Sweeps every cache, returning the total number of entries removed.
    pub fn sweep_expired(&self) -> usize {
        self.each(|cache| cache.sweep_expired()).into_iter().sum()
    }

    pub fn total_entries(&self) -> usize {
        self.each(|cache| cache.len()).into_iter().sum()
    }

    pub fn len(&self) -> usize {
        self.caches.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-cache statistics in registration order.
    pub fn stats(&self) -> Vec<NamedStats> {
        self.each(|cache| NamedStats {
            name: cache.name().to_string(),
            stats: cache.stats(),
        })
    }
}
