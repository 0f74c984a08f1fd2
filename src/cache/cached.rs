//! Cached Calls
//!
//! Wraps an async fetch so that calls deriving the same key are served from
//! a [`SharedCache`] until the entry expires.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::cache::SharedCache;

/// Per-call-site cache options.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheOptions {
    /// TTL for entries written by this call site; `None` uses the cache default
    pub ttl: Option<Duration>,
}

impl CacheOptions {
    pub fn ttl(ttl: Duration) -> Self {
        Self { ttl: Some(ttl) }
    }
}

// == Cached Call ==
/// An async fetch function memoized through a shared cache.
///
/// `fetch` takes the call arguments by value; `key_fn` derives the cache key
/// from a borrow of the same arguments and must be deterministic.
///
/// Concurrent misses on one key are not coalesced: each runs `fetch` and the
/// last one to finish owns the entry.
pub struct CachedCall<V, F, K> {
    cache: SharedCache<V>,
    fetch: F,
    key_fn: K,
    options: CacheOptions,
}

impl<V, F, K> fmt::Debug for CachedCall<V, F, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedCall")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Builds a [`CachedCall`].
pub fn with_cache<V, F, K>(
    cache: SharedCache<V>,
    fetch: F,
    key_fn: K,
    options: CacheOptions,
) -> CachedCall<V, F, K> {
    CachedCall {
        cache,
        fetch,
        key_fn,
        options,
    }
}

impl<V, F, K> CachedCall<V, F, K>
where
    V: Clone,
{
    pub fn cache(&self) -> &SharedCache<V> {
        &self.cache
    }

    /// Returns the cached value for `args`, or runs the fetch and caches its
    /// result. Errors pass through unchanged and leave the cache untouched.
    pub async fn call<A, Fut, E>(&self, args: A) -> Result<V, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<V, E>>,
        K: Fn(&A) -> String,
    {
        let key = (self.key_fn)(&args);

        if let Some(value) = self.cache.get(&key) {
            debug!(cache = self.cache.name(), %key, "Cache hit");
            return Ok(value);
        }
        debug!(cache = self.cache.name(), %key, "Cache miss, fetching");

        match (self.fetch)(args).await {
            Ok(value) => {
                self.cache.set(key, value.clone(), self.options.ttl);
                Ok(value)
            }
            Err(err) => {
                debug!(cache = self.cache.name(), %key, "Fetch failed, nothing cached");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_fetch(
        calls: Arc<AtomicUsize>,
    ) -> impl Fn(u32) -> std::future::Ready<Result<String, String>> {
        move |id| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(Ok(format!("item {id} fetch {n}")))
        }
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = SharedCache::new("items", Duration::from_secs(60));
        let cached = with_cache(
            cache.clone(),
            counting_fetch(calls.clone()),
            |id: &u32| format!("item_{id}"),
            CacheOptions::default(),
        );

        let first = cached.call(7).await.unwrap();
        let second = cached.call(7).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(cache.get("item_7").as_deref(), Some("item 7 fetch 1"));
    }

    #[tokio::test]
    async fn test_distinct_keys_fetch_separately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cached = with_cache(
            SharedCache::new("items", Duration::from_secs(60)),
            counting_fetch(calls.clone()),
            |id: &u32| format!("item_{id}"),
            CacheOptions::default(),
        );

        cached.call(1).await.unwrap();
        cached.call(2).await.unwrap();
        cached.call(1).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_leaves_no_entry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let cached = with_cache(
            SharedCache::<String>::new("items", Duration::from_secs(60)),
            move |_: ()| {
                counter.fetch_add(1, Ordering::SeqCst);
                std::future::ready(Err::<String, _>("backend down"))
            },
            |_: &()| "flaky".to_string(),
            CacheOptions::default(),
        );

        let err = tokio_test::assert_err!(cached.call(()).await);
        assert_eq!(err, "backend down");
        assert!(cached.cache().get("flaky").is_none());

        // No negative caching: the next call retries
        tokio_test::assert_err!(cached.call(()).await);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ttl_option_applies() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cached = with_cache(
            SharedCache::new("items", Duration::from_secs(60)),
            counting_fetch(calls.clone()),
            |id: &u32| format!("item_{id}"),
            CacheOptions::ttl(Duration::from_millis(30)),
        );

        cached.call(1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        let refreshed = cached.call(1).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(refreshed, "item 1 fetch 2");
    }

    #[tokio::test]
    async fn test_invalidation_forces_refetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cached = with_cache(
            SharedCache::new("items", Duration::from_secs(60)),
            counting_fetch(calls.clone()),
            |id: &u32| format!("item_{id}"),
            CacheOptions::default(),
        );

        cached.call(3).await.unwrap();
        cached.cache().delete_by_prefix("item_");
        cached.call(3).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_both_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let cached = with_cache(
            SharedCache::new("slow", Duration::from_secs(60)),
            move |_: ()| {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok::<usize, ()>(n)
                }
            },
            |_: &()| "slow".to_string(),
            CacheOptions::default(),
        );

        let (a, b) = tokio::join!(cached.call(()), cached.call(()));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_ne!(a.unwrap(), b.unwrap());
        assert_eq!(cached.cache().len(), 1);
    }
}
