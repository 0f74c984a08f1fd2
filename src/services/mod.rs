//! Data-access services
//!
//! Each service owns the typed caches for one resource family and exposes
//! cached reads plus the mutations that invalidate them. Invalidation always
//! goes through the shared [`CacheRegistry`] so a prefix reaches every
//! family that uses it, and only runs after the backend confirmed the write.

mod course;
mod user;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub use course::CourseService;
pub use user::UserService;

use crate::cache::{with_cache, CacheOptions, CachedCall, SharedCache};
use crate::error::ApiError;

pub(crate) type FetchFuture<V> = Pin<Box<dyn Future<Output = Result<V, ApiError>> + Send>>;
pub(crate) type BoxedFetch<A, V> = Box<dyn Fn(A) -> FetchFuture<V> + Send + Sync>;
pub(crate) type KeyFn<A> = fn(&A) -> String;

/// A backend read memoized under keys derived from `A`.
pub(crate) type CachedFetch<A, V> = CachedCall<V, BoxedFetch<A, V>, KeyFn<A>>;

pub(crate) fn cached_fetch<A, V, F, Fut>(
    cache: SharedCache<V>,
    fetch: F,
    key_fn: KeyFn<A>,
    ttl: Duration,
) -> CachedFetch<A, V>
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, ApiError>> + Send + 'static,
{
    let fetch: BoxedFetch<A, V> = Box::new(move |args| Box::pin(fetch(args)));
    with_cache(cache, fetch, key_fn, CacheOptions::ttl(ttl))
}

/// Joins key parts with `_`, collapsing the runs left by empty parts.
///
/// `["courses_list", "", "status_draft", ""]` becomes
/// `courses_list_status_draft_`.
pub(crate) fn join_key(parts: &[&str]) -> String {
    let joined = parts.join("_");
    let mut key = String::with_capacity(joined.len());
    for c in joined.chars() {
        if c == '_' && key.ends_with('_') {
            continue;
        }
        key.push(c);
    }
    key
}

/// `name_value` when the value is present and non-empty, else "".
pub(crate) fn key_part<T: ToString>(name: &str, value: Option<T>) -> String {
    match value.map(|v| v.to_string()) {
        Some(v) if !v.is_empty() => format!("{name}_{v}"),
        _ => String::new(),
    }
}

/// Paging values of zero mean "not set" for key purposes.
pub(crate) fn nonzero(value: Option<u32>) -> Option<u32> {
    value.filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_key_collapses_empty_parts() {
        assert_eq!(join_key(&["courses_list", "", "", "", ""]), "courses_list_");
        assert_eq!(
            join_key(&["courses_list", "", "status_draft", ""]),
            "courses_list_status_draft_"
        );
        assert_eq!(join_key(&["a", "b"]), "a_b");
    }

    #[test]
    fn test_key_part_skips_empty() {
        assert_eq!(key_part("skip", Some(20)), "skip_20");
        assert_eq!(key_part("skip", nonzero(Some(0))), "");
        assert_eq!(key_part::<u32>("skip", None), "");
        assert_eq!(key_part("search", Some("")), "");
        assert_eq!(key_part("search", Some("0")), "search_0");
    }
}
