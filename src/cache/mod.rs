//! Cache Module
//!
//! In-memory response caching with TTL expiration, prefix invalidation and
//! memoized async calls.

mod cached;
mod entry;
mod registry;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use cached::{with_cache, CacheOptions, CachedCall};
pub use entry::CacheEntry;
pub use registry::{CacheRegistry, Invalidate, NamedStats};
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default TTL in seconds for entries stored without an explicit TTL
pub const DEFAULT_TTL_SECS: u64 = 5 * 60;
