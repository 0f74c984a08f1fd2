//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies that are not
//! passed straight through from the backend.

use serde::{Deserialize, Serialize};

use crate::cache::{CacheStats, NamedStats};

/// Plain acknowledgement, also the backend's shape for password changes
/// and mark-read calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for `GET /cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    /// Counters summed over every cache
    pub total: CacheStats,
    /// hits / (hits + misses) over every cache
    pub hit_rate: f64,
    /// Per-cache breakdown
    pub caches: Vec<NamedStats>,
}

impl CacheStatsResponse {
    pub fn new(caches: Vec<NamedStats>) -> Self {
        let mut total = CacheStats::new();
        for named in &caches {
            total.merge(&named.stats);
        }
        Self {
            hit_rate: total.hit_rate(),
            total,
            caches,
        }
    }
}

/// Response body for `POST /cache/invalidate`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub prefix: String,
    pub removed: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
