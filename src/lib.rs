//! LMS Gateway - a caching backend-for-frontend for an LMS REST API
//!
//! Memoizes backend reads in per-family TTL caches, invalidates them by key
//! prefix after successful writes, and sweeps expired entries in the
//! background.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_sweep_task;
