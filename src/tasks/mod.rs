//! Background Tasks Module
//!
//! Contains background tasks that run periodically during gateway operation.
//!
//! # Tasks
//! - Expired-entry sweep: drops cache entries nobody re-read after expiry

mod sweep;

pub use sweep::spawn_sweep_task;
