//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the caches.
//!
//! # Tasks
//! - TTL Sweep: Purges expired memory-cache entries at a configured interval

mod sweep;

pub use sweep::{spawn_sweep_task, SweepHandle};
