//! Background Tasks Module
//!
//! # Tasks
//! - Cache sweep: drops expired cache entries at a configured interval (opt-in)

mod sweep;

pub use sweep::{log_cache_stats, spawn_sweep_task};
