//! Background Tasks Module
//!
//! Contains tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - TTL Sweep: Removes stale cache entries once per cache interval

mod sweep;

pub(crate) use sweep::spawn_sweep_task;
