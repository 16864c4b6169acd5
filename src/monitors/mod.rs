//! Host resource monitors
//!
//! The broadcaster only needs "give me one fresh snapshot"; this module
//! defines that seam and the sysinfo-backed implementation behind it.

pub mod system;

pub use system::SystemMonitor;

use anyhow::Result;
use async_trait::async_trait;

use crate::SystemStats;

/// Source of resource-utilization snapshots
///
/// A failed sample means "nothing to broadcast this tick" and must never be
/// treated as fatal by the caller.
#[async_trait]
pub trait Sampler: Send {
    /// Produce one fresh snapshot.
    async fn sample(&mut self) -> Result<SystemStats>;
}
