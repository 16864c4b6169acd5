//! Shared helpers for integration tests

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use sysstream::SystemStats;
use sysstream::actors::hub::HubHandle;
use sysstream::monitors::Sampler;

pub fn stats(cpu_usage: f64, memory_usage: f64, disk_usage: f64) -> SystemStats {
    SystemStats {
        cpu_usage,
        memory_usage,
        disk_usage,
    }
}

/// Sampler that always returns the same snapshot
pub struct FixedSampler(pub SystemStats);

#[async_trait]
impl Sampler for FixedSampler {
    async fn sample(&mut self) -> Result<SystemStats> {
        Ok(self.0)
    }
}

/// Poll the hub until it reports `expected` clients.
///
/// Registration happens on the connection task after the upgrade response, so
/// tests that just connected a client must wait for membership to settle.
pub async fn wait_for_clients(hub: &HubHandle, expected: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);

    loop {
        if hub.client_count().await.unwrap_or(0) == expected {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "hub never reached {expected} clients"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
