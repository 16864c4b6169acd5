//! sysinfo-backed sampling of CPU, memory and disk utilization

use std::path::Path;

use anyhow::{Result, bail};
use async_trait::async_trait;
use sysinfo::{Disks, System};

use super::Sampler;
use crate::SystemStats;

/// Samples resource utilization of the local host.
///
/// Keeps the `sysinfo` handles alive between samples; CPU usage is computed
/// from the delta since the previous refresh.
pub struct SystemMonitor {
    sys: System,
    disks: Disks,
}

impl SystemMonitor {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        // two refreshes spaced by the minimum interval, otherwise the first
        // CPU reading is always zero
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_all();

        Self {
            sys,
            disks: Disks::new_with_refreshed_list(),
        }
    }

    fn collect(&mut self) -> Result<SystemStats> {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();
        self.disks.refresh(true);

        if self.sys.cpus().is_empty() {
            bail!("no CPUs reported");
        }
        let cpu_usage = self.sys.global_cpu_usage() as f64;

        let total_memory = self.sys.total_memory();
        if total_memory == 0 {
            bail!("total memory reported as zero");
        }
        let memory_usage = self.sys.used_memory() as f64 / total_memory as f64 * 100.0;

        // usage of the root filesystem; hosts without a "/" mount (or inside
        // containers that hide it) fall back to the sum over all disks
        let (total, available) = match self
            .disks
            .iter()
            .find(|disk| disk.mount_point() == Path::new("/"))
        {
            Some(disk) => (disk.total_space(), disk.available_space()),
            None => self
                .disks
                .iter()
                .fold((0, 0), |(total, available), disk| {
                    (total + disk.total_space(), available + disk.available_space())
                }),
        };
        if total == 0 {
            bail!("no disk capacity visible");
        }
        let disk_usage = (total - available) as f64 / total as f64 * 100.0;

        Ok(SystemStats {
            cpu_usage,
            memory_usage,
            disk_usage,
        })
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sampler for SystemMonitor {
    async fn sample(&mut self) -> Result<SystemStats> {
        self.collect()
    }
}
