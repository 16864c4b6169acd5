pub mod actors;
pub mod config;
pub mod monitors;
pub mod server;

use serde::{Deserialize, Serialize};

/// One resource-utilization snapshot, produced fresh on every sampling tick.
///
/// All three values are percentages in `[0, 100]`. The serialized form of this
/// struct is the wire payload: a flat JSON object with exactly these three
/// fields, sent as one WebSocket text message per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
}
