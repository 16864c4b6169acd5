use std::net::Ipv4Addr;
use std::time::Duration;

const SERVER_PORT: &str = "PORT";

const DEFAULT_PORT: u16 = 8080;

pub fn get_port() -> u16 {
    let port_from_env = std::env::var(SERVER_PORT);
    port_from_env.map_or(DEFAULT_PORT, |res| res.parse().unwrap_or(DEFAULT_PORT))
}

const SERVER_ADDR: &str = "ADDR";

const DEFAULT_ADDR: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

pub fn get_addr() -> Ipv4Addr {
    let addr_from_env = std::env::var(SERVER_ADDR);
    addr_from_env.map_or(DEFAULT_ADDR, |res| res.parse().unwrap_or(DEFAULT_ADDR))
}

/// Steady-state delay between two sampling ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Delay before the next attempt after a failed sample. Longer than
/// [`TICK_INTERVAL`] so a persistently failing collector is not hot-looped.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(2);
