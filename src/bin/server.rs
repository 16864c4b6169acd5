use std::net::SocketAddr;

use clap::Parser;
use sysstream::{
    actors::{broadcaster::BroadcasterHandle, hub::HubHandle},
    config,
    monitors::SystemMonitor,
    server,
};
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Port to listen on (falls back to the PORT environment variable)
    #[arg(short, long)]
    port: Option<u16>,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("sysstream", LevelFilter::TRACE),
        ("sysstream_server", LevelFilter::TRACE),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let hub = HubHandle::spawn();
    let broadcaster = BroadcasterHandle::spawn(SystemMonitor::new(), hub.clone());

    let port = args.port.unwrap_or_else(config::get_port);
    let bind_addr = SocketAddr::from((config::get_addr(), port));
    let addr = server::spawn_server(bind_addr, hub.clone()).await?;

    info!("streaming system stats on ws://{addr}/ws");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    broadcaster.shutdown().await.ok();
    hub.shutdown().await.ok();

    Ok(())
}
