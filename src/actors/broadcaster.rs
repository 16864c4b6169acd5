//! BroadcasterActor - samples host stats and fans them out at a fixed cadence
//!
//! The broadcaster drives the streaming side of the system. Every tick it asks
//! the sampler for a fresh snapshot, serializes it exactly once, and hands the
//! envelope to the hub. The loop runs whether or not anyone is connected.
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → sample() → serialize once → Hub broadcast → [client queues]
//!     ↑
//!     └─── Commands (SampleNow, Shutdown)
//! ```
//!
//! A failed sample is skipped entirely - no partial or stale envelope goes
//! out - and the next attempt waits the longer retry interval instead of the
//! tick interval.

use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::ws::Message;
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tracing::{debug, instrument, trace, warn};

use crate::config::{RETRY_INTERVAL, TICK_INTERVAL};
use crate::monitors::Sampler;

use super::hub::HubHandle;
use super::messages::BroadcasterCommand;

/// Actor that periodically samples the host and broadcasts the result
pub struct BroadcasterActor<S: Sampler> {
    /// Source of resource snapshots
    sampler: S,

    /// Hub performing the fan-out
    hub: HubHandle,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<BroadcasterCommand>,

    /// Steady-state delay between ticks
    tick_interval: Duration,

    /// Delay after a failed sample
    retry_interval: Duration,
}

impl<S: Sampler> BroadcasterActor<S> {
    pub fn new(sampler: S, hub: HubHandle, command_rx: mpsc::Receiver<BroadcasterCommand>) -> Self {
        Self {
            sampler,
            hub,
            command_rx,
            tick_interval: TICK_INTERVAL,
            retry_interval: RETRY_INTERVAL,
        }
    }

    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command is received or the hub goes away.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting broadcaster actor");

        let mut delay = self.tick_interval;

        loop {
            tokio::select! {
                // Timer tick - sample and broadcast
                _ = sleep(delay) => {
                    delay = match self.sample_and_publish().await {
                        Ok(delivered) => {
                            trace!(delivered, "tick broadcast");
                            self.tick_interval
                        }
                        Err(e) if self.hub.is_closed() => {
                            warn!("hub is gone, stopping broadcasts: {e:#}");
                            break;
                        }
                        Err(e) => {
                            warn!("skipping tick: {e:#}");
                            self.retry_interval
                        }
                    };
                }

                // Handle commands
                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        BroadcasterCommand::SampleNow { respond_to } => {
                            debug!("received SampleNow command");
                            let result = self.sample_and_publish().await;
                            let _ = respond_to.send(result);
                        }

                        BroadcasterCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                // Command channel closed - exit
                else => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!("broadcaster actor stopped");
    }

    /// Take one snapshot, serialize it once, and hand it to the hub.
    ///
    /// Returns the number of clients the envelope was queued for.
    async fn sample_and_publish(&mut self) -> Result<usize> {
        let stats = self
            .sampler
            .sample()
            .await
            .context("failed to collect stats")?;

        let envelope = serde_json::to_string(&stats).context("failed to serialize stats")?;

        self.hub.broadcast(Message::Text(envelope)).await
    }
}

/// Handle for controlling a BroadcasterActor
///
/// This handle provides a typed API for sending commands to the actor.
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct BroadcasterHandle {
    /// Command sender
    sender: mpsc::Sender<BroadcasterCommand>,
}

impl BroadcasterHandle {
    /// Spawn a new broadcaster actor
    ///
    /// This creates the actor, spawns it as a tokio task, and returns a handle.
    pub fn spawn<S>(sampler: S, hub: HubHandle) -> Self
    where
        S: Sampler + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);

        let actor = BroadcasterActor::new(sampler, hub, cmd_rx);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Trigger an immediate sample-and-broadcast
    ///
    /// This bypasses the interval timer. Returns the number of clients the
    /// snapshot reached. Useful for testing and manual refresh operations.
    pub async fn sample_now(&self) -> Result<usize> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(BroadcasterCommand::SampleNow { respond_to: tx })
            .await
            .context("failed to send SampleNow command")?;

        rx.await.context("failed to receive response")?
    }

    /// Gracefully shut down the broadcaster
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(BroadcasterCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")
    }
}
