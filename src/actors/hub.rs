//! HubActor - owns the set of connected clients
//!
//! The hub is the single place where client membership changes. It runs as one
//! Tokio task consuming a command queue, so registrations, deregistrations and
//! broadcasts are strictly serialized: "currently connected" is well-defined
//! at every instant, and no send ever races a removal of the same client.
//!
//! ## Message Flow
//!
//! ```text
//! Register / Deregister (connection tasks) ─┐
//!                                           ├─▶ command queue ─▶ hub task ─▶ client queues
//! Broadcast (one per tick)  ────────────────┘
//! ```
//!
//! Fan-out never performs socket I/O. Each client is represented by a bounded
//! mpsc queue drained by its own writer task; the hub only `try_send`s into
//! those queues. A queue that is gone means the client's socket already failed,
//! a queue that is full means the client cannot keep up - both cases evict
//! exactly that client and leave the rest untouched.

use std::collections::HashMap;

use anyhow::{Context, Result};
use axum::extract::ws::Message;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, trace, warn};

use super::messages::{ClientId, HubCommand};

/// Capacity of each client's outbound queue. A client lagging this many
/// envelopes behind the broadcaster is dropped.
pub const CLIENT_QUEUE_CAPACITY: usize = 32;

/// Actor owning the authoritative client set
pub struct HubActor {
    /// Registered clients and their outbound queues
    clients: HashMap<ClientId, mpsc::Sender<Message>>,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<HubCommand>,
}

impl HubActor {
    pub fn new(command_rx: mpsc::Receiver<HubCommand>) -> Self {
        Self {
            clients: HashMap::new(),
            command_rx,
        }
    }

    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command arrives or every handle has been dropped.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting hub actor");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                HubCommand::Register {
                    id,
                    sender,
                    respond_to,
                } => {
                    self.clients.insert(id, sender);
                    info!(%id, clients = self.clients.len(), "client registered");
                    let _ = respond_to.send(());
                }

                HubCommand::Deregister { id, respond_to } => {
                    if self.remove(id) {
                        info!(%id, clients = self.clients.len(), "client deregistered");
                    }
                    let _ = respond_to.send(());
                }

                HubCommand::Broadcast {
                    envelope,
                    respond_to,
                } => {
                    let delivered = self.broadcast(envelope);
                    let _ = respond_to.send(delivered);
                }

                HubCommand::ClientCount { respond_to } => {
                    let _ = respond_to.send(self.clients.len());
                }

                HubCommand::Shutdown => {
                    debug!("received shutdown command");
                    break;
                }
            }
        }

        debug!(clients = self.clients.len(), "hub actor stopped");
    }

    /// Queue `envelope` for every client registered right now.
    ///
    /// Clients whose queue is closed or full are evicted; delivery to the
    /// remaining clients is unaffected. Returns the number of clients the
    /// envelope was queued for.
    fn broadcast(&mut self, envelope: Message) -> usize {
        let mut dead = Vec::new();

        for (id, sender) in &self.clients {
            match sender.try_send(envelope.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(client = %id, "send queue closed, dropping client");
                    dead.push(*id);
                }
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(client = %id, "send queue full, dropping slow client");
                    dead.push(*id);
                }
            }
        }

        let delivered = self.clients.len() - dead.len();

        for id in dead {
            self.remove(id);
        }

        trace!(delivered, "broadcast complete");

        delivered
    }

    /// Remove a client if present, dropping its queue sender.
    ///
    /// Dropping the sender is what closes the client's writer task, which in
    /// turn closes the underlying stream.
    fn remove(&mut self, id: ClientId) -> bool {
        self.clients.remove(&id).is_some()
    }
}

/// Handle for talking to the HubActor
///
/// This handle provides a typed API for sending commands to the actor.
/// It can be cloned and shared across tasks; every connection task and the
/// broadcaster hold one.
#[derive(Debug, Clone)]
pub struct HubHandle {
    /// Command sender
    sender: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Spawn a new hub actor
    ///
    /// This creates the actor, spawns it as a tokio task, and returns a handle.
    pub fn spawn() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);

        tokio::spawn(HubActor::new(cmd_rx).run());

        Self { sender: cmd_tx }
    }

    /// Add a client to the broadcast set
    ///
    /// Returns once membership is effective: every broadcast processed after
    /// this call includes the client until it is deregistered.
    pub async fn register(&self, id: ClientId, sender: mpsc::Sender<Message>) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(HubCommand::Register {
                id,
                sender,
                respond_to: tx,
            })
            .await
            .context("failed to send Register command")?;

        rx.await.context("hub dropped Register acknowledgement")
    }

    /// Remove a client from the broadcast set
    ///
    /// Safe to call more than once for the same id; removing a client that is
    /// already gone is a no-op.
    pub async fn deregister(&self, id: ClientId) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(HubCommand::Deregister { id, respond_to: tx })
            .await
            .context("failed to send Deregister command")?;

        rx.await.context("hub dropped Deregister acknowledgement")
    }

    /// Fan one envelope out to every registered client
    ///
    /// Returns the number of clients the envelope was queued for, once an
    /// attempt has been made for every member present when the hub picked the
    /// command up. Per-client failures are handled inside the hub and never
    /// surface here.
    pub async fn broadcast(&self, envelope: Message) -> Result<usize> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(HubCommand::Broadcast {
                envelope,
                respond_to: tx,
            })
            .await
            .context("failed to send Broadcast command")?;

        rx.await.context("hub dropped Broadcast acknowledgement")
    }

    /// Current number of registered clients
    pub async fn client_count(&self) -> Result<usize> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(HubCommand::ClientCount { respond_to: tx })
            .await
            .context("failed to send ClientCount command")?;

        rx.await.context("hub dropped ClientCount response")
    }

    /// Drop all clients and stop the hub
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(HubCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")
    }

    /// Whether the hub has stopped accepting commands
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
