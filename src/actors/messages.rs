//! Message types for actor communication
//!
//! This module defines all message types used for communication between actors.
//!
//! ## Design Principles
//!
//! 1. **Commands**: Request/response messages sent to specific actors via mpsc
//! 2. **Acknowledgement**: membership changes carry a oneshot so callers can
//!    order their own work after the change is effective
//! 3. **One envelope, many queues**: a broadcast carries the already-serialized
//!    frame; the hub clones it per recipient instead of re-serializing

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::Message;
use tokio::sync::{mpsc, oneshot};

/// Identity of one connected client, unique for the lifetime of the process.
///
/// Ids are never reused; a reconnecting client gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(u64);

impl ClientId {
    /// Allocate the next free id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

/// Commands that can be sent to the HubActor
#[derive(Debug)]
pub enum HubCommand {
    /// Add a client to the broadcast set
    ///
    /// `sender` is the client's bounded outbound queue; the hub never touches
    /// the socket itself.
    Register {
        id: ClientId,
        sender: mpsc::Sender<Message>,
        respond_to: oneshot::Sender<()>,
    },

    /// Remove a client from the broadcast set
    ///
    /// Removing a client that is already gone is a no-op, not an error.
    Deregister {
        id: ClientId,
        respond_to: oneshot::Sender<()>,
    },

    /// Fan one envelope out to every currently registered client
    ///
    /// Responds with the number of clients the envelope was queued for.
    Broadcast {
        envelope: Message,
        respond_to: oneshot::Sender<usize>,
    },

    /// Query the current number of registered clients
    ClientCount { respond_to: oneshot::Sender<usize> },

    /// Drop all clients and stop the hub
    Shutdown,
}

/// Commands that can be sent to the BroadcasterActor
#[derive(Debug)]
pub enum BroadcasterCommand {
    /// Sample and broadcast immediately (bypassing the interval timer)
    ///
    /// Used for testing and manual refresh operations.
    SampleNow {
        /// Channel to send the result back
        respond_to: oneshot::Sender<anyhow::Result<usize>>,
    },

    /// Gracefully shut down the broadcaster
    Shutdown,
}
