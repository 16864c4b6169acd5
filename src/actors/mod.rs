//! Actor-based streaming pipeline
//!
//! This module implements the concurrent core of the system. Each long-lived
//! component runs as an independent async task communicating via Tokio
//! channels.
//!
//! ## Architecture Overview
//!
//! ```text
//!                  ┌─────────────────┐
//!                  │   Broadcaster   │  tick: sample → serialize once
//!                  └────────┬────────┘
//!                           │ Broadcast(envelope)
//!                           ▼
//!   Register ────▶ ┌─────────────────┐
//!                  │       Hub       │  single task, owns the client set
//!   Deregister ──▶ └───┬─────────┬───┘
//!                      │         │ bounded per-client queues
//!               ┌──────▼──┐   ┌──▼──────┐
//!               │ writer 1│   │ writer N│  one per WebSocket client
//!               └─────────┘   └─────────┘
//! ```
//!
//! ## Actor Types
//!
//! - **HubActor**: owns client membership and performs the broadcast fan-out
//! - **BroadcasterActor**: samples host stats at a fixed cadence and pushes
//!   each snapshot through the hub
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: Each actor has an mpsc command channel for control messages
//! 2. **Request/Response**: oneshot channels for calls that await an answer
//! 3. **Fan-out**: the hub writes into bounded per-client queues, never into
//!    sockets, so membership changes are never blocked on network I/O

pub mod broadcaster;
pub mod hub;
pub mod messages;
