//! # RPC Framing - multipart wire layout for RPC envelopes
//!
//! Serializes outbound request and reply envelopes onto a multipart message
//! socket, for two delivery topologies:
//! - **Proxy**: a broker routes on plain metadata frames
//! - **Direct**: dealer/router pairing, metadata inside one serialized blob
//!
//! ## Architecture
//!
//! ```text
//!   dispatch layer ──(Topology, Envelope)──► SenderSet
//!                                              │
//!              ┌───────────────┬───────────────┼───────────────┐
//!              ▼               ▼               ▼               ▼
//!        ProxyRequest     ProxyReply     DirectRequest    DirectReply
//!              └───────────────┴───────┬───────┴───────────────┘
//!                          Serializer  │  FrameSink
//!                      (msgpack/json)  ▼  (stream / memory)
//!                                  frames + MORE
//! ```
//!
//! Senders are stateless; one `send` writes one whole message. Nothing is
//! queued or retried here.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod envelope;
pub mod inbound;
pub mod sender;
pub mod serialization;
pub mod transport;
pub mod types;

// Internal utilities
pub mod observability;

pub use envelope::{Envelope, EnvelopeKind, MessageType, Reply, ReplyBody, Request, Target};
pub use sender::{Sender, SenderSet, Topology};
pub use types::{Config, Error, Result};
