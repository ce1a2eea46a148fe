//! # Service Bus - Address-Routed Message Bus with One-Shot Replies
//!
//! The external collaborator the service proxy is layered on: a reliable
//! point-to-point addressable send/reply primitive.
//!
//! ```text
//! ┌──────────────┐  send_with_reply(addr, wire)  ┌──────────────┐
//! │    Proxy     │ ────────────────────────────→ │  Service Bus │
//! │              │ ←──────── ReplyReceiver ───── │              │
//! └──────────────┘                               └──────┬───────┘
//!                                                       │ Delivery
//!                                                       ▼
//!                                                ┌──────────────┐
//!                                                │   Consumer   │
//!                                                │  (handler)   │──reply/fail──┐
//!                                                └──────────────┘              │
//!                        one Reply, exactly once  ←────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - Each send gets exactly one [`Reply`](shared_wire::Reply): a handler
//!   reply, a no-handler failure, a bus-level timeout, or a bus-closed
//!   failure when the replier is dropped.
//! - Addresses are point-to-point: one consumer per address; replies bind
//!   only to their own send regardless of interleaving.
//!
//! Clustering, discovery, and transport framing are out of scope; this bus
//! runs in-process.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod bus;
pub mod consumer;
pub mod delivery;

// Re-export main types
pub use bus::{BusOptions, InMemoryBus, MessageBus};
pub use consumer::{Consumer, DeliveryStream};
pub use delivery::{Delivery, Replier, ReplyReceiver};
