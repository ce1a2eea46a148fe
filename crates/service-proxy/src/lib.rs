//! # Service Proxy - Typed Asynchronous Proxies over the Service Bus
//!
//! The public-facing half of the request/response contract: strongly-typed
//! proxy handles that marshal a request to the wire, route it to a logical
//! service address, and resolve exactly one outcome per call.
//!
//! ```text
//! ┌────────┐ process(req)  ┌─────────────┐  encode   ┌────────────┐
//! │ Caller │ ────────────→ │ ProxyHandle │ ────────→ │ Wire Codec │
//! └────────┘               └──────┬──────┘           └────────────┘
//!      ↑                          │ send_with_reply(address, wire)
//!      │                          ▼
//!      │                   ┌─────────────┐          ┌──────────────┐
//!      │   single outcome  │ PendingCalls│ ←─reply─ │ Service Bus  │
//!      └───────────────────│ (correlate) │          │  + handler   │
//!                          └─────────────┘          └──────────────┘
//! ```
//!
//! ## Contract
//!
//! - A call resolves **exactly once**: decoded success, remote failure, or
//!   transport failure. Never twice, never silently dropped.
//! - Contract violations (a request that does not encode to a field-mapping
//!   object) fail synchronously, before anything reaches the bus.
//! - Calls on one handle are independent; completion order follows bus
//!   delivery order, not send order.
//! - Completion runs on the runtime's context, not the call site's stack.
//!
//! ## Limitations
//!
//! Cancellation is not exposed: once sent, a call runs to a reply or a
//! bus-level failure. Dropping the call future abandons the outcome without
//! affecting other in-flight calls.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod binder;
pub mod call_id;
pub mod error;
pub mod pending;
pub mod proxy;
pub mod repository;
pub mod router;

// Re-export main types
pub use binder::{bind, BoundService, ServiceHandler};
pub use call_id::CallId;
pub use error::ProxyError;
pub use pending::{PendingCalls, PendingStats};
pub use proxy::ProxyHandle;
pub use repository::RepositoryConnectorProxy;
pub use router::{resolve, Address, ServiceName};
