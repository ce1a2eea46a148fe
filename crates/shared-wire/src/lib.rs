//! # Shared Wire - Wire Format for the Service-Proxy Bus
//!
//! Everything both ends of a bus conversation must agree on:
//!
//! - **Wire values**: self-describing JSON field-mapping objects
//!   (`serde_json::Value`), order-irrelevant.
//! - **Codec**: total `encode`/`decode` between domain objects and wire
//!   values. Absent and unknown fields decode to defaults, never a panic.
//! - **Domain data objects**: `ClientRequest` / `ClientResponse`.
//! - **Reply model**: the `{Success, Failure}` tagged union every request
//!   resolves to, with a structured `FailureCause`.
//!
//! ```text
//! ┌──────────────┐   encode()   ┌──────────────┐   decode()   ┌──────────────┐
//! │ domain object│ ───────────→ │  wire value  │ ───────────→ │ domain object│
//! │ ClientRequest│              │ JSON object  │              │ ClientRequest│
//! └──────────────┘              └──────────────┘              └──────────────┘
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod codec;
pub mod entities;
pub mod reply;

// Re-export main types
pub use codec::{decode, encode, DecodeError, EncodeError};
pub use entities::{ClientRequest, ClientResponse};
pub use reply::{FailureCause, FailureCode, Reply};

/// The serialized, self-describing representation of a domain object.
///
/// Always a JSON field-mapping object on the wire; [`codec::encode`] enforces
/// this.
pub type WireValue = serde_json::Value;
