//! # Reply Model
//!
//! The tagged union every bus request resolves to, and the structured
//! failure cause carried by the failure arm.
//!
//! Domain failures (the handler explicitly reported an error) and transport
//! failures (no handler, reply timeout, bus closed) travel the same delivery
//! path and differ only in the cause's content.

use crate::WireValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The single outcome of a bus request. Exactly one per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reply {
    /// The handler produced a result, carried as a wire value.
    Success(WireValue),

    /// The handler or the bus reported a failure.
    Failure(FailureCause),
}

impl Reply {
    /// Whether this is the success arm.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Classification of a failure cause.
///
/// Mirrors the failure classes an addressable reply bus can report:
/// the recipient itself failed, nobody was listening, the reply did not
/// arrive in time, or the bus went away entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCode {
    /// The handler received the request and explicitly reported an error.
    Recipient,

    /// No consumer is registered at the destination address.
    NoHandlers,

    /// The bus-level reply timeout elapsed before a reply arrived.
    Timeout,

    /// The bus (or the reply channel) was closed while the call was in flight.
    BusClosed,
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Recipient => "RECIPIENT_FAILURE",
            Self::NoHandlers => "NO_HANDLERS",
            Self::Timeout => "TIMEOUT",
            Self::BusClosed => "BUS_CLOSED",
        };
        f.write_str(name)
    }
}

/// Why a request failed.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct FailureCause {
    /// Failure classification.
    pub code: FailureCode,

    /// Human-readable description, produced by the handler or the bus.
    pub message: String,
}

impl FailureCause {
    /// A failure the handler itself reported (domain failure).
    #[must_use]
    pub fn recipient(message: impl Into<String>) -> Self {
        Self {
            code: FailureCode::Recipient,
            message: message.into(),
        }
    }

    /// No consumer registered at `address`.
    #[must_use]
    pub fn no_handlers(address: &str) -> Self {
        Self {
            code: FailureCode::NoHandlers,
            message: format!("no handlers registered at address '{address}'"),
        }
    }

    /// The reply timeout elapsed for a send to `address`.
    #[must_use]
    pub fn timeout(address: &str) -> Self {
        Self {
            code: FailureCode::Timeout,
            message: format!("reply timed out for address '{address}'"),
        }
    }

    /// The bus or reply channel closed mid-flight.
    #[must_use]
    pub fn bus_closed() -> Self {
        Self {
            code: FailureCode::BusClosed,
            message: "bus closed before a reply was delivered".to_string(),
        }
    }

    /// Whether this cause originated below the handler (transport level).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        !matches!(self.code, FailureCode::Recipient)
    }
}
