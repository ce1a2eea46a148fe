//! # Proxy Error Taxonomy
//!
//! Three kinds terminate at the caller, always exactly once:
//!
//! - **Contract**: the request could not be marshalled; raised synchronously
//!   before anything reaches the bus. Never retried automatically.
//! - **Remote**: the handler explicitly reported a failure cause.
//! - **Transport**: the bus could not produce a reply (no handler, timeout,
//!   closure). Same delivery path as `Remote`; only the cause differs.
//!
//! Plus **Decode**, for a success reply whose body does not match the
//! expected response type.

use shared_wire::{DecodeError, EncodeError, FailureCause};
use thiserror::Error;

/// Errors a proxy call can resolve with.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Local contract violation, raised before any bus interaction.
    #[error("contract violation: {0}")]
    Contract(#[from] EncodeError),

    /// The remote handler reported a failure.
    #[error("remote failure: {0}")]
    Remote(FailureCause),

    /// The bus could not deliver the request or its reply.
    #[error("transport failure: {0}")]
    Transport(FailureCause),

    /// The success reply did not match the expected response type.
    #[error("response decode failed: {0}")]
    Decode(#[from] DecodeError),
}

impl ProxyError {
    /// Split a failure reply into the remote/transport arms by its cause.
    pub(crate) fn from_failure(cause: FailureCause) -> Self {
        if cause.is_transport() {
            Self::Transport(cause)
        } else {
            Self::Remote(cause)
        }
    }

    /// The failure cause, when the error carries one.
    #[must_use]
    pub fn cause(&self) -> Option<&FailureCause> {
        match self {
            Self::Remote(cause) | Self::Transport(cause) => Some(cause),
            Self::Contract(_) | Self::Decode(_) => None,
        }
    }

    /// Whether this was a local contract violation (nothing was sent).
    #[must_use]
    pub fn is_contract(&self) -> bool {
        matches!(self, Self::Contract(_))
    }
}
