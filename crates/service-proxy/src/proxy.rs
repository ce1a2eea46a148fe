//! # Proxy Handle
//!
//! The caller-facing handle for one remote service: a bus connection plus a
//! destination address, stateless beyond those two fields and the shared
//! pending-call store. Safe to retain and reuse across many concurrent
//! calls; construction performs no I/O (binding is lazy, the first call
//! triggers the first send).

use crate::call_id::CallId;
use crate::error::ProxyError;
use crate::pending::PendingCalls;
use crate::router::Address;
use serde::de::DeserializeOwned;
use serde::Serialize;
use service_bus::MessageBus;
use shared_wire::{codec, Reply};
use std::sync::Arc;
use tracing::debug;

/// Handle to one remote service on the bus.
///
/// Per-call state machine: `CREATED → SENT → {COMPLETED_SUCCESS |
/// COMPLETED_FAILURE}`, no back-transitions. Completion disposes the
/// pending-call record in the same step.
#[derive(Clone)]
pub struct ProxyHandle {
    /// The bus connection calls are sent over.
    bus: Arc<dyn MessageBus>,

    /// Destination address, fixed for the lifetime of the handle.
    address: Address,

    /// Correlation store shared by all in-flight calls on this handle.
    pending: Arc<PendingCalls>,
}

impl ProxyHandle {
    /// Bind a handle to a bus connection and a destination address.
    ///
    /// No I/O happens here.
    #[must_use]
    pub fn new(bus: Arc<dyn MessageBus>, address: Address) -> Self {
        Self {
            bus,
            address,
            pending: Arc::new(PendingCalls::new()),
        }
    }

    /// Invoke `operation` on the remote service.
    ///
    /// Encodes the request (synchronously — a request that does not encode
    /// to a field-mapping object fails here, before any bus interaction),
    /// sends it, and resolves with the single outcome once the reply
    /// arrives. The reply is bridged into the correlation store on the
    /// runtime's context, not this call's stack.
    ///
    /// # Errors
    ///
    /// - `ProxyError::Contract` - the request could not be marshalled; nothing was sent
    /// - `ProxyError::Remote` - the handler reported a failure cause
    /// - `ProxyError::Transport` - no handler, reply timeout, or bus closure
    /// - `ProxyError::Decode` - the success reply did not match `Resp`
    pub async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp, ProxyError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        // Local contract check; a violation never reaches the bus.
        let body = codec::encode(request)?;

        let (call_id, outcome) = self.pending.register(operation);
        let guard = AbandonGuard::new(Arc::clone(&self.pending), call_id);
        let reply_rx = self.bus.send_with_reply(self.address.as_str(), body).await;
        debug!(
            call_id = %call_id,
            address = %self.address,
            operation = operation,
            "Request sent"
        );

        // Bridge the bus reply into the correlation store off this stack.
        // The receiver yields exactly one reply, so the call completes
        // exactly once; a dropped call future is absorbed by the store.
        let pending = Arc::clone(&self.pending);
        tokio::spawn(async move {
            let reply = reply_rx.recv().await;
            pending.complete(call_id, reply);
        });

        let reply = outcome
            .await
            .unwrap_or_else(|_| Reply::Failure(shared_wire::FailureCause::bus_closed()));
        guard.disarm();

        match reply {
            Reply::Success(wire) => Ok(codec::decode(&wire)?),
            Reply::Failure(cause) => Err(ProxyError::from_failure(cause)),
        }
    }

    /// The destination address of this handle.
    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Number of calls currently in flight on this handle.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.pending.pending_count()
    }

    /// Correlation-layer counters for this handle.
    #[must_use]
    pub fn pending_stats(&self) -> &crate::pending::PendingStats {
        self.pending.stats()
    }
}

/// Abandons the pending entry if the call future is dropped before its
/// outcome is delivered, so the correlation store never accumulates
/// entries for callers that gave up.
struct AbandonGuard {
    pending: Arc<PendingCalls>,
    call_id: CallId,
    armed: bool,
}

impl AbandonGuard {
    fn new(pending: Arc<PendingCalls>, call_id: CallId) -> Self {
        Self {
            pending,
            call_id,
            armed: true,
        }
    }

    /// The outcome was delivered; nothing left to clean up.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        if self.armed {
            self.pending.abandon(self.call_id);
        }
    }
}
