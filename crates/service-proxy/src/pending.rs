//! # Pending Call Store - Correlation Layer
//!
//! Pairs each outgoing request with the single asynchronous reply that
//! answers it.
//!
//! Flow:
//! 1. `call` registers a pending call and keeps the oneshot receiver
//! 2. The request is sent on the bus
//! 3. The bus-side bridge task receives the reply and calls `complete()`
//! 4. `call` awaits the receiver and resumes the caller
//!
//! `complete` removes the entry before delivering, so a second outcome for
//! the same call (late reply after a transport failure, or the reverse)
//! finds nothing to complete: first outcome wins, at most one notification
//! per call.

use crate::call_id::CallId;
use dashmap::DashMap;
use shared_wire::Reply;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// A call that was sent and is awaiting its reply.
struct PendingCall {
    /// Channel the single outcome is delivered on.
    tx: oneshot::Sender<Reply>,

    /// When the call was registered.
    created_at: Instant,

    /// Operation name (for logging).
    operation: String,
}

/// Counters over the lifetime of a store.
#[derive(Debug, Default)]
pub struct PendingStats {
    /// Calls registered.
    pub total_registered: AtomicU64,

    /// Calls completed with an outcome.
    pub total_completed: AtomicU64,

    /// Calls abandoned before an outcome was delivered (call future
    /// dropped, bus closure).
    pub total_abandoned: AtomicU64,

    /// Outcomes discarded because the call was already completed or unknown.
    pub total_discarded: AtomicU64,
}

/// Correlation store for in-flight calls.
///
/// Safe under concurrent registration and completion from many in-flight
/// calls on the same proxy handle.
pub struct PendingCalls {
    /// Map of call ID to pending call.
    pending: DashMap<CallId, PendingCall>,

    /// Statistics.
    stats: PendingStats,
}

impl PendingCalls {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
            stats: PendingStats::default(),
        }
    }

    /// Register a call and get the receiver its single outcome arrives on.
    #[must_use]
    pub fn register(&self, operation: &str) -> (CallId, oneshot::Receiver<Reply>) {
        let call_id = CallId::new();
        let (tx, rx) = oneshot::channel();

        self.pending.insert(
            call_id,
            PendingCall {
                tx,
                created_at: Instant::now(),
                operation: operation.to_string(),
            },
        );
        self.stats.total_registered.fetch_add(1, Ordering::Relaxed);

        debug!(call_id = %call_id, operation = operation, "Registered pending call");
        (call_id, rx)
    }

    /// Deliver the outcome for a call.
    ///
    /// Removes the entry first, so at most one outcome can ever be delivered
    /// per call. Returns `true` if this outcome won; `false` if the call was
    /// unknown, already completed, or its caller is gone.
    pub fn complete(&self, call_id: CallId, reply: Reply) -> bool {
        let Some((_, call)) = self.pending.remove(&call_id) else {
            self.stats.total_discarded.fetch_add(1, Ordering::Relaxed);
            warn!(call_id = %call_id, "Outcome for unknown or already-completed call discarded");
            return false;
        };

        let elapsed_ms = call.created_at.elapsed().as_millis() as u64;
        match call.tx.send(reply) {
            Ok(()) => {
                self.stats.total_completed.fetch_add(1, Ordering::Relaxed);
                debug!(
                    call_id = %call_id,
                    operation = call.operation,
                    elapsed_ms = elapsed_ms,
                    "Completed pending call"
                );
                true
            }
            Err(_) => {
                self.stats.total_abandoned.fetch_add(1, Ordering::Relaxed);
                debug!(
                    call_id = %call_id,
                    operation = call.operation,
                    "Caller gone, outcome dropped"
                );
                false
            }
        }
    }

    /// Drop the entry for a call without delivering an outcome.
    ///
    /// The abandonment path: the caller gave up (call future dropped, bus
    /// closure) before a reply arrived. A reply arriving later finds nothing
    /// to complete and is discarded. Returns `true` if an entry was removed.
    pub fn abandon(&self, call_id: CallId) -> bool {
        if self.pending.remove(&call_id).is_none() {
            return false;
        }
        self.stats.total_abandoned.fetch_add(1, Ordering::Relaxed);
        debug!(call_id = %call_id, "Abandoned pending call");
        true
    }

    /// Number of calls currently in flight.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether a call is still awaiting its reply.
    #[must_use]
    pub fn is_pending(&self, call_id: &CallId) -> bool {
        self.pending.contains_key(call_id)
    }

    /// Lifetime counters.
    #[must_use]
    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }
}

impl Default for PendingCalls {
    fn default() -> Self {
        Self::new()
    }
}
