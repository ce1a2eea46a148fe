//! # Bus Core
//!
//! The `send_with_reply` primitive and the in-memory implementation.

use crate::consumer::{Consumer, ConsumerRegistry};
use crate::delivery::{Delivery, ReplyReceiver};
use async_trait::async_trait;
use shared_wire::{FailureCause, Reply, WireValue};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// The point-to-point addressable send/reply primitive.
///
/// This is the only surface the proxy core requires of a bus; clustering,
/// discovery, and framing live behind implementations of this trait.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Send `body` to the consumer at `address` and obtain the one-shot
    /// channel the single reply will arrive on.
    ///
    /// Never fails synchronously: delivery problems (no consumer, timeout,
    /// closure) surface as a `Failure` reply on the returned channel.
    async fn send_with_reply(&self, address: &str, body: WireValue) -> ReplyReceiver;
}

/// Bus configuration knobs.
///
/// Timeout and retry policy live here, at the bus layer, not in the proxy
/// contract. There is no retry: a request is sent once and resolves once.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusOptions {
    /// Maximum time to wait for a handler reply before resolving the call
    /// with a `Timeout` failure. `None` waits indefinitely.
    pub reply_timeout: Option<Duration>,
}

/// In-memory implementation of the message bus.
///
/// Uses one unbounded mpsc channel per registered address and a
/// `tokio::sync::oneshot` per send for the reply. Suitable for in-process
/// wiring and tests; a distributed deployment would implement
/// [`MessageBus`] over a network transport.
pub struct InMemoryBus {
    /// Consumer registry keyed by address.
    consumers: ConsumerRegistry,

    /// Configuration.
    options: BusOptions,

    /// Total messages sent (including those that failed to route).
    messages_sent: AtomicU64,

    /// Sends that found no consumer.
    no_handler_drops: AtomicU64,
}

impl InMemoryBus {
    /// Create a bus with default options (no reply timeout).
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(BusOptions::default())
    }

    /// Create a bus with explicit options.
    #[must_use]
    pub fn with_options(options: BusOptions) -> Self {
        Self {
            consumers: Arc::new(RwLock::new(HashMap::new())),
            options,
            messages_sent: AtomicU64::new(0),
            no_handler_drops: AtomicU64::new(0),
        }
    }

    /// Register the consumer for `address`.
    ///
    /// Addresses are point-to-point: registering over an existing consumer
    /// replaces it, and the replaced consumer stops receiving deliveries.
    #[must_use]
    pub fn consumer(&self, address: &str) -> Consumer {
        let (tx, rx) = mpsc::unbounded_channel();

        if let Ok(mut registry) = self.consumers.write() {
            if registry.insert(address.to_string(), tx.clone()).is_some() {
                warn!(address = %address, "Replacing existing consumer");
            }
        }

        debug!(address = %address, "Consumer registered");
        Consumer::new(rx, tx, address.to_string(), self.consumers.clone())
    }

    /// Send `body` to `address`, returning the reply channel immediately.
    ///
    /// The synchronous core of [`MessageBus::send_with_reply`]; exposed for
    /// callers that are not in an async context at send time. The reply
    /// timeout needs a runtime to drive its timer: sends from outside one
    /// skip the deadline and wait for the reply indefinitely.
    pub fn send_to(&self, address: &str, body: WireValue) -> ReplyReceiver {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);

        let (tx, receiver) = ReplyReceiver::channel();
        let consumer_tx = self
            .consumers
            .read()
            .ok()
            .and_then(|registry| registry.get(address).cloned());

        let Some(consumer_tx) = consumer_tx else {
            self.no_handler_drops.fetch_add(1, Ordering::Relaxed);
            warn!(address = %address, "No consumer at address, failing send");
            let _ = tx.send(Reply::Failure(FailureCause::no_handlers(address)));
            return receiver;
        };

        let delivery = Delivery::new(body, tx, address.to_string());
        if let Err(mpsc::error::SendError(delivery)) = consumer_tx.send(delivery) {
            // Consumer task is gone but Drop has not run yet.
            self.no_handler_drops.fetch_add(1, Ordering::Relaxed);
            warn!(address = %address, "Consumer channel closed, failing send");
            delivery.replier.fail(FailureCause::no_handlers(address));
            return receiver;
        }

        debug!(address = %address, "Message delivered to consumer");
        match self.options.reply_timeout {
            None => receiver,
            Some(limit) => Self::bounded(receiver, limit, address.to_string()),
        }
    }

    /// Wrap a reply channel with the bus-level timeout.
    ///
    /// A reply arriving after the deadline is discarded by the one-shot
    /// channel: first outcome wins.
    fn bounded(receiver: ReplyReceiver, limit: Duration, address: String) -> ReplyReceiver {
        // The timer runs on the caller's runtime; without one the send
        // still resolves, just without a deadline.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(address = %address, "No runtime for the reply timer, timeout skipped");
            return receiver;
        };

        let (tx, bounded_rx) = ReplyReceiver::channel();
        handle.spawn(async move {
            let reply = match tokio::time::timeout(limit, receiver.recv()).await {
                Ok(reply) => reply,
                Err(_) => {
                    warn!(address = %address, timeout_ms = limit.as_millis() as u64, "Reply timed out");
                    Reply::Failure(FailureCause::timeout(&address))
                }
            };
            let _ = tx.send(reply);
        });
        bounded_rx
    }

    /// Whether a consumer is currently registered at `address`.
    #[must_use]
    pub fn has_consumer(&self, address: &str) -> bool {
        self.consumers
            .read()
            .is_ok_and(|registry| registry.contains_key(address))
    }

    /// Number of registered consumers.
    #[must_use]
    pub fn consumer_count(&self) -> usize {
        self.consumers.read().map_or(0, |registry| registry.len())
    }

    /// Total messages sent through this bus.
    #[must_use]
    pub fn messages_sent(&self) -> u64 {
        self.messages_sent.load(Ordering::Relaxed)
    }

    /// Sends that failed to route because no consumer was registered.
    #[must_use]
    pub fn no_handler_drops(&self) -> u64 {
        self.no_handler_drops.load(Ordering::Relaxed)
    }

    /// The options this bus was built with.
    #[must_use]
    pub fn options(&self) -> BusOptions {
        self.options
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn send_with_reply(&self, address: &str, body: WireValue) -> ReplyReceiver {
        self.send_to(address, body)
    }
}
