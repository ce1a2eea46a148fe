//! # Consumers
//!
//! The receiving side of an address. One consumer per address; dropping the
//! consumer deregisters it, after which sends to the address fail
//! `NO_HANDLERS`.

use crate::delivery::Delivery;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tracing::debug;

/// Registry of per-address delivery senders, shared with the bus.
pub(crate) type ConsumerRegistry = Arc<RwLock<HashMap<String, mpsc::UnboundedSender<Delivery>>>>;

/// A consumer bound to a single bus address.
///
/// When dropped, the registration is automatically cleaned up.
pub struct Consumer {
    /// Incoming deliveries for this address.
    receiver: mpsc::UnboundedReceiver<Delivery>,

    /// Our own sender, kept to tell our registration apart from a
    /// replacement on the same address during Drop.
    sender: mpsc::UnboundedSender<Delivery>,

    /// The address this consumer listens on.
    address: String,

    /// Reference to the bus registry (for cleanup).
    registry: ConsumerRegistry,
}

impl Consumer {
    pub(crate) fn new(
        receiver: mpsc::UnboundedReceiver<Delivery>,
        sender: mpsc::UnboundedSender<Delivery>,
        address: String,
        registry: ConsumerRegistry,
    ) -> Self {
        Self {
            receiver,
            sender,
            address,
            registry,
        }
    }

    /// Receive the next delivery for this address.
    ///
    /// # Returns
    ///
    /// - `Some(delivery)` - The next delivery
    /// - `None` - The bus was dropped
    pub async fn recv(&mut self) -> Option<Delivery> {
        self.receiver.recv().await
    }

    /// Try to receive a delivery without waiting.
    pub fn try_recv(&mut self) -> Option<Delivery> {
        self.receiver.try_recv().ok()
    }

    /// The address this consumer is bound to.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Drop for Consumer {
    fn drop(&mut self) {
        let Ok(mut registry) = self.registry.write() else {
            return;
        };
        // Only deregister our own registration; a replacement consumer on the
        // same address stays.
        let ours = registry
            .get(&self.address)
            .is_some_and(|tx| tx.same_channel(&self.sender));
        if ours {
            registry.remove(&self.address);
        }
        debug!(address = %self.address, "Consumer dropped");
    }
}

/// A stream wrapper over a consumer, for use with stream combinators.
pub struct DeliveryStream {
    consumer: Consumer,
}

impl DeliveryStream {
    /// Wrap a consumer into a stream of deliveries.
    #[must_use]
    pub fn new(consumer: Consumer) -> Self {
        Self { consumer }
    }

    /// The address this stream is bound to.
    #[must_use]
    pub fn address(&self) -> &str {
        self.consumer.address()
    }
}

impl Stream for DeliveryStream {
    type Item = Delivery;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.consumer.receiver.poll_recv(cx)
    }
}
