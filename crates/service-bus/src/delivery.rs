//! # Deliveries and One-Shot Repliers
//!
//! A [`Delivery`] is what a consumer receives for each send: the wire value
//! plus a [`Replier`] that can be used exactly once. The sending side holds
//! the matching [`ReplyReceiver`], which always yields exactly one
//! [`Reply`] even when the replier is dropped without answering.

use shared_wire::{FailureCause, Reply, WireValue};
use tokio::sync::oneshot;
use tracing::debug;

/// A message handed to the consumer registered at an address.
#[derive(Debug)]
pub struct Delivery {
    /// The request body as sent.
    pub body: WireValue,

    /// One-shot handle for answering this delivery.
    pub replier: Replier,
}

impl Delivery {
    pub(crate) fn new(body: WireValue, tx: oneshot::Sender<Reply>, address: String) -> Self {
        Self {
            body,
            replier: Replier { tx, address },
        }
    }

    /// Split into body and replier.
    #[must_use]
    pub fn into_parts(self) -> (WireValue, Replier) {
        (self.body, self.replier)
    }
}

/// One-shot reply handle for a single delivery.
///
/// Consuming `self` on every path makes a second reply for the same delivery
/// unrepresentable. Dropping a `Replier` without answering surfaces to the
/// sender as a `BusClosed` failure.
#[derive(Debug)]
pub struct Replier {
    tx: oneshot::Sender<Reply>,
    address: String,
}

impl Replier {
    /// Answer with a success wire value.
    pub fn reply(self, body: WireValue) {
        self.send(Reply::Success(body));
    }

    /// Answer with a failure cause.
    pub fn fail(self, cause: FailureCause) {
        self.send(Reply::Failure(cause));
    }

    /// Answer with an already-built reply.
    pub fn send(self, reply: Reply) {
        if self.tx.send(reply).is_err() {
            // Sender abandoned the call (future dropped); nothing to notify.
            debug!(address = %self.address, "Reply dropped, caller gone");
        }
    }

    /// The address this delivery arrived on.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// The sending side's handle to the single asynchronous outcome.
#[derive(Debug)]
pub struct ReplyReceiver {
    rx: oneshot::Receiver<Reply>,
}

impl ReplyReceiver {
    pub(crate) fn channel() -> (oneshot::Sender<Reply>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// Wait for the single outcome of the send.
    ///
    /// Always resolves: a dropped replier or a closed bus is folded into a
    /// `BusClosed` failure rather than an error on a second channel.
    pub async fn recv(self) -> Reply {
        self.rx
            .await
            .unwrap_or_else(|_| Reply::Failure(FailureCause::bus_closed()))
    }
}
