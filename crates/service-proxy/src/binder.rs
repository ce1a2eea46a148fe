//! # Service Binder - Handler Side
//!
//! Stands up a service on a bus address: a bound task consumes deliveries,
//! decodes each request, runs the handler, and answers with the encoded
//! response or the handler's failure cause. The proxy side never sees a
//! difference between a local handler bound here and a remote one.

use crate::router::Address;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use service_bus::InMemoryBus;
use shared_wire::{codec, FailureCause};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Business logic for one request/response service.
#[async_trait]
pub trait ServiceHandler: Send + Sync + 'static {
    /// The decoded request type.
    type Request: DeserializeOwned + Send;

    /// The response type, encoded back onto the wire.
    type Response: Serialize + Send;

    /// Execute one request. A returned `FailureCause` travels to the caller
    /// as the failure arm of the reply.
    async fn handle(&self, request: Self::Request) -> Result<Self::Response, FailureCause>;
}

/// A service bound to an address. Dropping it (or calling `shutdown`)
/// stops the task and deregisters the consumer.
pub struct BoundService {
    address: Address,
    task: JoinHandle<()>,
}

impl BoundService {
    /// The address this service listens on.
    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Stop serving. Deliveries already queued are dropped; their senders
    /// observe a `BusClosed` failure.
    pub fn shutdown(self) {
        self.task.abort();
        debug!(address = %self.address, "Service unbound");
    }
}

impl Drop for BoundService {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Bind `handler` to `address` on `bus` and start serving.
///
/// Each delivery is decoded; a request that does not decode is answered
/// with a `Recipient` failure without invoking the handler.
pub fn bind<H: ServiceHandler>(bus: &InMemoryBus, address: Address, handler: H) -> BoundService {
    let mut consumer = bus.consumer(address.as_str());
    let task_address = address.clone();

    let task = tokio::spawn(async move {
        while let Some(delivery) = consumer.recv().await {
            let (body, replier) = delivery.into_parts();

            let request = match codec::decode::<H::Request>(&body) {
                Ok(request) => request,
                Err(error) => {
                    warn!(address = %task_address, error = %error, "Malformed request");
                    replier.fail(FailureCause::recipient(format!(
                        "malformed request: {error}"
                    )));
                    continue;
                }
            };

            match handler.handle(request).await {
                Ok(response) => match codec::encode(&response) {
                    Ok(wire) => replier.reply(wire),
                    Err(error) => {
                        warn!(address = %task_address, error = %error, "Unencodable response");
                        replier.fail(FailureCause::recipient(format!(
                            "unencodable response: {error}"
                        )));
                    }
                },
                Err(cause) => {
                    debug!(address = %task_address, cause = %cause, "Handler reported failure");
                    replier.fail(cause);
                }
            }
        }
    });

    debug!(address = %address, "Service bound");
    BoundService { address, task }
}
