//! # Repository Connector Proxy
//!
//! Typed binding for the repository-connector service: one `process`
//! operation taking a [`ClientRequest`] and resolving with a
//! [`ClientResponse`]. The static signature replaces runtime argument-shape
//! checks; a call that type-checks has the right shape.

use crate::error::ProxyError;
use crate::proxy::ProxyHandle;
use crate::router::{resolve, Address, ServiceName};
use service_bus::MessageBus;
use shared_wire::{ClientRequest, ClientResponse};
use std::sync::Arc;

/// Proxy to a remote repository-connector service.
#[derive(Clone)]
pub struct RepositoryConnectorProxy {
    handle: ProxyHandle,
}

impl RepositoryConnectorProxy {
    /// Bind a proxy to a bus connection and an explicit address.
    ///
    /// Performs no I/O; the first `process` call triggers the first send.
    #[must_use]
    pub fn create_proxy(bus: Arc<dyn MessageBus>, address: Address) -> Self {
        Self {
            handle: ProxyHandle::new(bus, address),
        }
    }

    /// Bind a proxy to the service's well-known address.
    #[must_use]
    pub fn on_default_address(bus: Arc<dyn MessageBus>) -> Self {
        Self::create_proxy(bus, resolve(ServiceName::RepositoryConnector))
    }

    /// Fetch the document `request` points at.
    ///
    /// Resolves exactly once with either the repository's response or a
    /// [`ProxyError`]. Cancellation is not supported: dropping the future
    /// abandons the outcome but the remote call still runs.
    ///
    /// # Errors
    ///
    /// See [`ProxyHandle::call`].
    pub async fn process(&self, request: ClientRequest) -> Result<ClientResponse, ProxyError> {
        self.handle.call("process", &request).await
    }

    /// The underlying untyped handle.
    #[must_use]
    pub fn handle(&self) -> &ProxyHandle {
        &self.handle
    }
}
