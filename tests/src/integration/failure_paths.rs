//! # Failure Paths
//!
//! The three error kinds of the proxy contract, end to end:
//!
//! 1. **Contract** - malformed request, fails before the bus sees anything
//! 2. **Remote** - the handler reports a failure cause
//! 3. **Transport** - no handler, reply timeout, bus closure
//!
//! All three terminate at the caller exactly once; transport and remote
//! failures travel the same delivery path and differ only in cause content.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use service_bus::{BusOptions, InMemoryBus, MessageBus};
    use service_proxy::{bind, Address, ProxyError, ProxyHandle, ServiceHandler};
    use shared_wire::{ClientRequest, ClientResponse, FailureCause, FailureCode};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Handler that always reports the same failure cause.
    struct FailingRepository;

    #[async_trait]
    impl ServiceHandler for FailingRepository {
        type Request = ClientRequest;
        type Response = ClientResponse;

        async fn handle(&self, _request: ClientRequest) -> Result<ClientResponse, FailureCause> {
            Err(FailureCause::recipient("handler timeout"))
        }
    }

    /// Handler that never answers within any reasonable deadline.
    struct StalledRepository;

    #[async_trait]
    impl ServiceHandler for StalledRepository {
        type Request = ClientRequest;
        type Response = ClientResponse;

        async fn handle(&self, _request: ClientRequest) -> Result<ClientResponse, FailureCause> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(ClientResponse::default())
        }
    }

    fn proxy_on(bus: &Arc<InMemoryBus>, address: &str) -> ProxyHandle {
        ProxyHandle::new(bus.clone() as Arc<dyn MessageBus>, Address::from(address))
    }

    #[tokio::test]
    async fn test_spec_scenario_handler_timeout_cause() {
        // Same call as the happy-path scenario, but the reply is a failure
        // whose cause contains "handler timeout": one failed outcome, no
        // result.
        let bus = Arc::new(InMemoryBus::new());
        let _service = bind(&bus, Address::from("repository.connector"), FailingRepository);
        let proxy = proxy_on(&bus, "repository.connector");

        let result: Result<ClientResponse, _> =
            proxy.call("process", &ClientRequest::get("/a.html")).await;

        match result.unwrap_err() {
            ProxyError::Remote(cause) => {
                assert_eq!(cause.code, FailureCode::Recipient);
                assert!(cause.message.contains("handler timeout"));
            }
            other => panic!("expected remote failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_contract_violation_fails_synchronously_without_send() {
        let bus = Arc::new(InMemoryBus::new());
        let _service = bind(&bus, Address::from("repository.connector"), FailingRepository);
        let proxy = proxy_on(&bus, "repository.connector");

        // Arrays are not field-mapping objects.
        let result: Result<ClientResponse, _> = proxy.call("process", &vec!["/a.html"]).await;

        assert!(result.unwrap_err().is_contract());
        // The bus observed no send at all.
        assert_eq!(bus.messages_sent(), 0);
        assert_eq!(proxy.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_handler_is_transport_failure() {
        let bus = Arc::new(InMemoryBus::new());
        let proxy = proxy_on(&bus, "repository.connector");

        let result: Result<ClientResponse, _> =
            proxy.call("process", &ClientRequest::get("/a.html")).await;

        match result.unwrap_err() {
            ProxyError::Transport(cause) => {
                assert_eq!(cause.code, FailureCode::NoHandlers);
                assert!(cause.message.contains("repository.connector"));
            }
            other => panic!("expected transport failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bus_level_timeout_surfaces_as_transport_failure() {
        let bus = Arc::new(InMemoryBus::with_options(BusOptions {
            reply_timeout: Some(Duration::from_millis(30)),
        }));
        let _service = bind(&bus, Address::from("repository.connector"), StalledRepository);
        let proxy = proxy_on(&bus, "repository.connector");

        let result = timeout(
            Duration::from_secs(1),
            proxy.call::<_, ClientResponse>("process", &ClientRequest::get("/a.html")),
        )
        .await
        .expect("bus timeout should fire well before the guard");

        match result.unwrap_err() {
            ProxyError::Transport(cause) => assert_eq!(cause.code, FailureCode::Timeout),
            other => panic!("expected timeout failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handler_dropped_mid_call_is_bus_closed() {
        let bus = Arc::new(InMemoryBus::new());
        let mut consumer = bus.consumer("repository.connector");
        let proxy = proxy_on(&bus, "repository.connector");

        // Take the delivery, then vanish without replying.
        let reaper = tokio::spawn(async move {
            let delivery = consumer.recv().await.expect("delivery");
            drop(delivery);
        });

        let result: Result<ClientResponse, _> =
            proxy.call("process", &ClientRequest::get("/a.html")).await;

        match result.unwrap_err() {
            ProxyError::Transport(cause) => assert_eq!(cause.code, FailureCode::BusClosed),
            other => panic!("expected bus-closed failure, got {other:?}"),
        }
        reaper.await.expect("reaper");
    }

    #[tokio::test]
    async fn test_failure_never_retried() {
        let bus = Arc::new(InMemoryBus::new());
        let _service = bind(&bus, Address::from("repository.connector"), FailingRepository);
        let proxy = proxy_on(&bus, "repository.connector");

        let _ = proxy
            .call::<_, ClientResponse>("process", &ClientRequest::get("/a.html"))
            .await;

        // One failed call means exactly one message on the bus.
        assert_eq!(bus.messages_sent(), 1);
    }
}
