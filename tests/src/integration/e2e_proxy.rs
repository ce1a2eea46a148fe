//! # End-to-End Proxy Flows
//!
//! The full path from a typed caller to a bound service and back:
//!
//! ```text
//! [Caller] ──process(ClientRequest)──→ [RepositoryConnectorProxy]
//!                                              │ encode + send
//!                                              ▼
//!                                      [InMemoryBus @ "repository.connector"]
//!                                              │ Delivery
//!                                              ▼
//!                                      [Bound handler] ──reply──→ [Caller]
//! ```

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use service_bus::{InMemoryBus, MessageBus};
    use service_proxy::{
        bind, Address, ProxyHandle, RepositoryConnectorProxy, ServiceHandler, ServiceName,
    };
    use shared_wire::{ClientRequest, ClientResponse, FailureCause};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Repository that serves a fixed page for every request.
    struct EchoRepository;

    #[async_trait]
    impl ServiceHandler for EchoRepository {
        type Request = ClientRequest;
        type Response = ClientResponse;

        async fn handle(&self, request: ClientRequest) -> Result<ClientResponse, FailureCause> {
            let mut response = ClientResponse::with_status(200, "<html/>");
            response
                .headers
                .insert("X-Request-Path".to_string(), request.path);
            Ok(response)
        }
    }

    fn repository_address() -> Address {
        ServiceName::RepositoryConnector.into()
    }

    #[tokio::test]
    async fn test_spec_scenario_process_a_html() {
        // Proxy created for "repository.connector"; caller invokes
        // process({path: "/a.html"}); handler echoes status 200 + "<html/>".
        let bus = Arc::new(InMemoryBus::new());
        let _service = bind(&bus, repository_address(), EchoRepository);

        let proxy = RepositoryConnectorProxy::on_default_address(bus.clone());
        let response = timeout(
            Duration::from_secs(1),
            proxy.process(ClientRequest::get("/a.html")),
        )
        .await
        .expect("timeout")
        .expect("success");

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "<html/>");
        assert_eq!(response.headers["X-Request-Path"], "/a.html");
    }

    #[tokio::test]
    async fn test_full_request_round_trips_through_wire() {
        let bus = Arc::new(InMemoryBus::new());
        let _service = bind(&bus, repository_address(), EchoRepository);
        let proxy = RepositoryConnectorProxy::on_default_address(bus.clone());

        let mut request = ClientRequest::get("/content/page.html");
        request.method = "POST".to_string();
        request
            .params
            .insert("preview".to_string(), "true".to_string());
        request
            .form_attributes
            .insert("q".to_string(), "fragment".to_string());

        let response = proxy.process(request).await.expect("success");
        assert_eq!(response.headers["X-Request-Path"], "/content/page.html");
    }

    #[tokio::test]
    async fn test_proxy_handle_is_reusable_across_calls() {
        let bus = Arc::new(InMemoryBus::new());
        let _service = bind(&bus, repository_address(), EchoRepository);
        let proxy = RepositoryConnectorProxy::on_default_address(bus.clone());

        for n in 0..10 {
            let response = proxy
                .process(ClientRequest::get(format!("/page-{n}.html")))
                .await
                .expect("success");
            assert_eq!(response.status_code, 200);
        }
        assert_eq!(bus.messages_sent(), 10);
        assert_eq!(proxy.handle().in_flight(), 0);
    }

    #[tokio::test]
    async fn test_two_services_on_one_bus() {
        let bus = Arc::new(InMemoryBus::new());
        let _repo = bind(&bus, repository_address(), EchoRepository);

        /// Assembler that wraps whatever body it is given.
        struct WrappingAssembler;

        #[async_trait]
        impl ServiceHandler for WrappingAssembler {
            type Request = ClientResponse;
            type Response = ClientResponse;

            async fn handle(&self, input: ClientResponse) -> Result<ClientResponse, FailureCause> {
                Ok(ClientResponse::with_status(
                    input.status_code,
                    format!("<page>{}</page>", input.body),
                ))
            }
        }

        let _assembler = bind(
            &bus,
            Address::from(ServiceName::FragmentAssembler),
            WrappingAssembler,
        );

        let repo_proxy = RepositoryConnectorProxy::on_default_address(bus.clone());
        let assembler_proxy = ProxyHandle::new(
            bus.clone() as Arc<dyn MessageBus>,
            ServiceName::FragmentAssembler.into(),
        );

        let fetched = repo_proxy
            .process(ClientRequest::get("/a.html"))
            .await
            .expect("fetch");
        let assembled: ClientResponse = assembler_proxy
            .call("assemble", &fetched)
            .await
            .expect("assemble");

        assert_eq!(assembled.body, "<page><html/></page>");
        assert_eq!(bus.consumer_count(), 2);
    }
}
