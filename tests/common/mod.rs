//! Test utilities for libhyperspace integration tests.

#![allow(dead_code)]

use std::net::TcpListener;
use std::time::Duration;

use libhyperspace::{Address, HsdClient};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A fake hsd API backed by a wiremock server.
pub struct MockDaemon {
    pub server: MockServer,
    pub address: Address,
}

impl MockDaemon {
    /// Start a new mock daemon on a random local port.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let address = Address::from(*server.address());
        Self { server, address }
    }

    /// Answer `GET /gateway` with 200 and a plain-text body.
    pub async fn mock_gateway_ok(&self) {
        Mock::given(method("GET"))
            .and(path("/gateway"))
            .respond_with(ResponseTemplate::new(200).set_body_string("success"))
            .mount(&self.server)
            .await;
    }

    /// Answer `GET /gateway` with the given status.
    pub async fn mock_gateway_status(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/gateway"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Answer `verb path` with a JSON body.
    pub async fn mock_json(&self, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `GET path` only after `delay`.
    pub async fn mock_slow(&self, route: &str, delay: Duration) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server has seen so far.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}

/// An address with nothing listening on it.
pub fn unused_address() -> Address {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let addr = listener.local_addr().expect("no local addr");
    drop(listener);
    Address::from(addr)
}

/// A client whose probe gives up quickly.
pub fn test_client() -> HsdClient {
    HsdClient::builder()
        .liveness_timeout(Duration::from_secs(5))
        .build()
        .expect("failed to build client")
}
