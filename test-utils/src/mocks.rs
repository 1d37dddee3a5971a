//! A stand-in vip-core service for integration tests.

use serde_json::Value;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate, Times};

/// Path of the library rules endpoint.
pub const LIBRARY_RULES_PATH: &str = "/1.0/api/libraryrules";

/// Path of the service endpoint.
pub const SERVICE_PATH: &str = "/1.0/api/service";

/// Wiremock server answering vip-core calls.
///
/// Expected call counts are verified when the mock is dropped.
#[derive(Debug)]
pub struct VipCoreMock {
    server: MockServer,
}

impl VipCoreMock {
    /// Start a server on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the server.
    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// The underlying wiremock server.
    #[must_use]
    pub const fn server(&self) -> &MockServer {
        &self.server
    }

    /// Answer `libraryrules` calls whose body contains `request`.
    pub async fn on_library_rules(
        &self,
        request: Value,
        status: u16,
        body: Value,
        calls: impl Into<Times>,
    ) {
        self.on_json(LIBRARY_RULES_PATH, request, status, body, calls)
            .await;
    }

    /// Answer `service` calls whose body contains `request`.
    pub async fn on_service(
        &self,
        request: Value,
        status: u16,
        body: Value,
        calls: impl Into<Times>,
    ) {
        self.on_json(SERVICE_PATH, request, status, body, calls).await;
    }

    /// Answer every call to `endpoint` with a raw body.
    pub async fn on_raw(
        &self,
        endpoint: &str,
        status: u16,
        body: &str,
        calls: impl Into<Times>,
    ) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    async fn on_json(
        &self,
        endpoint: &str,
        request: Value,
        status: u16,
        body: Value,
        calls: impl Into<Times>,
    ) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(request))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    /// Number of requests received so far.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }

    /// JSON bodies of the requests received so far.
    pub async fn request_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}
