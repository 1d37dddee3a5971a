//! Retry, timing and lifecycle behaviour of the transport.

use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use test_utils::{VipCoreMock, fixtures, mocks::LIBRARY_RULES_PATH};
use vipcore_client::{
    LibraryRulesClient, RetryConfig, ServiceClient, Transport, TransportError, VipCoreConfig,
    VipCoreError,
};

const RETRY_DELAY: Duration = Duration::from_millis(10);

fn config(uri: &str) -> VipCoreConfig {
    VipCoreConfig::new(uri)
        .unwrap()
        .with_retry(RetryConfig::default().with_delay(RETRY_DELAY))
}

fn transport_error<T: std::fmt::Debug>(result: Result<T, VipCoreError>) -> TransportError {
    match result {
        Err(VipCoreError::Transport(err)) => err,
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_persistent_server_error_is_retried_three_times() {
    let mock = VipCoreMock::start().await;
    mock.on_raw(LIBRARY_RULES_PATH, 500, "", 4).await;
    let client = LibraryRulesClient::open(&config(&mock.uri())).unwrap();

    let started = Instant::now();
    let err = transport_error(client.get_rule_set("010100").await);

    assert!(matches!(err, TransportError::ServerError { status: 500, .. }));
    assert!(started.elapsed() >= RETRY_DELAY * 3);
    assert_eq!(mock.request_count().await, 4);
}

#[tokio::test]
async fn test_bad_gateway_recovers() {
    let mock = VipCoreMock::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .respond_with(wiremock::ResponseTemplate::new(502))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(mock.server())
        .await;
    mock.on_library_rules(
        json!({"agencyId": "010100"}),
        200,
        fixtures::library_rules_response(&[fixtures::rule_set_010100()]),
        1,
    )
    .await;
    let client = LibraryRulesClient::open(&config(&mock.uri())).unwrap();

    let rule_set = client.get_rule_set("010100").await.unwrap();
    assert_eq!(rule_set.agency_id, "010100");
    assert_eq!(mock.request_count().await, 3);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mock = VipCoreMock::start().await;
    mock.on_library_rules(json!({}), 400, fixtures::error_body("error_in_request"), 1)
        .await;
    let client = LibraryRulesClient::open(&config(&mock.uri())).unwrap();

    let result = client.get_rule_set("sdfsdf").await;
    assert!(matches!(result, Err(VipCoreError::Application(_))));
    assert_eq!(mock.request_count().await, 1);
}

#[tokio::test]
async fn test_connection_refused_is_retried() {
    // Bind then drop a listener to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ServiceClient::open(&config(&format!("http://127.0.0.1:{port}"))).unwrap();

    let started = Instant::now();
    let err = transport_error(client.get_information("010100").await);

    assert!(matches!(err, TransportError::Request { .. }));
    assert!(err.is_retryable());
    assert!(started.elapsed() >= RETRY_DELAY * 3);
}

#[tokio::test]
async fn test_retries_can_be_disabled() {
    let mock = VipCoreMock::start().await;
    mock.on_raw(LIBRARY_RULES_PATH, 502, "", 1).await;
    let config = config(&mock.uri()).with_retry(RetryConfig::default().without_retries());
    let client = LibraryRulesClient::open(&config).unwrap();

    let err = transport_error(client.get_rule_set("010100").await);
    assert!(matches!(err, TransportError::ServerError { status: 502, .. }));
}

#[tokio::test]
async fn test_base_path_is_kept() {
    let mock = VipCoreMock::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .and(wiremock::matchers::path("/vipcore/api/1.0/api/libraryrules"))
        .respond_with(
            wiremock::ResponseTemplate::new(200)
                .set_body_json(fixtures::library_rules_response(&[fixtures::rule_set_010100()])),
        )
        .expect(1)
        .mount(mock.server())
        .await;
    let client =
        LibraryRulesClient::open(&config(&format!("{}/vipcore/api", mock.uri()))).unwrap();

    assert!(client.has_feature("010100", "auth_root").await.unwrap());
}

#[tokio::test]
async fn test_shared_transport_close() {
    let mock = VipCoreMock::start().await;
    let transport = Arc::new(Transport::new(&config(&mock.uri())).unwrap());
    let rules = LibraryRulesClient::new(Arc::clone(&transport), Duration::from_secs(60));
    let service = ServiceClient::new(Arc::clone(&transport), Duration::from_secs(60));

    rules.close();
    service.close();
    assert!(transport.is_closed());

    let err = transport_error(service.get_information("010100").await);
    assert!(matches!(err, TransportError::Closed));
    assert_eq!(mock.request_count().await, 0);
}
