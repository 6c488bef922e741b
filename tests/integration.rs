//! Integration tests for libhyperspace against a mock hsd API.

mod common;

use std::time::Duration;

use libhyperspace::{CallOptions, Connection, Error, HsdClient};
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{test_client, unused_address, MockDaemon};

#[tokio::test]
async fn is_running_when_gateway_answers() {
    let hsd = MockDaemon::start().await;
    hsd.mock_gateway_ok().await;

    assert!(test_client().is_running(hsd.address.clone()).await);
}

#[tokio::test]
async fn not_running_on_network_error() {
    assert!(!test_client().is_running(unused_address()).await);
}

#[tokio::test]
async fn not_running_on_error_status() {
    let hsd = MockDaemon::start().await;
    hsd.mock_gateway_status(500).await;

    assert!(!test_client().is_running(hsd.address.clone()).await);
}

#[tokio::test]
async fn connect_unreachable_returns_sentinel() {
    let client = test_client();
    let address = unused_address();

    let first = client.connect(address.clone()).await.unwrap_err();
    let second = client.connect(address).await.unwrap_err();

    assert!(matches!(first, Error::CouldNotConnect));
    assert!(matches!(second, Error::CouldNotConnect));
    assert_eq!(first.to_string(), second.to_string());
}

#[tokio::test]
async fn try_connect_reports_unreachable() {
    let connection = test_client().try_connect(unused_address()).await;
    assert!(matches!(connection, Connection::Unreachable));
}

#[tokio::test]
async fn connect_returns_working_session() {
    let hsd = MockDaemon::start().await;
    hsd.mock_gateway_ok().await;

    let session = test_client().connect(hsd.address.clone()).await.unwrap();
    assert_eq!(session.address(), &hsd.address);
    assert!(session.is_running().await);

    let gateway = session.call("/gateway").await.unwrap();
    assert_eq!(gateway, json!("success"));
}

#[tokio::test]
async fn session_notices_daemon_going_away() {
    let hsd = MockDaemon::start().await;
    hsd.mock_gateway_ok().await;

    let session = test_client().connect(hsd.address.clone()).await.unwrap();
    hsd.server.reset().await;
    hsd.mock_gateway_status(503).await;

    assert!(!session.is_running().await);
}

#[tokio::test]
async fn call_returns_json_body() {
    let hsd = MockDaemon::start().await;
    hsd.mock_json("GET", "/consensus", 200, json!({"height": 1234, "synced": true}))
        .await;

    let body = test_client()
        .call(hsd.address.clone(), "/consensus")
        .await
        .unwrap();
    assert_eq!(body["height"], 1234);
    assert_eq!(body["synced"], true);
}

#[tokio::test]
async fn call_rejects_with_body_on_error_status() {
    let hsd = MockDaemon::start().await;
    hsd.mock_json("GET", "/wallet", 400, json!({"message": "wallet is locked"}))
        .await;

    let err = test_client()
        .call(hsd.address.clone(), "/wallet")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.response_body(), Some(&json!({"message": "wallet is locked"})));
}

#[tokio::test]
async fn call_rejects_with_transport_error() {
    let err = test_client()
        .call(unused_address(), "/gateway")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn call_sends_identifying_headers() {
    let hsd = MockDaemon::start().await;
    Mock::given(method("GET"))
        .and(path("/daemon/version"))
        .and(header("User-Agent", "Hyperspace-Agent"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "1.0.0"})))
        .expect(1)
        .mount(&hsd.server)
        .await;

    let body = test_client()
        .call(hsd.address.clone(), "/daemon/version")
        .await
        .unwrap();
    assert_eq!(body["version"], "1.0.0");
}

#[tokio::test]
async fn call_sends_query_parameters() {
    let hsd = MockDaemon::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .and(query_param("test", "test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&hsd.server)
        .await;

    let body = test_client()
        .call(
            hsd.address.clone(),
            CallOptions::new("/test").query("test", "test"),
        )
        .await
        .unwrap();
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn call_posts_json_body() {
    let hsd = MockDaemon::start().await;
    Mock::given(method("POST"))
        .and(path("/wallet/unlock"))
        .and(body_json(json!({"encryptionpassword": "hunter2"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&hsd.server)
        .await;

    let body = test_client()
        .call(
            hsd.address.clone(),
            CallOptions::post("/wallet/unlock").json(json!({"encryptionpassword": "hunter2"})),
        )
        .await
        .unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn call_times_out() {
    let hsd = MockDaemon::start().await;
    hsd.mock_slow("/slow", Duration::from_secs(5)).await;

    let err = test_client()
        .call(
            hsd.address.clone(),
            CallOptions::new("/slow").timeout(Duration::from_millis(200)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout(t) if t == Duration::from_millis(200)));
}

#[tokio::test]
async fn call_as_deserializes_body() {
    #[derive(Debug, Deserialize)]
    struct Consensus {
        height: u64,
        synced: bool,
    }

    let hsd = MockDaemon::start().await;
    hsd.mock_gateway_ok().await;
    hsd.mock_json("GET", "/consensus", 200, json!({"height": 7, "synced": false}))
        .await;

    let session = test_client().connect(hsd.address.clone()).await.unwrap();
    let consensus: Consensus = session.call_as("/consensus").await.unwrap();
    assert_eq!(consensus.height, 7);
    assert!(!consensus.synced);

    let err = session.call_as::<Consensus>("/gateway").await.unwrap_err();
    match err {
        Error::JsonParse { message, .. } => assert!(message.contains("\"success\"")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn pool_caps_concurrent_requests() {
    let hsd = MockDaemon::start().await;
    hsd.mock_slow("/slow", Duration::from_secs(1)).await;

    let client = HsdClient::builder().max_sockets(2).build().unwrap();
    let mut handles = Vec::new();
    for _ in 0..5 {
        let client = client.clone();
        let address = hsd.address.clone();
        handles.push(tokio::spawn(async move { client.call(address, "/slow").await }));
    }

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(hsd.request_count().await, 2);
    assert_eq!(client.agent().available_sockets(&hsd.address), 0);

    for result in futures::future::join_all(handles).await {
        assert!(result.unwrap().is_ok());
    }
    assert_eq!(hsd.request_count().await, 5);
    assert_eq!(client.agent().available_sockets(&hsd.address), 2);
}

#[tokio::test]
async fn saturated_daemon_does_not_block_another() {
    let busy = MockDaemon::start().await;
    busy.mock_slow("/slow", Duration::from_secs(3)).await;
    let other = MockDaemon::start().await;
    other.mock_gateway_ok().await;

    let client = HsdClient::builder().max_sockets(2).build().unwrap();
    let mut handles = Vec::new();
    for _ in 0..2 {
        let client = client.clone();
        let address = busy.address.clone();
        handles.push(tokio::spawn(async move { client.call(address, "/slow").await }));
    }
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(client.agent().available_sockets(&busy.address), 0);

    let body = client
        .call(
            other.address.clone(),
            CallOptions::new("/gateway").timeout(Duration::from_secs(1)),
        )
        .await
        .unwrap();
    assert_eq!(body, json!("success"));
    assert_eq!(client.agent().available_sockets(&other.address), 2);

    for result in futures::future::join_all(handles).await {
        assert!(result.unwrap().is_ok());
    }
}

#[tokio::test]
async fn timed_out_request_frees_its_socket() {
    let hsd = MockDaemon::start().await;
    hsd.mock_slow("/slow", Duration::from_secs(5)).await;
    hsd.mock_gateway_ok().await;

    let client = HsdClient::builder().max_sockets(1).build().unwrap();
    let err = client
        .call(
            hsd.address.clone(),
            CallOptions::new("/slow").timeout(Duration::from_millis(100)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(_)));

    assert_eq!(client.agent().available_sockets(&hsd.address), 1);
    assert!(client.is_running(hsd.address.clone()).await);
}
