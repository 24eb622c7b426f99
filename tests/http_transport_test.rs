mod common;

use pay_notify_relay::application::relay::{Ack, Relay};
use pay_notify_relay::domain::config::{Deployment, EnvironmentConfig};
use pay_notify_relay::domain::event::{Amount, PaymentEvent};
use pay_notify_relay::error::RelayError;
use pay_notify_relay::infrastructure::http::{JSON_CONTENT_TYPE, ReqwestTransport};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn event() -> PaymentEvent {
    PaymentEvent::new(Amount::new("0.01").unwrap(), 1_700_000_000_000)
}

fn dev_config(server: &MockServer) -> EnvironmentConfig {
    Deployment::new(server.uri(), "http://prod.invalid", common::SECRET).snapshot(false)
}

fn relay(timeout: Duration) -> Relay {
    Relay::new(Box::new(ReqwestTransport::new(timeout).unwrap()))
}

#[tokio::test]
async fn test_posts_signed_json_to_payment_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payment"))
        .and(header("content-type", JSON_CONTENT_TYPE))
        .and(body_json(serde_json::json!({
            "amount": "0.01",
            "time": 1_700_000_000_000i64,
            "signature": "88a61086b64d86c97785d25c91283eb79bd7fa73db70116eaa2984798c0f49c4",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = dev_config(&server);
    let ack = relay(Duration::from_secs(5)).relay(&event(), &config).await.unwrap();

    assert_eq!(ack, Ack { status: 200 });
}

#[tokio::test]
async fn test_prod_toggle_targets_prod_host() {
    let dev = common::payment_server(200).await;
    let prod = common::payment_server(201).await;
    let deployment = Deployment::new(dev.uri(), prod.uri(), common::SECRET);
    let relay = relay(Duration::from_secs(5));

    relay.relay(&event(), &deployment.snapshot(false)).await.unwrap();
    let ack = relay.relay(&event(), &deployment.snapshot(true)).await.unwrap();

    assert_eq!(ack.status, 201);
    let dev_requests = dev.received_requests().await.unwrap();
    let prod_requests = prod.received_requests().await.unwrap();
    assert_eq!(dev_requests.len(), 1);
    assert_eq!(prod_requests.len(), 1);
    // Only the host changes between environments.
    assert_eq!(dev_requests[0].body, prod_requests[0].body);
}

#[tokio::test]
async fn test_server_error_is_rejection_not_transport_failure() {
    let server = common::payment_server(500).await;
    let config = dev_config(&server);

    let err = relay(Duration::from_secs(5)).relay(&event(), &config).await.unwrap_err();

    assert_eq!(err, RelayError::ServerRejected { status: 500 });
    // No retry.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop a listener to get a port nothing is listening on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Deployment::new(format!("http://{}", addr), "http://prod.invalid", common::SECRET)
        .snapshot(false);
    let err = relay(Duration::from_secs(5)).relay(&event(), &config).await.unwrap_err();

    assert!(matches!(err, RelayError::TransportError(_)));
}

#[tokio::test]
async fn test_slow_server_hits_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = dev_config(&server);
    let err = relay(Duration::from_millis(200))
        .relay(&event(), &config)
        .await
        .unwrap_err();

    match err {
        RelayError::TransportError(message) => assert!(message.starts_with("timeout")),
        other => panic!("expected transport error, got {:?}", other),
    }
}
