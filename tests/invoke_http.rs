//! Wire-level tests for the invocation route.
//!
//! Each test spins up the Axum router on a random port and posts a real
//! event payload, asserting the `{statusCode, body}` response shape.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use mailrelay::config::{RelayConfig, SmtpConfig, StorageConfig};
use mailrelay::error::{StorageError, TransportError};
use mailrelay::handler::Forwarder;
use mailrelay::server::invoke_routes;
use mailrelay::transport::{MailTransport, ObjectStore};

struct FakeStore {
    objects: HashMap<(String, String), Vec<u8>>,
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn fetch_raw(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}

struct FakeMailer {
    sent: Mutex<usize>,
}

#[async_trait]
impl MailTransport for FakeMailer {
    async fn send_raw(
        &self,
        _from: &str,
        _destinations: &[String],
        _raw: &[u8],
    ) -> Result<String, TransportError> {
        let mut sent = self.sent.lock().unwrap();
        *sent += 1;
        Ok(format!("fake-message-{sent}"))
    }
}

/// Start the router on a random port; returns the port and the mailer.
async fn start_server() -> (u16, Arc<FakeMailer>) {
    let mut objects = HashMap::new();
    objects.insert(
        ("mail-bucket".to_string(), "inbox/m-1".to_string()),
        b"From: sender@example.com\r\n\r\nhi\r\n".to_vec(),
    );
    let store = Arc::new(FakeStore { objects });
    let mailer = Arc::new(FakeMailer {
        sent: Mutex::new(0),
    });

    let config = RelayConfig {
        forward_to: "dest@forward.example".to_string(),
        domain: "rbios.net".to_string(),
        from_email: "noreply@rbios.net".to_string(),
        notify_only: false,
        storage: StorageConfig {
            endpoint: "http://localhost:9000".to_string(),
        },
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            port: 25,
            credentials: None,
        },
        bind_addr: "127.0.0.1:0".parse().unwrap(),
    };

    let forwarder = Arc::new(Forwarder::new(config, store, mailer.clone()));
    let app = invoke_routes(forwarder);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (port, mailer)
}

fn receipt_event() -> Value {
    json!({
        "Records": [{
            "ses": {
                "mail": {
                    "messageId": "m-1",
                    "commonHeaders": {
                        "from": ["sender@example.com"],
                        "to": ["user@rbios.net"],
                        "subject": "Hello",
                        "date": "Mon, 1 Sep 2025 10:00:00 +0000"
                    }
                },
                "receipt": {
                    "action": { "bucketName": "mail-bucket", "objectKey": "inbox/m-1" }
                }
            }
        }]
    })
}

#[tokio::test]
async fn invoke_returns_the_invocation_contract() {
    let (port, mailer) = start_server().await;

    let response = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{port}/invoke"))
        .json(&receipt_event())
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 200);
    assert_eq!(
        body["body"].as_str().unwrap(),
        "\"Email(s) processed successfully\""
    );
    assert_eq!(*mailer.sent.lock().unwrap(), 1);
}

#[tokio::test]
async fn invoke_with_malformed_event_reports_failure() {
    let (port, mailer) = start_server().await;

    let response = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{port}/invoke"))
        .json(&json!({ "not": "an event" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 500);
    assert!(body["body"].as_str().unwrap().contains("Error processing email"));
    assert_eq!(*mailer.sent.lock().unwrap(), 0);
}
