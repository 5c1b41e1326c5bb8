//! Integration tests for slack-webhook.
//!
//! Most tests run against a one-shot HTTP responder bound to localhost, so
//! no Slack workspace is needed.
//!
//! Run the test that posts to a real webhook:
//!   SLACK_WEBHOOK_URL=https://hooks.slack.com/... cargo test --test integration_tests -- --ignored

use std::env;
use std::time::Duration;

use slack_webhook::{Attachment, SlackMessage, WebhookClient, WebhookConfig, WebhookError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accept a single request, answer with `status` and `reply`, and return the
/// raw request body.
async fn one_shot_server(status: u16, reply: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/services/T000/B000/XXXX", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers were read");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let content_length: usize = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .map(|v| v.trim().parse().unwrap())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {} Status\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reply.len(),
            reply
        );
        socket.write_all(response.as_bytes()).await.unwrap();

        String::from_utf8(buf[header_end..].to_vec()).unwrap()
    });

    (url, handle)
}

fn sample_message() -> SlackMessage {
    SlackMessage::new("[Warning] Disk almost full", "Disk *almost* full on `db-01`")
        .with_username("Seq")
        .with_icon_url("https://getseq.net/images/nuget/seq-apps.png")
        .with_attachment(Attachment::new("#f9c019", "free: 3%"))
}

// ============================================================================
// Unit tests (no network required)
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_client_rejects_invalid_config() {
        let result = WebhookClient::new(WebhookConfig::new("hooks.slack.com"));
        assert!(matches!(result, Err(WebhookError::Config(_))));
    }

    #[test]
    fn test_client_debug_hides_url() {
        let client =
            WebhookClient::new(WebhookConfig::new("https://hooks.slack.com/services/SECRET"))
                .unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("SECRET"));
    }

    #[test]
    fn test_client_with_proxy() {
        let config = WebhookConfig::new("https://hooks.slack.com/services/T/B/X")
            .with_proxy("http://127.0.0.1:3128");
        let client = WebhookClient::new(config).unwrap();
        assert_eq!(client.config().proxy.as_deref(), Some("http://127.0.0.1:3128"));
    }
}

// ============================================================================
// Local responder tests
// ============================================================================

mod post_tests {
    use super::*;

    #[tokio::test]
    async fn test_post_sends_json_payload() {
        let (url, server) = one_shot_server(200, "ok").await;
        let client = WebhookClient::new(WebhookConfig::new(url)).unwrap();

        client.send(&sample_message()).await.unwrap();

        let body = server.await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["text"], "[Warning] Disk almost full");
        assert_eq!(value["blocks"][0]["text"]["text"], "Disk *almost* full on `db-01`");
        assert_eq!(value["username"], "Seq");
        assert_eq!(value["attachments"][0]["color"], "#f9c019");
        assert!(value.get("channel").is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let (url, server) = one_shot_server(404, "no_service").await;
        let client = WebhookClient::new(WebhookConfig::new(url)).unwrap();

        let result = client.send(&sample_message()).await;
        server.await.unwrap();

        match result {
            Err(WebhookError::Status { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "no_service");
            }
            other => panic!("Expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_post_to_explicit_url() {
        let (url, server) = one_shot_server(200, "ok").await;
        let client =
            WebhookClient::new(WebhookConfig::new("https://hooks.slack.com/services/unused"))
                .unwrap();

        client.post(&url, &sample_message()).await.unwrap();
        assert!(!server.await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let config = WebhookConfig::new("http://127.0.0.1:9/hook")
            .with_timeout(Duration::from_secs(2));
        let client = WebhookClient::new(config).unwrap();

        match client.send(&sample_message()).await {
            Err(WebhookError::Http(_)) => {}
            other => panic!("Expected HTTP error, got {:?}", other),
        }
    }
}

// ============================================================================
// Live tests (require SLACK_WEBHOOK_URL)
// ============================================================================

mod live_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires SLACK_WEBHOOK_URL"]
    async fn test_post_to_slack() {
        let _ = dotenvy::dotenv();
        let url = env::var("SLACK_WEBHOOK_URL").expect("SLACK_WEBHOOK_URL not set");
        let client = WebhookClient::new(WebhookConfig::new(url)).unwrap();
        client.send(&sample_message()).await.unwrap();
    }
}
