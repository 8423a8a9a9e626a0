//! Integration tests for the Telegram transport

use scalptrix::notify::{Notifier, TelegramNotifier};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123456:SECRET-token";

// Nothing listens on port 1, so every request fails at the transport level.
const UNREACHABLE: &str = "http://127.0.0.1:1";

#[tokio::test]
async fn transport_failure_does_not_expose_token() {
    let notifier = TelegramNotifier::with_base_url(
        reqwest::Client::new(),
        Some(TOKEN.to_string()),
        Some("42".to_string()),
        UNREACHABLE,
    );

    let report = notifier.send("hello").await;
    assert!(!report.delivered);
    assert!(report.detail.starts_with("transport error"), "{}", report.detail);
    assert!(!report.detail.contains(TOKEN), "{}", report.detail);
    assert!(!report.detail.contains("/bot"), "{}", report.detail);
}

#[tokio::test]
async fn chat_lookup_failure_does_not_expose_token() {
    let notifier = TelegramNotifier::with_base_url(
        reqwest::Client::new(),
        Some(TOKEN.to_string()),
        None,
        UNREACHABLE,
    );

    let err = notifier.recent_chats().await.unwrap_err();
    assert!(!err.to_string().contains(TOKEN), "{err}");
}

#[tokio::test]
async fn send_posts_html_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_partial_json(json!({ "chat_id": "42", "text": "<b>hi</b>", "parse_mode": "HTML" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::with_base_url(
        reqwest::Client::new(),
        Some(TOKEN.to_string()),
        Some("42".to_string()),
        server.uri(),
    );

    let report = notifier.send("<b>hi</b>").await;
    assert!(report.delivered);
}

#[tokio::test]
async fn missing_credentials_are_reported() {
    let notifier = TelegramNotifier::with_base_url(reqwest::Client::new(), None, None, UNREACHABLE);

    let report = notifier.send("hello").await;
    assert!(!report.delivered);
    assert_eq!(report.detail, "TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID is not set");
}
