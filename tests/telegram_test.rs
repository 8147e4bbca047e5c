//! HTTP-level tests for [`TelegramClient`] envelope handling.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pandu::PanduError;
use pandu::chat::TelegramClient;

fn message_envelope() -> serde_json::Value {
    json!({
        "ok": true,
        "result": {"message_id": 10, "chat": {"id": 42}}
    })
}

#[tokio::test]
async fn send_message_unwraps_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot42:TEST/sendMessage"))
        .and(body_partial_json(json!({
            "chat_id": 42,
            "text": "halo",
            "parse_mode": "Markdown"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_envelope()))
        .expect(1)
        .mount(&server)
        .await;

    let client = TelegramClient::with_base_url("42:TEST", &server.uri());
    let message = client.send_message(42, "halo", None).await.unwrap();
    assert_eq!(message.message_id, 10);
    assert_eq!(message.chat.id, 42);
}

#[tokio::test]
async fn failed_envelope_becomes_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot42:TEST/editMessageText"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "description": "Bad Request: message is not modified"
        })))
        .mount(&server)
        .await;

    let client = TelegramClient::with_base_url("42:TEST", &server.uri());
    let err = client
        .edit_message_text(42, 10, "halo", None)
        .await
        .unwrap_err();

    match err {
        PanduError::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("not modified"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn get_updates_parses_batch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot42:TEST/getUpdates"))
        .and(body_partial_json(json!({"offset": 7})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [
                {
                    "update_id": 7,
                    "message": {
                        "message_id": 1,
                        "chat": {"id": 42},
                        "text": "/start"
                    }
                },
                {
                    "update_id": 8,
                    "callback_query": {
                        "id": "cb1",
                        "from": {"id": 9},
                        "data": "radius_500",
                        "message": {"message_id": 2, "chat": {"id": 42}}
                    }
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = TelegramClient::with_base_url("42:TEST", &server.uri());
    let updates = client.get_updates(Some(7)).await.unwrap();

    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].message.as_ref().unwrap().text.as_deref(), Some("/start"));
    assert_eq!(
        updates[1].callback_query.as_ref().unwrap().data.as_deref(),
        Some("radius_500")
    );
}

#[tokio::test]
async fn answer_callback_query_returns_flag() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot42:TEST/answerCallbackQuery"))
        .and(body_partial_json(json!({"callback_query_id": "cb1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
        .mount(&server)
        .await;

    let client = TelegramClient::with_base_url("42:TEST", &server.uri());
    assert!(client.answer_callback_query("cb1", Some("Siap")).await.unwrap());
}

#[tokio::test]
async fn transport_failure_becomes_http_error() {
    let client = TelegramClient::with_base_url("42:TEST", "http://127.0.0.1:9");
    let err = client.send_message(1, "halo", None).await.unwrap_err();
    assert!(matches!(err, PanduError::Http(_)));
}
