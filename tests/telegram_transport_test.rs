//! TelegramTransport against a mocked Bot API (wiremock)

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use relaybot::core::error::AppError;
use relaybot::telegram::transport::notify_best_effort;
use relaybot::telegram::{ChatTransport, MessageHandle, TelegramTransport};

const CHAT_ID: i64 = 123456789;

fn message_json(message_id: i32, text: &str) -> serde_json::Value {
    serde_json::json!({
        "ok": true,
        "result": {
            "message_id": message_id,
            "from": {
                "id": 987654321,
                "is_bot": true,
                "first_name": "TestBot",
                "username": "test_bot"
            },
            "chat": {
                "id": CHAT_ID,
                "first_name": "Test",
                "type": "private"
            },
            "date": 1735992000,
            "text": text
        }
    })
}

async fn transport_for(server: &MockServer) -> TelegramTransport {
    let bot = teloxide::Bot::new("test_token_12345:ABCDEF").set_api_url(server.uri().parse().unwrap());
    TelegramTransport::new(bot)
}

#[tokio::test]
async fn test_send_text_returns_editable_handle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex("/bot[^/]+/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_json(42, "🔍 Checking link...")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex("/bot[^/]+/editMessageText"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_json(42, "📥 Downloading...")))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server).await;
    let handle = transport.send_text(CHAT_ID, "🔍 Checking link...").await.unwrap();

    assert_eq!(
        handle,
        MessageHandle {
            chat_id: CHAT_ID,
            message_id: 42
        }
    );
    transport.edit_text(handle, "📥 Downloading...").await.unwrap();
}

#[tokio::test]
async fn test_rejected_edit_is_an_error_but_best_effort_swallows_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex("/bot[^/]+/editMessageText"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: message is not modified"
        })))
        .mount(&server)
        .await;

    let transport = transport_for(&server).await;
    let handle = MessageHandle {
        chat_id: CHAT_ID,
        message_id: 7,
    };

    let result = transport.edit_text(handle, "same text").await;
    assert!(matches!(result, Err(AppError::Telegram(_))), "{:?}", result);

    notify_best_effort(&transport, Some(handle), "same text").await;
}
