// tests/http_roundtrip.rs
// Real sockets: provider client against a fake completion API, and the
// conversation client against the chat router.


use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use folio::api::types::Message;
use folio::client::{
    APOLOGY_REPLY, ChatTransport, ConversationClient, HttpTransport, LaunchOptions, SubmitOutcome,
};
use folio::llm::{
    ChatMessage, CompletionProvider, CompletionRequest, CompletionSettings, OpenAiCompatProvider,
};
use folio::api::types::{ChatRequest, Role};

use test_helpers::{EchoPromptProvider, StubStore, banking_record, create_test_app};

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Fake OpenAI-compatible endpoint: echoes model/auth/last message
async fn fake_completions(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let last = body["messages"]
        .as_array()
        .and_then(|m| m.last())
        .map(|m| m["content"].clone())
        .unwrap_or(Value::Null);

    match last.as_str() {
        Some("explode") => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": { "message": "over capacity" } })),
        ),
        Some("silence") => (
            StatusCode::OK,
            Json(json!({ "choices": [{ "message": { "role": "assistant", "content": null } }] })),
        ),
        Some("stall") => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, Json(json!({ "choices": [] })))
        }
        _ => (
            StatusCode::OK,
            Json(json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": format!(
                            "{}|{}|{}|{}",
                            body["model"].as_str().unwrap_or_default(),
                            body["temperature"],
                            body["max_tokens"],
                            auth
                        )
                    }
                }]
            })),
        ),
    }
}

fn request_with(content: &str) -> CompletionRequest {
    CompletionRequest::new(
        vec![
            ChatMessage::from(&Message::system("sys")),
            ChatMessage::from(&Message::user(content)),
        ],
        &CompletionSettings::default(),
    )
}

async fn fake_provider(timeout: Option<Duration>) -> OpenAiCompatProvider {
    let addr = spawn(Router::new().route("/v1/chat/completions", post(fake_completions))).await;
    OpenAiCompatProvider::new("test-key".into(), format!("http://{}/v1", addr), timeout).unwrap()
}

#[tokio::test]
async fn test_provider_sends_openai_compatible_request() {
    let provider = fake_provider(None).await;

    let response = provider.complete(request_with("hello")).await.unwrap();

    assert_eq!(
        response.first_content(),
        Some("llama-3.3-70b-versatile|0.7|500|Bearer test-key")
    );
}

#[tokio::test]
async fn test_provider_error_status_is_error() {
    let provider = fake_provider(None).await;

    let err = provider.complete(request_with("explode")).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("503"), "{message}");
    assert!(message.contains("over capacity"), "{message}");
}

#[tokio::test]
async fn test_provider_null_content_is_empty_choice() {
    let provider = fake_provider(None).await;

    let response = provider.complete(request_with("silence")).await.unwrap();
    assert_eq!(response.choices, vec![None]);
    assert_eq!(response.first_content(), None);
}

#[tokio::test]
async fn test_provider_timeout_is_error() {
    let provider = fake_provider(Some(Duration::from_millis(200))).await;
    assert!(provider.complete(request_with("stall")).await.is_err());
}

#[tokio::test]
async fn test_client_against_chat_server() {
    let app = create_test_app(
        Arc::new(StubStore::with(vec![banking_record()])),
        Arc::new(EchoPromptProvider::default()),
    );
    let addr = spawn(app).await;

    let options = LaunchOptions::resolve(&format!("http://{}/?hideButton=true", addr), None).unwrap();
    assert!(options.hide_launcher);

    let client = ConversationClient::new(Arc::new(HttpTransport::new(options.endpoint)));
    let outcome = client.submit("Tell me about the banking project").await;

    let SubmitOutcome::Sent { reply, failed } = outcome else {
        panic!("submission was ignored");
    };
    assert!(!failed);
    assert_eq!(reply.role, Role::Assistant);
    assert!(reply.content.contains("Mobile Banking Redesign"));

    let messages = client.messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], Message::user("Tell me about the banking project"));
}

#[tokio::test]
async fn test_client_renders_apology_on_server_error() {
    let app = create_test_app(
        Arc::new(StubStore::default()),
        Arc::new(EchoPromptProvider::failing("boom")),
    );
    let addr = spawn(app).await;
    let endpoint = format!("http://{}/chat", addr).parse().unwrap();

    let transport = HttpTransport::new(endpoint);
    let err = transport
        .send(&ChatRequest::new("hi", vec![Message::user("hi")]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("500"));

    let client = ConversationClient::new(Arc::new(transport));
    let outcome = client.submit("hi").await;
    assert_eq!(
        outcome,
        SubmitOutcome::Sent {
            reply: Message::assistant(APOLOGY_REPLY),
            failed: true
        }
    );
}

#[tokio::test]
async fn test_client_unreachable_server() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint = format!("http://{}/chat", addr).parse().unwrap();
    let client = ConversationClient::new(Arc::new(HttpTransport::new(endpoint)));

    let outcome = client.submit("anyone there?").await;
    assert!(matches!(outcome, SubmitOutcome::Sent { failed: true, .. }));
    assert!(!client.is_loading().await);
}
