// src/client/transport.rs
// How the conversation client reaches the chat endpoint

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::api::types::{ChatRequest, ChatResponse};
use crate::error::{ChatError, ChatResult};

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// One request/response exchange. Returns the assistant reply text.
    async fn send(&self, request: &ChatRequest) -> ChatResult<String>;
}

/// JSON over HTTP against `POST <endpoint>`
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> ChatResult<String> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(ChatError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Transport(format!(
                "Request failed with {}: {}",
                status, body
            )));
        }

        let body: ChatResponse = response.json().await.map_err(ChatError::transport)?;
        match body {
            ChatResponse::Reply { reply } => Ok(reply),
            ChatResponse::Failure { error, details } => Err(ChatError::Provider(anyhow::anyhow!(
                "{}{}",
                error,
                details.map(|d| format!(": {}", d)).unwrap_or_default()
            ))),
        }
    }
}
