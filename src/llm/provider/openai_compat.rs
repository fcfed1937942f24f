// src/llm/provider/openai_compat.rs
// OpenAI-compatible chat completions provider (Groq by default)

use super::{CompletionProvider, CompletionRequest, CompletionResponse};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

pub struct OpenAiCompatProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    #[serde(default)]
    message: Option<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatProvider {
    /// `base_url` is the API root, e.g. `https://api.groq.com/openai/v1`
    pub fn new(api_key: String, base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatProvider {
    fn name(&self) -> &'static str {
        "openai-compat"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let start = Instant::now();
        debug!(
            "Completion request: model={} messages={}",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Completion request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Completion API error {}: {}", status, error_text));
        }

        let raw: ApiResponse = response
            .json()
            .await
            .context("Malformed completion response")?;

        debug!(
            "Completion response: choices={} latency_ms={}",
            raw.choices.len(),
            start.elapsed().as_millis()
        );

        Ok(CompletionResponse {
            choices: raw
                .choices
                .into_iter()
                .map(|c| c.message.and_then(|m| m.content))
                .collect(),
        })
    }
}
