// src/chat/assembler.rs
// Context Assembler: ChatRequest -> retrieval -> prompt -> completion -> reply

use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::api::types::ChatRequest;
use crate::error::{ChatError, ChatResult};
use crate::knowledge::{KnowledgeRecord, KnowledgeStore, RetrievalPolicy};
use crate::llm::provider::{CompletionProvider, CompletionRequest, CompletionSettings};

use super::context::format_context;
use super::prompt::{assemble_messages, build_system_prompt};

/// Reply used when the provider answers without any content
pub const FALLBACK_REPLY: &str = "I apologize, but I couldn't generate a response.";

#[derive(Debug, Clone, PartialEq)]
pub struct AssemblerSettings {
    pub retrieval: RetrievalPolicy,
    /// Prior turns forwarded with each question (6 = three exchanges)
    pub history_window: usize,
    pub completion: CompletionSettings,
}

impl Default for AssemblerSettings {
    fn default() -> Self {
        Self {
            retrieval: RetrievalPolicy::default(),
            history_window: 6,
            completion: CompletionSettings::default(),
        }
    }
}

/// Stateless per request; collaborators are injected once at startup
#[derive(Clone)]
pub struct ContextAssembler {
    store: Arc<dyn KnowledgeStore>,
    provider: Arc<dyn CompletionProvider>,
    settings: AssemblerSettings,
}

impl ContextAssembler {
    pub fn new(
        store: Arc<dyn KnowledgeStore>,
        provider: Arc<dyn CompletionProvider>,
        settings: AssemblerSettings,
    ) -> Self {
        Self {
            store,
            provider,
            settings,
        }
    }

    pub fn settings(&self) -> &AssemblerSettings {
        &self.settings
    }

    /// Retrieval never fails the request: store errors degrade to no records
    async fn retrieve(&self, question: &str) -> Vec<KnowledgeRecord> {
        match self.store.retrieve(question, self.settings.retrieval).await {
            Ok(records) => {
                debug!("Retrieved {} knowledge records", records.len());
                records
            }
            Err(e) => {
                let err = ChatError::Retrieval(e);
                warn!("{}", err);
                Vec::new()
            }
        }
    }

    /// Build the provider request for `request` (steps 1-3)
    pub async fn prepare(&self, request: &ChatRequest) -> CompletionRequest {
        let records = self.retrieve(&request.message).await;
        let context = format_context(&records);
        let system_prompt = build_system_prompt(&context);

        let messages = assemble_messages(
            &system_prompt,
            &request.conversation_history,
            self.settings.history_window,
            &request.message,
        );

        CompletionRequest::new(messages, &self.settings.completion)
    }

    /// Answer one validated request
    pub async fn answer(&self, request: &ChatRequest) -> ChatResult<String> {
        if request.message.trim().is_empty() {
            return Err(ChatError::InvalidInput);
        }

        let completion = self.prepare(request).await;

        let response = self.provider.complete(completion).await.map_err(|e| {
            error!("Completion provider '{}' failed: {:#}", self.provider.name(), e);
            ChatError::Provider(e)
        })?;

        Ok(response
            .first_content()
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_REPLY.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Message, Role};
    use crate::chat::context::NO_CONTEXT;
    use crate::llm::provider::CompletionResponse;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FixedStore {
        records: Vec<KnowledgeRecord>,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl KnowledgeStore for FixedStore {
        async fn search(&self, _query: &str, limit: usize) -> Result<Vec<KnowledgeRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            Ok(self.records.iter().take(limit).cloned().collect())
        }

        async fn all(&self) -> Result<Vec<KnowledgeRecord>> {
            self.search("", usize::MAX).await
        }
    }

    /// Records the request and answers with a canned response
    struct RecordingProvider {
        response: Result<CompletionResponse, String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl RecordingProvider {
        fn answering(response: CompletionResponse) -> Self {
            Self {
                response: Ok(response),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> CompletionRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl CompletionProvider for RecordingProvider {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            self.seen.lock().unwrap().push(request);
            self.response.clone().map_err(|e| anyhow!(e))
        }
    }

    fn banking() -> KnowledgeRecord {
        KnowledgeRecord {
            project: Some("Mobile Banking Redesign".into()),
            kind: Some("Case Study".into()),
            title: Some("Nav Overhaul".into()),
            content: Some("Streamlined navigation...".into()),
            tags: Some("UX Research".into()),
        }
    }

    fn assembler(store: FixedStore, provider: Arc<RecordingProvider>) -> ContextAssembler {
        ContextAssembler::new(Arc::new(store), provider, AssemblerSettings::default())
    }

    #[tokio::test]
    async fn test_record_embedded_in_system_prompt() {
        let provider = Arc::new(RecordingProvider::answering(CompletionResponse::single(
            "They redesigned mobile banking navigation.",
        )));
        let store = FixedStore {
            records: vec![banking()],
            ..Default::default()
        };

        let reply = assembler(store, provider.clone())
            .answer(&ChatRequest::new("Tell me about the banking project", vec![]))
            .await
            .unwrap();

        assert_eq!(reply, "They redesigned mobile banking navigation.");
        let sent = provider.last();
        assert!(sent.system_prompt().unwrap().contains("Mobile Banking Redesign"));
        assert_eq!(sent.temperature, 0.7);
        assert_eq!(sent.max_tokens, 500);
        assert_eq!(sent.messages.last().unwrap().role, Role::User);
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_sentinel() {
        let provider = Arc::new(RecordingProvider::answering(CompletionResponse::single("ok")));
        let store = FixedStore {
            fail: true,
            ..Default::default()
        };

        let reply = assembler(store, provider.clone())
            .answer(&ChatRequest::new("anything", vec![]))
            .await
            .unwrap();

        assert_eq!(reply, "ok");
        assert!(provider.last().system_prompt().unwrap().contains(NO_CONTEXT));
    }

    #[tokio::test]
    async fn test_empty_completion_uses_fallback() {
        for response in [CompletionResponse::default(), CompletionResponse::single("")] {
            let provider = Arc::new(RecordingProvider::answering(response));
            let reply = assembler(FixedStore::default(), provider)
                .answer(&ChatRequest::new("hi", vec![]))
                .await
                .unwrap();
            assert_eq!(reply, FALLBACK_REPLY);
        }
    }

    #[tokio::test]
    async fn test_provider_failure_is_provider_error() {
        let provider = Arc::new(RecordingProvider::failing("upstream 503"));
        let err = assembler(FixedStore::default(), provider)
            .answer(&ChatRequest::new("hi", vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Provider(_)));
        assert_eq!(err.to_string(), "upstream 503");
    }

    #[tokio::test]
    async fn test_blank_message_skips_collaborators() {
        let provider = Arc::new(RecordingProvider::answering(CompletionResponse::single("x")));
        let store = Arc::new(FixedStore::default());
        let assembler =
            ContextAssembler::new(store.clone(), provider.clone(), AssemblerSettings::default());

        let err = assembler.answer(&ChatRequest::new("  ", vec![])).await.unwrap_err();

        assert!(matches!(err, ChatError::InvalidInput));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_window_applied() {
        let provider = Arc::new(RecordingProvider::answering(CompletionResponse::single("ok")));
        let history: Vec<Message> = (0..10).map(|i| Message::user(format!("m{}", i))).collect();

        assembler(FixedStore::default(), provider.clone())
            .answer(&ChatRequest::new("latest", history))
            .await
            .unwrap();

        let sent = provider.last();
        let contents: Vec<_> = sent.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(&contents[1..], &["m4", "m5", "m6", "m7", "m8", "m9", "latest"]);
    }
}
