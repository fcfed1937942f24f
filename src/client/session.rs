// src/client/session.rs
// One chat session: ordered message log + single-flight Idle/Pending machine

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

use super::transport::ChatTransport;
use crate::api::types::{ChatRequest, Message};

/// Shown in place of a reply whenever the exchange fails
pub const APOLOGY_REPLY: &str =
    "Sorry, something went wrong on my end. Mind trying that again in a bit?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyInput,
    RequestPending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The exchange ran; `reply` is the assistant message appended to the
    /// log (the apology when `failed`)
    Sent { reply: Message, failed: bool },
    Ignored(IgnoreReason),
}

/// Side effects on state transitions (spinner, button toggle, scrolling)
pub trait SessionHooks: Send + Sync {
    /// Entered Pending; loading indicator on
    fn on_pending(&self) {}

    /// Entered Idle; loading indicator off
    fn on_idle(&self) {}

    /// The displayed log was replaced
    fn on_messages(&self, _messages: &[Message]) {}
}

pub struct NoopHooks;

impl SessionHooks for NoopHooks {}

#[derive(Debug)]
struct Inner {
    state: SessionState,
    messages: Vec<Message>,
    input: String,
}

pub struct ConversationClient {
    transport: Arc<dyn ChatTransport>,
    hooks: Arc<dyn SessionHooks>,
    inner: Mutex<Inner>,
}

impl ConversationClient {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self::with_hooks(transport, Arc::new(NoopHooks))
    }

    pub fn with_hooks(transport: Arc<dyn ChatTransport>, hooks: Arc<dyn SessionHooks>) -> Self {
        Self {
            transport,
            hooks,
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                messages: Vec::new(),
                input: String::new(),
            }),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    /// True exactly while a request is outstanding
    pub async fn is_loading(&self) -> bool {
        self.state().await == SessionState::Pending
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.inner.lock().await.messages.clone()
    }

    pub async fn input(&self) -> String {
        self.inner.lock().await.input.clone()
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        self.inner.lock().await.input = text.into();
    }

    /// Drop the log and start over. Refused while Pending.
    pub async fn reset(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.state == SessionState::Pending {
            return false;
        }
        inner.messages.clear();
        self.hooks.on_messages(&inner.messages);
        true
    }

    /// Submit the input field. The field is cleared as soon as the
    /// submission is accepted, whatever the outcome of the request.
    pub async fn submit_input(&self) -> SubmitOutcome {
        let request = {
            let mut inner = self.inner.lock().await;
            let text = inner.input.clone();
            match self.begin(&mut inner, &text) {
                Ok(request) => {
                    inner.input.clear();
                    request
                }
                Err(reason) => return SubmitOutcome::Ignored(reason),
            }
        };

        self.finish(request).await
    }

    /// Submit `text` directly, bypassing the input field
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let request = {
            let mut inner = self.inner.lock().await;
            match self.begin(&mut inner, text) {
                Ok(request) => request,
                Err(reason) => return SubmitOutcome::Ignored(reason),
            }
        };

        self.finish(request).await
    }

    /// Idle -> Pending. Appends the user message right away.
    fn begin(&self, inner: &mut Inner, text: &str) -> Result<ChatRequest, IgnoreReason> {
        let text = text.trim();
        if text.is_empty() {
            return Err(IgnoreReason::EmptyInput);
        }
        if inner.state == SessionState::Pending {
            return Err(IgnoreReason::RequestPending);
        }

        let mut history = inner.messages.clone();
        history.push(Message::user(text));

        inner.messages = history.clone();
        inner.state = SessionState::Pending;
        self.hooks.on_messages(&inner.messages);
        self.hooks.on_pending();

        Ok(ChatRequest::new(text, history))
    }

    /// Pending -> Idle with the reply (or apology) appended
    async fn finish(&self, request: ChatRequest) -> SubmitOutcome {
        let (reply, failed) = match self.transport.send(&request).await {
            Ok(text) => (Message::assistant(text), false),
            Err(e) => {
                error!("Chat error: {}", e);
                (Message::assistant(APOLOGY_REPLY), true)
            }
        };

        let mut messages = request.conversation_history;
        messages.push(reply.clone());

        let mut inner = self.inner.lock().await;
        inner.messages = messages;
        inner.state = SessionState::Idle;
        self.hooks.on_messages(&inner.messages);
        self.hooks.on_idle();

        SubmitOutcome::Sent { reply, failed }
    }
}
