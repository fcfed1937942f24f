// src/client/mod.rs
// Conversation Client: drives one chat session against the chat endpoint

pub mod launch;
pub mod repl;
pub mod session;
pub mod transport;

pub use launch::{DEFAULT_ENDPOINT, LaunchOptions};
pub use repl::Repl;
pub use session::{
    APOLOGY_REPLY, ConversationClient, IgnoreReason, NoopHooks, SessionHooks, SessionState,
    SubmitOutcome,
};
pub use transport::{ChatTransport, HttpTransport};
