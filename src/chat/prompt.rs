// src/chat/prompt.rs
// System instruction and message list construction

use crate::api::types::Message;
use crate::llm::provider::ChatMessage;

/// Persona, domain restriction and decline rule around the context block
pub fn build_system_prompt(context: &str) -> String {
    format!(
        "You are a helpful AI assistant for a UX/Product Designer's portfolio.

Your role:
- Answer questions about their work, projects, process, and experience
- Be concise and professional
- Focus on research → design decisions → outcomes
- If information isn't in the portfolio knowledge base, politely say you don't have that information

Portfolio Context:
{context}

Guidelines:
- Only discuss what's in the portfolio knowledge base
- Be friendly but professional
- Keep responses focused and relevant
- If asked about something not in the portfolio, say \"I don't have information about that in the portfolio\""
    )
}

/// The last `window` entries of `history`, in original order
pub fn history_window(history: &[Message], window: usize) -> &[Message] {
    &history[history.len().saturating_sub(window)..]
}

/// `[system, ...last `window` history entries, user]`. Older turns are
/// dropped, not summarized.
pub fn assemble_messages(
    system_prompt: &str,
    history: &[Message],
    window: usize,
    message: &str,
) -> Vec<ChatMessage> {
    let recent = history_window(history, window);

    let mut messages = Vec::with_capacity(recent.len() + 2);
    messages.push(ChatMessage::from(&Message::system(system_prompt)));
    messages.extend(recent.iter().map(ChatMessage::from));
    messages.push(ChatMessage::from(&Message::user(message)));
    messages
}
