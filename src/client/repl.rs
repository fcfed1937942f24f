//! Interactive REPL for the portfolio chat
//!
//! Each line is submitted through the [`ConversationClient`]; a spinner is
//! shown while the request is pending and replies are printed as they land
//! in the log.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::launch::LaunchOptions;
use super::session::{ConversationClient, IgnoreReason, SessionHooks, SubmitOutcome};
use super::transport::HttpTransport;
use crate::api::types::{Message, Role};

/// Terminal rendering of session transitions
#[derive(Default)]
struct TerminalHooks {
    spinner: Mutex<Option<ProgressBar>>,
    rendered: AtomicUsize,
}

impl SessionHooks for TerminalHooks {
    fn on_pending(&self) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn on_idle(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(spinner) = slot.take() {
                spinner.finish_and_clear();
            }
        }
    }

    fn on_messages(&self, messages: &[Message]) {
        // The user already sees what they typed; only print new replies
        let seen = self.rendered.swap(messages.len(), Ordering::SeqCst);
        for msg in messages.iter().skip(seen.min(messages.len())) {
            if msg.role == Role::Assistant {
                self.print_reply(&msg.content);
            }
        }
    }
}

impl TerminalHooks {
    fn print_reply(&self, content: &str) {
        let print = || println!("\n{}\n", content);
        match self.spinner.lock().ok().and_then(|slot| slot.clone()) {
            Some(spinner) => spinner.suspend(print),
            None => print(),
        }
    }
}

pub struct Repl {
    editor: DefaultEditor,
    client: ConversationClient,
    options: LaunchOptions,
}

impl Repl {
    pub fn new(options: LaunchOptions) -> Result<Self> {
        let editor = DefaultEditor::new()?;
        let transport = Arc::new(HttpTransport::new(options.endpoint.clone()));
        let client = ConversationClient::with_hooks(transport, Arc::new(TerminalHooks::default()));

        Ok(Self {
            editor,
            client,
            options,
        })
    }

    /// Run the REPL loop
    pub async fn run(&mut self) -> Result<()> {
        if !self.options.hide_launcher {
            println!("Ask about the portfolio ({})", self.options.endpoint);
            println!("Type your question (Ctrl+D to exit, /help for commands)");
            println!();
        }

        loop {
            match self.editor.readline(">>> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(&line)?;

                    if trimmed.starts_with('/') {
                        if !self.handle_command(trimmed).await {
                            break;
                        }
                        continue;
                    }

                    self.client.set_input(line).await;
                    if let SubmitOutcome::Ignored(IgnoreReason::RequestPending) =
                        self.client.submit_input().await
                    {
                        println!("Still waiting on the previous answer.");
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Returns false when the loop should stop
    async fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            "/help" => {
                println!("Commands:");
                println!("  /help     - Show this help");
                println!("  /history  - Show the conversation so far");
                println!("  /clear    - Start a new conversation");
                println!("  /quit     - Exit");
            }
            "/history" => {
                let messages = self.client.messages().await;
                if messages.is_empty() {
                    println!("No messages yet.");
                }
                for msg in messages {
                    println!("[{}] {}", msg.role.as_str(), msg.content);
                }
            }
            "/clear" => {
                if self.client.reset().await {
                    println!("Conversation cleared.");
                }
            }
            "/quit" | "/exit" => return false,
            other => println!("Unknown command: {} (try /help)", other),
        }
        true
    }
}
