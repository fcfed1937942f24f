//! HTTP server bootstrap for the chat endpoint
//!
//! Collaborators (knowledge store, completion provider) are created once
//! here and handed to the router as read-only state.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::http::{AppState, create_router};
use crate::chat::ContextAssembler;
use crate::config::FolioConfig;
use crate::knowledge::SqliteKnowledgeStore;
use crate::llm::OpenAiCompatProvider;

/// Wire the production collaborators from config
pub async fn build_state(config: &FolioConfig) -> Result<AppState> {
    let store = SqliteKnowledgeStore::connect(&config.database_url, config.sqlite_max_connections)
        .await?;
    store.ensure_schema().await?;

    let provider = OpenAiCompatProvider::new(
        config.llm_api_key.clone(),
        config.llm_base_url.clone(),
        config.llm_timeout(),
    )?;

    let assembler = ContextAssembler::new(
        Arc::new(store),
        Arc::new(provider),
        config.assembler_settings(),
    );

    Ok(AppState::new(assembler))
}

/// Serve on an already bound listener until the process stops
pub async fn serve(listener: TcpListener, state: AppState, cors_permissive: bool) -> Result<()> {
    let app = create_router(state, cors_permissive);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Run the HTTP server
pub async fn run(config: FolioConfig) -> Result<()> {
    info!("Model: {}", config.llm_model);
    info!("Retrieval: {:?}", config.retrieval_policy());

    let state = build_state(&config).await?;

    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("Chat API listening on http://{}/chat", bind_address);
    serve(listener, state, config.cors_permissive).await
}
