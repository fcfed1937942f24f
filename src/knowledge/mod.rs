// src/knowledge/mod.rs
// Knowledge Store: read-only source of portfolio records

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod sqlite;

pub use sqlite::SqliteKnowledgeStore;

/// One portfolio fact. Any column may be absent; formatting substitutes
/// a placeholder instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct KnowledgeRecord {
    pub project: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
}

/// How the assembler asks the store for context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalPolicy {
    /// Records whose content contains the question (case-insensitive),
    /// at most `limit` of them
    Match { limit: usize },
    /// Every record, ordered by project
    All,
}

impl Default for RetrievalPolicy {
    fn default() -> Self {
        RetrievalPolicy::Match { limit: 5 }
    }
}

#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Case-insensitive substring search over `content`, capped at `limit`
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<KnowledgeRecord>>;

    /// All records ordered by `project` ascending
    async fn all(&self) -> Result<Vec<KnowledgeRecord>>;

    /// Dispatch on the configured policy
    async fn retrieve(&self, query: &str, policy: RetrievalPolicy) -> Result<Vec<KnowledgeRecord>> {
        match policy {
            RetrievalPolicy::Match { limit } => self.search(query, limit).await,
            RetrievalPolicy::All => self.all().await,
        }
    }
}
