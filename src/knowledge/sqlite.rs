// src/knowledge/sqlite.rs
// SQLite-backed knowledge store (table: portfolio_knowledge)

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::debug;

use super::{KnowledgeRecord, KnowledgeStore};

#[derive(Clone)]
pub struct SqliteKnowledgeStore {
    pub pool: SqlitePool,
}

impl SqliteKnowledgeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`, creating the file if needed
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = database_url
            .parse::<sqlx::sqlite::SqliteConnectOptions>()
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open knowledge store at {}", database_url))?;

        Ok(Self::new(pool))
    }

    /// Create the table when missing. Rows are authored elsewhere.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS portfolio_knowledge (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project TEXT,
                type TEXT,
                title TEXT,
                content TEXT,
                tags TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create portfolio_knowledge table")?;

        Ok(())
    }
}

#[async_trait]
impl KnowledgeStore for SqliteKnowledgeStore {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<KnowledgeRecord>> {
        debug!("Knowledge search: limit={} query_len={}", limit, query.len());

        // instr() keeps '%' and '_' in the question literal
        let rows = sqlx::query_as::<_, KnowledgeRecord>(
            r#"
            SELECT project, type, title, content, tags
            FROM portfolio_knowledge
            WHERE instr(lower(content), lower($1)) > 0
            ORDER BY id
            LIMIT $2
            "#,
        )
        .bind(query)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .context("Failed to search portfolio knowledge")?;

        Ok(rows)
    }

    async fn all(&self) -> Result<Vec<KnowledgeRecord>> {
        let rows = sqlx::query_as::<_, KnowledgeRecord>(
            r#"
            SELECT project, type, title, content, tags
            FROM portfolio_knowledge
            ORDER BY project ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch portfolio knowledge")?;

        Ok(rows)
    }
}
