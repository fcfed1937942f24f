// src/config/mod.rs
// Process configuration, loaded once from .env + environment at startup

use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::chat::AssemblerSettings;
use crate::knowledge::RetrievalPolicy;
use crate::llm::provider::CompletionSettings;

#[derive(Debug, Clone)]
pub struct FolioConfig {
    // ── Server
    pub host: String,
    pub port: u16,
    pub cors_permissive: bool,

    // ── Knowledge store
    pub database_url: String,
    pub sqlite_max_connections: u32,
    pub retrieval_mode: String,
    pub retrieval_limit: usize,

    // ── Completion provider
    pub llm_base_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_temperature: f64,
    pub llm_max_tokens: u32,
    pub llm_timeout_secs: u64,

    // ── Prompt
    pub history_window: usize,
}

/// Reads `key` through `lookup`, strips trailing `# comments` and
/// whitespace, and parses it. Falls back to `default` when missing or
/// unparseable.
fn var_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(val) = lookup(key) else {
        return default;
    };

    let clean_val = val.split('#').next().unwrap_or("").trim();
    match clean_val.parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!("Config: {} = '{}' (parse failed, using default)", key, val);
            default
        }
    }
}

impl FolioConfig {
    /// Load from the process environment. `.env` is loaded once by the binary
    /// before this runs.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            host: var_or(&lookup, "FOLIO_HOST", "0.0.0.0".to_string()),
            port: var_or(&lookup, "FOLIO_PORT", 3001),
            cors_permissive: var_or(&lookup, "CORS_PERMISSIVE", false),
            database_url: var_or(&lookup, "DATABASE_URL", "sqlite:./folio.db".to_string()),
            sqlite_max_connections: var_or(&lookup, "SQLITE_MAX_CONNECTIONS", 5),
            retrieval_mode: var_or(&lookup, "RETRIEVAL_MODE", "match".to_string()),
            retrieval_limit: var_or(&lookup, "RETRIEVAL_LIMIT", 5),
            llm_base_url: var_or(
                &lookup,
                "LLM_BASE_URL",
                "https://api.groq.com/openai/v1".to_string(),
            ),
            llm_api_key: var_or(&lookup, "GROQ_API_KEY", String::new()),
            llm_model: var_or(&lookup, "LLM_MODEL", "llama-3.3-70b-versatile".to_string()),
            llm_temperature: var_or(&lookup, "LLM_TEMPERATURE", 0.7),
            llm_max_tokens: var_or(&lookup, "LLM_MAX_TOKENS", 500),
            llm_timeout_secs: var_or(&lookup, "LLM_TIMEOUT_SECS", 60),
            history_window: var_or(&lookup, "HISTORY_WINDOW", 6),
        };

        if config.llm_api_key.is_empty() {
            warn!("Missing GROQ_API_KEY, completion calls will be rejected by the provider");
        }

        config
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `RETRIEVAL_MODE=all` fetches every record; anything else filters
    pub fn retrieval_policy(&self) -> RetrievalPolicy {
        match self.retrieval_mode.to_ascii_lowercase().as_str() {
            "all" => RetrievalPolicy::All,
            "match" => RetrievalPolicy::Match {
                limit: self.retrieval_limit,
            },
            other => {
                warn!("Unknown RETRIEVAL_MODE '{}', using substring match", other);
                RetrievalPolicy::Match {
                    limit: self.retrieval_limit,
                }
            }
        }
    }

    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings {
            model: self.llm_model.clone(),
            temperature: self.llm_temperature,
            max_tokens: self.llm_max_tokens,
        }
    }

    pub fn assembler_settings(&self) -> AssemblerSettings {
        AssemblerSettings {
            retrieval: self.retrieval_policy(),
            history_window: self.history_window,
            completion: self.completion_settings(),
        }
    }

    /// `None` when `LLM_TIMEOUT_SECS=0`
    pub fn llm_timeout(&self) -> Option<Duration> {
        (self.llm_timeout_secs > 0).then(|| Duration::from_secs(self.llm_timeout_secs))
    }
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
