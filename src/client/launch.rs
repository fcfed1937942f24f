// src/client/launch.rs
// Client-visible configuration: endpoint override + launcher flag

use anyhow::{Context, Result};
use url::Url;

/// Relative path of the chat endpoint when none is given
pub const DEFAULT_ENDPOINT: &str = "/chat";

/// Query flag that suppresses the launcher
const HIDE_LAUNCHER_PARAM: &str = "hideButton";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub endpoint: Url,
    pub hide_launcher: bool,
}

impl LaunchOptions {
    /// `page_url` is where the client is "opened" (its query may carry
    /// `hideButton=true`). `endpoint` is relative to it unless absolute.
    pub fn resolve(page_url: &str, endpoint: Option<&str>) -> Result<Self> {
        let page = Url::parse(page_url).with_context(|| format!("Invalid URL: {}", page_url))?;

        let hide_launcher = page
            .query_pairs()
            .any(|(k, v)| k == HIDE_LAUNCHER_PARAM && v == "true");

        let endpoint = endpoint.unwrap_or(DEFAULT_ENDPOINT);
        let endpoint = match Url::parse(endpoint) {
            Ok(absolute) => absolute,
            Err(_) => page
                .join(endpoint)
                .with_context(|| format!("Invalid endpoint: {}", endpoint))?,
        };

        Ok(Self {
            endpoint,
            hide_launcher,
        })
    }
}
