//! Assistant configuration
//!
//! Resolved from CLI flags or the environment. A missing key is valid: the
//! assistant then answers with the configuration-error reply.

use clap::Args;

use crate::gemini::GeminiBackend;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Secondary variable checked when `GEMINI_API_KEY` is unset
pub const FALLBACK_KEY_VAR: &str = "API_KEY";

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    /// API key for the hosted model (falls back to $API_KEY)
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name
    #[arg(long, global = true, env = "STATIONFOLIO_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the generative language API
    #[arg(long, global = true, env = "STATIONFOLIO_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// First non-blank key wins
fn pick_key(explicit: Option<String>, fallback: Option<String>) -> Option<String> {
    explicit
        .into_iter()
        .chain(fallback)
        .map(|k| k.trim().to_string())
        .find(|k| !k.is_empty())
}

impl AssistantConfig {
    /// The configured key, consulting `$API_KEY` when no other was given
    pub fn resolved_api_key(&self) -> Option<String> {
        pick_key(self.api_key.clone(), std::env::var(FALLBACK_KEY_VAR).ok())
    }

    /// Build the hosted backend, or `None` without credentials
    pub fn backend(&self) -> Option<GeminiBackend> {
        let Some(key) = self.resolved_api_key() else {
            tracing::warn!("no API key configured; assistant will report a configuration error");
            return None;
        };
        Some(GeminiBackend::new(key, self.model.clone(), self.endpoint.clone()))
    }
}
