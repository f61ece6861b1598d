// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Charla assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Charla configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CharlaConfig {
    /// Agent identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Webhook ingress server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// WaSender WhatsApp gateway settings.
    #[serde(default)]
    pub wasender: WasenderConfig,

    /// Cohere API settings (chat completion and embeddings).
    #[serde(default)]
    pub cohere: CohereConfig,

    /// Qdrant vector search settings.
    #[serde(default)]
    pub qdrant: QdrantConfig,

    /// Document store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Message aggregation queue settings.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Speech-to-text settings.
    #[serde(default)]
    pub transcription: TranscriptionConfig,
}

/// Agent identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional system prompt prepended to every conversation.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
        }
    }
}

fn default_agent_name() -> String {
    "charla".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Webhook ingress server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address for the webhook listener.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Security token the gateway embeds in the webhook path.
    /// `None` disables the ingress entirely.
    #[serde(default)]
    pub webhook_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            webhook_token: None,
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// WaSender WhatsApp gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WasenderConfig {
    /// WaSender API key. `None` disables outbound delivery.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the WaSender API.
    #[serde(default = "default_wasender_base_url")]
    pub base_url: String,
}

impl Default for WasenderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_wasender_base_url(),
        }
    }
}

fn default_wasender_base_url() -> String {
    "https://wasenderapi.com/api".to_string()
}

/// Cohere API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CohereConfig {
    /// Cohere API key. `None` requires environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat completion model identifier.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Embedding model identifier.
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    /// Maximum tokens to generate per reply. `None` leaves it unbounded.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for CohereConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            chat_model: default_chat_model(),
            embed_model: default_embed_model(),
            max_tokens: None,
        }
    }
}

fn default_chat_model() -> String {
    "command-a-03-2025".to_string()
}

fn default_embed_model() -> String {
    "embed-multilingual-v3.0".to_string()
}

/// Qdrant vector search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QdrantConfig {
    /// Base URL of the Qdrant REST API.
    #[serde(default = "default_qdrant_url")]
    pub url: String,

    /// Optional API key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Collection searched for context documents.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Number of nearest documents retrieved per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: default_qdrant_url(),
            api_key: None,
            collection: default_collection(),
            top_k: default_top_k(),
        }
    }
}

fn default_qdrant_url() -> String {
    "http://127.0.0.1:6333".to_string()
}

fn default_collection() -> String {
    "documentos".to_string()
}

fn default_top_k() -> usize {
    10
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Collection holding per-recipient conversation records.
    #[serde(default = "default_history_collection")]
    pub history_collection: String,

    /// Collection holding content-addressed embedding cache entries.
    #[serde(default = "default_cache_collection")]
    pub cache_collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            history_collection: default_history_collection(),
            cache_collection: default_cache_collection(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("charla").join("charla.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "charla.db".to_string())
}

fn default_history_collection() -> String {
    "chat_history".to_string()
}

fn default_cache_collection() -> String {
    "chat_cache".to_string()
}

/// Message aggregation queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Debounce delay in milliseconds, measured from the first buffered
    /// message of a burst.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Upper bound on any single external call inside a flush, in seconds.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    3000
}

fn default_call_timeout_secs() -> u64 {
    60
}

/// Speech-to-text configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptionConfig {
    /// Groq API key. `None` skips the Groq provider.
    #[serde(default)]
    pub groq_api_key: Option<String>,

    /// Wit.ai server access token. `None` skips the Wit.ai provider.
    #[serde(default)]
    pub wit_ai_token: Option<String>,

    /// Target language passed to transcription models.
    #[serde(default = "default_language")]
    pub language: String,

    /// Directory for staged audio files. `None` uses the system temp dir.
    #[serde(default)]
    pub temp_dir: Option<String>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            wit_ai_token: None,
            language: default_language(),
            temp_dir: None,
        }
    }
}

fn default_language() -> String {
    "es".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = CharlaConfig::default();
        assert_eq!(config.agent.name, "charla");
        assert_eq!(config.agent.log_level, "info");
        assert_eq!(config.queue.debounce_ms, 3000);
        assert_eq!(config.qdrant.top_k, 10);
        assert_eq!(config.qdrant.collection, "documentos");
        assert_eq!(config.cohere.chat_model, "command-a-03-2025");
        assert_eq!(config.cohere.embed_model, "embed-multilingual-v3.0");
        assert_eq!(config.transcription.language, "es");
        assert_eq!(config.store.history_collection, "chat_history");
        assert_eq!(config.store.cache_collection, "chat_cache");
    }

    #[test]
    fn unknown_top_level_key_rejected() {
        let result = toml::from_str::<CharlaConfig>("[nonsense]\nvalue = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_key_rejected() {
        let result = toml::from_str::<CharlaConfig>("[queue]\ndebounce = 100\n");
        assert!(result.is_err());
    }

    #[test]
    fn partial_section_merges_with_defaults() {
        let config: CharlaConfig =
            toml::from_str("[queue]\ndebounce_ms = 500\n").unwrap();
        assert_eq!(config.queue.debounce_ms, 500);
        assert_eq!(config.queue.call_timeout_secs, 60);
    }
}
