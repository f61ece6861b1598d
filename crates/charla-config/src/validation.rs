// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, non-empty paths, and
//! positive timing values.

use crate::diagnostic::ConfigError;
use crate::model::CharlaConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CharlaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate bind_address is not empty and looks like an IP or hostname
    let addr = config.server.bind_address.trim();
    if addr.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.bind_address must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "server.bind_address `{addr}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    if config.store.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "store.database_path must not be empty".to_string(),
        });
    }

    if config.store.history_collection.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "store.history_collection must not be empty".to_string(),
        });
    }

    if config.store.cache_collection.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "store.cache_collection must not be empty".to_string(),
        });
    }

    if config.queue.debounce_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "queue.debounce_ms must be greater than zero".to_string(),
        });
    }

    if config.queue.call_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "queue.call_timeout_secs must be greater than zero".to_string(),
        });
    }

    if config.qdrant.top_k == 0 {
        errors.push(ConfigError::Validation {
            message: "qdrant.top_k must be at least 1".to_string(),
        });
    }

    if config.transcription.language.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "transcription.language must not be empty".to_string(),
        });
    }

    if let Some(token) = &config.server.webhook_token {
        if token.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "server.webhook_token must not be blank when set".to_string(),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
