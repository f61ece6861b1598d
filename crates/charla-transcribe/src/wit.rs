// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wit.ai transcription: raw bytes, no local staging.
//!
//! Wit streams back a sequence of partial JSON objects; the transcript is
//! the `text` of the last object in the body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};

use charla_core::CharlaError;
use charla_core::traits::adapter::PluginAdapter;
use charla_core::traits::transcriber::TranscriberAdapter;
use charla_core::types::{AdapterType, AudioFormat, HealthStatus};

/// Base URL for the Wit.ai speech endpoint.
const API_BASE_URL: &str = "https://api.wit.ai";

/// Wit.ai speech-to-text provider.
pub struct WitTranscriber {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl WitTranscriber {
    pub fn new(token: Option<String>) -> Result<Self, CharlaError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| CharlaError::Config(format!("invalid Wit.ai token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| CharlaError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            token,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

/// Extract the final transcript from a body of concatenated JSON objects.
fn final_transcript(body: &str) -> Option<String> {
    let mut last = None;
    for value in serde_json::Deserializer::from_str(body).into_iter::<Value>() {
        let Ok(value) = value else { break };
        if let Some(text) = value.get("text").and_then(Value::as_str) {
            if !text.trim().is_empty() {
                last = Some(text.to_string());
            }
        }
    }
    last
}

#[async_trait]
impl PluginAdapter for WitTranscriber {
    fn name(&self) -> &str {
        "wit-ai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transcriber
    }

    async fn health_check(&self) -> Result<HealthStatus, CharlaError> {
        if self.token.is_some() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy("no access token configured".into()))
        }
    }

    async fn shutdown(&self) -> Result<(), CharlaError> {
        Ok(())
    }
}

#[async_trait]
impl TranscriberAdapter for WitTranscriber {
    fn available(&self) -> bool {
        self.token.is_some()
    }

    async fn transcribe(
        &self,
        audio: &[u8],
        format: AudioFormat,
        _language: &str,
    ) -> Result<Option<String>, CharlaError> {
        let mime = match format {
            AudioFormat::Mp3 => "audio/mpeg",
            _ => "audio/ogg",
        };

        let response = self
            .client
            .post(format!("{}/speech", self.base_url))
            .header(CONTENT_TYPE, mime)
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| CharlaError::Provider {
                message: format!("Wit.ai request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "Wit.ai returned an error");
            return Ok(None);
        }

        let body = response.text().await.map_err(|e| CharlaError::Provider {
            message: format!("failed to read Wit.ai response: {e}"),
            source: Some(Box::new(e)),
        })?;

        let transcript = final_transcript(&body);
        if transcript.is_some() {
            debug!("Wit.ai transcription succeeded");
        }
        Ok(transcript)
    }
}
