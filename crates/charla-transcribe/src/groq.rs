// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Groq Whisper transcription with local file staging.
//!
//! The audio is staged to a uniquely named temporary file before upload.
//! When the sniffed format is ambiguous Opus, up to three candidate
//! extensions are tried. Every staged file is deleted before transcribe
//! returns, on every exit path; the periodic sweep in [`crate::sweep`] is
//! only a leak backstop.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, warn};

use charla_core::CharlaError;
use charla_core::traits::adapter::PluginAdapter;
use charla_core::traits::transcriber::TranscriberAdapter;
use charla_core::types::{AdapterType, AudioFormat, HealthStatus};

use crate::format::candidate_extensions;

/// Base URL for Groq's OpenAI-compatible audio API.
const API_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Whisper model used for transcription.
const WHISPER_MODEL: &str = "whisper-large-v3";

/// Prefix for staged audio files, shared with the sweep.
pub(crate) const TEMP_FILE_PREFIX: &str = "charla-audio-";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Deletes the staged file when dropped, covering early returns.
struct StagedFile {
    path: PathBuf,
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), %error, "failed to delete staged audio file");
        }
    }
}

/// Groq speech-to-text provider.
pub struct GroqTranscriber {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    temp_dir: PathBuf,
}

impl GroqTranscriber {
    pub fn new(api_key: Option<String>, temp_dir: Option<&str>) -> Result<Self, CharlaError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &api_key {
            let value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| CharlaError::Config(format!("invalid Groq API key: {e}")))?;
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
            api_key,
            base_url: API_BASE_URL.to_string(),
            temp_dir: temp_dir.map_or_else(std::env::temp_dir, PathBuf::from),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    async fn stage(&self, audio: &[u8], extension: &str) -> Result<StagedFile, CharlaError> {
        let path = self.temp_dir.join(format!(
            "{TEMP_FILE_PREFIX}{}.{extension}",
            uuid::Uuid::new_v4()
        ));
        tokio::fs::write(&path, audio)
            .await
            .map_err(|e| CharlaError::Internal(format!("failed to stage audio file: {e}")))?;
        Ok(StagedFile { path })
    }

    async fn submit(&self, path: &Path, language: &str) -> Result<String, CharlaError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CharlaError::Internal(format!("failed to read staged file: {e}")))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.ogg".to_string());

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            )
            .text("model", WHISPER_MODEL)
            .text("language", language.to_string());

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CharlaError::Provider {
                message: format!("Groq request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CharlaError::Provider {
                message: format!("Groq returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: TranscriptionResponse =
            response.json().await.map_err(|e| CharlaError::Provider {
                message: format!("Groq response was not valid JSON: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(parsed.text)
    }
}

#[async_trait]
impl PluginAdapter for GroqTranscriber {
    fn name(&self) -> &str {
        "groq"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transcriber
    }

    async fn health_check(&self) -> Result<HealthStatus, CharlaError> {
        if self.api_key.is_some() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy("no API key configured".into()))
        }
    }

    async fn shutdown(&self) -> Result<(), CharlaError> {
        Ok(())
    }
}

#[async_trait]
impl TranscriberAdapter for GroqTranscriber {
    fn available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn transcribe(
        &self,
        audio: &[u8],
        format: AudioFormat,
        language: &str,
    ) -> Result<Option<String>, CharlaError> {
        for extension in candidate_extensions(format) {
            let staged = self.stage(audio, extension).await?;
            match self.submit(&staged.path, language).await {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(%extension, "Groq transcription succeeded");
                    return Ok(Some(text));
                }
                Ok(_) => {
                    debug!(%extension, "Groq returned empty transcript, trying next candidate");
                }
                Err(error) => {
                    warn!(%extension, %error, "Groq transcription attempt failed");
                }
            }
            // `staged` dropped here, deleting the file before the next try.
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn temp_file_count(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with(TEMP_FILE_PREFIX)
            })
            .count()
    }

    #[tokio::test]
    async fn successful_transcription_returns_text_and_cleans_up() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "hola"})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let transcriber =
            GroqTranscriber::new(Some("key".into()), dir.path().to_str())
                .unwrap()
                .with_base_url(server.uri());

        let result = transcriber
            .transcribe(b"OggS....", AudioFormat::Ogg, "es")
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some("hola"));
        assert_eq!(temp_file_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn failure_tries_all_candidates_and_cleans_up() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let transcriber =
            GroqTranscriber::new(Some("key".into()), dir.path().to_str())
                .unwrap()
                .with_base_url(server.uri());

        // Raw opus tries three candidate extensions.
        let result = transcriber
            .transcribe(&[0x01, 0x02], AudioFormat::Opus, "es")
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(temp_file_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn missing_api_key_is_unavailable() {
        let transcriber = GroqTranscriber::new(None, None).unwrap();
        assert!(!transcriber.available());
    }
}
