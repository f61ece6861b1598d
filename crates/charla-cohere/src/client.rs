// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Cohere v2 API.
//!
//! Handles authentication, request construction, and transient error retry
//! for both the chat and embed endpoints.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use charla_core::CharlaError;

use crate::types::ApiErrorResponse;

/// Base URL for the Cohere v2 API.
const API_BASE_URL: &str = "https://api.cohere.com";

/// HTTP client shared by the Cohere provider and embedder.
///
/// Manages the bearer token, connection pooling, and retry logic for
/// transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct CohereClient {
    client: reqwest::Client,
    max_retries: u32,
    base_url: String,
}

impl CohereClient {
    pub fn new(api_key: &str) -> Result<Self, CharlaError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| CharlaError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| CharlaError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            max_retries: 1,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// POSTs a JSON body to `path` and deserializes the response.
    ///
    /// On transient errors (429, 500, 503), retries once after a 1-second delay.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, CharlaError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, path, "retrying Cohere request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| CharlaError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, path, "Cohere response received");

            if status.is_success() {
                let text = response.text().await.map_err(|e| CharlaError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&text).map_err(|e| CharlaError::Provider {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(CharlaError::Provider {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!("Cohere API error ({status}): {}", api_err.message)
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(CharlaError::Provider {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| CharlaError::Provider {
            message: "Cohere request failed after retries".into(),
            source: None,
        }))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Pong {
        ok: bool,
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .and(header("authorization", "Bearer test-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = CohereClient::new("test-key")
            .unwrap()
            .with_base_url(server.uri());
        let pong: Pong = client
            .post_json("/ping", &serde_json::json!({}))
            .await
            .unwrap();
        assert!(pong.ok);
    }

    #[tokio::test]
    async fn retries_once_on_429() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = CohereClient::new("test-key")
            .unwrap()
            .with_base_url(server.uri());
        let pong: Pong = client
            .post_json("/ping", &serde_json::json!({}))
            .await
            .unwrap();
        assert!(pong.ok);
    }

    #[tokio::test]
    async fn surfaces_api_error_message_on_400() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"message": "invalid model"})),
            )
            .mount(&server)
            .await;

        let client = CohereClient::new("test-key")
            .unwrap()
            .with_base_url(server.uri());
        let result: Result<Pong, _> = client.post_json("/ping", &serde_json::json!({})).await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("invalid model"), "got: {err}");
    }

    #[tokio::test]
    async fn exhausts_retries_on_503() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(serde_json::json!({"message": "overloaded"})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = CohereClient::new("test-key")
            .unwrap()
            .with_base_url(server.uri());
        let result: Result<Pong, _> = client.post_json("/ping", &serde_json::json!({})).await;
        assert!(result.is_err());
    }
}
