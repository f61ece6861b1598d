// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WASender gateway adapter for outbound delivery and media decryption.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use charla_core::CharlaError;
use charla_core::traits::adapter::PluginAdapter;
use charla_core::traits::gateway::GatewayAdapter;
use charla_core::types::{AdapterType, HealthStatus, MessageId, VoiceMessage};

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    to: String,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    data: Option<SendData>,
}

#[derive(Debug, Deserialize)]
struct SendData {
    #[serde(rename = "msgId", default)]
    msg_id: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct DecryptResponse {
    #[serde(rename = "publicUrl", default)]
    public_url: Option<String>,
}

/// WhatsApp gateway over the WASender HTTP API.
pub struct WasenderGateway {
    client: reqwest::Client,
    base_url: String,
}

impl WasenderGateway {
    pub fn new(api_key: &str, base_url: impl Into<String>) -> Result<Self, CharlaError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| CharlaError::Config(format!("invalid WASender API key: {e}")))?,
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| CharlaError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PluginAdapter for WasenderGateway {
    fn name(&self) -> &str {
        "wasender"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, CharlaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CharlaError> {
        Ok(())
    }
}

#[async_trait]
impl GatewayAdapter for WasenderGateway {
    async fn send(&self, recipient: &str, text: &str) -> Result<MessageId, CharlaError> {
        let body = SendRequest {
            to: format!("+{recipient}"),
            text,
        };
        let response = self
            .client
            .post(format!("{}/send-message", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| CharlaError::Channel {
                message: format!("send request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CharlaError::Channel {
                message: format!("WASender returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: SendResponse = response.json().await.map_err(|e| CharlaError::Channel {
            message: format!("WASender response was not valid JSON: {e}"),
            source: Some(Box::new(e)),
        })?;
        let id = parsed
            .data
            .and_then(|d| d.msg_id)
            .map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        info!(recipient, message_id = %id, "message delivered");
        Ok(MessageId(id))
    }

    async fn fetch_voice_media(&self, voice: &VoiceMessage) -> Result<Vec<u8>, CharlaError> {
        // The decrypt endpoint expects the audioMessage wrapped back into
        // the upsert envelope shape it was delivered in.
        let payload = json!({
            "data": {
                "messages": {
                    "key": {
                        "id": voice
                            .message_id
                            .clone()
                            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                    },
                    "message": {
                        "audioMessage": {
                            "url": voice.url,
                            "mimetype": voice
                                .mimetype
                                .as_deref()
                                .unwrap_or("audio/ogg; codecs=opus"),
                            "mediaKey": voice.media_key,
                            "fileSha256": voice.file_sha256,
                            "fileLength": voice.file_length,
                            "fileName": voice.file_name.as_deref().unwrap_or("audio.ogg"),
                        }
                    }
                }
            }
        });

        let response = self
            .client
            .post(format!("{}/decrypt-media", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| CharlaError::Channel {
                message: format!("decrypt-media request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CharlaError::Channel {
                message: format!("decrypt-media returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: DecryptResponse =
            response.json().await.map_err(|e| CharlaError::Channel {
                message: format!("decrypt-media response was not valid JSON: {e}"),
                source: Some(Box::new(e)),
            })?;
        let public_url = parsed.public_url.ok_or_else(|| CharlaError::Channel {
            message: "decrypt-media response carried no publicUrl".into(),
            source: None,
        })?;

        let media = self
            .client
            .get(&public_url)
            .send()
            .await
            .map_err(|e| CharlaError::Channel {
                message: format!("media download failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        let status = media.status();
        if !status.is_success() {
            return Err(CharlaError::Channel {
                message: format!("media download returned {status}"),
                source: None,
            });
        }
        let bytes = media.bytes().await.map_err(|e| CharlaError::Channel {
            message: format!("failed to read media body: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(size = bytes.len(), "voice media downloaded");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn send_posts_prefixed_number_and_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send-message"))
            .and(header("authorization", "Bearer key"))
            .and(body_partial_json(serde_json::json!({
                "to": "+59171234567",
                "text": "Hola"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {"msgId": 12345}
            })))
            .mount(&server)
            .await;

        let gateway = WasenderGateway::new("key", server.uri()).unwrap();
        let id = gateway.send("59171234567", "Hola").await.unwrap();
        assert_eq!(id.0, "12345");
    }

    #[tokio::test]
    async fn send_failure_is_a_channel_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send-message"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid number"))
            .mount(&server)
            .await;

        let gateway = WasenderGateway::new("key", server.uri()).unwrap();
        let result = gateway.send("123", "Hola").await;
        assert!(matches!(result, Err(CharlaError::Channel { .. })));
    }

    #[tokio::test]
    async fn fetch_voice_media_decrypts_then_downloads() {
        let server = MockServer::start().await;
        let media_url = format!("{}/files/decrypted.ogg", server.uri());
        Mock::given(method("POST"))
            .and(path("/decrypt-media"))
            .and(body_partial_json(serde_json::json!({
                "data": {"messages": {
                    "key": {"id": "m9"},
                    "message": {"audioMessage": {"url": "https://mmg.whatsapp.net/v/abc"}}
                }}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "publicUrl": media_url
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/decrypted.ogg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"OggS....".to_vec()))
            .mount(&server)
            .await;

        let gateway = WasenderGateway::new("key", server.uri()).unwrap();
        let voice = VoiceMessage {
            url: "https://mmg.whatsapp.net/v/abc".into(),
            message_id: Some("m9".into()),
            ..VoiceMessage::default()
        };
        let bytes = gateway.fetch_voice_media(&voice).await.unwrap();
        assert_eq!(bytes, b"OggS....");
    }

    #[tokio::test]
    async fn missing_public_url_is_a_channel_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/decrypt-media"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let gateway = WasenderGateway::new("key", server.uri()).unwrap();
        let voice = VoiceMessage {
            url: "https://mmg.whatsapp.net/v/abc".into(),
            ..VoiceMessage::default()
        };
        let result = gateway.fetch_voice_media(&voice).await;
        assert!(matches!(result, Err(CharlaError::Channel { .. })));
    }
}
