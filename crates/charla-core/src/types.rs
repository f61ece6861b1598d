// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Charla pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for an outbound message, as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Provider,
    Store,
    Embedding,
    Search,
    Transcriber,
}

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Configured instruction prepended to provider requests. Never stored
    /// in a conversation record.
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One piece of turn content. The canonical form is `{"type": "text", "text": …}`;
/// segments of other types are preserved but skipped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSegment {
    #[serde(rename = "type", default = "text_kind")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

fn text_kind() -> String {
    "text".to_string()
}

impl ContentSegment {
    /// A canonical text segment.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: text_kind(),
            text: text.into(),
        }
    }
}

/// The polymorphic content of a stored turn.
///
/// Historical records hold any of three shapes: a bare string, a segment
/// list, or a single segment object. New turns are always written in the
/// canonical [`TurnContent::Segments`] form; the other variants exist so
/// old records deserialize without loss. Shape branching happens only in
/// [`crate::text::extract_text`], never deeper in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnContent {
    Segments(Vec<ContentSegment>),
    Single(ContentSegment),
    Text(String),
}

/// One message in a conversation, attributed to user or assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: TurnContent,
}

impl Turn {
    /// A user turn with a single canonical text segment.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: TurnContent::Segments(vec![ContentSegment::text(text)]),
        }
    }

    /// An assistant turn with a single canonical text segment.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: TurnContent::Segments(vec![ContentSegment::text(text)]),
        }
    }
}

/// Durable per-recipient conversation state, keyed by normalized phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Chronological, append-only turn history.
    #[serde(default)]
    pub chat: Vec<Turn>,

    /// Whether replies are generated without human approval.
    #[serde(rename = "automaticSend", default = "default_automatic_send")]
    pub automatic_send: bool,

    /// RFC 3339 timestamp of the last merge, stamped by the store adapter.
    #[serde(rename = "lastUpdate", default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

fn default_automatic_send() -> bool {
    true
}

impl Default for ConversationRecord {
    fn default() -> Self {
        Self {
            chat: Vec::new(),
            automatic_send: true,
            last_update: None,
        }
    }
}

/// A cached embedding keyed by the SHA-256 hash of its source text.
///
/// Once written for a hash, `embedding` is immutable; `response` may stay
/// null forever (embedding-only caching).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    pub embedding: Vec<f32>,
    pub response: Option<Turn>,
}

// --- Provider types ---

/// A normalized chat message sent to the completion provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// A retrieved context document attached to a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub id: String,
    pub text: String,
}

/// A request to the chat-completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub documents: Vec<ContextDocument>,
    pub max_tokens: Option<u32>,
}

/// A response from the chat-completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub role: Role,
    pub content: Vec<ContentSegment>,
}

// --- Embedding types ---

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
    pub dimensions: usize,
}

// --- Vector search types ---

/// A single similarity-search hit with its opaque payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub score: Option<f32>,
}

// --- Inbound types ---

/// Audio container formats recognized by magic-byte sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Ogg,
    Mp3,
    M4a,
    Wav,
    /// Unrecognized leading bytes; assumed raw Opus.
    Opus,
}

impl AudioFormat {
    /// Canonical file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Ogg => "ogg",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
            AudioFormat::Wav => "wav",
            AudioFormat::Opus => "opus",
        }
    }

    /// MIME type used when submitting this format to a transcription API.
    pub fn mime_type(self) -> &'static str {
        match self {
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::M4a => "audio/mp4",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Opus => "audio/opus",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Reference to an encrypted voice note attached to an inbound message.
///
/// Field names follow the gateway's `audioMessage` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceMessage {
    pub url: String,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub media_key: Option<String>,
    #[serde(default)]
    pub file_sha256: Option<String>,
    #[serde(default)]
    pub file_length: Option<u64>,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Gateway message id, used to address the decrypt-media endpoint.
    #[serde(default)]
    pub message_id: Option<String>,
}

/// The body of an inbound message after webhook extraction.
#[derive(Debug, Clone)]
pub enum InboundContent {
    Text(String),
    Voice(VoiceMessage),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
    }

    #[test]
    fn turn_content_deserializes_all_three_shapes() {
        let bare: TurnContent = serde_json::from_str(r#""hola""#).unwrap();
        assert_eq!(bare, TurnContent::Text("hola".into()));

        let list: TurnContent =
            serde_json::from_str(r#"[{"type":"text","text":"hola"}]"#).unwrap();
        assert_eq!(
            list,
            TurnContent::Segments(vec![ContentSegment::text("hola")])
        );

        let single: TurnContent =
            serde_json::from_str(r#"{"type":"text","text":"hola"}"#).unwrap();
        assert_eq!(single, TurnContent::Single(ContentSegment::text("hola")));
    }

    #[test]
    fn canonical_turn_serializes_as_segment_list() {
        let turn = Turn::user("Hola");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "role": "user",
                "content": [{"type": "text", "text": "Hola"}]
            })
        );
    }

    #[test]
    fn conversation_record_defaults() {
        let record: ConversationRecord = serde_json::from_str("{}").unwrap();
        assert!(record.chat.is_empty());
        assert!(record.automatic_send);
        assert!(record.last_update.is_none());
    }

    #[test]
    fn conversation_record_round_trips_automatic_send() {
        let record: ConversationRecord =
            serde_json::from_str(r#"{"automaticSend": false}"#).unwrap();
        assert!(!record.automatic_send);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["automaticSend"], serde_json::json!(false));
    }

    #[test]
    fn audio_format_extensions_and_mime_types() {
        assert_eq!(AudioFormat::Ogg.extension(), "ogg");
        assert_eq!(AudioFormat::Mp3.mime_type(), "audio/mpeg");
        assert_eq!(AudioFormat::M4a.mime_type(), "audio/mp4");
        assert_eq!(AudioFormat::Opus.to_string(), "opus");
    }

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;
        for variant in [
            AdapterType::Channel,
            AdapterType::Provider,
            AdapterType::Store,
            AdapterType::Embedding,
            AdapterType::Search,
            AdapterType::Transcriber,
        ] {
            let s = variant.to_string();
            assert_eq!(AdapterType::from_str(&s).unwrap(), variant);
        }
    }
}
