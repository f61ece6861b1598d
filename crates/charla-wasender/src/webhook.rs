// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WASender webhook payload types and inbound-message extraction.
//!
//! Only `messages.upsert` events carry user messages; everything else is
//! logged and dropped. Extraction rejects self-sent messages and events
//! without usable content before they reach the pipeline.

use serde::Deserialize;
use tracing::debug;

use charla_core::types::{InboundContent, VoiceMessage};

use crate::phone::normalize_phone;

/// JID suffix carried by direct-chat senders.
const USER_JID_SUFFIX: &str = "@s.whatsapp.net";

/// Top-level webhook event envelope.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub data: Option<EventData>,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub messages: Option<MessageEnvelope>,
}

#[derive(Debug, Deserialize)]
pub struct MessageEnvelope {
    pub key: MessageKey,
    #[serde(default)]
    pub message: Option<MessageBody>,
}

#[derive(Debug, Deserialize)]
pub struct MessageKey {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "fromMe", default)]
    pub from_me: bool,
    #[serde(rename = "remoteJid")]
    pub remote_jid: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub conversation: Option<String>,
    #[serde(rename = "extendedTextMessage", default)]
    pub extended_text_message: Option<ExtendedTextMessage>,
    #[serde(rename = "audioMessage", default)]
    pub audio_message: Option<VoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ExtendedTextMessage {
    #[serde(default)]
    pub text: Option<String>,
}

/// An inbound message accepted for processing.
#[derive(Debug)]
pub struct InboundMessage {
    /// Normalized recipient phone number, the partition key downstream.
    pub recipient: String,
    pub content: InboundContent,
}

/// Extracts an inbound message from a `messages.upsert` event.
///
/// Returns `None` for non-upsert events, self-sent messages, and events
/// carrying neither text nor audio.
pub fn extract_inbound(event: WebhookEvent) -> Option<InboundMessage> {
    if event.event != "messages.upsert" {
        debug!(event = %event.event, "ignoring unhandled webhook event");
        return None;
    }

    let envelope = event.data?.messages?;
    if envelope.key.from_me {
        return None;
    }
    let body = envelope.message?;

    let recipient = normalize_phone(
        envelope
            .key
            .remote_jid
            .strip_suffix(USER_JID_SUFFIX)
            .unwrap_or(&envelope.key.remote_jid),
    );
    if recipient.is_empty() {
        return None;
    }

    if let Some(mut voice) = body.audio_message {
        if voice.message_id.is_none() {
            voice.message_id = envelope.key.id;
        }
        return Some(InboundMessage {
            recipient,
            content: InboundContent::Voice(voice),
        });
    }

    let text = body
        .conversation
        .or_else(|| body.extended_text_message.and_then(|m| m.text))
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        debug!("dropping upsert without usable text");
        return None;
    }

    Some(InboundMessage {
        recipient,
        content: InboundContent::Text(text.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upsert(body: serde_json::Value) -> WebhookEvent {
        serde_json::from_value(serde_json::json!({
            "event": "messages.upsert",
            "data": {"messages": body}
        }))
        .unwrap()
    }

    #[test]
    fn extracts_plain_conversation_text() {
        let event = upsert(serde_json::json!({
            "key": {"id": "m1", "fromMe": false, "remoteJid": "71234567@s.whatsapp.net"},
            "message": {"conversation": "Hola"}
        }));
        let inbound = extract_inbound(event).unwrap();
        assert_eq!(inbound.recipient, "59171234567");
        assert!(matches!(inbound.content, InboundContent::Text(ref t) if t == "Hola"));
    }

    #[test]
    fn extracts_extended_text_when_conversation_is_absent() {
        let event = upsert(serde_json::json!({
            "key": {"fromMe": false, "remoteJid": "59171234567@s.whatsapp.net"},
            "message": {"extendedTextMessage": {"text": "  Como estas  "}}
        }));
        let inbound = extract_inbound(event).unwrap();
        assert!(matches!(inbound.content, InboundContent::Text(ref t) if t == "Como estas"));
    }

    #[test]
    fn extracts_voice_message_with_key_id() {
        let event = upsert(serde_json::json!({
            "key": {"id": "m2", "fromMe": false, "remoteJid": "59171234567@s.whatsapp.net"},
            "message": {"audioMessage": {
                "url": "https://mmg.whatsapp.net/v/abc",
                "mimetype": "audio/ogg; codecs=opus",
                "mediaKey": "a2V5",
                "fileLength": 4096
            }}
        }));
        let inbound = extract_inbound(event).unwrap();
        let InboundContent::Voice(voice) = inbound.content else {
            panic!("expected voice content");
        };
        assert_eq!(voice.url, "https://mmg.whatsapp.net/v/abc");
        assert_eq!(voice.message_id.as_deref(), Some("m2"));
    }

    #[test]
    fn rejects_self_sent_messages() {
        let event = upsert(serde_json::json!({
            "key": {"fromMe": true, "remoteJid": "59171234567@s.whatsapp.net"},
            "message": {"conversation": "Hola"}
        }));
        assert!(extract_inbound(event).is_none());
    }

    #[test]
    fn rejects_blank_text_and_missing_body() {
        let blank = upsert(serde_json::json!({
            "key": {"fromMe": false, "remoteJid": "59171234567@s.whatsapp.net"},
            "message": {"conversation": "   "}
        }));
        assert!(extract_inbound(blank).is_none());

        let no_body = upsert(serde_json::json!({
            "key": {"fromMe": false, "remoteJid": "59171234567@s.whatsapp.net"}
        }));
        assert!(extract_inbound(no_body).is_none());
    }

    #[test]
    fn ignores_other_events() {
        let event: WebhookEvent = serde_json::from_value(serde_json::json!({
            "event": "chats.update",
            "data": {}
        }))
        .unwrap();
        assert!(extract_inbound(event).is_none());
    }
}
