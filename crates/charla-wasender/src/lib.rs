// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WASender WhatsApp gateway: webhook extraction, phone normalization,
//! outbound delivery, and voice-media decryption.

pub mod channel;
pub mod phone;
pub mod webhook;

pub use channel::WasenderGateway;
pub use phone::normalize_phone;
pub use webhook::{InboundMessage, WebhookEvent, extract_inbound};
