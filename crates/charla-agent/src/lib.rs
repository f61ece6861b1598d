// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message aggregation and flush pipeline for the Charla assistant.
//!
//! Buffers inbound messages per recipient, debounces bursts, and drives the
//! single-flight flush that reads history, computes a retrieval-augmented
//! reply, delivers it, and persists the assistant turn.

pub mod handler;
pub mod processor;
pub mod queue;
pub mod shutdown;

pub use handler::{InboundHandler, TRANSCRIPTION_PLACEHOLDER};
pub use processor::MessageProcessor;
pub use queue::{FlushHandler, MessageAggregator};
