// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech-to-text for incoming voice notes.
//!
//! A [`TranscriptionChain`] tries Groq Whisper first and falls back to
//! Wit.ai; format detection from magic bytes decides how the audio is
//! staged and labelled. The sweep module cleans up staged files orphaned
//! by crashes.

pub mod chain;
pub mod format;
pub mod groq;
pub mod sweep;
pub mod wit;

pub use chain::TranscriptionChain;
pub use format::sniff_format;
pub use groq::GroqTranscriber;
pub use sweep::{spawn_sweeper, sweep_once};
pub use wit::WitTranscriber;
