// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audio container sniffing from leading bytes.

use charla_core::types::AudioFormat;

/// Classify an audio buffer by its magic bytes.
///
/// Recognizes Ogg (`OggS`), the MP3 frame sync (`FF Ex`), the MP4 `ftyp`
/// box at offset 4, and RIFF/WAV. Anything else is assumed to be raw Opus,
/// which WhatsApp voice notes commonly are.
pub fn sniff_format(bytes: &[u8]) -> AudioFormat {
    if bytes.len() >= 4 && &bytes[..4] == b"OggS" {
        AudioFormat::Ogg
    } else if bytes.len() >= 2 && bytes[0] == 0xFF && (bytes[1] & 0xE0) == 0xE0 {
        AudioFormat::Mp3
    } else if bytes.len() >= 8 && &bytes[4..8] == b"ftyp" {
        AudioFormat::M4a
    } else if bytes.len() >= 4 && &bytes[..4] == b"RIFF" {
        AudioFormat::Wav
    } else {
        AudioFormat::Opus
    }
}

/// Extensions to try when staging a file for transcription.
///
/// Raw Opus is ambiguous; transcription services accept it under several
/// container labels, so three candidates are tried in order.
pub fn candidate_extensions(format: AudioFormat) -> &'static [&'static str] {
    match format {
        AudioFormat::Opus => &["ogg", "opus", "wav"],
        AudioFormat::Ogg => &["ogg"],
        AudioFormat::Mp3 => &["mp3"],
        AudioFormat::M4a => &["m4a"],
        AudioFormat::Wav => &["wav"],
    }
}
