// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic cleanup of leaked staged audio files.
//!
//! Staged files are normally deleted by the transcriber itself; this sweep
//! only catches files orphaned by a crash mid-transcription.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};

use crate::groq::TEMP_FILE_PREFIX;

/// How often the background sweeper runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Staged files older than this are considered orphaned.
const MAX_AGE: Duration = Duration::from_secs(3600);

/// Delete staged audio files in `dir` older than `max_age`. Returns the
/// number of files removed. Unreadable entries are skipped.
pub fn sweep_once(dir: &Path, max_age: Duration) -> usize {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(dir = %dir.display(), %error, "failed to read temp directory for sweep");
            return 0;
        }
    };

    let now = SystemTime::now();
    let mut removed = 0;
    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(TEMP_FILE_PREFIX) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        let age = now.duration_since(modified).unwrap_or_default();
        if age < max_age {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(error) => {
                warn!(path = %entry.path().display(), %error, "failed to remove orphaned audio file");
            }
        }
    }
    if removed > 0 {
        debug!(dir = %dir.display(), removed, "swept orphaned audio files");
    }
    removed
}

/// Spawn a background task that sweeps `dir` every hour.
pub fn spawn_sweeper(dir: PathBuf) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            sweep_once(&dir, MAX_AGE);
        }
    })
}
