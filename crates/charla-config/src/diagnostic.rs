// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment error rendering as miette diagnostics.
//!
//! Unknown keys get a source span inside the offending TOML file and a
//! "did you mean?" suggestion via Jaro-Winkler similarity; the remaining
//! loader failures collapse to message-only diagnostics.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Unknown keys at least this similar to a valid key get a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error rendered as a miette diagnostic.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no section of the configuration model defines.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(charla::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Closest valid key, when one is close enough.
        suggestion: Option<String>,
        /// Comma-joined valid keys of the section.
        valid_keys: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that deserialized to the wrong type.
    #[error("invalid value for `{key}`: {detail}")]
    #[diagnostic(code(charla::config::invalid_value))]
    InvalidValue {
        /// Dotted path of the offending key.
        key: String,
        /// Description of the mismatch.
        detail: String,
    },

    /// A semantic constraint violated after deserialization.
    #[error("validation error: {message}")]
    #[diagnostic(code(charla::config::validation))]
    Validation {
        /// Description of the violated constraint.
        message: String,
    },

    /// Any other loader failure.
    #[error("configuration error: {0}")]
    #[diagnostic(code(charla::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert every error inside a `figment::Error` into a [`ConfigError`].
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let (span, src) = locate_key(&error, field, toml_sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::InvalidType(actual, expected) => ConfigError::InvalidValue {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// Resolve the span of `field` in whichever loaded TOML source defines it.
///
/// When the figment error names a file, only that file is scanned;
/// otherwise every loaded source is tried in order.
fn locate_key(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let wanted = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });
    let section = error.path.first().map(String::as_str);

    for (path, content) in toml_sources {
        if wanted.as_ref().is_some_and(|w| w != path) {
            continue;
        }
        if let Some(offset) = key_offset(content, section, field) {
            return (
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(path, content.clone())),
            );
        }
    }
    (None, None)
}

/// Byte offset of `field` as a key line under `section` (`None` = top level).
fn key_offset(content: &str, section: Option<&str>, field: &str) -> Option<usize> {
    let mut current: Option<&str> = None;
    let mut offset = 0;
    for line in content.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix('[') {
            current = rest.split(']').next();
        } else if current == section {
            if let Some(after) = trimmed.strip_prefix(field) {
                if after.trim_start().starts_with('=') {
                    return Some(offset + (line.len() - trimmed.len()));
                }
            }
        }
        offset += line.len() + 1;
    }
    None
}

/// Closest valid key by Jaro-Winkler similarity, when close enough.
fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        if handler.render_report(&mut out, error as &dyn Diagnostic).is_ok() {
            eprint!("{out}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
