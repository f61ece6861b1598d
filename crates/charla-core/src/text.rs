// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text normalization over polymorphic turn content.
//!
//! Stored conversations mix three content shapes (bare string, segment list,
//! single segment object). All shape branching lives here; the rest of the
//! pipeline only ever sees plain strings.

use crate::types::{Role, Turn, TurnContent};

/// Extracts the plain text of a turn.
///
/// Bare strings pass through. Segment lists concatenate the `text` of every
/// `"text"`-typed segment, newline-joined, skipping blank segments. A single
/// segment object yields its `text` field.
pub fn extract_text(turn: &Turn) -> String {
    match &turn.content {
        TurnContent::Text(s) => s.clone(),
        TurnContent::Segments(segments) => segments
            .iter()
            .filter(|s| s.kind == "text" && !s.text.trim().is_empty())
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        TurnContent::Single(segment) => segment.text.clone(),
    }
}

/// Collapses the unanswered tail of a conversation into one query string.
///
/// Every user turn after the most recent assistant turn is pending; with no
/// assistant turn at all the whole conversation is. Pending turns are
/// normalized and blank results dropped: one survivor is returned
/// unmodified, several are joined as numbered `Mensaje {i}: {text}` blocks
/// separated by a blank line. Returns an empty string when nothing usable
/// remains.
pub fn unanswered_user_text(turns: &[Turn]) -> String {
    let start = turns
        .iter()
        .rposition(|t| t.role == Role::Assistant)
        .map_or(0, |i| i + 1);

    let pending: Vec<String> = turns[start..]
        .iter()
        .filter(|t| t.role == Role::User)
        .map(extract_text)
        .filter(|text| !text.trim().is_empty())
        .collect();

    match pending.len() {
        0 => String::new(),
        1 => pending.into_iter().next().unwrap_or_default(),
        _ => pending
            .iter()
            .enumerate()
            .map(|(i, text)| format!("Mensaje {}: {}", i + 1, text))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentSegment;

    #[test]
    fn extract_text_handles_bare_string() {
        let turn = Turn {
            role: Role::User,
            content: TurnContent::Text("hola".into()),
        };
        assert_eq!(extract_text(&turn), "hola");
    }

    #[test]
    fn extract_text_joins_text_segments_skipping_blanks() {
        let turn = Turn {
            role: Role::User,
            content: TurnContent::Segments(vec![
                ContentSegment::text("uno"),
                ContentSegment::text("   "),
                ContentSegment {
                    kind: "image".into(),
                    text: "ignored".into(),
                },
                ContentSegment::text("dos"),
            ]),
        };
        assert_eq!(extract_text(&turn), "uno\ndos");
    }

    #[test]
    fn extract_text_handles_single_object() {
        let turn = Turn {
            role: Role::User,
            content: TurnContent::Single(ContentSegment::text("solo")),
        };
        assert_eq!(extract_text(&turn), "solo");
    }

    #[test]
    fn unanswered_joins_burst_after_last_assistant_turn() {
        let turns = vec![
            Turn::user("a"),
            Turn::assistant("x"),
            Turn::user("b"),
            Turn::user("c"),
        ];
        assert_eq!(
            unanswered_user_text(&turns),
            "Mensaje 1: b\n\nMensaje 2: c"
        );
    }

    #[test]
    fn unanswered_single_message_returned_unmodified() {
        let turns = vec![Turn::user("a"), Turn::assistant("x"), Turn::user("b")];
        assert_eq!(unanswered_user_text(&turns), "b");
    }

    #[test]
    fn unanswered_without_assistant_treats_every_user_turn_as_pending() {
        let turns = vec![Turn::user("a")];
        assert_eq!(unanswered_user_text(&turns), "a");

        // A fresh recipient's opening burst joins the same way as any other.
        let turns = vec![Turn::user("Hola"), Turn::user("Como estas")];
        assert_eq!(
            unanswered_user_text(&turns),
            "Mensaje 1: Hola\n\nMensaje 2: Como estas"
        );
    }

    #[test]
    fn unanswered_empty_conversation_is_empty() {
        assert_eq!(unanswered_user_text(&[]), "");
    }

    #[test]
    fn unanswered_all_answered_is_empty() {
        let turns = vec![Turn::user("a"), Turn::assistant("x")];
        assert_eq!(unanswered_user_text(&turns), "");
    }

    #[test]
    fn unanswered_blank_turns_dropped_before_numbering() {
        let turns = vec![
            Turn::assistant("x"),
            Turn::user("  "),
            Turn::user("b"),
            Turn::user("c"),
        ];
        assert_eq!(
            unanswered_user_text(&turns),
            "Mensaje 1: b\n\nMensaje 2: c"
        );
    }
}
