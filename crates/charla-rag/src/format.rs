// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text formatting for WhatsApp delivery.
//!
//! WhatsApp renders no Markdown, so model output is flattened: emphasis and
//! code markers are stripped, links keep their text, list markers become a
//! single bullet glyph, and runs of blank lines are collapsed.

use std::sync::LazyLock;

use regex::Regex;

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[a-zA-Z0-9]*\n?([\s\S]*?)```").unwrap());
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());
static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:-{3,}|\*{3,}|_{3,})[ \t]*$\n?").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*+][ \t]+").unwrap());
static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\d+[.)][ \t]+").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*|__([^_]+)__").unwrap());
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*|\b_([^_\n]+)_\b").unwrap());
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+)`").unwrap());
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strip Markdown structure from `text` for plain-text WhatsApp delivery.
pub fn format_for_whatsapp(text: &str) -> String {
    let text = FENCED_CODE.replace_all(text, "$1");
    let text = HEADING.replace_all(&text, "");
    let text = HORIZONTAL_RULE.replace_all(&text, "");
    let text = BULLET.replace_all(&text, "\u{2022} ");
    let text = NUMBERED.replace_all(&text, "\u{2022} ");
    let text = LINK.replace_all(&text, "$1");
    let text = BOLD.replace_all(&text, "$1$2");
    let text = ITALIC.replace_all(&text, "$1$2");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_emphasis_and_collapses_newlines() {
        assert_eq!(
            format_for_whatsapp("**Hola** *mundo*\n\n\n\nFin"),
            "Hola mundo\n\nFin"
        );
    }

    #[test]
    fn strips_headings() {
        assert_eq!(format_for_whatsapp("# Titulo\n\nTexto"), "Titulo\n\nTexto");
        assert_eq!(format_for_whatsapp("### Sub\nTexto"), "Sub\nTexto");
    }

    #[test]
    fn rewrites_list_markers_to_bullets() {
        assert_eq!(
            format_for_whatsapp("- uno\n- dos\n1. tres\n2) cuatro"),
            "\u{2022} uno\n\u{2022} dos\n\u{2022} tres\n\u{2022} cuatro"
        );
    }

    #[test]
    fn keeps_link_text_only() {
        assert_eq!(
            format_for_whatsapp("Mira [esto](https://example.com) ahora"),
            "Mira esto ahora"
        );
    }

    #[test]
    fn unwraps_code_markers() {
        assert_eq!(format_for_whatsapp("usa `ls -la` aqui"), "usa ls -la aqui");
        assert_eq!(
            format_for_whatsapp("```sh\necho hola\n```"),
            "echo hola"
        );
    }

    #[test]
    fn removes_horizontal_rules() {
        assert_eq!(format_for_whatsapp("arriba\n\n---\n\nabajo"), "arriba\n\nabajo");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(format_for_whatsapp("\n\n  hola  \n\n"), "hola");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(
            format_for_whatsapp("Hola, como estas?\n\nBien."),
            "Hola, como estas?\n\nBien."
        );
    }
}
