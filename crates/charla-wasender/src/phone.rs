// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone number normalization.
//!
//! Recipient keys are digits-only with country code. Bolivian local
//! numbers are eight digits; they get the 591 country code prefixed.

/// Normalizes a phone number into the canonical recipient key.
///
/// Strips whitespace and a leading `+`. Bare eight-digit numbers are
/// assumed Bolivian and prefixed with `591`. Anything else is returned
/// with only the cosmetic characters removed.
pub fn normalize_phone(number: &str) -> String {
    let cleaned: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    if cleaned.len() == 8 && cleaned.chars().all(|c| c.is_ascii_digit()) {
        return format!("591{cleaned}");
    }
    cleaned.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_digit_local_number_gets_country_code() {
        assert_eq!(normalize_phone("71234567"), "59171234567");
    }

    #[test]
    fn full_international_number_is_unchanged() {
        assert_eq!(normalize_phone("59171234567"), "59171234567");
        assert_eq!(normalize_phone("+59171234567"), "59171234567");
    }

    #[test]
    fn whitespace_is_stripped() {
        assert_eq!(normalize_phone(" 7123 4567 "), "59171234567");
    }

    #[test]
    fn non_bolivian_numbers_pass_through() {
        assert_eq!(normalize_phone("+14155550100"), "14155550100");
        assert_eq!(normalize_phone(""), "");
    }
}
