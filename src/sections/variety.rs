//! Character variety sections - uppercase, lowercase and digit checks.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::sync::LazyLock;

use super::SectionResult;
use crate::types::Violation;

/// Any Unicode decimal digit (general category Nd).
static DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d").expect("invalid digit pattern"));

fn require(
    password: &SecretString,
    class: fn(&char) -> bool,
    violation: Violation,
) -> SectionResult {
    if password.expose_secret().chars().any(|c| class(&c)) {
        None
    } else {
        Some(violation)
    }
}

/// Requires at least one ASCII uppercase letter.
pub fn uppercase_section(password: &SecretString) -> SectionResult {
    require(password, char::is_ascii_uppercase, Violation::MissingUppercase)
}

/// Requires at least one ASCII lowercase letter.
pub fn lowercase_section(password: &SecretString) -> SectionResult {
    require(password, char::is_ascii_lowercase, Violation::MissingLowercase)
}

/// Requires at least one decimal digit, ASCII or not (`٣`, `३`, ...).
pub fn digit_section(password: &SecretString) -> SectionResult {
    if DIGIT.is_match(password.expose_secret()) {
        return None;
    }
    Some(Violation::MissingDigit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    #[test]
    fn test_uppercase_section() {
        assert_eq!(
            uppercase_section(&secret("lowercase123!")),
            Some(Violation::MissingUppercase)
        );
        assert_eq!(uppercase_section(&secret("lowerCase")), None);
    }

    #[test]
    fn test_uppercase_section_ignores_non_ascii() {
        assert_eq!(
            uppercase_section(&secret("ÉÀÜ")),
            Some(Violation::MissingUppercase)
        );
    }

    #[test]
    fn test_lowercase_section() {
        assert_eq!(
            lowercase_section(&secret("UPPERCASE123!")),
            Some(Violation::MissingLowercase)
        );
        assert_eq!(lowercase_section(&secret("UPPERcASE")), None);
    }

    #[test]
    fn test_lowercase_section_ignores_non_ascii() {
        assert_eq!(
            lowercase_section(&secret("éàü")),
            Some(Violation::MissingLowercase)
        );
    }

    #[test]
    fn test_digit_section() {
        assert_eq!(
            digit_section(&secret("NoNumbers!")),
            Some(Violation::MissingDigit)
        );
        assert_eq!(digit_section(&secret("One1")), None);
    }

    #[test]
    fn test_digit_section_unicode_decimal_digits() {
        // ARABIC-INDIC DIGIT THREE, DEVANAGARI DIGIT FIVE, FULLWIDTH DIGIT SEVEN
        for pwd in ["Abcdefg\u{0663}", "x\u{096B}", "\u{FF17}"] {
            assert_eq!(digit_section(&secret(pwd)), None, "{:?} has a digit", pwd);
        }
    }

    #[test]
    fn test_digit_section_rejects_other_numerics() {
        // ROMAN NUMERAL TWO (Nl) and SUPERSCRIPT TWO (No) are not decimal digits
        assert_eq!(
            digit_section(&secret("\u{2161}\u{00B2}")),
            Some(Violation::MissingDigit)
        );
    }
}
