//! Special character section.

use secrecy::{ExposeSecret, SecretString};
use super::SectionResult;
use crate::types::Violation;

/// Characters accepted as "special" by the policy.
pub const SPECIAL_CHARS: &[char] = &['@', '$', '!', '%', '*', '?', '&', '#'];

/// Requires at least one character from [`SPECIAL_CHARS`].
///
/// Other punctuation (`-`, `_`, `^`, spaces, ...) does not count.
pub fn special_section(password: &SecretString) -> SectionResult {
    if password.expose_secret().contains(SPECIAL_CHARS) {
        return None;
    }
    Some(Violation::MissingSpecial)
}
