//! Length section - checks password minimum length.

use secrecy::{ExposeSecret, SecretString};
use super::SectionResult;
use crate::types::Violation;

pub const MIN_LENGTH: usize = 8;

/// Checks if the password meets the minimum length.
///
/// Length is counted in characters, not bytes.
pub fn length_section(password: &SecretString) -> SectionResult {
    if password.expose_secret().chars().count() < MIN_LENGTH {
        return Some(Violation::TooShort);
    }
    None
}
