//! Password policy sections
//!
//! Each section checks a single policy rule.

mod length;
mod special;
mod variety;

pub use length::length_section;
pub use special::{special_section, SPECIAL_CHARS};
pub use variety::{digit_section, lowercase_section, uppercase_section};

use crate::types::Violation;

/// Result type for section check functions.
/// - `Some(violation)` - Rule not satisfied
/// - `None` - Rule satisfied
pub type SectionResult = Option<Violation>;
