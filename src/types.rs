//! Domain types shared by the evaluator, the hasher and the stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;
use crate::hasher::{Digest, Salt};

/// Strength tier derived from the number of satisfied policy rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrengthTier {
    Weak,
    Moderate,
    Strong,
}

impl StrengthTier {
    /// Maps a policy score (0..=5) to a tier.
    pub fn from_score(score: usize) -> Self {
        match score {
            0..=2 => StrengthTier::Weak,
            3 => StrengthTier::Moderate,
            _ => StrengthTier::Strong,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthTier::Weak => "Weak",
            StrengthTier::Moderate => "Moderate",
            StrengthTier::Strong => "Strong",
        }
    }
}

impl fmt::Display for StrengthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrengthTier {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Weak" => Ok(StrengthTier::Weak),
            "Moderate" => Ok(StrengthTier::Moderate),
            "Strong" => Ok(StrengthTier::Strong),
            other => Err(StoreError::CorruptRecord(format!(
                "unknown strength tier '{}'",
                other
            ))),
        }
    }
}

/// A single unmet policy rule.
///
/// Variants are declared in rule order, which is also the order in which
/// they appear in a [`PolicyResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Violation {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    MissingSpecial,
}

impl Violation {
    pub fn message(&self) -> &'static str {
        match self {
            Violation::TooShort => "Password must be at least 8 characters long.",
            Violation::MissingUppercase => "Password must contain at least one uppercase letter.",
            Violation::MissingLowercase => "Password must contain at least one lowercase letter.",
            Violation::MissingDigit => "Password must contain at least one digit.",
            Violation::MissingSpecial => "Password must contain at least one special character.",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of evaluating a password against the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyResult {
    pub tier: StrengthTier,
    pub violations: Vec<Violation>,
}

impl PolicyResult {
    /// Number of satisfied rules.
    pub fn score(&self) -> usize {
        crate::evaluator::RULE_COUNT - self.violations.len()
    }

    pub fn violation_count(&self) -> u32 {
        self.violations.len() as u32
    }
}

/// A credential as written to the store. Never holds plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub username: String,
    pub digest: Digest,
    pub salt: Salt,
    pub strength_tier: StrengthTier,
    pub violation_count: u32,
    pub created_at: DateTime<Utc>,
}

impl CredentialRecord {
    pub fn stored(&self) -> StoredCredential {
        StoredCredential {
            digest: self.digest.clone(),
            salt: self.salt.clone(),
            strength_tier: self.strength_tier,
            violation_count: self.violation_count,
        }
    }
}

/// The part of a credential record that reuse checks and reports read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub digest: Digest,
    pub salt: Salt,
    pub strength_tier: StrengthTier,
    pub violation_count: u32,
}

/// Timestamped snapshot of the tier distribution and violation total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub report_time: DateTime<Utc>,
    pub weak_count: u64,
    pub moderate_count: u64,
    pub strong_count: u64,
    pub total_violations: u64,
}

impl ReportRecord {
    /// Number of credentials the report covers.
    pub fn population(&self) -> u64 {
        self.weak_count + self.moderate_count + self.strong_count
    }
}
