//! Credential submission pipeline.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use crate::clock::{Clock, SystemClock};
use crate::error::{HygieneError, InputError, StoreError};
use crate::evaluator::evaluate_policy;
use crate::hasher::{digest, new_salt};
use crate::report::ReportAggregator;
use crate::reuse::is_reused;
use crate::store::{Admission, CredentialStore};
use crate::types::{CredentialRecord, PolicyResult, ReportRecord};

/// Outcome of [`CredentialService::submit`].
///
/// A reused password is a declined submission, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Accepted {
        policy: PolicyResult,
        username: String,
        created_at: DateTime<Utc>,
    },
    Reused {
        policy: PolicyResult,
    },
}

impl Submission {
    pub fn policy(&self) -> &PolicyResult {
        match self {
            Submission::Accepted { policy, .. } | Submission::Reused { policy } => policy,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Submission::Accepted { .. })
    }
}

/// Evaluates, hashes, reuse-checks and stores submitted passwords, and
/// produces reports over the stored population.
pub struct CredentialService<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: CredentialStore> CredentialService<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: CredentialStore, C: Clock> CredentialService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Scores a password without storing anything.
    pub fn evaluate(&self, password: &SecretString) -> PolicyResult {
        evaluate_policy(password)
    }

    /// Submits a password for `username`.
    ///
    /// The password is stored (as a salted digest) only if it does not match
    /// any stored credential. The reuse check and the insert happen in one
    /// atomic store operation.
    ///
    /// # Errors
    /// - `InputError::EmptyUsername` for a blank username
    /// - `StoreError` if the store fails; nothing is written in that case
    pub fn submit(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Submission, HygieneError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(InputError::EmptyUsername.into());
        }

        let policy = evaluate_policy(password);
        let salt = new_salt();
        let record = CredentialRecord {
            username: username.to_string(),
            digest: digest(password, &salt),
            salt,
            strength_tier: policy.tier,
            violation_count: policy.violation_count(),
            created_at: self.clock.now(),
        };

        let admission = self
            .store
            .insert_unless_reused(&record, &mut |stored| is_reused(password, stored))?;

        match admission {
            Admission::Inserted => {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    "Accepted credential for '{}' ({}, {} violations)",
                    record.username,
                    record.strength_tier,
                    record.violation_count
                );
                Ok(Submission::Accepted {
                    policy,
                    username: record.username,
                    created_at: record.created_at,
                })
            }
            Admission::Rejected => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Rejected credential for '{}': password reused", record.username);
                Ok(Submission::Reused { policy })
            }
        }
    }

    /// Appends a report over the current population.
    pub fn aggregate_report(&self) -> Result<ReportRecord, StoreError> {
        ReportAggregator::with_clock(&self.store, &self.clock).aggregate()
    }

    /// All reports, oldest first.
    pub fn history(&self) -> Result<Vec<ReportRecord>, StoreError> {
        ReportAggregator::with_clock(&self.store, &self.clock).history()
    }

    /// Stored usernames in insertion order.
    pub fn usernames(&self) -> Result<Vec<String>, StoreError> {
        self.store.list_usernames()
    }
}
