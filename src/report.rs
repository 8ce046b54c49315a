//! Strength report aggregation.

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::store::CredentialStore;
use crate::types::{ReportRecord, StoredCredential, StrengthTier};

/// Counts credentials per tier and sums their violations.
pub fn summarize(credentials: &[StoredCredential], at: DateTime<Utc>) -> ReportRecord {
    let mut report = ReportRecord {
        report_time: at,
        weak_count: 0,
        moderate_count: 0,
        strong_count: 0,
        total_violations: 0,
    };

    for credential in credentials {
        match credential.strength_tier {
            StrengthTier::Weak => report.weak_count += 1,
            StrengthTier::Moderate => report.moderate_count += 1,
            StrengthTier::Strong => report.strong_count += 1,
        }
        report.total_violations += u64::from(credential.violation_count);
    }

    report
}

/// Writes population snapshots to a store's report log and reads them back.
pub struct ReportAggregator<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: CredentialStore> ReportAggregator<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: CredentialStore, C: Clock> ReportAggregator<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Summarizes the current credential population and appends the
    /// resulting report to the log.
    pub fn aggregate(&self) -> Result<ReportRecord, StoreError> {
        let credentials = self.store.list_credentials()?;
        let report = summarize(&credentials, self.clock.now());
        self.store.append_report(&report)?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Password report: {} weak, {} moderate, {} strong, {} violations",
            report.weak_count,
            report.moderate_count,
            report.strong_count,
            report.total_violations
        );

        Ok(report)
    }

    /// All reports, oldest first.
    pub fn history(&self) -> Result<Vec<ReportRecord>, StoreError> {
        self.store.list_reports()
    }
}
