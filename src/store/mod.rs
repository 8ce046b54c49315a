//! Credential store interface and adapters.
//!
//! The store owns the credential set and the report log. Nothing here is
//! cached across calls; every read goes to the backing storage.

mod memory;
#[cfg(feature = "sqlite")]
mod migrations;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use migrations::SCHEMA_VERSION;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use std::sync::Arc;

use crate::error::StoreError;
use crate::types::{CredentialRecord, ReportRecord, StoredCredential};

/// Answer of [`CredentialStore::insert_unless_reused`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Inserted,
    Rejected,
}

/// Persistence for credential records and the report log.
pub trait CredentialStore {
    /// Inserts a record unconditionally.
    ///
    /// # Errors
    /// `StoreError::DuplicateOrConstraint` if the record breaks a store
    /// constraint (e.g. its salt is already in use).
    fn insert_credential(&self, record: &CredentialRecord) -> Result<(), StoreError>;

    /// Atomically reads the stored credentials, asks `reused` whether the
    /// new record collides with them, and inserts it only if it does not.
    ///
    /// No other insertion may interleave between the read and the write.
    fn insert_unless_reused(
        &self,
        record: &CredentialRecord,
        reused: &mut dyn FnMut(&[StoredCredential]) -> bool,
    ) -> Result<Admission, StoreError>;

    /// Stored credentials in insertion order.
    fn list_credentials(&self) -> Result<Vec<StoredCredential>, StoreError>;

    /// Usernames in insertion order.
    fn list_usernames(&self) -> Result<Vec<String>, StoreError>;

    fn append_report(&self, report: &ReportRecord) -> Result<(), StoreError>;

    /// Report log ordered by `report_time` ascending, ties in append order.
    fn list_reports(&self) -> Result<Vec<ReportRecord>, StoreError>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for &T {
    fn insert_credential(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        (**self).insert_credential(record)
    }

    fn insert_unless_reused(
        &self,
        record: &CredentialRecord,
        reused: &mut dyn FnMut(&[StoredCredential]) -> bool,
    ) -> Result<Admission, StoreError> {
        (**self).insert_unless_reused(record, reused)
    }

    fn list_credentials(&self) -> Result<Vec<StoredCredential>, StoreError> {
        (**self).list_credentials()
    }

    fn list_usernames(&self) -> Result<Vec<String>, StoreError> {
        (**self).list_usernames()
    }

    fn append_report(&self, report: &ReportRecord) -> Result<(), StoreError> {
        (**self).append_report(report)
    }

    fn list_reports(&self) -> Result<Vec<ReportRecord>, StoreError> {
        (**self).list_reports()
    }
}

impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    fn insert_credential(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        (**self).insert_credential(record)
    }

    fn insert_unless_reused(
        &self,
        record: &CredentialRecord,
        reused: &mut dyn FnMut(&[StoredCredential]) -> bool,
    ) -> Result<Admission, StoreError> {
        (**self).insert_unless_reused(record, reused)
    }

    fn list_credentials(&self) -> Result<Vec<StoredCredential>, StoreError> {
        (**self).list_credentials()
    }

    fn list_usernames(&self) -> Result<Vec<String>, StoreError> {
        (**self).list_usernames()
    }

    fn append_report(&self, report: &ReportRecord) -> Result<(), StoreError> {
        (**self).append_report(report)
    }

    fn list_reports(&self) -> Result<Vec<ReportRecord>, StoreError> {
        (**self).list_reports()
    }
}
