//! In-memory credential store.

use std::sync::{Mutex, MutexGuard};

use super::{Admission, CredentialStore};
use crate::error::StoreError;
use crate::types::{CredentialRecord, ReportRecord, StoredCredential};

#[derive(Default)]
struct Inner {
    credentials: Vec<CredentialRecord>,
    reports: Vec<ReportRecord>,
}

/// Mutex-guarded store for tests and embedding. Contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl Inner {
    fn insert(&mut self, record: &CredentialRecord) -> Result<(), StoreError> {
        if self.credentials.iter().any(|c| c.salt == record.salt) {
            return Err(StoreError::DuplicateOrConstraint(format!(
                "salt {} already in use",
                record.salt
            )));
        }
        self.credentials.push(record.clone());
        Ok(())
    }

    fn stored(&self) -> Vec<StoredCredential> {
        self.credentials.iter().map(CredentialRecord::stored).collect()
    }
}

impl CredentialStore for MemoryStore {
    fn insert_credential(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        self.lock()?.insert(record)
    }

    fn insert_unless_reused(
        &self,
        record: &CredentialRecord,
        reused: &mut dyn FnMut(&[StoredCredential]) -> bool,
    ) -> Result<Admission, StoreError> {
        let mut inner = self.lock()?;
        if reused(&inner.stored()) {
            return Ok(Admission::Rejected);
        }
        inner.insert(record)?;
        Ok(Admission::Inserted)
    }

    fn list_credentials(&self) -> Result<Vec<StoredCredential>, StoreError> {
        Ok(self.lock()?.stored())
    }

    fn list_usernames(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .lock()?
            .credentials
            .iter()
            .map(|c| c.username.clone())
            .collect())
    }

    fn append_report(&self, report: &ReportRecord) -> Result<(), StoreError> {
        self.lock()?.reports.push(report.clone());
        Ok(())
    }

    fn list_reports(&self) -> Result<Vec<ReportRecord>, StoreError> {
        let mut reports = self.lock()?.reports.clone();
        // stable: equal timestamps keep append order
        reports.sort_by_key(|r| r.report_time);
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{digest, new_salt};
    use crate::types::StrengthTier;
    use chrono::{Duration, TimeZone, Utc};
    use secrecy::SecretString;

    fn record(username: &str, password: &str) -> CredentialRecord {
        let salt = new_salt();
        CredentialRecord {
            username: username.to_string(),
            digest: digest(&SecretString::new(password.to_string().into()), &salt),
            salt,
            strength_tier: StrengthTier::Moderate,
            violation_count: 2,
            created_at: Utc::now(),
        }
    }

    fn report_at(secs: i64, weak: u64) -> ReportRecord {
        ReportRecord {
            report_time: Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs),
            weak_count: weak,
            moderate_count: 0,
            strong_count: 0,
            total_violations: 0,
        }
    }

    #[test]
    fn test_insert_and_list() {
        let store = MemoryStore::new();
        let alice = record("alice", "password1");
        store.insert_credential(&alice).unwrap();
        store.insert_credential(&record("bob", "Str0ng!Pass")).unwrap();

        let stored = store.list_credentials().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0], alice.stored());
        assert_eq!(store.list_usernames().unwrap(), vec!["alice", "bob"]);
    }

    #[test]
    fn test_duplicate_salt_rejected() {
        let store = MemoryStore::new();
        let first = record("alice", "password1");
        let mut second = record("bob", "other");
        second.salt = first.salt.clone();

        store.insert_credential(&first).unwrap();
        let result = store.insert_credential(&second);
        assert!(matches!(result, Err(StoreError::DuplicateOrConstraint(_))));
        assert_eq!(store.list_credentials().unwrap().len(), 1);
    }

    #[test]
    fn test_insert_unless_reused() {
        let store = MemoryStore::new();
        let rec = record("alice", "password1");

        let admission = store.insert_unless_reused(&rec, &mut |stored| {
            assert!(stored.is_empty());
            false
        });
        assert_eq!(admission.unwrap(), Admission::Inserted);

        let admission = store.insert_unless_reused(&record("bob", "x"), &mut |stored| {
            assert_eq!(stored.len(), 1);
            true
        });
        assert_eq!(admission.unwrap(), Admission::Rejected);
        assert_eq!(store.list_usernames().unwrap(), vec!["alice"]);
    }

    #[test]
    fn test_reports_sorted_by_time() {
        let store = MemoryStore::new();
        store.append_report(&report_at(20, 1)).unwrap();
        store.append_report(&report_at(10, 2)).unwrap();
        store.append_report(&report_at(20, 3)).unwrap();

        let weak: Vec<u64> = store
            .list_reports()
            .unwrap()
            .iter()
            .map(|r| r.weak_count)
            .collect();
        assert_eq!(weak, vec![2, 1, 3]);
    }
}
