//! SQLite credential store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, TransactionBehavior, params};

use super::migrations;
use super::{Admission, CredentialStore};
use crate::error::StoreError;
use crate::hasher::{Digest, Salt};
use crate::types::{CredentialRecord, ReportRecord, StoredCredential, StrengthTier};

/// Store backed by a single SQLite connection.
///
/// Open it once at startup with [`SqliteStore::open`]; opening applies any
/// pending schema migrations.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and migrates its schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;

        #[cfg(feature = "tracing")]
        tracing::info!("Opened credential store at {:?}", path);

        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(mut conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        let _previous = migrations::migrate(&mut conn)?;

        #[cfg(feature = "tracing")]
        if _previous < migrations::SCHEMA_VERSION {
            tracing::info!(
                "Credential store schema upgraded from version {} to {}",
                _previous,
                migrations::SCHEMA_VERSION
            );
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Schema version recorded in the database.
    pub fn schema_version(&self) -> Result<u32, StoreError> {
        let conn = self.lock()?;
        migrations::current_version(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

fn to_micros(time: &DateTime<Utc>) -> i64 {
    time.timestamp_micros()
}

fn from_micros(micros: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| StoreError::CorruptRecord(format!("timestamp {} out of range", micros)))
}

fn insert_row(conn: &Connection, record: &CredentialRecord) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO credentials
            (username, digest, salt, strength_tier, violation_count, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.username,
            record.digest.as_str(),
            record.salt.as_str(),
            record.strength_tier.as_str(),
            record.violation_count,
            to_micros(&record.created_at),
        ],
    )?;
    Ok(())
}

struct CredentialRow {
    digest: String,
    salt: String,
    strength_tier: String,
    violation_count: u32,
}

impl CredentialRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            digest: row.get(0)?,
            salt: row.get(1)?,
            strength_tier: row.get(2)?,
            violation_count: row.get(3)?,
        })
    }

    fn decode(self) -> Result<StoredCredential, StoreError> {
        let corrupt = |e: crate::error::InputError| StoreError::CorruptRecord(e.to_string());
        Ok(StoredCredential {
            digest: Digest::from_hex(&self.digest).map_err(corrupt)?,
            salt: Salt::from_hex(&self.salt).map_err(corrupt)?,
            strength_tier: self.strength_tier.parse::<StrengthTier>()?,
            violation_count: self.violation_count,
        })
    }
}

fn select_credentials(conn: &Connection) -> Result<Vec<StoredCredential>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT digest, salt, strength_tier, violation_count
         FROM credentials ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], CredentialRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().map(CredentialRow::decode).collect()
}

impl CredentialStore for SqliteStore {
    fn insert_credential(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        let conn = self.lock()?;
        insert_row(&conn, record)
    }

    fn insert_unless_reused(
        &self,
        record: &CredentialRecord,
        reused: &mut dyn FnMut(&[StoredCredential]) -> bool,
    ) -> Result<Admission, StoreError> {
        let mut conn = self.lock()?;
        // IMMEDIATE takes the write lock up front, so other connections to
        // the same file cannot insert between our read and our write.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let stored = select_credentials(&tx)?;
        if reused(&stored) {
            // dropping the transaction rolls it back
            return Ok(Admission::Rejected);
        }

        insert_row(&tx, record)?;
        tx.commit()?;
        Ok(Admission::Inserted)
    }

    fn list_credentials(&self) -> Result<Vec<StoredCredential>, StoreError> {
        let conn = self.lock()?;
        select_credentials(&conn)
    }

    fn list_usernames(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT username FROM credentials ORDER BY id")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    fn append_report(&self, report: &ReportRecord) -> Result<(), StoreError> {
        let counts = [
            stored_count(report.weak_count)?,
            stored_count(report.moderate_count)?,
            stored_count(report.strong_count)?,
            stored_count(report.total_violations)?,
        ];
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO password_reports
                (report_time, weak_count, moderate_count, strong_count, total_violations)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                to_micros(&report.report_time),
                counts[0],
                counts[1],
                counts[2],
                counts[3],
            ],
        )?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Appended password report at {}", report.report_time);

        Ok(())
    }

    fn list_reports(&self) -> Result<Vec<ReportRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT report_time, weak_count, moderate_count, strong_count, total_violations
             FROM password_reports ORDER BY report_time, id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(time, weak, moderate, strong, violations)| {
                Ok(ReportRecord {
                    report_time: from_micros(time)?,
                    weak_count: count(weak)?,
                    moderate_count: count(moderate)?,
                    strong_count: count(strong)?,
                    total_violations: count(violations)?,
                })
            })
            .collect()
    }
}

fn stored_count(value: u64) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| {
        StoreError::DuplicateOrConstraint(format!(
            "count {} exceeds the INTEGER column range",
            value
        ))
    })
}

fn count(value: i64) -> Result<u64, StoreError> {
    u64::try_from(value)
        .map_err(|_| StoreError::CorruptRecord(format!("negative count {}", value)))
}
