//! Versioned schema migrations.
//!
//! The applied version lives in `PRAGMA user_version`. Each step runs in its
//! own transaction together with the version bump. Steps only ever add
//! schema objects; existing rows are never dropped.
//!
//! Databases written by the earlier Python tool (`users` and a
//! `password_reports` table with `report_date`, `weak_passwords`, ...) are
//! adopted by step 1: the old report table is renamed to
//! `legacy_password_reports` and its rows are copied into the new log, and
//! `users` rows carrying a strength tier are copied into `credentials`.
//! Both legacy tables are left in place.

use rusqlite::Connection;

use crate::error::StoreError;

type Step = fn(&Connection) -> rusqlite::Result<()>;

/// Ordered migration steps. Step `i` upgrades the schema to version `i + 1`.
const MIGRATIONS: &[Step] = &[core_schema, report_time_index];

const CORE_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS credentials (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        digest TEXT NOT NULL,
        salt TEXT NOT NULL,
        strength_tier TEXT NOT NULL,
        violation_count INTEGER NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_credentials_salt ON credentials(salt);
    CREATE TABLE IF NOT EXISTS password_reports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        report_time INTEGER NOT NULL,
        weak_count INTEGER NOT NULL,
        moderate_count INTEGER NOT NULL,
        strong_count INTEGER NOT NULL,
        total_violations INTEGER NOT NULL
    );";

// Legacy timestamps are SQLite CURRENT_TIMESTAMP text (UTC).
const IMPORT_LEGACY_REPORTS: &str = "
    INSERT INTO password_reports
        (report_time, weak_count, moderate_count, strong_count, total_violations)
    SELECT COALESCE(CAST(strftime('%s', report_date) AS INTEGER), 0) * 1000000,
           weak_passwords, moderate_passwords, strong_passwords, COALESCE(violations, 0)
    FROM legacy_password_reports
    ORDER BY id;";

// The legacy digest is sha256(password ++ salt hex), the same as ours.
const IMPORT_LEGACY_USERS: &str = "
    INSERT OR IGNORE INTO credentials
        (username, digest, salt, strength_tier, violation_count, created_at)
    SELECT username, lower(password), lower(salt), password_strength, violation_count,
           COALESCE(CAST(strftime('%s', date_created) AS INTEGER), 0) * 1000000
    FROM users
    WHERE length(password) = 64 AND password NOT GLOB '*[^0-9a-fA-F]*'
      AND length(salt) = 32 AND salt NOT GLOB '*[^0-9a-fA-F]*'
      AND password_strength IN ('Weak', 'Moderate', 'Strong')
    ORDER BY id;";

fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

const LEGACY_USER_COLUMNS: &[&str] = &[
    "username",
    "password",
    "salt",
    "password_strength",
    "violation_count",
    "date_created",
];

fn has_columns(columns: &[String], wanted: &[&str]) -> bool {
    wanted.iter().all(|w| columns.iter().any(|c| c == w))
}

/// 1: credentials and report log, adopting legacy tables.
fn core_schema(conn: &Connection) -> rusqlite::Result<()> {
    let reports = table_columns(conn, "password_reports")?;
    let legacy_reports = !reports.is_empty() && !has_columns(&reports, &["report_time"]);
    if legacy_reports {
        conn.execute_batch("ALTER TABLE password_reports RENAME TO legacy_password_reports;")?;
    }

    conn.execute_batch(CORE_SCHEMA)?;

    if legacy_reports {
        let _imported = conn.execute(IMPORT_LEGACY_REPORTS, [])?;
        #[cfg(feature = "tracing")]
        tracing::info!("Imported {} legacy password reports", _imported);
    }

    let users = table_columns(conn, "users")?;
    if has_columns(&users, LEGACY_USER_COLUMNS) {
        let _imported = conn.execute(IMPORT_LEGACY_USERS, [])?;
        #[cfg(feature = "tracing")]
        tracing::info!("Imported {} legacy credentials", _imported);
    } else if !users.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::warn!("Legacy users table has no strength columns; left untouched");
    }

    Ok(())
}

/// 2: chronological history lookups.
fn report_time_index(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_password_reports_time
            ON password_reports(report_time, id);",
    )
}

/// Latest schema version known to this build.
pub const SCHEMA_VERSION: u32 = MIGRATIONS.len() as u32;

pub(crate) fn current_version(conn: &Connection) -> Result<u32, StoreError> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Brings the schema up to [`SCHEMA_VERSION`].
///
/// Returns the version the database was at before migrating.
///
/// # Errors
/// `StoreError::SchemaTooNew` if the database was written by a newer build.
pub(crate) fn migrate(conn: &mut Connection) -> Result<u32, StoreError> {
    let found = current_version(conn)?;
    if found > SCHEMA_VERSION {
        #[cfg(feature = "tracing")]
        tracing::error!(
            "Refusing to open database at schema version {} (supported {})",
            found,
            SCHEMA_VERSION
        );
        return Err(StoreError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    for (index, step) in MIGRATIONS.iter().enumerate().skip(found as usize) {
        let version = index as u32 + 1;
        let tx = conn.transaction()?;
        step(&tx)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;

        #[cfg(feature = "tracing")]
        tracing::info!("Applied credential store migration {}", version);
    }

    Ok(found)
}
