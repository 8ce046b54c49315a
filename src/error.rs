//! Error types.

use thiserror::Error;

/// Malformed input handed to the library. Fatal to the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Malformed salt: expected {expected} hex characters, got {actual:?}")]
    MalformedSalt { expected: usize, actual: String },
    #[error("Malformed digest: expected {expected} hex characters, got {actual:?}")]
    MalformedDigest { expected: usize, actual: String },
    #[error("Username must not be empty")]
    EmptyUsername,
}

/// Failures raised by a credential store. Propagated to the caller as-is.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
    #[error("Credential store constraint violated: {0}")]
    DuplicateOrConstraint(String),
    #[error("Corrupt record in credential store: {0}")]
    CorruptRecord(String),
    #[error("Database schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: u32, supported: u32 },
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref code, _)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::DuplicateOrConstraint(err.to_string())
            }
            rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::IntegralValueOutOfRange(..) => {
                StoreError::CorruptRecord(err.to_string())
            }
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Library-level error.
#[derive(Error, Debug)]
pub enum HygieneError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
