//! Environment-driven configuration.
//!
//! # Environment Variables
//!
//! - `PWD_HYGIENE_DB_PATH`: SQLite database file
//!   (default: `./password_security.db`)
//! - `PWD_HYGIENE_DEBOUNCE_MS`: delay before an async policy evaluation
//!   starts (default: 300)

use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_ENV: &str = "PWD_HYGIENE_DB_PATH";
pub const DEBOUNCE_ENV: &str = "PWD_HYGIENE_DEBOUNCE_MS";

pub const DEFAULT_DB_PATH: &str = "./password_security.db";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Returns the credential database path.
///
/// Priority:
/// 1. Environment variable `PWD_HYGIENE_DB_PATH`
/// 2. Default path `./password_security.db`
pub fn get_db_path() -> PathBuf {
    std::env::var(DB_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH))
}

/// Returns the async evaluation debounce.
///
/// Falls back to the default when the variable is unset or not a number.
pub fn get_debounce() -> Duration {
    let millis = std::env::var(DEBOUNCE_ENV)
        .ok()
        .and_then(|v| match v.trim().parse::<u64>() {
            Ok(ms) => Some(ms),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Ignoring invalid {}={:?}: {}", DEBOUNCE_ENV, v, _e);
                None
            }
        })
        .unwrap_or(DEFAULT_DEBOUNCE_MS);
    Duration::from_millis(millis)
}
