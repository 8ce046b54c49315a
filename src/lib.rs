//! Password hygiene library
//!
//! This library evaluates passwords against a fixed policy, stores them as
//! salted SHA-256 digests, refuses passwords already in use anywhere in the
//! stored population, and aggregates strength reports over time.
//!
//! # Features
//!
//! - `async` (default): Enables debounced async evaluation with cancellation support
//! - `sqlite` (default): Enables the SQLite credential store
//! - `tracing`: Enables logging via tracing crate
//! - `cli`: Builds the `pwd-hygiene` binary
//!
//! # Environment Variables
//!
//! - `PWD_HYGIENE_DB_PATH`: Custom path to the credential database
//!   (default: `./password_security.db`)
//! - `PWD_HYGIENE_DEBOUNCE_MS`: Debounce for async evaluation (default: 300)
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_hygiene::{CredentialService, SqliteStore, Submission};
//! use secrecy::SecretString;
//!
//! // Open the store (call once at startup)
//! let store = SqliteStore::open(pwd_hygiene::get_db_path()).expect("Failed to open store");
//! let service = CredentialService::new(store);
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! match service.submit("alice", &password).expect("Store failure") {
//!     Submission::Accepted { policy, .. } => println!("Stored, tier {}", policy.tier),
//!     Submission::Reused { .. } => println!("Password already in use"),
//! }
//!
//! let report = service.aggregate_report().expect("Store failure");
//! println!("Weak passwords: {}", report.weak_count);
//! ```

// Internal modules
mod clock;
mod config;
mod error;
mod evaluator;
mod hasher;
mod report;
mod reuse;
mod sections;
mod service;
mod store;
mod types;

// Public API
pub use clock::{Clock, SystemClock};
pub use config::{get_db_path, get_debounce};
pub use error::{HygieneError, InputError, StoreError};
pub use evaluator::{evaluate_policy, RULE_COUNT};
pub use hasher::{digest, new_salt, Digest, Salt, DIGEST_LEN, SALT_LEN};
pub use report::{summarize, ReportAggregator};
pub use reuse::is_reused;
pub use sections::SPECIAL_CHARS;
pub use service::{CredentialService, Submission};
pub use store::{Admission, CredentialStore, MemoryStore};
pub use types::{
    CredentialRecord, PolicyResult, ReportRecord, StoredCredential, StrengthTier, Violation,
};

#[cfg(feature = "sqlite")]
pub use store::{SqliteStore, SCHEMA_VERSION};

#[cfg(feature = "async")]
pub use evaluator::{evaluate_policy_debounced, evaluate_policy_tx};
