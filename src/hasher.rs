//! Salted credential hashing.
//!
//! A digest is SHA-256 over the password bytes followed by the salt's hex
//! text, hex-encoded. Salts are 16 bytes from the operating system CSPRNG.

use rand::RngCore;
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest as _, Sha256};
use std::fmt;

use crate::error::InputError;

/// Salt size in bytes.
pub const SALT_LEN: usize = 16;

/// Digest size in bytes (SHA-256).
pub const DIGEST_LEN: usize = 32;

/// Per-credential random salt, stored as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Salt(String);

impl Salt {
    /// Parses a salt previously produced by [`new_salt`].
    ///
    /// # Errors
    /// `InputError::MalformedSalt` unless `s` is exactly `2 * SALT_LEN` hex
    /// characters.
    pub fn from_hex(s: &str) -> Result<Self, InputError> {
        parse_hex(s, SALT_LEN)
            .map(Salt)
            .ok_or_else(|| InputError::MalformedSalt {
                expected: SALT_LEN * 2,
                actual: s.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex-encoded SHA-256 digest of password and salt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(String);

impl Digest {
    /// # Errors
    /// `InputError::MalformedDigest` unless `s` is exactly `2 * DIGEST_LEN`
    /// hex characters.
    pub fn from_hex(s: &str) -> Result<Self, InputError> {
        parse_hex(s, DIGEST_LEN)
            .map(Digest)
            .ok_or_else(|| InputError::MalformedDigest {
                expected: DIGEST_LEN * 2,
                actual: s.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes to lowercase so equal bytes always compare equal as text.
fn parse_hex(s: &str, byte_len: usize) -> Option<String> {
    match hex::decode(s) {
        Ok(bytes) if bytes.len() == byte_len => Some(hex::encode(bytes)),
        _ => None,
    }
}

/// Generates a fresh salt from `OsRng`.
pub fn new_salt() -> Salt {
    let mut bytes = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut bytes);
    Salt(hex::encode(bytes))
}

/// Derives the digest of `password` under `salt`. Deterministic.
pub fn digest(password: &SecretString, salt: &Salt) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(password.expose_secret().as_bytes());
    hasher.update(salt.as_str().as_bytes());
    Digest(hex::encode(hasher.finalize()))
}
