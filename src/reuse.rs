//! Reuse detection against stored salted digests.

use secrecy::SecretString;

use crate::hasher::digest;
use crate::types::StoredCredential;

/// Returns `true` if `candidate` matches any stored credential.
///
/// Every stored credential has its own salt, so the candidate is re-hashed
/// with each one; comparing raw digests across salts never matches. Cost is
/// one SHA-256 per stored credential.
pub fn is_reused(candidate: &SecretString, stored: &[StoredCredential]) -> bool {
    stored
        .iter()
        .any(|credential| digest(candidate, &credential.salt) == credential.digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::new_salt;
    use crate::types::StrengthTier;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    fn stored_for(password: &str) -> StoredCredential {
        let salt = new_salt();
        StoredCredential {
            digest: digest(&secret(password), &salt),
            salt,
            strength_tier: StrengthTier::Strong,
            violation_count: 0,
        }
    }

    #[test]
    fn test_is_reused_match() {
        let stored = vec![stored_for("Secret1!")];
        assert!(is_reused(&secret("Secret1!"), &stored));
    }

    #[test]
    fn test_is_reused_no_match() {
        let stored = vec![stored_for("Secret1!")];
        assert!(!is_reused(&secret("Different1!"), &stored));
    }

    #[test]
    fn test_is_reused_empty_population() {
        assert!(!is_reused(&secret("anything"), &[]));
    }

    #[test]
    fn test_is_reused_finds_match_among_many() {
        let stored: Vec<_> = ["alpha1!A", "bravo2@B", "Secret1!", "delta4#D"]
            .iter()
            .map(|p| stored_for(p))
            .collect();
        assert!(is_reused(&secret("Secret1!"), &stored));
        assert!(!is_reused(&secret("secret1!"), &stored));
    }

    #[test]
    fn test_is_reused_requires_rehash_with_stored_salt() {
        // A digest computed under a fresh salt never equals the stored one.
        let stored = stored_for("Secret1!");
        let naive = digest(&secret("Secret1!"), &new_salt());
        assert_ne!(naive, stored.digest);
        assert!(is_reused(&secret("Secret1!"), &[stored]));
    }
}
