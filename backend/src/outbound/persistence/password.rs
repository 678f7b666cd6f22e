//! Argon2 hashing for stored credentials.
//!
//! The domain treats hashing as an opaque service of the persistence layer:
//! drafts carry the candidate password, rows only ever hold the encoded hash.

/// Hash a candidate password with a fresh random salt.
pub(crate) fn hash_password(password: &str) -> Result<String, String> {
    let salt: [u8; 16] = rand::random();
    argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())
        .map_err(|err| format!("password hashing failed: {err}"))
}

/// Verify a candidate against an encoded hash.
///
/// Malformed hashes verify as `false` rather than erroring, so a corrupt row
/// reads as a failed login instead of a server fault.
pub(crate) fn verify_password(encoded: &str, candidate: &str) -> bool {
    argon2::verify_encoded(encoded, candidate.as_bytes()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let encoded = hash_password("dummy_pw").expect("hashing succeeds");
        assert!(verify_password(&encoded, "dummy_pw"));
        assert!(!verify_password(&encoded, "wrong_pw"));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("dummy_pw").expect("hashing succeeds");
        let second = hash_password("dummy_pw").expect("hashing succeeds");
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hashes_never_verify() {
        assert!(!verify_password("not-an-encoded-hash", "dummy_pw"));
    }
}
