//! Password verification (Argon2id) and the password policy shared by
//! registration and reset.

use std::borrow::Cow;

use argon2::{Argon2, PasswordHash, PasswordVerifier};

use crate::error::AuthError;

fn with_pepper<'a>(password: &'a str, pepper: Option<&str>) -> Cow<'a, str> {
    match pepper {
        Some(p) => Cow::Owned(format!("{p}{password}")),
        None => Cow::Borrowed(password),
    }
}

/// Verify a plaintext password against a stored Argon2id PHC string.
///
/// The pepper, if any, must be the one used when the hash was produced.
/// A mismatch is `Ok(false)`; a malformed stored hash is an error.
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

    // Parameters are read from the PHC string itself.
    match Argon2::default().verify_password(with_pepper(password, pepper).as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}

/// Minimum-length policy, counted in characters rather than bytes.
pub fn meets_policy(password: &str, min_length: usize) -> bool {
    password.chars().count() >= min_length
}

#[cfg(test)]
mod tests {
    use super::*;
    use gudang_db::repository::hash_password;

    #[test]
    fn correct_password_matches() {
        let hash = hash_password("rahasia123", None).unwrap();
        assert!(verify_password("rahasia123", &hash, None).unwrap());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hash = hash_password("rahasia123", None).unwrap();
        assert!(!verify_password("rahasia124", &hash, None).unwrap());
    }

    #[test]
    fn pepper_must_agree() {
        let hash = hash_password("rahasia123", Some("lada")).unwrap();
        assert!(verify_password("rahasia123", &hash, Some("lada")).unwrap());
        assert!(!verify_password("rahasia123", &hash, None).unwrap());
        assert!(!verify_password("rahasia123", &hash, Some("garam")).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("pw", "not-a-hash", None),
            Err(AuthError::Crypto(_))
        ));
    }

    #[test]
    fn policy_counts_characters() {
        assert!(meets_policy("abcdef", 6));
        assert!(!meets_policy("abcde", 6));
        // Six characters, twelve bytes.
        assert!(meets_policy("ééééé\u{e9}", 6));
    }
}
