use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};
use thiserror::Error;

/// bcrypt work factor used for every new hash.
pub const HASH_COST: u32 = DEFAULT_COST;

/// The hashing primitive itself failed. Never a user-facing condition.
#[derive(Debug, Error)]
#[error("failed to hash password: {0}")]
pub struct HashingError(#[from] BcryptError);

/// Hashes a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, HashingError> {
    Ok(hash(password, HASH_COST)?)
}

/// Checks a password against a stored hash.
///
/// A mismatch and an unparseable hash both come back as `false`; only the log
/// tells them apart.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    match verify(password, hashed_password) {
        Ok(matches) => matches,
        Err(e) => {
            log::warn!("stored password hash could not be parsed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let hashed = hash_password(password).unwrap();

        assert!(verify_password(password, &hashed));
        assert!(!verify_password("wrong_password", &hashed));
    }

    #[test]
    fn test_hash_is_salted() {
        let first = hash_password("same_password").unwrap();
        let second = hash_password("same_password").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("same_password", &first));
        assert!(verify_password("same_password", &second));
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        assert!(!verify_password("test_password123", "invalidhashformat"));
        assert!(!verify_password("test_password123", ""));
    }
}
