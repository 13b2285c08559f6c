use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// Digests a plaintext password with bcrypt. The salt is generated per call,
/// so two digests of the same password differ; comparison goes through
/// `verify_password`, never string equality.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, digest: &str) -> Result<bool, AppError> {
    verify(password, digest)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "correct horse battery staple";
        let digest = hash_password(password).unwrap();

        assert!(verify_password(password, &digest).unwrap());
        assert!(!verify_password("wrong password", &digest).unwrap());
    }

    #[test]
    fn test_distinct_passwords_produce_distinct_digests() {
        let a = hash_password("first password").unwrap();
        let b = hash_password("second password").unwrap();
        assert_ne!(a, b);
        assert!(!verify_password("first password", &b).unwrap());
    }

    #[test]
    fn test_verify_with_invalid_digest() {
        match verify_password("anything", "not-a-bcrypt-digest") {
            Err(AppError::InternalServerError(msg)) => {
                assert!(msg.contains("Failed to verify password"));
            }
            Ok(false) => {
                // bcrypt may also report a malformed digest as a plain
                // non-match; both outcomes deny access.
            }
            Ok(true) => panic!("verification must not succeed against a malformed digest"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }
}
