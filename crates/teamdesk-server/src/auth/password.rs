//! Password hashing.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the password.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Compare a candidate password with a stored hash.
pub fn password_matches(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            hash_password("admin123"),
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
    }

    #[test]
    fn test_password_matches() {
        let stored = hash_password("s3cret");
        assert!(password_matches("s3cret", &stored));
        assert!(!password_matches("S3cret", &stored));
    }
}
