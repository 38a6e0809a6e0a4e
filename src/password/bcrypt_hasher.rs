use super::{PasswordAlgorithm, PasswordHasher};
use crate::error::{AppError, AppResult};
use bcrypt::{hash, verify, DEFAULT_COST};

/// bcrypt password hasher
///
/// Retained so hashes imported from an older deployment keep verifying;
/// new passwords default to Argon2id.
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a new bcrypt hasher with default cost (12)
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Failed to hash password with bcrypt: {}", e)))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        verify(password, hash)
            .map_err(|e| AppError::Internal(format!("Failed to verify bcrypt password: {}", e)))
    }

    fn is_hash(&self, value: &str) -> bool {
        // bcrypt hashes start with $2, $2a$, $2b$, $2x$ or $2y$ and are 60
        // characters with exactly three $ separators
        value.starts_with("$2") && value.len() == 60 && value.matches('$').count() == 3
    }

    fn algorithm(&self) -> PasswordAlgorithm {
        PasswordAlgorithm::Bcrypt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = BcryptHasher::new();

        let hash = hasher.hash_password("Driving123").unwrap();
        assert!(hash.starts_with("$2"));
        assert_eq!(hash.len(), 60);
        assert!(hasher.is_hash(&hash));

        assert!(hasher.verify_password("Driving123", &hash).unwrap());
        assert!(!hasher.verify_password("WrongPass1", &hash).unwrap());
    }

    #[test]
    fn test_is_hash_rejects_other_formats() {
        let hasher = BcryptHasher::new();

        assert!(hasher.is_hash("$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW"));
        assert!(!hasher.is_hash("not-a-hash"));
        assert!(!hasher.is_hash("$argon2id$example"));
        assert!(!hasher.is_hash("$2b$12$tooshort"));
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        let hasher = BcryptHasher::new();

        let hash1 = hasher.hash_password("Driving123").unwrap();
        let hash2 = hasher.hash_password("Driving123").unwrap();
        assert_ne!(hash1, hash2);

        assert!(hasher.verify_password("Driving123", &hash1).unwrap());
        assert!(hasher.verify_password("Driving123", &hash2).unwrap());
    }
}
