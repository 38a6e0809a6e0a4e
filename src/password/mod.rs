use crate::error::{AppError, AppResult};

/// Password hashing algorithm types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordAlgorithm {
    /// bcrypt, kept for verifying hashes imported from older deployments
    Bcrypt,
    /// Argon2id algorithm (OWASP recommended for new passwords)
    Argon2id,
}

impl Default for PasswordAlgorithm {
    fn default() -> Self {
        Self::Argon2id
    }
}

impl std::fmt::Display for PasswordAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bcrypt => write!(f, "bcrypt"),
            Self::Argon2id => write!(f, "Argon2id"),
        }
    }
}

/// Abstract trait for password hashing algorithms
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verify a plaintext password against a hash
    #[allow(dead_code)]
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;

    /// Check if a string is a hash created by this algorithm
    fn is_hash(&self, value: &str) -> bool;

    /// Get the algorithm identifier
    fn algorithm(&self) -> PasswordAlgorithm;
}

pub mod argon2_hasher;
pub mod bcrypt_hasher;

pub use argon2_hasher::Argon2idHasher;
pub use bcrypt_hasher::BcryptHasher;

/// Password manager with support for multiple algorithms
///
/// New driver passwords are hashed with the current algorithm; verification
/// accepts any supported hash format so accounts migrated from an older
/// deployment keep working.
pub struct PasswordManager {
    current_algorithm: PasswordAlgorithm,
    hashers: Vec<Box<dyn PasswordHasher>>,
}

impl Default for PasswordManager {
    fn default() -> Self {
        Self::new(PasswordAlgorithm::default())
    }
}

impl PasswordManager {
    /// Create a new PasswordManager with specified default algorithm
    pub fn new(default_algorithm: PasswordAlgorithm) -> Self {
        let hashers: Vec<Box<dyn PasswordHasher>> = vec![
            Box::new(BcryptHasher::new()),
            Box::new(Argon2idHasher::new()),
        ];

        Self {
            current_algorithm: default_algorithm,
            hashers,
        }
    }

    /// Hash a plaintext password using the current algorithm
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        if password.is_empty() {
            return Err(AppError::BadRequest("Password cannot be empty".to_string()));
        }

        self.validate_password_strength(password)?;

        let hasher = self
            .hashers
            .iter()
            .find(|h| h.algorithm() == self.current_algorithm)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Hasher not found for algorithm: {}",
                    self.current_algorithm
                ))
            })?;

        hasher.hash_password(password)
    }

    /// Verify a plaintext password against any supported hash format
    #[allow(dead_code)]
    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        for hasher in &self.hashers {
            if hasher.is_hash(hash) {
                return hasher.verify_password(password, hash);
            }
        }

        Err(AppError::BadRequest("Unsupported hash format".to_string()))
    }

    /// Check if a string is a password hash (any supported format)
    pub fn is_hashed_password(&self, value: &str) -> bool {
        self.hashers.iter().any(|hasher| hasher.is_hash(value))
    }

    /// Validate password strength before accepting a new password
    pub fn validate_password_strength(&self, password: &str) -> AppResult<()> {
        if password.len() < 8 {
            return Err(AppError::BadRequest(
                "Password must be at least 8 characters long".to_string(),
            ));
        }

        // Bounded to keep hashing cost predictable
        if password.len() > 128 {
            return Err(AppError::BadRequest(
                "Password must be no more than 128 characters long".to_string(),
            ));
        }

        if !password.chars().any(|c| c.is_alphabetic()) {
            return Err(AppError::BadRequest(
                "Password must contain at least one letter".to_string(),
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::BadRequest(
                "Password must contain at least one digit".to_string(),
            ));
        }

        Ok(())
    }
}
