//! Password hashing
//!
//! One-way hashing of new secrets and verification against stored hashes.

use log::warn;

use crate::error::CredentialError;

/// One-way password hasher.
///
/// `hash` must produce a self-describing string carrying a recognised scheme
/// tag; `verify` must compare in constant time for that scheme.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, CredentialError>;

    fn verify(&self, plain: &str, hashed: &str) -> bool;
}

/// bcrypt-backed hasher producing `$2b$` hashes
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plain: &str) -> Result<String, CredentialError> {
        bcrypt::hash(plain, self.cost).map_err(|e| CredentialError::HashFailed(e.to_string()))
    }

    fn verify(&self, plain: &str, hashed: &str) -> bool {
        match bcrypt::verify(plain, hashed) {
            Ok(matches) => matches,
            Err(e) => {
                // A malformed hash never authenticates
                warn!("Stored hash could not be verified: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::format::{HashScheme, SecretFormat};

    fn hasher() -> BcryptHasher {
        BcryptHasher::new(4)
    }

    #[test]
    fn test_hash_then_verify() {
        let hashed = hasher().hash("secret123").unwrap();
        assert!(hasher().verify("secret123", &hashed));
        assert!(!hasher().verify("secret124", &hashed));
    }

    #[test]
    fn test_hash_is_tagged_and_salted() {
        let first = hasher().hash("secret123").unwrap();
        let second = hasher().hash("secret123").unwrap();
        assert_ne!(first, second);
        assert!(matches!(
            SecretFormat::classify(&first),
            SecretFormat::Hashed {
                scheme: HashScheme::Bcrypt2b,
                ..
            }
        ));
    }

    #[test]
    fn test_verifies_2y_hashes() {
        let hashed = hasher().hash("secret123").unwrap().replacen("$2b$", "$2y$", 1);
        assert!(hasher().verify("secret123", &hashed));
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        assert!(!hasher().verify("secret123", "$2b$not-a-real-hash"));
    }

    #[test]
    fn test_invalid_cost_is_reported() {
        let err = BcryptHasher::new(99).hash("secret123").unwrap_err();
        assert!(matches!(err, CredentialError::HashFailed(_)));
    }
}
