//! Authentication system
//!
//! Handles secret classification, password hashing, and the credential
//! lifecycle including migration of legacy plain-text secrets.

pub mod format;
pub mod hasher;
pub mod manager;
pub mod results;

pub use format::{HashScheme, SecretFormat};
pub use hasher::{BcryptHasher, PasswordHasher};
pub use manager::CredentialManager;
pub use results::{LoginOutcome, MigrationFailure, MigrationReport};
