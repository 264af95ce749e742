//! Error types
//!
//! Defines domain-specific error types for each module of the student registry.

use std::fmt;
use std::io;

/// Record store errors
#[derive(Debug)]
pub enum StoreError {
    DuplicateEmail(String),
    NotFound(i32),
    LockPoisoned,
    IdSpaceExhausted,
    Io(io::Error),
    InvalidSeed(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DuplicateEmail(e) => write!(f, "Email already registered: {}", e),
            StoreError::NotFound(id) => write!(f, "Student not found: {}", id),
            StoreError::LockPoisoned => write!(f, "Record store lock poisoned"),
            StoreError::IdSpaceExhausted => write!(f, "No student ids left to assign"),
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::InvalidSeed(s) => write!(f, "Invalid seed data: {}", s),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(error: io::Error) -> Self {
        StoreError::Io(error)
    }
}

/// Credential lifecycle errors
#[derive(Debug)]
pub enum CredentialError {
    InvalidInput(String),
    HashFailed(String),
    Store(StoreError),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::InvalidInput(s) => write!(f, "Invalid input: {}", s),
            CredentialError::HashFailed(s) => write!(f, "Password hashing failed: {}", s),
            CredentialError::Store(e) => write!(f, "Store failure: {}", e),
        }
    }
}

impl std::error::Error for CredentialError {}

impl From<StoreError> for CredentialError {
    fn from(error: StoreError) -> Self {
        CredentialError::Store(error)
    }
}

/// Token issuance and validation errors
#[derive(Debug)]
pub enum TokenError {
    IssueFailed(String),
    Invalid(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::IssueFailed(s) => write!(f, "Token issuance failed: {}", s),
            TokenError::Invalid(s) => write!(f, "Invalid token: {}", s),
        }
    }
}

impl std::error::Error for TokenError {}

/// Session authentication errors
#[derive(Debug)]
pub enum AuthError {
    InvalidCredentials,
    NotLoggedIn,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::NotLoggedIn => write!(f, "Not logged in"),
        }
    }
}

impl std::error::Error for AuthError {}

/// General registry error that encompasses all error types
#[derive(Debug)]
pub enum RegistryError {
    Auth(AuthError),
    Credential(CredentialError),
    Store(StoreError),
    Token(TokenError),
    Validation(String),
    Protocol(String),
    IoError(io::Error),
    Config(config::ConfigError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Auth(e) => write!(f, "Authentication error: {}", e),
            RegistryError::Credential(e) => write!(f, "Credential error: {}", e),
            RegistryError::Store(e) => write!(f, "Storage error: {}", e),
            RegistryError::Token(e) => write!(f, "Token error: {}", e),
            RegistryError::Validation(e) => write!(f, "Validation error: {}", e),
            RegistryError::Protocol(e) => write!(f, "Protocol error: {}", e),
            RegistryError::IoError(e) => write!(f, "I/O error: {}", e),
            RegistryError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<AuthError> for RegistryError {
    fn from(error: AuthError) -> Self {
        RegistryError::Auth(error)
    }
}

// Store failures surfaced through the credential layer keep their store identity
impl From<CredentialError> for RegistryError {
    fn from(error: CredentialError) -> Self {
        match error {
            CredentialError::Store(e) => RegistryError::Store(e),
            other => RegistryError::Credential(other),
        }
    }
}

impl From<StoreError> for RegistryError {
    fn from(error: StoreError) -> Self {
        RegistryError::Store(error)
    }
}

impl From<TokenError> for RegistryError {
    fn from(error: TokenError) -> Self {
        RegistryError::Token(error)
    }
}

impl From<io::Error> for RegistryError {
    fn from(error: io::Error) -> Self {
        RegistryError::IoError(error)
    }
}

impl From<config::ConfigError> for RegistryError {
    fn from(error: config::ConfigError) -> Self {
        RegistryError::Config(error)
    }
}
