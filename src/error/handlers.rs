//! Error handlers
//!
//! Maps registry errors onto protocol status codes and client-facing messages.

use crate::error::types::{AuthError, CredentialError, RegistryError, StoreError, TokenError};
use crate::protocol::responses;
use log::{error, warn};

/// Log a registry error at a level matching its severity
pub fn handle_error(err: &RegistryError) {
    match error_to_status_code(err) {
        responses::INTERNAL_ERROR => error!("Registry error: {}", err),
        _ => warn!("Request rejected: {}", err),
    }
}

/// Convert error to protocol status code
pub fn error_to_status_code(err: &RegistryError) -> u16 {
    match err {
        RegistryError::Auth(_) => responses::UNAUTHORIZED,
        RegistryError::Token(TokenError::Invalid(_)) => responses::UNAUTHORIZED,
        RegistryError::Token(TokenError::IssueFailed(_)) => responses::INTERNAL_ERROR,
        RegistryError::Credential(CredentialError::InvalidInput(_)) => responses::BAD_REQUEST,
        RegistryError::Credential(_) => responses::INTERNAL_ERROR,
        RegistryError::Store(StoreError::NotFound(_)) => responses::NOT_FOUND,
        RegistryError::Store(StoreError::DuplicateEmail(_)) => responses::CONFLICT,
        RegistryError::Store(_) => responses::INTERNAL_ERROR,
        RegistryError::Validation(_) => responses::BAD_REQUEST,
        RegistryError::Protocol(_) => responses::BAD_REQUEST,
        RegistryError::IoError(_) => responses::INTERNAL_ERROR,
        RegistryError::Config(_) => responses::INTERNAL_ERROR,
    }
}

/// Message sent to the client for an error.
///
/// Internal failures are reported generically; their detail only goes to the log.
pub fn error_to_client_message(err: &RegistryError) -> String {
    match err {
        RegistryError::Auth(AuthError::InvalidCredentials) => "Invalid credentials".into(),
        RegistryError::Auth(AuthError::NotLoggedIn) => "Not logged in".into(),
        RegistryError::Token(TokenError::Invalid(_)) => "Invalid token".into(),
        RegistryError::Credential(CredentialError::InvalidInput(msg)) => msg.clone(),
        RegistryError::Store(StoreError::NotFound(_)) => "Student not found".into(),
        RegistryError::Store(StoreError::DuplicateEmail(_)) => "Email already registered".into(),
        RegistryError::Validation(msg) | RegistryError::Protocol(msg) => msg.clone(),
        _ => "Internal server error".into(),
    }
}
