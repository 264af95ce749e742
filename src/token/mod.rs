//! Bearer tokens
//!
//! Tokens are opaque to the rest of the registry; only the issuer reads them.

pub mod jwt;

pub use jwt::{Claims, JwtIssuer};

use crate::error::TokenError;

/// Issues bearer tokens after registration or login and maps them back to an email
pub trait TokenIssuer: Send + Sync {
    fn issue_token(&self, email: &str) -> Result<String, TokenError>;

    fn validate_token(&self, token: &str) -> Result<String, TokenError>;
}
