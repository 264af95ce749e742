//! JWT token issuer
//!
//! Issues and validates HS256 bearer tokens whose subject is the student email.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    get_current_timestamp,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::TokenError;
use crate::token::TokenIssuer;

/// Claims carried by issued tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

pub struct JwtIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    fn issue_at(&self, email: &str, issued_at: u64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: email.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl.as_secs()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::IssueFailed(e.to_string()))
    }

    /// Decodes and validates a token, returning its claims
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue_token(&self, email: &str) -> Result<String, TokenError> {
        self.issue_at(email, get_current_timestamp())
    }

    fn validate_token(&self, token: &str) -> Result<String, TokenError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-0123456789";

    fn issuer() -> JwtIssuer {
        JwtIssuer::new(SECRET, Duration::from_secs(3600))
    }

    #[test]
    fn test_issued_token_validates_to_subject() {
        let token = issuer().issue_token("ada@x.io").unwrap();
        assert_eq!(issuer().validate_token(&token).unwrap(), "ada@x.io");

        let claims = issuer().decode_claims(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other = JwtIssuer::new("another-secret-9876543210", Duration::from_secs(3600));
        let token = other.issue_token("ada@x.io").unwrap();
        assert!(matches!(
            issuer().validate_token(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let short = JwtIssuer::new(SECRET, Duration::from_secs(10));
        let token = short
            .issue_at("ada@x.io", get_current_timestamp() - 10_000)
            .unwrap();
        assert!(short.validate_token(&token).is_err());
    }

    #[test]
    fn test_huge_ttl_saturates_expiry() {
        let forever = JwtIssuer::new(SECRET, Duration::MAX);
        let token = forever.issue_token("ada@x.io").unwrap();
        let claims = forever.decode_claims(&token).unwrap();
        assert_eq!(claims.exp, u64::MAX);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(issuer().validate_token("not.a.token").is_err());
        assert!(issuer().validate_token("").is_err());
    }
}
