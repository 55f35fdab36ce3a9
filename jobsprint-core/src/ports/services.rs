use async_trait::async_trait;
use secrecy::Secret;
use thiserror::Error;

use crate::domain::{
    account::AccountId,
    email::Email,
    token::{TokenClaims, TokenKind},
};

/// Port trait for email sending service
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String>;
}

/// Port trait for one-way salted hashing of passwords and one-time codes.
///
/// Failures are sentinel `Err(String)` values so callers can answer with a
/// generic error instead of leaking hashing internals; a well-formed digest
/// that simply does not match is `Ok(false)`.
#[async_trait]
pub trait SecretHasher: Send + Sync {
    async fn hash(&self, secret: Secret<String>) -> Result<Secret<String>, String>;
    async fn verify(
        &self,
        candidate: Secret<String>,
        digest: Secret<String>,
    ) -> Result<bool, String>;
}

// TokenService port trait and errors
#[derive(Debug, Error)]
pub enum TokenServiceError {
    #[error("Malformed token")]
    Malformed,
    #[error("Token has expired")]
    Expired,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for TokenServiceError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Malformed, Self::Malformed)
                | (Self::Expired, Self::Expired)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Port trait for minting and validating signed bearer tokens.
///
/// Pure signing and verification: revocation and credential-change
/// invalidation are layered on top by the flows that need them.
pub trait TokenService: Send + Sync {
    fn issue_access_token(
        &self,
        account_id: AccountId,
        email: &Email,
    ) -> Result<String, TokenServiceError>;
    fn issue_refresh_token(
        &self,
        account_id: AccountId,
        email: &Email,
    ) -> Result<String, TokenServiceError>;
    fn verify(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, TokenServiceError>;
}
