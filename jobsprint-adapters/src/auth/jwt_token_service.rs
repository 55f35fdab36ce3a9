use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode, errors::ErrorKind};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jobsprint_core::{AccountId, Email, TokenClaims, TokenKind, TokenService, TokenServiceError};

/// Signing configuration. Access and refresh tokens use distinct secrets so a
/// leaked access-token secret cannot forge refresh tokens.
#[derive(Clone)]
pub struct TokenConfig {
    pub access_secret: Secret<String>,
    pub refresh_secret: Secret<String>,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
}

/// `TokenService` backed by HS256 JWTs.
///
/// Every issued token carries a fresh UUIDv4 `jti`, which downstream flows
/// use as the revocation key. Verification here is pure: no store lookups.
#[derive(Clone)]
pub struct JwtTokenService {
    config: TokenConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    sub: Uuid,
    email: String,
    iat: i64,
    exp: i64,
    jti: Uuid,
    typ: String,
}

impl JwtTokenService {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    fn secret_for(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => self.config.access_secret.expose_secret().as_bytes(),
            TokenKind::Refresh => self.config.refresh_secret.expose_secret().as_bytes(),
        }
    }

    fn ttl_seconds(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.config.access_ttl_seconds,
            TokenKind::Refresh => self.config.refresh_ttl_seconds,
        }
    }

    fn issue(
        &self,
        account_id: AccountId,
        email: &Email,
        kind: TokenKind,
    ) -> Result<String, TokenServiceError> {
        let delta = chrono::Duration::try_seconds(self.ttl_seconds(kind)).ok_or_else(|| {
            TokenServiceError::UnexpectedError("Failed to create token duration".to_string())
        })?;

        let now = Utc::now();
        let expires_at = now.checked_add_signed(delta).ok_or_else(|| {
            TokenServiceError::UnexpectedError("Duration out of range".to_string())
        })?;

        let claims = JwtClaims {
            sub: account_id.as_uuid(),
            email: email.as_ref().expose_secret().clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
            typ: kind.as_str().to_string(),
        };

        encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_for(kind)),
        )
        .map_err(|e| TokenServiceError::UnexpectedError(e.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn issue_access_token(
        &self,
        account_id: AccountId,
        email: &Email,
    ) -> Result<String, TokenServiceError> {
        self.issue(account_id, email, TokenKind::Access)
    }

    fn issue_refresh_token(
        &self,
        account_id: AccountId,
        email: &Email,
    ) -> Result<String, TokenServiceError> {
        self.issue(account_id, email, TokenKind::Refresh)
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, TokenServiceError> {
        let data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret_for(expected)),
            &Validation::default(),
        )
        .map_err(|error| match error.kind() {
            ErrorKind::ExpiredSignature => TokenServiceError::Expired,
            _ => TokenServiceError::Malformed,
        })?;

        let claims = data.claims;
        if claims.typ != expected.as_str() {
            return Err(TokenServiceError::Malformed);
        }

        let email =
            Email::try_from(Secret::from(claims.email)).map_err(|_| TokenServiceError::Malformed)?;
        let issued_at =
            DateTime::from_timestamp(claims.iat, 0).ok_or(TokenServiceError::Malformed)?;
        let expires_at =
            DateTime::from_timestamp(claims.exp, 0).ok_or(TokenServiceError::Malformed)?;

        Ok(TokenClaims {
            account_id: AccountId::from(claims.sub),
            email,
            token_id: claims.jti,
            issued_at,
            expires_at,
            kind: expected,
        })
    }
}
