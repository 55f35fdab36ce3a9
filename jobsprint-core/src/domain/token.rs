use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{account::AccountId, email::Email};

/// Discriminates the two bearer credential families. Access tokens authorize
/// individual requests; refresh tokens only mint new access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

/// Claims decoded from a verified token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub account_id: AccountId,
    pub email: Email,
    /// Revocation key, unique across all tokens ever issued.
    pub token_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub kind: TokenKind,
}
