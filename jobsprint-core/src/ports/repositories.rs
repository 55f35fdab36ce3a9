use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::Secret;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    account::{Account, AccountId, NewAccount},
    email::Email,
    otp::{OtpEntry, OtpPurpose},
};

// AccountStore port trait and errors
#[derive(Debug, Error)]
pub enum AccountStoreError {
    #[error("Email already exists")]
    EmailAlreadyExists,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for AccountStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::EmailAlreadyExists, Self::EmailAlreadyExists)
                | (Self::AccountNotFound, Self::AccountNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Persistence boundary for accounts and their pending one-time codes.
///
/// Point lookups and upserts only. `take_otp_if_hash_matches` is the
/// read-modify-write half of code consumption: it must remove the entry only
/// when the stored hash still equals `code_hash`, atomically, so concurrent
/// verifications of the same code cannot both succeed.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn add_account(&self, account: NewAccount) -> Result<AccountId, AccountStoreError>;
    async fn find_by_email(&self, email: &Email) -> Result<Account, AccountStoreError>;
    async fn find_by_id(&self, id: AccountId) -> Result<Account, AccountStoreError>;
    async fn mark_confirmed(&self, id: AccountId) -> Result<(), AccountStoreError>;
    async fn set_password_hash(
        &self,
        id: AccountId,
        password_hash: Secret<String>,
        changed_at: DateTime<Utc>,
    ) -> Result<(), AccountStoreError>;
    /// Store a pending code, replacing any previous entry of the same purpose.
    async fn put_otp(&self, id: AccountId, entry: OtpEntry) -> Result<(), AccountStoreError>;
    async fn get_otp(
        &self,
        id: AccountId,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpEntry>, AccountStoreError>;
    /// Remove the entry for `purpose` if its stored hash equals `code_hash`.
    /// Returns whether an entry was removed.
    async fn take_otp_if_hash_matches(
        &self,
        id: AccountId,
        purpose: OtpPurpose,
        code_hash: &Secret<String>,
    ) -> Result<bool, AccountStoreError>;
}

// RevocationStore port trait and errors
#[derive(Debug, Error)]
pub enum RevocationStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Durable record of revoked token identifiers, shared across all server
/// instances with read-after-write consistency. Records may be pruned once
/// past their expiry; the token's own TTL check covers them from then on.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Idempotent: revoking an already-revoked identifier is a no-op.
    async fn revoke(
        &self,
        token_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RevocationStoreError>;
    async fn is_revoked(&self, token_id: Uuid) -> Result<bool, RevocationStoreError>;
}
