use chrono::{DateTime, NaiveDate, Utc};
use secrecy::Secret;
use uuid::Uuid;

use crate::domain::{email::Email, phone::Phone};

/// Identifier of a persisted account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AccountId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Data required to create an account. The password arrives already hashed;
/// plaintext never crosses the persistence boundary.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub password_hash: Secret<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<Phone>,
    pub date_of_birth: Option<NaiveDate>,
}

/// A persisted account as seen by the application layer.
///
/// The phone number is plaintext here; the store decrypts on load and
/// encrypts on write.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: Email,
    pub password_hash: Secret<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<Phone>,
    pub date_of_birth: Option<NaiveDate>,
    pub confirmed: bool,
    pub change_credential_time: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub banned_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Whether the account may authenticate at all.
    pub fn is_active(&self) -> bool {
        self.banned_at.is_none() && self.deleted_at.is_none()
    }

    /// Whether the password was changed after the given instant.
    ///
    /// Compared at second granularity: token issuance times travel through
    /// JWT `iat` claims, which only carry whole seconds.
    pub fn credentials_changed_since(&self, instant: DateTime<Utc>) -> bool {
        self.change_credential_time
            .is_some_and(|changed_at| changed_at.timestamp() > instant.timestamp())
    }
}
