use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;

use jobsprint_core::{
    Account, AccountId, AccountStore, AccountStoreError, Email, NewAccount, OtpEntry, OtpPurpose,
};

/// In-memory `AccountStore` for tests.
///
/// One lock guards accounts and pending codes together, which makes code
/// consumption an atomic read-modify-write just like the production store's
/// conditional delete.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<AccountId, Account>,
    otps: HashMap<(AccountId, OtpPurpose), OtpEntry>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test helper: set or clear the ban timestamp.
    pub async fn set_banned_at(&self, id: AccountId, banned_at: Option<DateTime<Utc>>) {
        if let Some(account) = self.inner.write().await.accounts.get_mut(&id) {
            account.banned_at = banned_at;
        }
    }

    /// Test helper: set or clear the soft-delete timestamp.
    pub async fn set_deleted_at(&self, id: AccountId, deleted_at: Option<DateTime<Utc>>) {
        if let Some(account) = self.inner.write().await.accounts.get_mut(&id) {
            account.deleted_at = deleted_at;
        }
    }
}

#[async_trait::async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn add_account(&self, account: NewAccount) -> Result<AccountId, AccountStoreError> {
        let mut inner = self.inner.write().await;
        if inner.accounts.values().any(|a| a.email == account.email) {
            return Err(AccountStoreError::EmailAlreadyExists);
        }

        let id = AccountId::new();
        inner.accounts.insert(
            id,
            Account {
                id,
                email: account.email,
                password_hash: account.password_hash,
                first_name: account.first_name,
                last_name: account.last_name,
                phone: account.phone,
                date_of_birth: account.date_of_birth,
                confirmed: false,
                change_credential_time: None,
                deleted_at: None,
                banned_at: None,
            },
        );
        Ok(id)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Account, AccountStoreError> {
        let inner = self.inner.read().await;
        inner
            .accounts
            .values()
            .find(|a| &a.email == email)
            .cloned()
            .ok_or(AccountStoreError::AccountNotFound)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Account, AccountStoreError> {
        let inner = self.inner.read().await;
        inner
            .accounts
            .get(&id)
            .cloned()
            .ok_or(AccountStoreError::AccountNotFound)
    }

    async fn mark_confirmed(&self, id: AccountId) -> Result<(), AccountStoreError> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .get_mut(&id)
            .ok_or(AccountStoreError::AccountNotFound)?;
        account.confirmed = true;
        Ok(())
    }

    async fn set_password_hash(
        &self,
        id: AccountId,
        password_hash: Secret<String>,
        changed_at: DateTime<Utc>,
    ) -> Result<(), AccountStoreError> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .get_mut(&id)
            .ok_or(AccountStoreError::AccountNotFound)?;
        account.password_hash = password_hash;
        account.change_credential_time = Some(changed_at);
        Ok(())
    }

    async fn put_otp(&self, id: AccountId, entry: OtpEntry) -> Result<(), AccountStoreError> {
        let mut inner = self.inner.write().await;
        if !inner.accounts.contains_key(&id) {
            return Err(AccountStoreError::AccountNotFound);
        }
        inner.otps.insert((id, entry.purpose), entry);
        Ok(())
    }

    async fn get_otp(
        &self,
        id: AccountId,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpEntry>, AccountStoreError> {
        let inner = self.inner.read().await;
        Ok(inner.otps.get(&(id, purpose)).cloned())
    }

    async fn take_otp_if_hash_matches(
        &self,
        id: AccountId,
        purpose: OtpPurpose,
        code_hash: &Secret<String>,
    ) -> Result<bool, AccountStoreError> {
        let mut inner = self.inner.write().await;
        let key = (id, purpose);
        let matches = inner
            .otps
            .get(&key)
            .is_some_and(|entry| entry.code_hash.expose_secret() == code_hash.expose_secret());
        if matches {
            inner.otps.remove(&key);
        }
        Ok(matches)
    }
}
