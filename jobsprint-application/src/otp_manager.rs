use chrono::{TimeDelta, Utc};

use jobsprint_core::{
    AccountId, AccountStore, AccountStoreError, OtpCode, OtpEntry, OtpError, OtpPurpose,
    SecretHasher,
};

/// Issues and verifies one-time codes attached to an account.
///
/// Codes are stored hashed so a compromised data store does not leak usable
/// codes; at most one code per purpose is live at a time.
#[derive(Clone)]
pub struct OtpManager<S, H>
where
    S: AccountStore,
    H: SecretHasher,
{
    account_store: S,
    hasher: H,
    code_ttl: TimeDelta,
}

impl<S, H> OtpManager<S, H>
where
    S: AccountStore,
    H: SecretHasher,
{
    pub fn new(account_store: S, hasher: H, code_ttl: TimeDelta) -> Self {
        Self {
            account_store,
            hasher,
            code_ttl,
        }
    }

    /// Generate a fresh code for the purpose, store its hash with an absolute
    /// expiry, and hand back the plaintext for out-of-band delivery.
    ///
    /// Any previous code of the same purpose is replaced.
    #[tracing::instrument(name = "OtpManager::issue", skip(self))]
    pub async fn issue(
        &self,
        account_id: AccountId,
        purpose: OtpPurpose,
    ) -> Result<OtpCode, OtpError> {
        let code = OtpCode::new();
        let code_hash = self
            .hasher
            .hash(code.as_ref().clone())
            .await
            .map_err(OtpError::UnexpectedError)?;

        let entry = OtpEntry {
            code_hash,
            purpose,
            expires_at: Utc::now() + self.code_ttl,
        };
        self.account_store
            .put_otp(account_id, entry)
            .await
            .map_err(store_error)?;

        Ok(code)
    }

    /// Check a supplied code against the pending entry for the purpose and
    /// consume the entry on success.
    ///
    /// Consumption is a compare-and-delete: if a concurrent verification of
    /// the same code already removed the entry, this one fails `NotFound`.
    #[tracing::instrument(name = "OtpManager::verify", skip(self, candidate))]
    pub async fn verify(
        &self,
        account_id: AccountId,
        purpose: OtpPurpose,
        candidate: &OtpCode,
    ) -> Result<(), OtpError> {
        let entry = self
            .account_store
            .get_otp(account_id, purpose)
            .await
            .map_err(store_error)?
            .ok_or(OtpError::NotFound)?;

        if entry.is_expired_at(Utc::now()) {
            return Err(OtpError::Expired);
        }

        let matches = self
            .hasher
            .verify(candidate.as_ref().clone(), entry.code_hash.clone())
            .await
            .map_err(OtpError::UnexpectedError)?;
        if !matches {
            return Err(OtpError::Mismatch);
        }

        let consumed = self
            .account_store
            .take_otp_if_hash_matches(account_id, purpose, &entry.code_hash)
            .await
            .map_err(store_error)?;
        if !consumed {
            return Err(OtpError::NotFound);
        }

        Ok(())
    }
}

fn store_error(error: AccountStoreError) -> OtpError {
    match error {
        AccountStoreError::AccountNotFound => OtpError::NotFound,
        other => OtpError::UnexpectedError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use jobsprint_adapters::crypto::Argon2SecretHasher;
    use jobsprint_adapters::persistence::InMemoryAccountStore;
    use jobsprint_core::{Email, NewAccount};
    use secrecy::{ExposeSecret, Secret};

    use super::*;

    /// A six-digit code guaranteed to differ from `code`.
    fn different_code(code: &OtpCode) -> OtpCode {
        let raw = code.as_ref().expose_secret();
        let first = if raw.as_bytes()[0] == b'9' { '1' } else { '9' };
        OtpCode::try_from(Secret::from(format!("{first}{}", &raw[1..]))).unwrap()
    }

    async fn account_in_store(store: &InMemoryAccountStore) -> AccountId {
        store
            .add_account(NewAccount {
                email: Email::try_from(Secret::from("a@x.com".to_string())).unwrap(),
                password_hash: Secret::from("digest".to_string()),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                phone: None,
                date_of_birth: None,
            })
            .await
            .unwrap()
    }

    fn manager(store: InMemoryAccountStore, ttl: TimeDelta) -> OtpManager<InMemoryAccountStore, Argon2SecretHasher> {
        OtpManager::new(store, Argon2SecretHasher::for_otp_codes(), ttl)
    }

    #[tokio::test]
    async fn issued_code_verifies_exactly_once() {
        let store = InMemoryAccountStore::new();
        let account_id = account_in_store(&store).await;
        let manager = manager(store, TimeDelta::minutes(10));

        let code = manager
            .issue(account_id, OtpPurpose::ConfirmEmail)
            .await
            .unwrap();

        manager
            .verify(account_id, OtpPurpose::ConfirmEmail, &code)
            .await
            .unwrap();

        // The entry was consumed; a replay finds nothing.
        let replay = manager
            .verify(account_id, OtpPurpose::ConfirmEmail, &code)
            .await;
        assert_eq!(replay.unwrap_err(), OtpError::NotFound);
    }

    #[tokio::test]
    async fn expired_code_fails_even_when_it_matches() {
        let store = InMemoryAccountStore::new();
        let account_id = account_in_store(&store).await;
        let manager = manager(store, TimeDelta::minutes(-1));

        let code = manager
            .issue(account_id, OtpPurpose::ConfirmEmail)
            .await
            .unwrap();

        let result = manager
            .verify(account_id, OtpPurpose::ConfirmEmail, &code)
            .await;
        assert_eq!(result.unwrap_err(), OtpError::Expired);
    }

    #[tokio::test]
    async fn wrong_code_is_a_mismatch_and_keeps_the_entry() {
        let store = InMemoryAccountStore::new();
        let account_id = account_in_store(&store).await;
        let manager = manager(store, TimeDelta::minutes(10));

        let code = manager
            .issue(account_id, OtpPurpose::ConfirmEmail)
            .await
            .unwrap();

        let wrong = different_code(&code);
        let result = manager
            .verify(account_id, OtpPurpose::ConfirmEmail, &wrong)
            .await;
        assert_eq!(result.unwrap_err(), OtpError::Mismatch);

        // The right code still works afterwards.
        manager
            .verify(account_id, OtpPurpose::ConfirmEmail, &code)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn reissuing_a_purpose_replaces_the_previous_code() {
        let store = InMemoryAccountStore::new();
        let account_id = account_in_store(&store).await;
        let manager = manager(store, TimeDelta::minutes(10));

        let first = manager
            .issue(account_id, OtpPurpose::ForgetPassword)
            .await
            .unwrap();
        let second = manager
            .issue(account_id, OtpPurpose::ForgetPassword)
            .await
            .unwrap();

        let stale = manager
            .verify(account_id, OtpPurpose::ForgetPassword, &first)
            .await;
        // With one in a million odds the two codes collide and the stale one
        // still verifies; regenerate in that case rather than flake.
        if first.as_ref().expose_secret() != second.as_ref().expose_secret() {
            assert_eq!(stale.unwrap_err(), OtpError::Mismatch);
        }

        manager
            .verify(account_id, OtpPurpose::ForgetPassword, &second)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn purposes_do_not_interfere() {
        let store = InMemoryAccountStore::new();
        let account_id = account_in_store(&store).await;
        let manager = manager(store, TimeDelta::minutes(10));

        let confirm = manager
            .issue(account_id, OtpPurpose::ConfirmEmail)
            .await
            .unwrap();
        let reset = manager
            .issue(account_id, OtpPurpose::ForgetPassword)
            .await
            .unwrap();

        manager
            .verify(account_id, OtpPurpose::ForgetPassword, &reset)
            .await
            .unwrap();
        manager
            .verify(account_id, OtpPurpose::ConfirmEmail, &confirm)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn issuing_for_an_unknown_account_fails() {
        let store = InMemoryAccountStore::new();
        let manager = manager(store, TimeDelta::minutes(10));

        let result = manager
            .issue(AccountId::new(), OtpPurpose::ConfirmEmail)
            .await;
        assert_eq!(result.unwrap_err(), OtpError::NotFound);
    }
}
