use jobsprint_core::{
    AccountStore, AccountStoreError, Email, OtpCode, OtpError, OtpPurpose, SecretHasher,
};

use crate::otp_manager::OtpManager;

/// Error types for verify account use case
#[derive(Debug, thiserror::Error)]
pub enum VerifyAccountError {
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
    #[error(transparent)]
    OtpError(#[from] OtpError),
}

/// Verify account use case - consumes a confirmation code and marks the
/// account confirmed.
///
/// A confirmed account has no pending confirmation entry left, so replaying a
/// stale code fails with `NotFound`, which is the desired terminal behavior.
#[derive(Clone)]
pub struct VerifyAccountUseCase<S, H>
where
    S: AccountStore,
    H: SecretHasher,
{
    account_store: S,
    otp_manager: OtpManager<S, H>,
}

impl<S, H> VerifyAccountUseCase<S, H>
where
    S: AccountStore + Clone,
    H: SecretHasher + Clone,
{
    pub fn new(account_store: S, otp_manager: OtpManager<S, H>) -> Self {
        Self {
            account_store,
            otp_manager,
        }
    }

    #[tracing::instrument(name = "VerifyAccountUseCase::execute", skip(self, code))]
    pub async fn execute(&self, email: Email, code: OtpCode) -> Result<(), VerifyAccountError> {
        let account = self.account_store.find_by_email(&email).await?;

        self.otp_manager
            .verify(account.id, OtpPurpose::ConfirmEmail, &code)
            .await?;

        self.account_store.mark_confirmed(account.id).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jobsprint_adapters::crypto::Argon2SecretHasher;
    use jobsprint_adapters::persistence::InMemoryAccountStore;
    use jobsprint_core::NewAccount;
    use chrono::TimeDelta;
    use secrecy::Secret;

    use super::*;

    fn email() -> Email {
        Email::try_from(Secret::from("a@x.com".to_string())).unwrap()
    }

    async fn store_with_account() -> InMemoryAccountStore {
        let store = InMemoryAccountStore::new();
        store
            .add_account(NewAccount {
                email: email(),
                password_hash: Secret::from("digest".to_string()),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                phone: None,
                date_of_birth: None,
            })
            .await
            .unwrap();
        store
    }

    fn use_case(
        store: InMemoryAccountStore,
    ) -> (
        VerifyAccountUseCase<InMemoryAccountStore, Argon2SecretHasher>,
        OtpManager<InMemoryAccountStore, Argon2SecretHasher>,
    ) {
        let hasher = Argon2SecretHasher::for_otp_codes();
        let otp_manager = OtpManager::new(store.clone(), hasher.clone(), TimeDelta::minutes(10));
        (
            VerifyAccountUseCase::new(store, otp_manager.clone()),
            otp_manager,
        )
    }

    #[tokio::test]
    async fn correct_code_confirms_the_account_once() {
        let store = store_with_account().await;
        let (use_case, otp_manager) = use_case(store.clone());

        let account = store.find_by_email(&email()).await.unwrap();
        let code = otp_manager
            .issue(account.id, OtpPurpose::ConfirmEmail)
            .await
            .unwrap();

        use_case.execute(email(), code.clone()).await.unwrap();
        assert!(store.find_by_email(&email()).await.unwrap().confirmed);

        // The code was consumed on confirmation; replaying it finds nothing.
        let replay = use_case.execute(email(), code).await;
        assert!(matches!(
            replay,
            Err(VerifyAccountError::OtpError(OtpError::NotFound))
        ));
    }

    #[tokio::test]
    async fn unknown_email_is_rejected() {
        let (use_case, _) = use_case(InMemoryAccountStore::new());

        let code = OtpCode::new();
        let result = use_case.execute(email(), code).await;
        assert!(matches!(
            result,
            Err(VerifyAccountError::AccountStoreError(
                AccountStoreError::AccountNotFound
            ))
        ));
    }

    #[tokio::test]
    async fn wrong_code_leaves_the_account_unconfirmed() {
        let store = store_with_account().await;
        let (use_case, otp_manager) = use_case(store.clone());

        let account = store.find_by_email(&email()).await.unwrap();
        let issued = otp_manager
            .issue(account.id, OtpPurpose::ConfirmEmail)
            .await
            .unwrap();

        let wrong = {
            use secrecy::ExposeSecret;
            let raw = issued.as_ref().expose_secret();
            let first = if raw.as_bytes()[0] == b'9' { '1' } else { '9' };
            OtpCode::try_from(Secret::from(format!("{first}{}", &raw[1..]))).unwrap()
        };

        let result = use_case.execute(email(), wrong).await;
        assert!(matches!(
            result,
            Err(VerifyAccountError::OtpError(OtpError::Mismatch))
        ));
        assert!(!store.find_by_email(&email()).await.unwrap().confirmed);
    }
}
