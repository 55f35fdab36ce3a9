use jobsprint_core::{
    AccountStore, AccountStoreError, Email, EmailClient, OtpError, OtpPurpose, SecretHasher,
};

use crate::email_body::send_otp_email;
use crate::otp_manager::OtpManager;

/// Error types for forgot password use case
#[derive(Debug, thiserror::Error)]
pub enum ForgotPasswordError {
    #[error("Account not found")]
    AccountNotFound,
    #[error(transparent)]
    OtpError(#[from] OtpError),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Forgot password use case - issues a password-reset code and emails it.
///
/// Re-requesting replaces any previous reset code; the caller never has to
/// wait out an old expiry.
#[derive(Clone)]
pub struct ForgotPasswordUseCase<S, H, E>
where
    S: AccountStore,
    H: SecretHasher,
    E: EmailClient + Clone + 'static,
{
    account_store: S,
    otp_manager: OtpManager<S, H>,
    email_client: E,
}

impl<S, H, E> ForgotPasswordUseCase<S, H, E>
where
    S: AccountStore + Clone,
    H: SecretHasher + Clone,
    E: EmailClient + Clone + 'static,
{
    pub fn new(account_store: S, otp_manager: OtpManager<S, H>, email_client: E) -> Self {
        Self {
            account_store,
            otp_manager,
            email_client,
        }
    }

    #[tracing::instrument(name = "ForgotPasswordUseCase::execute", skip(self))]
    pub async fn execute(&self, email: Email) -> Result<(), ForgotPasswordError> {
        let account = match self.account_store.find_by_email(&email).await {
            Ok(account) => account,
            Err(AccountStoreError::AccountNotFound) => {
                return Err(ForgotPasswordError::AccountNotFound);
            }
            Err(error) => return Err(ForgotPasswordError::UnexpectedError(error.to_string())),
        };

        let code = self
            .otp_manager
            .issue(account.id, OtpPurpose::ForgetPassword)
            .await?;

        send_otp_email(
            self.email_client.clone(),
            email,
            account.first_name,
            code,
            "Reset your password",
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jobsprint_adapters::crypto::Argon2SecretHasher;
    use jobsprint_adapters::email::RecordingEmailClient;
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
        email_client: RecordingEmailClient,
    ) -> ForgotPasswordUseCase<InMemoryAccountStore, Argon2SecretHasher, RecordingEmailClient>
    {
        let hasher = Argon2SecretHasher::for_otp_codes();
        let otp_manager = OtpManager::new(store.clone(), hasher, TimeDelta::minutes(10));
        ForgotPasswordUseCase::new(store, otp_manager, email_client)
    }

    #[tokio::test]
    async fn stores_a_reset_code_and_emails_it() {
        let store = store_with_account().await;
        let email_client = RecordingEmailClient::new();
        let use_case = use_case(store.clone(), email_client.clone());

        use_case.execute(email()).await.unwrap();

        let account = store.find_by_email(&email()).await.unwrap();
        let pending = store
            .get_otp(account.id, OtpPurpose::ForgetPassword)
            .await
            .unwrap();
        assert!(pending.is_some());

        let mut sent = Vec::new();
        for _ in 0..100 {
            sent = email_client.sent().await;
            if !sent.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(sent.len(), 1);
        assert!(sent[0].content.contains("Reset your password"));
    }

    #[tokio::test]
    async fn unknown_email_is_reported_and_nothing_is_sent() {
        let email_client = RecordingEmailClient::new();
        let use_case = use_case(InMemoryAccountStore::new(), email_client.clone());

        let result = use_case.execute(email()).await;
        assert!(matches!(result, Err(ForgotPasswordError::AccountNotFound)));
        assert!(email_client.sent().await.is_empty());
    }
}
