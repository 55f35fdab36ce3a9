use chrono::NaiveDate;

use jobsprint_core::{
    AccountStore, AccountStoreError, Email, EmailClient, NewAccount, OtpError, OtpPurpose,
    Password, Phone, SecretHasher,
};

use crate::email_body::send_otp_email;
use crate::otp_manager::OtpManager;

/// Data accepted from a new registrant.
#[derive(Debug)]
pub struct SignupData {
    pub email: Email,
    pub password: Password,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<Phone>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Error types for signup use case
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("Account store error: {0}")]
    AccountStoreError(#[from] AccountStoreError),
    #[error("Failed to hash password: {0}")]
    HashingError(String),
    #[error("Failed to issue confirmation code: {0}")]
    OtpError(#[from] OtpError),
}

/// Signup use case - creates an unconfirmed account and emails a
/// confirmation code.
#[derive(Clone)]
pub struct SignupUseCase<S, H, E>
where
    S: AccountStore,
    H: SecretHasher,
    E: EmailClient + Clone + 'static,
{
    account_store: S,
    hasher: H,
    otp_manager: OtpManager<S, H>,
    email_client: E,
}

impl<S, H, E> SignupUseCase<S, H, E>
where
    S: AccountStore + Clone,
    H: SecretHasher + Clone,
    E: EmailClient + Clone + 'static,
{
    pub fn new(account_store: S, hasher: H, otp_manager: OtpManager<S, H>, email_client: E) -> Self {
        Self {
            account_store,
            hasher,
            otp_manager,
            email_client,
        }
    }

    /// Execute the signup use case
    ///
    /// Creates the account unconfirmed, issues a confirmation code, and sends
    /// it by email on a detached task. The caller gets an answer regardless
    /// of email transport health.
    #[tracing::instrument(name = "SignupUseCase::execute", skip(self, data))]
    pub async fn execute(&self, data: SignupData) -> Result<(), SignupError> {
        let password_hash = self
            .hasher
            .hash(data.password.into_secret())
            .await
            .map_err(SignupError::HashingError)?;

        let account_id = self
            .account_store
            .add_account(NewAccount {
                email: data.email.clone(),
                password_hash,
                first_name: data.first_name.clone(),
                last_name: data.last_name,
                phone: data.phone,
                date_of_birth: data.date_of_birth,
            })
            .await?;

        let code = self
            .otp_manager
            .issue(account_id, OtpPurpose::ConfirmEmail)
            .await?;

        send_otp_email(
            self.email_client.clone(),
            data.email,
            data.first_name,
            code,
            "Verify your account",
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jobsprint_adapters::crypto::Argon2SecretHasher;
    use jobsprint_adapters::email::RecordingEmailClient;
    use jobsprint_adapters::persistence::InMemoryAccountStore;
    use chrono::TimeDelta;
    use secrecy::Secret;

    use super::*;

    fn signup_data(email: &str) -> SignupData {
        SignupData {
            email: Email::try_from(Secret::from(email.to_string())).unwrap(),
            password: Password::try_from(Secret::from("P@ss1234".to_string())).unwrap(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: Some(Phone::try_from(Secret::from("+15551234567".to_string())).unwrap()),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10),
        }
    }

    fn use_case(
        store: InMemoryAccountStore,
        email_client: RecordingEmailClient,
    ) -> SignupUseCase<InMemoryAccountStore, Argon2SecretHasher, RecordingEmailClient> {
        let hasher = Argon2SecretHasher::for_otp_codes();
        let otp_manager = OtpManager::new(store.clone(), hasher.clone(), TimeDelta::minutes(10));
        SignupUseCase::new(store, hasher, otp_manager, email_client)
    }

    #[tokio::test]
    async fn creates_an_unconfirmed_account_with_a_pending_code() {
        let store = InMemoryAccountStore::new();
        let use_case = use_case(store.clone(), RecordingEmailClient::new());

        use_case.execute(signup_data("a@x.com")).await.unwrap();

        let email = Email::try_from(Secret::from("a@x.com".to_string())).unwrap();
        let account = store.find_by_email(&email).await.unwrap();
        assert!(!account.confirmed);

        let pending = store
            .get_otp(account.id, OtpPurpose::ConfirmEmail)
            .await
            .unwrap();
        assert!(pending.is_some());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryAccountStore::new();
        let use_case = use_case(store, RecordingEmailClient::new());

        use_case.execute(signup_data("a@x.com")).await.unwrap();
        let result = use_case.execute(signup_data("a@x.com")).await;

        assert!(matches!(
            result,
            Err(SignupError::AccountStoreError(
                AccountStoreError::EmailAlreadyExists
            ))
        ));
    }

    #[tokio::test]
    async fn confirmation_code_is_emailed_to_the_registrant() {
        let store = InMemoryAccountStore::new();
        let email_client = RecordingEmailClient::new();
        let use_case = use_case(store, email_client.clone());

        use_case.execute(signup_data("a@x.com")).await.unwrap();

        // Delivery happens on a detached task; wait for it to land.
        let mut sent = Vec::new();
        for _ in 0..100 {
            sent = email_client.sent().await;
            if !sent.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "a@x.com");
        assert_eq!(sent[0].subject, "Your OTP code");
        assert!(sent[0].content.contains("Hello Ada"));
        assert!(sent[0].content.contains("Verify your account"));
    }
}
