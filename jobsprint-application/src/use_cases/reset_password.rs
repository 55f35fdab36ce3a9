use chrono::Utc;

use jobsprint_core::{
    AccountStore, AccountStoreError, Email, OtpCode, OtpError, OtpPurpose, Password, SecretHasher,
};

use crate::otp_manager::OtpManager;

/// Error types for reset password use case
#[derive(Debug, thiserror::Error)]
pub enum ResetPasswordError {
    #[error("Account not found")]
    AccountNotFound,
    #[error(transparent)]
    OtpError(#[from] OtpError),
    #[error("Failed to hash password: {0}")]
    HashingError(String),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Reset password use case - consumes a reset code, stores the new password
/// hash, and records the change instant.
///
/// Recording the instant is what invalidates every refresh token issued
/// before the reset, without enumerating them.
#[derive(Clone)]
pub struct ResetPasswordUseCase<S, H>
where
    S: AccountStore,
    H: SecretHasher,
{
    account_store: S,
    hasher: H,
    otp_manager: OtpManager<S, H>,
}

impl<S, H> ResetPasswordUseCase<S, H>
where
    S: AccountStore + Clone,
    H: SecretHasher + Clone,
{
    pub fn new(account_store: S, hasher: H, otp_manager: OtpManager<S, H>) -> Self {
        Self {
            account_store,
            hasher,
            otp_manager,
        }
    }

    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip(self, code, new_password))]
    pub async fn execute(
        &self,
        email: Email,
        code: OtpCode,
        new_password: Password,
    ) -> Result<(), ResetPasswordError> {
        let account = match self.account_store.find_by_email(&email).await {
            Ok(account) => account,
            Err(AccountStoreError::AccountNotFound) => {
                return Err(ResetPasswordError::AccountNotFound);
            }
            Err(error) => return Err(ResetPasswordError::UnexpectedError(error.to_string())),
        };

        self.otp_manager
            .verify(account.id, OtpPurpose::ForgetPassword, &code)
            .await?;

        let password_hash = self
            .hasher
            .hash(new_password.into_secret())
            .await
            .map_err(ResetPasswordError::HashingError)?;

        self.account_store
            .set_password_hash(account.id, password_hash, Utc::now())
            .await
            .map_err(|error| ResetPasswordError::UnexpectedError(error.to_string()))?;

        Ok(())
    }
}
