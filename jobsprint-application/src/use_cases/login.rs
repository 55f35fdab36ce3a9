use jobsprint_core::{
    AccountStore, AccountStoreError, Email, Password, SecretHasher, TokenService,
    TokenServiceError,
};

/// Both credentials handed to a freshly authenticated session.
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Error types for login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Covers unknown email, banned or soft-deleted accounts, and wrong
    /// passwords alike, so callers cannot enumerate accounts.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Token error: {0}")]
    TokenError(#[from] TokenServiceError),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Login use case - authenticates credentials and mints one access and one
/// refresh token.
#[derive(Clone)]
pub struct LoginUseCase<S, H, T>
where
    S: AccountStore,
    H: SecretHasher,
    T: TokenService,
{
    account_store: S,
    hasher: H,
    token_service: T,
}

impl<S, H, T> LoginUseCase<S, H, T>
where
    S: AccountStore,
    H: SecretHasher,
    T: TokenService,
{
    pub fn new(account_store: S, hasher: H, token_service: T) -> Self {
        Self {
            account_store,
            hasher,
            token_service,
        }
    }

    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password))]
    pub async fn execute(&self, email: Email, password: Password) -> Result<TokenPair, LoginError> {
        let account = match self.account_store.find_by_email(&email).await {
            Ok(account) => account,
            Err(AccountStoreError::AccountNotFound) => return Err(LoginError::InvalidCredentials),
            Err(error) => return Err(LoginError::UnexpectedError(error.to_string())),
        };

        if !account.is_active() {
            return Err(LoginError::InvalidCredentials);
        }

        let matches = self
            .hasher
            .verify(password.into_secret(), account.password_hash.clone())
            .await
            .map_err(LoginError::UnexpectedError)?;
        if !matches {
            return Err(LoginError::InvalidCredentials);
        }

        let access_token = self
            .token_service
            .issue_access_token(account.id, &account.email)?;
        let refresh_token = self
            .token_service
            .issue_refresh_token(account.id, &account.email)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}
