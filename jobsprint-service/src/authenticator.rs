use axum::http::HeaderMap;

use jobsprint_core::{
    Account, AccountStore, AccountStoreError, RevocationStore, TokenKind, TokenService,
};

use crate::routes::ACCESS_TOKEN_HEADER;
use crate::routes::error::AuthApiError;

/// Access-token guard for protected routes.
///
/// Token verification itself is pure; this layers the revocation check and
/// the account's own state (existence, ban, soft-delete) on top.
#[derive(Clone)]
pub struct Authenticator<S, R, T>
where
    S: AccountStore,
    R: RevocationStore,
    T: TokenService,
{
    account_store: S,
    revocation_store: R,
    token_service: T,
}

impl<S, R, T> Authenticator<S, R, T>
where
    S: AccountStore,
    R: RevocationStore,
    T: TokenService,
{
    pub fn new(account_store: S, revocation_store: R, token_service: T) -> Self {
        Self {
            account_store,
            revocation_store,
            token_service,
        }
    }

    /// Resolve the `accesstoken` header to a live account, or fail with the
    /// status the HTTP layer should answer with.
    #[tracing::instrument(name = "Authenticating request", skip_all)]
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Account, AuthApiError> {
        let token = headers
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthApiError::MissingAccessToken)?;

        let claims = self
            .token_service
            .verify(token, TokenKind::Access)
            .map_err(|_| AuthApiError::InvalidAccessToken)?;

        let revoked = self
            .revocation_store
            .is_revoked(claims.token_id)
            .await
            .map_err(|error| AuthApiError::UnexpectedError(error.to_string()))?;
        if revoked {
            return Err(AuthApiError::InvalidAccessToken);
        }

        let account = match self.account_store.find_by_id(claims.account_id).await {
            Ok(account) => account,
            Err(AccountStoreError::AccountNotFound) => {
                return Err(AuthApiError::InvalidAccessToken);
            }
            Err(error) => return Err(AuthApiError::UnexpectedError(error.to_string())),
        };

        if !account.is_active() {
            return Err(AuthApiError::InvalidAccessToken);
        }

        Ok(account)
    }
}
