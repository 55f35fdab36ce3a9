use jobsprint_core::{
    AccountStore, AccountStoreError, RevocationStore, TokenKind, TokenService,
};

/// Error types for refresh token use case
#[derive(Debug, thiserror::Error)]
pub enum RefreshTokenError {
    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,
    #[error("Refresh token has been revoked")]
    TokenRevoked,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Refresh token is no longer valid. Please log in again.")]
    StaleCredential,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Refresh token use case - mints a fresh access token from a still-valid
/// refresh token. The refresh token itself is not rotated.
///
/// Layered on top of pure token verification: the identifier must not be
/// revoked, the account must still exist, and the token must postdate the
/// account's last credential change.
#[derive(Clone)]
pub struct RefreshTokenUseCase<S, R, T>
where
    S: AccountStore,
    R: RevocationStore,
    T: TokenService,
{
    account_store: S,
    revocation_store: R,
    token_service: T,
}

impl<S, R, T> RefreshTokenUseCase<S, R, T>
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

    #[tracing::instrument(name = "RefreshTokenUseCase::execute", skip(self, refresh_token))]
    pub async fn execute(&self, refresh_token: &str) -> Result<String, RefreshTokenError> {
        let claims = self
            .token_service
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|_| RefreshTokenError::InvalidRefreshToken)?;

        let revoked = self
            .revocation_store
            .is_revoked(claims.token_id)
            .await
            .map_err(|error| RefreshTokenError::UnexpectedError(error.to_string()))?;
        if revoked {
            return Err(RefreshTokenError::TokenRevoked);
        }

        let account = match self.account_store.find_by_id(claims.account_id).await {
            Ok(account) => account,
            Err(AccountStoreError::AccountNotFound) => {
                return Err(RefreshTokenError::AccountNotFound);
            }
            Err(error) => return Err(RefreshTokenError::UnexpectedError(error.to_string())),
        };

        if account.credentials_changed_since(claims.issued_at) {
            return Err(RefreshTokenError::StaleCredential);
        }

        self.token_service
            .issue_access_token(account.id, &account.email)
            .map_err(|error| RefreshTokenError::UnexpectedError(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use jobsprint_adapters::auth::{JwtTokenService, TokenConfig};
    use jobsprint_adapters::persistence::{InMemoryAccountStore, InMemoryRevocationStore};
    use jobsprint_core::{Account, Email, NewAccount};
    use chrono::{TimeDelta, Utc};
    use secrecy::Secret;

    use super::*;

    fn token_service() -> JwtTokenService {
        JwtTokenService::new(TokenConfig {
            access_secret: Secret::from("access-secret".to_string()),
            refresh_secret: Secret::from("refresh-secret".to_string()),
            access_ttl_seconds: 3600,
            refresh_ttl_seconds: 604_800,
        })
    }

    fn email() -> Email {
        Email::try_from(Secret::from("a@x.com".to_string())).unwrap()
    }

    async fn store_with_account() -> (InMemoryAccountStore, Account) {
        let store = InMemoryAccountStore::new();
        let id = store
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
        let account = store.find_by_id(id).await.unwrap();
        (store, account)
    }

    #[tokio::test]
    async fn valid_refresh_token_mints_a_new_access_token() {
        let service = token_service();
        let (store, account) = store_with_account().await;
        let use_case =
            RefreshTokenUseCase::new(store, InMemoryRevocationStore::new(), service.clone());

        let refresh = service.issue_refresh_token(account.id, &email()).unwrap();
        let access = use_case.execute(&refresh).await.unwrap();

        let claims = service.verify(&access, TokenKind::Access).unwrap();
        assert_eq!(claims.account_id, account.id);
    }

    #[tokio::test]
    async fn revoked_token_is_rejected() {
        let service = token_service();
        let (store, account) = store_with_account().await;
        let revocations = InMemoryRevocationStore::new();
        let use_case = RefreshTokenUseCase::new(store, revocations.clone(), service.clone());

        let refresh = service.issue_refresh_token(account.id, &email()).unwrap();
        let claims = service.verify(&refresh, TokenKind::Refresh).unwrap();
        revocations
            .revoke(claims.token_id, claims.expires_at)
            .await
            .unwrap();

        let result = use_case.execute(&refresh).await;
        assert!(matches!(result, Err(RefreshTokenError::TokenRevoked)));
    }

    #[tokio::test]
    async fn token_issued_before_a_password_change_is_stale() {
        let service = token_service();
        let (store, account) = store_with_account().await;
        let use_case = RefreshTokenUseCase::new(
            store.clone(),
            InMemoryRevocationStore::new(),
            service.clone(),
        );

        let refresh = service.issue_refresh_token(account.id, &email()).unwrap();
        let issued_at = service
            .verify(&refresh, TokenKind::Refresh)
            .unwrap()
            .issued_at;

        // Credential change strictly after issuance invalidates the token.
        store
            .set_password_hash(
                account.id,
                Secret::from("new-digest".to_string()),
                issued_at + TimeDelta::seconds(1),
            )
            .await
            .unwrap();

        let result = use_case.execute(&refresh).await;
        assert!(matches!(result, Err(RefreshTokenError::StaleCredential)));
    }

    #[tokio::test]
    async fn token_issued_after_a_password_change_still_works() {
        let service = token_service();
        let (store, account) = store_with_account().await;
        let use_case = RefreshTokenUseCase::new(
            store.clone(),
            InMemoryRevocationStore::new(),
            service.clone(),
        );

        store
            .set_password_hash(
                account.id,
                Secret::from("new-digest".to_string()),
                Utc::now() - TimeDelta::seconds(5),
            )
            .await
            .unwrap();

        let refresh = service.issue_refresh_token(account.id, &email()).unwrap();
        assert!(use_case.execute(&refresh).await.is_ok());
    }

    #[tokio::test]
    async fn access_tokens_cannot_be_used_to_refresh() {
        let service = token_service();
        let (store, account) = store_with_account().await;
        let use_case =
            RefreshTokenUseCase::new(store, InMemoryRevocationStore::new(), service.clone());

        let access = service.issue_access_token(account.id, &email()).unwrap();
        let result = use_case.execute(&access).await;
        assert!(matches!(result, Err(RefreshTokenError::InvalidRefreshToken)));
    }

    #[tokio::test]
    async fn missing_account_is_reported() {
        let service = token_service();
        let use_case = RefreshTokenUseCase::new(
            InMemoryAccountStore::new(),
            InMemoryRevocationStore::new(),
            service.clone(),
        );

        let refresh = service
            .issue_refresh_token(jobsprint_core::AccountId::new(), &email())
            .unwrap();
        let result = use_case.execute(&refresh).await;
        assert!(matches!(result, Err(RefreshTokenError::AccountNotFound)));
    }
}
