use jobsprint_core::{RevocationStore, RevocationStoreError, TokenKind, TokenService};

/// Error types for logout use case
#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,
    #[error("Revocation store error: {0}")]
    RevocationStoreError(#[from] RevocationStoreError),
}

/// Logout use case - revokes the presented refresh token's identifier until
/// the token's own expiry, after which the record is free to be pruned.
#[derive(Clone)]
pub struct LogoutUseCase<R, T>
where
    R: RevocationStore,
    T: TokenService,
{
    revocation_store: R,
    token_service: T,
}

impl<R, T> LogoutUseCase<R, T>
where
    R: RevocationStore,
    T: TokenService,
{
    pub fn new(revocation_store: R, token_service: T) -> Self {
        Self {
            revocation_store,
            token_service,
        }
    }

    #[tracing::instrument(name = "LogoutUseCase::execute", skip(self, refresh_token))]
    pub async fn execute(&self, refresh_token: &str) -> Result<(), LogoutError> {
        let claims = self
            .token_service
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|_| LogoutError::InvalidRefreshToken)?;

        self.revocation_store
            .revoke(claims.token_id, claims.expires_at)
            .await?;

        Ok(())
    }
}
