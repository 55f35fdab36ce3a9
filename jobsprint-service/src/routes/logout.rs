use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use jobsprint_application::LogoutUseCase;
use jobsprint_core::{AccountStore, RevocationStore, TokenService};

use crate::authenticator::Authenticator;
use crate::routes::error::AuthApiError;
use crate::routes::extract_refresh_token;

/// Requires a valid, non-revoked access token; revokes the refresh token
/// presented alongside it.
#[tracing::instrument(name = "Logout", skip(state, headers))]
pub async fn logout<S, R, T>(
    State(state): State<(Authenticator<S, R, T>, LogoutUseCase<R, T>)>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    R: RevocationStore + Clone + 'static,
    T: TokenService + Clone + 'static,
{
    let (authenticator, use_case) = state;

    authenticator.authenticate(&headers).await?;

    let refresh_token =
        extract_refresh_token(&headers).ok_or(AuthApiError::MissingRefreshToken)?;

    use_case.execute(&refresh_token).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "User logged out successfully" })),
    ))
}
