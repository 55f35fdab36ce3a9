use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use jobsprint_application::RefreshTokenUseCase;
use jobsprint_core::{AccountStore, RevocationStore, TokenService};

use crate::routes::error::AuthApiError;
use crate::routes::extract_refresh_token;

#[tracing::instrument(name = "Refresh token", skip(use_case, headers))]
pub async fn refresh_token<S, R, T>(
    State(use_case): State<RefreshTokenUseCase<S, R, T>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    R: RevocationStore + Clone + 'static,
    T: TokenService + Clone + 'static,
{
    let refresh_token =
        extract_refresh_token(&headers).ok_or(AuthApiError::MissingRefreshToken)?;

    let access_token = use_case.execute(&refresh_token).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "accessToken": access_token })),
    ))
}
