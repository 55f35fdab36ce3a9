use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use jobsprint_application::LoginUseCase;
use jobsprint_core::{AccountStore, Email, Password, SecretHasher, TokenService};

use crate::routes::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Login", skip(use_case, request))]
pub async fn login<S, H, T>(
    State(use_case): State<LoginUseCase<S, H, T>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    H: SecretHasher + Clone + 'static,
    T: TokenService + Clone + 'static,
{
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    let pair = use_case.execute(email, password).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Login successful",
            "accessToken": pair.access_token,
            "refreshToken": pair.refresh_token,
        })),
    ))
}
