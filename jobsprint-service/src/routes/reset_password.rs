use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use jobsprint_application::ResetPasswordUseCase;
use jobsprint_core::{AccountStore, Email, OtpCode, Password, SecretHasher};

use crate::routes::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: Secret<String>,
    pub otp: Secret<String>,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Reset password", skip(use_case, request))]
pub async fn reset_password<S, H>(
    State(use_case): State<ResetPasswordUseCase<S, H>>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    H: SecretHasher + Clone + 'static,
{
    let email = Email::try_from(request.email)?;
    let code = OtpCode::try_from(request.otp)?;
    let password = Password::try_from(request.password)?;

    use_case.execute(email, code, password).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Password reset successfully" })),
    ))
}
