use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use jobsprint_application::ForgotPasswordUseCase;
use jobsprint_core::{AccountStore, Email, EmailClient, SecretHasher};

use crate::routes::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Secret<String>,
}

#[tracing::instrument(name = "Forgot password", skip(use_case, request))]
pub async fn forgot_password<S, H, E>(
    State(use_case): State<ForgotPasswordUseCase<S, H, E>>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    H: SecretHasher + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let email = Email::try_from(request.email)?;

    use_case.execute(email).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "message": "OTP sent successfully. Check your email inbox."
        })),
    ))
}
