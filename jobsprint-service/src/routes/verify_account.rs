use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use jobsprint_application::VerifyAccountUseCase;
use jobsprint_core::{AccountStore, Email, OtpCode, SecretHasher};

use crate::routes::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct VerifyAccountRequest {
    pub email: Secret<String>,
    pub otp: Secret<String>,
}

#[tracing::instrument(name = "Verify account", skip(use_case, request))]
pub async fn verify_account<S, H>(
    State(use_case): State<VerifyAccountUseCase<S, H>>,
    Json(request): Json<VerifyAccountRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    H: SecretHasher + Clone + 'static,
{
    let email = Email::try_from(request.email)?;
    let code = OtpCode::try_from(request.otp)?;

    use_case.execute(email, code).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Email verified successfully" })),
    ))
}
