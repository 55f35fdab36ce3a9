use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use secrecy::Secret;
use serde::Deserialize;

use jobsprint_application::{SignupData, SignupUseCase};
use jobsprint_core::{AccountStore, Email, EmailClient, Password, Phone, SecretHasher};

use crate::routes::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub phone: Option<Secret<String>>,
    #[serde(rename = "DOB")]
    pub date_of_birth: Option<NaiveDate>,
}

#[tracing::instrument(name = "Signup", skip(use_case, request))]
pub async fn signup<S, H, E>(
    State(use_case): State<SignupUseCase<S, H, E>>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: AccountStore + Clone + 'static,
    H: SecretHasher + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;
    let phone = request.phone.map(Phone::try_from).transpose()?;

    use_case
        .execute(SignupData {
            email,
            password,
            first_name: request.first_name,
            last_name: request.last_name,
            phone,
            date_of_birth: request.date_of_birth,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Account created successfully" })),
    ))
}
