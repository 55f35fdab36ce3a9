use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use jobsprint_application::{
    ForgotPasswordError, LoginError, LogoutError, RefreshTokenError, ResetPasswordError,
    SignupError, VerifyAccountError,
};
use jobsprint_core::{AccountStoreError, EmailError, OtpError, PasswordError, PhoneError};

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Everything a flow can answer with, mapped onto the API's status codes.
#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("User not found")]
    AccountNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("OTP has expired")]
    OtpExpired,

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("Access token is required")]
    MissingAccessToken,

    #[error("Refresh token is required")]
    MissingRefreshToken,

    #[error("Invalid or expired access token")]
    InvalidAccessToken,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("Refresh token has been revoked")]
    TokenRevoked,

    #[error("Refresh token is no longer valid. Please log in again.")]
    StaleCredential,

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            AuthApiError::InvalidInput(_)
            | AuthApiError::AccountNotFound
            | AuthApiError::OtpExpired
            | AuthApiError::MissingAccessToken
            | AuthApiError::MissingRefreshToken => (StatusCode::BAD_REQUEST, self.to_string()),

            AuthApiError::EmailAlreadyExists => (StatusCode::CONFLICT, self.to_string()),

            AuthApiError::InvalidCredentials
            | AuthApiError::InvalidOtp
            | AuthApiError::InvalidAccessToken
            | AuthApiError::InvalidRefreshToken
            | AuthApiError::TokenRevoked
            | AuthApiError::StaleCredential => (StatusCode::UNAUTHORIZED, self.to_string()),

            AuthApiError::UnexpectedError(detail) => {
                // Log the detail, answer generically.
                tracing::error!(error = %detail, "Request failed unexpectedly");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse { message });

        (status_code, body).into_response()
    }
}

impl From<EmailError> for AuthApiError {
    fn from(error: EmailError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<PasswordError> for AuthApiError {
    fn from(error: PasswordError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<PhoneError> for AuthApiError {
    fn from(error: PhoneError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<OtpError> for AuthApiError {
    fn from(error: OtpError) -> Self {
        match error {
            OtpError::NotFound => AuthApiError::AccountNotFound,
            OtpError::Expired => AuthApiError::OtpExpired,
            OtpError::Mismatch => AuthApiError::InvalidOtp,
            OtpError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<AccountStoreError> for AuthApiError {
    fn from(error: AccountStoreError) -> Self {
        match error {
            AccountStoreError::EmailAlreadyExists => AuthApiError::EmailAlreadyExists,
            AccountStoreError::AccountNotFound => AuthApiError::AccountNotFound,
            AccountStoreError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<SignupError> for AuthApiError {
    fn from(error: SignupError) -> Self {
        match error {
            SignupError::AccountStoreError(e) => e.into(),
            SignupError::HashingError(e) => AuthApiError::UnexpectedError(e),
            SignupError::OtpError(e) => e.into(),
        }
    }
}

impl From<VerifyAccountError> for AuthApiError {
    fn from(error: VerifyAccountError) -> Self {
        match error {
            VerifyAccountError::AccountStoreError(e) => e.into(),
            VerifyAccountError::OtpError(e) => e.into(),
        }
    }
}

impl From<LoginError> for AuthApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => AuthApiError::InvalidCredentials,
            LoginError::TokenError(e) => AuthApiError::UnexpectedError(e.to_string()),
            LoginError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<LogoutError> for AuthApiError {
    fn from(error: LogoutError) -> Self {
        match error {
            LogoutError::InvalidRefreshToken => AuthApiError::InvalidRefreshToken,
            LogoutError::RevocationStoreError(e) => AuthApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<RefreshTokenError> for AuthApiError {
    fn from(error: RefreshTokenError) -> Self {
        match error {
            RefreshTokenError::InvalidRefreshToken => AuthApiError::InvalidRefreshToken,
            RefreshTokenError::TokenRevoked => AuthApiError::TokenRevoked,
            RefreshTokenError::AccountNotFound => AuthApiError::AccountNotFound,
            RefreshTokenError::StaleCredential => AuthApiError::StaleCredential,
            RefreshTokenError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<ForgotPasswordError> for AuthApiError {
    fn from(error: ForgotPasswordError) -> Self {
        match error {
            ForgotPasswordError::AccountNotFound => AuthApiError::AccountNotFound,
            ForgotPasswordError::OtpError(e) => e.into(),
            ForgotPasswordError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<ResetPasswordError> for AuthApiError {
    fn from(error: ResetPasswordError) -> Self {
        match error {
            ResetPasswordError::AccountNotFound => AuthApiError::AccountNotFound,
            ResetPasswordError::OtpError(e) => e.into(),
            ResetPasswordError::HashingError(e) => AuthApiError::UnexpectedError(e),
            ResetPasswordError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}
