use chrono::{DateTime, Utc};
use rand::Rng;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

/// What a one-time code proves when verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtpPurpose {
    ConfirmEmail,
    ForgetPassword,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfirmEmail => "confirmEmail",
            Self::ForgetPassword => "forgetPassword",
        }
    }
}

impl TryFrom<&str> for OtpPurpose {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "confirmEmail" => Ok(Self::ConfirmEmail),
            "forgetPassword" => Ok(Self::ForgetPassword),
            other => Err(format!("Unknown OTP purpose: {other}")),
        }
    }
}

/// Outcome of a failed one-time code verification.
#[derive(Debug, Error)]
pub enum OtpError {
    #[error("No pending code")]
    NotFound,
    #[error("Code has expired")]
    Expired,
    #[error("Code does not match")]
    Mismatch,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for OtpError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::NotFound, Self::NotFound)
                | (Self::Expired, Self::Expired)
                | (Self::Mismatch, Self::Mismatch)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// A 6-digit one-time code in plaintext form.
///
/// Only ever held in memory between generation and email delivery, or between
/// request parsing and verification; storage sees the hashed form.
#[derive(Clone)]
pub struct OtpCode(Secret<String>);

impl OtpCode {
    /// Generate a fresh uniformly random 6-digit code.
    pub fn new() -> Self {
        let code = rand::rng().random_range(100_000..1_000_000);
        Self(Secret::from(code.to_string()))
    }

    pub fn as_ref(&self) -> &Secret<String> {
        &self.0
    }

    pub fn into_secret(self) -> Secret<String> {
        self.0
    }
}

impl Default for OtpCode {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Secret<String>> for OtpCode {
    type Error = OtpError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        let raw = value.expose_secret();
        if raw.len() != 6 || !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(OtpError::Mismatch);
        }
        Ok(Self(value))
    }
}

impl std::fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OtpCode([REDACTED])")
    }
}

/// A pending one-time code as stored: hashed code, purpose, absolute expiry.
#[derive(Debug, Clone)]
pub struct OtpEntry {
    pub code_hash: Secret<String>,
    pub purpose: OtpPurpose,
    pub expires_at: DateTime<Utc>,
}

impl OtpEntry {
    /// An entry expiring exactly now is still valid; only strictly past
    /// expiries are rejected.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
