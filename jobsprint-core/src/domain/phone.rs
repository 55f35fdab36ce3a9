use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PhoneError {
    #[error("Phone number cannot be empty")]
    Empty,
}

/// Phone number of an account holder.
///
/// Kept secret in memory; the persistence layer additionally encrypts it
/// before it is written to storage.
#[derive(Clone)]
pub struct Phone(Secret<String>);

impl Phone {
    pub fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl TryFrom<Secret<String>> for Phone {
    type Error = PhoneError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        if value.expose_secret().is_empty() {
            return Err(PhoneError::Empty);
        }
        Ok(Self(value))
    }
}

impl std::fmt::Debug for Phone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Phone([REDACTED])")
    }
}

impl PartialEq for Phone {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for Phone {}
