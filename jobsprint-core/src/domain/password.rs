use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error, PartialEq)]
pub enum PasswordError {
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,
}

/// Plaintext password as received from a caller, before hashing.
#[derive(Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn as_ref(&self) -> &Secret<String> {
        &self.0
    }

    pub fn into_secret(self) -> Secret<String> {
        self.0
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        if value.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        Ok(Self(value))
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_eight_or_more_characters() {
        assert!(Password::try_from(Secret::from("P@ss1234".to_string())).is_ok());
    }

    #[test]
    fn rejects_short_passwords() {
        let result = Password::try_from(Secret::from("short".to_string()));
        assert_eq!(result.unwrap_err(), PasswordError::TooShort);
    }

    #[test]
    fn debug_does_not_expose_the_password() {
        let password = Password::try_from(Secret::from("P@ss1234".to_string())).unwrap();
        assert!(!format!("{password:?}").contains("P@ss1234"));
    }
}
