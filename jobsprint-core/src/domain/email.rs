use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Error, PartialEq)]
pub enum EmailError {
    #[error("Email cannot be empty")]
    Empty,
    #[error("Invalid email address")]
    Invalid,
}

/// Email address of an account holder.
///
/// Wrapped in a `Secret` so it never leaks through `Debug` output or logs.
#[derive(Clone)]
pub struct Email(Secret<String>);

impl Email {
    pub fn as_ref(&self) -> &Secret<String> {
        &self.0
    }

    pub fn into_secret(self) -> Secret<String> {
        self.0
    }
}

impl TryFrom<Secret<String>> for Email {
    type Error = EmailError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        let raw = value.expose_secret();
        if raw.is_empty() {
            return Err(EmailError::Empty);
        }
        if !EMAIL_PATTERN.is_match(raw) {
            return Err(EmailError::Invalid);
        }
        Ok(Self(value))
    }
}

impl std::fmt::Debug for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Email([REDACTED])")
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Email, EmailError> {
        Email::try_from(Secret::from(raw.to_string()))
    }

    #[test]
    fn accepts_well_formed_addresses() {
        assert!(parse("a@x.com").is_ok());
        assert!(parse("first.last@sub.example.org").is_ok());
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse("").unwrap_err(), EmailError::Empty);
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in ["no-at-sign", "@missing-local.com", "user@", "a b@x.com", "user@nodot"] {
            assert_eq!(parse(raw).unwrap_err(), EmailError::Invalid, "{raw}");
        }
    }

    #[test]
    fn equality_and_hash_use_the_inner_address() {
        let a = parse("a@x.com").unwrap();
        let b = parse("a@x.com").unwrap();
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn debug_does_not_expose_the_address() {
        let email = parse("a@x.com").unwrap();
        assert!(!format!("{email:?}").contains("a@x.com"));
    }
}
