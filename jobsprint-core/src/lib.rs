pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    account::{Account, AccountId, NewAccount},
    email::{Email, EmailError},
    otp::{OtpCode, OtpEntry, OtpError, OtpPurpose},
    password::{Password, PasswordError},
    phone::{Phone, PhoneError},
    token::{TokenClaims, TokenKind},
};

pub use ports::{
    repositories::{AccountStore, AccountStoreError, RevocationStore, RevocationStoreError},
    services::{EmailClient, SecretHasher, TokenService, TokenServiceError},
};
