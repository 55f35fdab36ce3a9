pub mod auth;
pub mod config;
pub mod crypto;
pub mod email;
pub mod persistence;

// Re-export the port implementations for convenience
pub use auth::{JwtTokenService, TokenConfig};
pub use crypto::{Argon2SecretHasher, CipherError, FieldCipher};
pub use email::{PostmarkEmailClient, RecordingEmailClient};
pub use persistence::{
    InMemoryAccountStore, InMemoryRevocationStore, PostgresAccountStore, RedisRevocationStore,
};
