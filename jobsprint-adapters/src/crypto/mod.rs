pub mod argon2_hasher;
pub mod field_cipher;

pub use argon2_hasher::Argon2SecretHasher;
pub use field_cipher::{CipherError, FieldCipher};
