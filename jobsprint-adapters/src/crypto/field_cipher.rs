use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64ct::{Base64, Encoding};
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};
use thiserror::Error;

const NONCE_LEN: usize = 12;

#[derive(Debug, Error, PartialEq)]
pub enum CipherError {
    #[error("Missing plaintext")]
    MissingPlaintext,
    #[error("Missing ciphertext")]
    MissingCiphertext,
    #[error("Missing cipher key")]
    MissingKey,
    #[error("Encryption failed")]
    EncryptionFailed,
    #[error("Ciphertext does not decrypt under this key")]
    DecryptionFailed,
}

/// Reversible encryption of a single sensitive field, keyed by one
/// process-wide secret.
///
/// AES-256-GCM with the key derived from the secret by SHA-256. Each
/// encryption draws a fresh random nonce, which travels prepended to the
/// sealed bytes; the whole frame is base64 so it can live in a text column.
/// All failure modes are recoverable error values - the repository wrapping
/// this decides whether a failed decrypt surfaces or degrades to an absent
/// field.
#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

impl FieldCipher {
    pub fn new(key: &Secret<String>) -> Result<Self, CipherError> {
        if key.expose_secret().is_empty() {
            return Err(CipherError::MissingKey);
        }

        let key_bytes: [u8; 32] = Sha256::digest(key.expose_secret().as_bytes()).into();
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
        Ok(Self { cipher })
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        if plaintext.is_empty() {
            return Err(CipherError::MissingPlaintext);
        }

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::EncryptionFailed)?;

        let mut framed = Vec::with_capacity(NONCE_LEN + sealed.len());
        framed.extend_from_slice(&nonce);
        framed.extend_from_slice(&sealed);
        Ok(Base64::encode_string(&framed))
    }

    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError> {
        if ciphertext.is_empty() {
            return Err(CipherError::MissingCiphertext);
        }

        let framed = Base64::decode_vec(ciphertext).map_err(|_| CipherError::DecryptionFailed)?;
        if framed.len() <= NONCE_LEN {
            return Err(CipherError::DecryptionFailed);
        }

        let (nonce_bytes, sealed) = framed.split_at(NONCE_LEN);
        let plain = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), sealed)
            .map_err(|_| CipherError::DecryptionFailed)?;

        String::from_utf8(plain).map_err(|_| CipherError::DecryptionFailed)
    }
}
