use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};

use jobsprint_core::SecretHasher;

/// Argon2id cost parameters: memory in KiB, iterations, parallelism.
#[derive(Debug, Clone, Copy)]
struct CostProfile {
    m_cost: u32,
    t_cost: u32,
    p_cost: u32,
}

/// `SecretHasher` backed by Argon2id, run on the blocking thread pool.
///
/// One algorithm family for both passwords and one-time codes, with a cost
/// profile per use case. Verification reads the parameters embedded in the
/// digest, so digests from either profile verify under any instance.
#[derive(Debug, Clone)]
pub struct Argon2SecretHasher {
    profile: CostProfile,
}

impl Argon2SecretHasher {
    /// Full-strength profile for account passwords.
    pub fn for_passwords() -> Self {
        Self {
            profile: CostProfile {
                m_cost: 15000,
                t_cost: 2,
                p_cost: 1,
            },
        }
    }

    /// Lighter profile for 6-digit codes that expire within minutes.
    pub fn for_otp_codes() -> Self {
        Self {
            profile: CostProfile {
                m_cost: 4096,
                t_cost: 1,
                p_cost: 1,
            },
        }
    }

    fn hasher(profile: CostProfile) -> Result<Argon2<'static>, String> {
        Ok(Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(profile.m_cost, profile.t_cost, profile.p_cost, None)
                .map_err(|e| e.to_string())?,
        ))
    }
}

#[async_trait]
impl SecretHasher for Argon2SecretHasher {
    #[tracing::instrument(name = "Computing secret hash", skip_all)]
    async fn hash(&self, secret: Secret<String>) -> Result<Secret<String>, String> {
        let profile = self.profile;
        let current_span: tracing::Span = tracing::Span::current();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(move || {
                let salt: SaltString = SaltString::generate(rand_core::OsRng);
                Self::hasher(profile)?
                    .hash_password(secret.expose_secret().as_bytes(), &salt)
                    .map(|h| Secret::from(h.to_string()))
                    .map_err(|e| e.to_string())
            })
        })
        .await
        .map_err(|e| e.to_string())?
    }

    #[tracing::instrument(name = "Verifying secret hash", skip_all)]
    async fn verify(
        &self,
        candidate: Secret<String>,
        digest: Secret<String>,
    ) -> Result<bool, String> {
        let profile = self.profile;
        let current_span: tracing::Span = tracing::Span::current();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(move || {
                let parsed: PasswordHash<'_> =
                    PasswordHash::new(digest.expose_secret()).map_err(|e| e.to_string())?;

                match Self::hasher(profile)?
                    .verify_password(candidate.expose_secret().as_bytes(), &parsed)
                {
                    Ok(()) => Ok(true),
                    Err(argon2::password_hash::Error::Password) => Ok(false),
                    Err(e) => Err(e.to_string()),
                }
            })
        })
        .await
        .map_err(|e| e.to_string())?
    }
}
