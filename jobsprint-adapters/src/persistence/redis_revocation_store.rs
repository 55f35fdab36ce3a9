use std::sync::Arc;

use chrono::{DateTime, Utc};
use redis::{Commands, Connection};
use tokio::sync::RwLock;
use uuid::Uuid;

use jobsprint_core::{RevocationStore, RevocationStoreError};

/// `RevocationStore` over Redis.
///
/// Revocations are shared across every server instance with read-after-write
/// consistency, and each record carries the revoked token's own expiry as its
/// TTL, so Redis prunes records exactly when the token would stop verifying
/// anyway.
#[derive(Clone)]
pub struct RedisRevocationStore {
    conn: Arc<RwLock<Connection>>,
}

impl RedisRevocationStore {
    pub fn new(conn: Arc<RwLock<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn revoke(
        &self,
        token_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RevocationStoreError> {
        let ttl = (expires_at - Utc::now()).num_seconds();
        if ttl <= 0 {
            // The token already fails its own TTL check.
            return Ok(());
        }

        let key = get_key(token_id);
        let mut conn = self.conn.write().await;
        conn.set_ex(key, true, ttl as u64)
            .map_err(|e| RevocationStoreError::DatabaseError(e.to_string()))
    }

    async fn is_revoked(&self, token_id: Uuid) -> Result<bool, RevocationStoreError> {
        let key = get_key(token_id);
        let mut conn = self.conn.write().await;
        conn.exists(&key)
            .map_err(|e| RevocationStoreError::DatabaseError(e.to_string()))
    }
}

const REVOKED_TOKEN_KEY_PREFIX: &str = "revoked_token:";

fn get_key(token_id: Uuid) -> String {
    format!("{}{}", REVOKED_TOKEN_KEY_PREFIX, token_id)
}
