use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use jobsprint_core::{RevocationStore, RevocationStoreError};

/// In-memory `RevocationStore` for tests, with lazy expiry pruning.
#[derive(Default, Clone)]
pub struct InMemoryRevocationStore {
    revoked: Arc<RwLock<HashMap<Uuid, DateTime<Utc>>>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(
        &self,
        token_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RevocationStoreError> {
        self.revoked.write().await.insert(token_id, expires_at);
        Ok(())
    }

    async fn is_revoked(&self, token_id: Uuid) -> Result<bool, RevocationStoreError> {
        let mut revoked = self.revoked.write().await;
        let Some(expires_at) = revoked.get(&token_id).copied() else {
            return Ok(false);
        };

        if Utc::now() > expires_at {
            // Past its natural expiry; the record has done its job.
            revoked.remove(&token_id);
            return Ok(false);
        }

        Ok(true)
    }
}
