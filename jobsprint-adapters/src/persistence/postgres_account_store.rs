use chrono::{DateTime, NaiveDate, Utc};
use secrecy::{ExposeSecret, Secret};
use sqlx::{Pool, Postgres, Row, postgres::PgRow};

use jobsprint_core::{
    Account, AccountId, AccountStore, AccountStoreError, Email, NewAccount, OtpEntry, OtpPurpose,
    Phone,
};

use crate::crypto::FieldCipher;

/// `AccountStore` over PostgreSQL.
///
/// The field cipher wraps the read/write path explicitly: the phone number is
/// encrypted immediately before a row is written and decrypted immediately
/// after one is loaded, so everything above this type sees plaintext. A row
/// whose stored phone no longer decrypts loads with the field absent rather
/// than failing the whole account.
#[derive(Clone)]
pub struct PostgresAccountStore {
    pool: sqlx::PgPool,
    cipher: FieldCipher,
}

impl PostgresAccountStore {
    pub fn new(pool: Pool<Postgres>, cipher: FieldCipher) -> Self {
        PostgresAccountStore { pool, cipher }
    }

    fn account_from_row(&self, row: &PgRow) -> Result<Account, AccountStoreError> {
        let id: uuid::Uuid = row.try_get("id").map_err(unexpected)?;
        let email: String = row.try_get("email").map_err(unexpected)?;
        let email = Email::try_from(Secret::from(email))
            .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;
        let password_hash: String = row.try_get("password_hash").map_err(unexpected)?;

        let phone = match row
            .try_get::<Option<String>, _>("phone")
            .map_err(unexpected)?
        {
            Some(sealed) => match self.cipher.decrypt(&sealed) {
                Ok(plain) => Phone::try_from(Secret::from(plain)).ok(),
                Err(error) => {
                    tracing::warn!(%error, "Stored phone number failed to decrypt");
                    None
                }
            },
            None => None,
        };

        Ok(Account {
            id: AccountId::from(id),
            email,
            password_hash: Secret::from(password_hash),
            first_name: row.try_get("first_name").map_err(unexpected)?,
            last_name: row.try_get("last_name").map_err(unexpected)?,
            phone,
            date_of_birth: row
                .try_get::<Option<NaiveDate>, _>("date_of_birth")
                .map_err(unexpected)?,
            confirmed: row.try_get("confirmed").map_err(unexpected)?,
            change_credential_time: row
                .try_get::<Option<DateTime<Utc>>, _>("change_credential_time")
                .map_err(unexpected)?,
            deleted_at: row
                .try_get::<Option<DateTime<Utc>>, _>("deleted_at")
                .map_err(unexpected)?,
            banned_at: row
                .try_get::<Option<DateTime<Utc>>, _>("banned_at")
                .map_err(unexpected)?,
        })
    }
}

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone, \
     date_of_birth, confirmed, change_credential_time, deleted_at, banned_at";

#[async_trait::async_trait]
impl AccountStore for PostgresAccountStore {
    #[tracing::instrument(name = "Adding account to PostgreSQL", skip_all)]
    async fn add_account(&self, account: NewAccount) -> Result<AccountId, AccountStoreError> {
        let account_id = AccountId::new();

        let phone = match &account.phone {
            Some(phone) => Some(
                self.cipher
                    .encrypt(phone.as_ref().expose_secret())
                    .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?,
            ),
            None => None,
        };

        let query = sqlx::query(
            r#"
                INSERT INTO accounts (id, email, password_hash, first_name, last_name, phone, date_of_birth)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(account.email.as_ref().expose_secret())
        .bind(account.password_hash.expose_secret())
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(phone)
        .bind(account.date_of_birth);

        query.execute(&self.pool).await.map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint().is_some() {
                    return AccountStoreError::EmailAlreadyExists;
                }
            }
            AccountStoreError::UnexpectedError(e.to_string())
        })?;

        Ok(account_id)
    }

    #[tracing::instrument(name = "Retrieving account by email from PostgreSQL", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<Account, AccountStoreError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email.as_ref().expose_secret())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        let Some(row) = row else {
            return Err(AccountStoreError::AccountNotFound);
        };

        self.account_from_row(&row)
    }

    #[tracing::instrument(name = "Retrieving account by id from PostgreSQL", skip_all)]
    async fn find_by_id(&self, id: AccountId) -> Result<Account, AccountStoreError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        let Some(row) = row else {
            return Err(AccountStoreError::AccountNotFound);
        };

        self.account_from_row(&row)
    }

    #[tracing::instrument(name = "Marking account confirmed", skip_all)]
    async fn mark_confirmed(&self, id: AccountId) -> Result<(), AccountStoreError> {
        let result = sqlx::query("UPDATE accounts SET confirmed = TRUE WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(AccountStoreError::AccountNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Setting new password hash", skip_all)]
    async fn set_password_hash(
        &self,
        id: AccountId,
        password_hash: Secret<String>,
        changed_at: DateTime<Utc>,
    ) -> Result<(), AccountStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE accounts
                SET password_hash = $1, change_credential_time = $2
                WHERE id = $3
            "#,
        )
        .bind(password_hash.expose_secret())
        .bind(changed_at)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(AccountStoreError::AccountNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Storing one-time code", skip_all)]
    async fn put_otp(&self, id: AccountId, entry: OtpEntry) -> Result<(), AccountStoreError> {
        let query = sqlx::query(
            r#"
                INSERT INTO account_otps (account_id, purpose, code_hash, expires_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (account_id, purpose)
                DO UPDATE SET code_hash = EXCLUDED.code_hash, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(entry.purpose.as_str())
        .bind(entry.code_hash.expose_secret())
        .bind(entry.expires_at);

        query.execute(&self.pool).await.map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint().is_some() {
                    return AccountStoreError::AccountNotFound;
                }
            }
            AccountStoreError::UnexpectedError(e.to_string())
        })?;

        Ok(())
    }

    #[tracing::instrument(name = "Retrieving one-time code", skip_all)]
    async fn get_otp(
        &self,
        id: AccountId,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpEntry>, AccountStoreError> {
        let row = sqlx::query(
            "SELECT code_hash, expires_at FROM account_otps WHERE account_id = $1 AND purpose = $2",
        )
        .bind(id.as_uuid())
        .bind(purpose.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let code_hash: String = row.try_get("code_hash").map_err(unexpected)?;
        Ok(Some(OtpEntry {
            code_hash: Secret::from(code_hash),
            purpose,
            expires_at: row.try_get("expires_at").map_err(unexpected)?,
        }))
    }

    #[tracing::instrument(name = "Consuming one-time code", skip_all)]
    async fn take_otp_if_hash_matches(
        &self,
        id: AccountId,
        purpose: OtpPurpose,
        code_hash: &Secret<String>,
    ) -> Result<bool, AccountStoreError> {
        // Conditional delete: of two concurrent verifications, only one row
        // removal can succeed.
        let result = sqlx::query(
            "DELETE FROM account_otps WHERE account_id = $1 AND purpose = $2 AND code_hash = $3",
        )
        .bind(id.as_uuid())
        .bind(purpose.as_str())
        .bind(code_hash.expose_secret())
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(result.rows_affected() == 1)
    }
}

fn unexpected(error: sqlx::Error) -> AccountStoreError {
    AccountStoreError::UnexpectedError(error.to_string())
}
