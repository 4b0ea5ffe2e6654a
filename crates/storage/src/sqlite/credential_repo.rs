use chrono::Utc;
use sqlx::Row;

use quiz_core::model::{BearerToken, UserSummary};

use super::SqliteRepository;
use crate::repository::{CredentialRepository, StorageError, StoredCredentials};

#[async_trait::async_trait]
impl CredentialRepository for SqliteRepository {
    async fn save_credentials(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        let user_json = credentials
            .user
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO credentials (slot, token, user_json, updated_at)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT(slot) DO UPDATE SET
                token = excluded.token,
                user_json = excluded.user_json,
                updated_at = excluded.updated_at
            ",
        )
        .bind(credentials.token.as_str().to_owned())
        .bind(user_json)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn load_credentials(&self) -> Result<Option<StoredCredentials>, StorageError> {
        let row = sqlx::query("SELECT token, user_json FROM credentials WHERE slot = 1")
            .fetch_optional(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let token: String = row
            .try_get("token")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let user_json: Option<String> = row
            .try_get("user_json")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let user: Option<UserSummary> = user_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        Ok(Some(StoredCredentials::new(BearerToken::new(token), user)))
    }

    async fn clear_credentials(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM credentials WHERE slot = 1")
            .execute(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
