use chrono::Utc;
use sqlx::Row;

use quiz_core::model::{AnswerMap, QuizId};

use super::SqliteRepository;
use crate::repository::{AttemptDraftRepository, StorageError};

#[async_trait::async_trait]
impl AttemptDraftRepository for SqliteRepository {
    async fn save_draft(&self, quiz_id: &QuizId, answers: &AnswerMap) -> Result<(), StorageError> {
        let answers_json = serde_json::to_string(answers)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO attempt_drafts (quiz_id, answers_json, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(quiz_id) DO UPDATE SET
                answers_json = excluded.answers_json,
                updated_at = excluded.updated_at
            ",
        )
        .bind(quiz_id.as_str().to_owned())
        .bind(answers_json)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn load_draft(&self, quiz_id: &QuizId) -> Result<Option<AnswerMap>, StorageError> {
        let row = sqlx::query("SELECT answers_json FROM attempt_drafts WHERE quiz_id = ?1")
            .bind(quiz_id.as_str().to_owned())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let answers_json: String = row
            .try_get("answers_json")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let answers = serde_json::from_str(&answers_json)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        Ok(Some(answers))
    }

    async fn clear_draft(&self, quiz_id: &QuizId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM attempt_drafts WHERE quiz_id = ?1")
            .bind(quiz_id.as_str().to_owned())
            .execute(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
