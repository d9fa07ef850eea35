use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::journal::{JournalEntry, JournalEntryUpdate, NewJournalEntry};

const JOURNAL_COLUMNS: &str = "id, user_id, task_id, entry, created_at, updated_at";

/// Journal entries. Callers validate the entry length before calling in.
pub struct JournalService {
    pool: PgPool,
}

impl JournalService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: &str,
        input: NewJournalEntry,
    ) -> Result<JournalEntry, DatabaseError> {
        if let Some(task_id) = input.task_id {
            let owned: Option<(i64,)> =
                sqlx::query_as("SELECT id FROM tasks WHERE id = $1 AND user_id = $2")
                    .bind(task_id)
                    .bind(user_id)
                    .fetch_optional(&self.pool)
                    .await?;
            if owned.is_none() {
                return Err(DatabaseError::NotFound(
                    "Task not found or does not belong to you".to_string(),
                ));
            }
        }

        let sql = format!(
            "INSERT INTO journal_entries (user_id, task_id, entry) VALUES ($1, $2, $3) RETURNING {}",
            JOURNAL_COLUMNS
        );
        let entry = sqlx::query_as::<_, JournalEntry>(&sql)
            .bind(user_id)
            .bind(input.task_id)
            .bind(&input.entry)
            .fetch_one(&self.pool)
            .await?;

        Ok(entry)
    }

    /// Newest first
    pub async fn list(&self, user_id: &str) -> Result<Vec<JournalEntry>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM journal_entries WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            JOURNAL_COLUMNS
        );
        let entries = sqlx::query_as::<_, JournalEntry>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    pub async fn get(&self, user_id: &str, entry_id: i64) -> Result<JournalEntry, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM journal_entries WHERE id = $1 AND user_id = $2",
            JOURNAL_COLUMNS
        );
        sqlx::query_as::<_, JournalEntry>(&sql)
            .bind(entry_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Journal entry not found".to_string()))
    }

    pub async fn update(
        &self,
        user_id: &str,
        entry_id: i64,
        input: JournalEntryUpdate,
    ) -> Result<JournalEntry, DatabaseError> {
        let sql = format!(
            "UPDATE journal_entries
             SET entry = $1, updated_at = CURRENT_TIMESTAMP
             WHERE id = $2 AND user_id = $3
             RETURNING {}",
            JOURNAL_COLUMNS
        );
        sqlx::query_as::<_, JournalEntry>(&sql)
            .bind(&input.entry)
            .bind(entry_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_owned)
    }

    pub async fn delete(&self, user_id: &str, entry_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_owned());
        }
        Ok(())
    }
}

fn not_owned() -> DatabaseError {
    DatabaseError::NotFound("Journal entry not found or does not belong to you".to_string())
}
