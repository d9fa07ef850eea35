use sqlx::PgPool;

use crate::database::manager::{is_unique_violation, DatabaseError};
use crate::database::models::tag::{Tag, TagInput, TaskTag};

const TAG_NAME_KEY: &str = "tags_user_id_name_key";
const TASK_TAG_KEY: &str = "task_tags_pkey";

/// Per-user tags and their many-to-many link with tasks
pub struct TagService {
    pool: PgPool,
}

impl TagService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: &str, input: TagInput) -> Result<Tag, DatabaseError> {
        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM tags WHERE user_id = $1 AND name = $2")
                .bind(user_id)
                .bind(&input.name)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_some() {
            return Err(duplicate_name());
        }

        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (user_id, name) VALUES ($1, $2)
             RETURNING id, user_id, name, created_at",
        )
        .bind(user_id)
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_name_conflict)
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Tag>, DatabaseError> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT id, user_id, name, created_at FROM tags WHERE user_id = $1 ORDER BY name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    pub async fn rename(
        &self,
        user_id: &str,
        tag_id: i64,
        input: TagInput,
    ) -> Result<Tag, DatabaseError> {
        sqlx::query_as::<_, Tag>(
            "UPDATE tags SET name = $1 WHERE id = $2 AND user_id = $3
             RETURNING id, user_id, name, created_at",
        )
        .bind(&input.name)
        .bind(tag_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_name_conflict)?
        .ok_or_else(tag_not_found)
    }

    pub async fn delete(&self, user_id: &str, tag_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND user_id = $2")
            .bind(tag_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(tag_not_found());
        }
        Ok(())
    }

    /// Link an owned tag to an owned task
    pub async fn attach(
        &self,
        user_id: &str,
        task_id: i64,
        tag_id: i64,
    ) -> Result<TaskTag, DatabaseError> {
        self.ensure_task_owned(user_id, task_id).await?;

        let tag_owned: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM tags WHERE id = $1 AND user_id = $2")
                .bind(tag_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        if tag_owned.is_none() {
            return Err(tag_not_found());
        }

        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT task_id FROM task_tags WHERE task_id = $1 AND tag_id = $2")
                .bind(task_id)
                .bind(tag_id)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_some() {
            return Err(duplicate_link());
        }

        sqlx::query_as::<_, TaskTag>(
            "INSERT INTO task_tags (task_id, tag_id) VALUES ($1, $2)
             RETURNING task_id, tag_id, created_at",
        )
        .bind(task_id)
        .bind(tag_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, TASK_TAG_KEY) {
                duplicate_link()
            } else {
                DatabaseError::from(e)
            }
        })
    }

    pub async fn list_for_task(&self, user_id: &str, task_id: i64) -> Result<Vec<Tag>, DatabaseError> {
        self.ensure_task_owned(user_id, task_id).await?;

        let tags = sqlx::query_as::<_, Tag>(
            "SELECT tg.id, tg.user_id, tg.name, tg.created_at
             FROM tags tg
             JOIN task_tags tt ON tg.id = tt.tag_id
             WHERE tt.task_id = $1 AND tg.user_id = $2
             ORDER BY tg.name",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    pub async fn detach(&self, user_id: &str, task_id: i64, tag_id: i64) -> Result<(), DatabaseError> {
        self.ensure_task_owned(user_id, task_id).await?;

        let result = sqlx::query("DELETE FROM task_tags WHERE task_id = $1 AND tag_id = $2")
            .bind(task_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Tag not found for this task".to_string()));
        }
        Ok(())
    }

    async fn ensure_task_owned(&self, user_id: &str, task_id: i64) -> Result<(), DatabaseError> {
        let owned: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM tasks WHERE id = $1 AND user_id = $2")
                .bind(task_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        match owned {
            Some(_) => Ok(()),
            None => Err(DatabaseError::NotFound(
                "Task not found or does not belong to you".to_string(),
            )),
        }
    }
}

fn map_name_conflict(err: sqlx::Error) -> DatabaseError {
    if is_unique_violation(&err, TAG_NAME_KEY) {
        duplicate_name()
    } else {
        DatabaseError::from(err)
    }
}

fn duplicate_name() -> DatabaseError {
    DatabaseError::Duplicate("Tag already exists".to_string())
}

fn duplicate_link() -> DatabaseError {
    DatabaseError::Duplicate("Tag is already associated with this task".to_string())
}

fn tag_not_found() -> DatabaseError {
    DatabaseError::NotFound("Tag not found or does not belong to you".to_string())
}
