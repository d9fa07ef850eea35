use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::database::manager::{is_unique_violation, DatabaseError};
use crate::database::models::task::{elapsed_seconds, ActiveTask, NewTask, Task, TaskWithTags};

const TASK_COLUMNS: &str = "id, user_id, title, priority, start_time, end_time, is_active, \
                            total_time, project_id, created_at";

/// Index that keeps a user to a single running task
const ONE_ACTIVE_INDEX: &str = "tasks_one_active_per_user";

/// Timed tasks and their lifecycle: start, stop, project association
pub struct TaskService {
    pool: PgPool,
}

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Start a new task. Refused while another task is running for the user.
    pub async fn start(
        &self,
        user_id: &str,
        input: NewTask,
        now: DateTime<Utc>,
    ) -> Result<Task, DatabaseError> {
        // Conditional insert; the partial unique index settles concurrent starts.
        let sql = format!(
            "INSERT INTO tasks (user_id, title, priority, start_time, is_active)
             SELECT $1, $2, $3, $4, TRUE
             WHERE NOT EXISTS (SELECT 1 FROM tasks WHERE user_id = $1 AND is_active)
             RETURNING {}",
            TASK_COLUMNS
        );

        let inserted = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .bind(&input.title)
            .bind(input.priority)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, ONE_ACTIVE_INDEX) {
                    DatabaseError::ActiveTaskExists
                } else {
                    DatabaseError::from(e)
                }
            })?;

        let task = inserted.ok_or(DatabaseError::ActiveTaskExists)?;
        info!("Task {} started for user {}", task.id, user_id);
        Ok(task)
    }

    /// The running task with its project name, if any
    pub async fn active(&self, user_id: &str) -> Result<Option<ActiveTask>, DatabaseError> {
        let task = sqlx::query_as::<_, ActiveTask>(
            "SELECT t.id, t.user_id, t.title, t.priority, t.start_time, t.end_time, t.is_active,
                    t.total_time, t.project_id, t.created_at, p.name AS project_name
             FROM tasks t
             LEFT JOIN projects p ON t.project_id = p.id AND p.user_id = t.user_id
             WHERE t.user_id = $1 AND t.is_active",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Stop a running task, recording its end time and total seconds.
    pub async fn stop(
        &self,
        user_id: &str,
        task_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Task, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Row lock keeps a second stop from seeing the task as still running
        let select = format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2 AND is_active FOR UPDATE",
            TASK_COLUMNS
        );
        let running = sqlx::query_as::<_, Task>(&select)
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Task not found or already stopped".to_string()))?;

        let total_seconds = elapsed_seconds(running.start_time, now);

        let update = format!(
            "UPDATE tasks SET end_time = $1, total_time = $2, is_active = FALSE
             WHERE id = $3
             RETURNING {}",
            TASK_COLUMNS
        );
        let stopped = sqlx::query_as::<_, Task>(&update)
            .bind(now)
            .bind(total_seconds)
            .bind(task_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Task {} {:?} after {}s for user {}",
            stopped.id,
            stopped.state(),
            total_seconds,
            user_id
        );
        Ok(stopped)
    }

    /// Stopped tasks with their tag names, optionally only those carrying `tag_name`
    pub async fn list_completed(
        &self,
        user_id: &str,
        tag_name: Option<&str>,
    ) -> Result<Vec<TaskWithTags>, DatabaseError> {
        let tasks = sqlx::query_as::<_, TaskWithTags>(
            "SELECT t.id, t.user_id, t.title, t.priority, t.start_time, t.end_time, t.is_active,
                    t.total_time, t.project_id, t.created_at,
                    COALESCE(ARRAY_AGG(tg.name ORDER BY tg.name) FILTER (WHERE tg.name IS NOT NULL),
                             '{}'::TEXT[]) AS tags
             FROM tasks t
             LEFT JOIN task_tags tt ON t.id = tt.task_id
             LEFT JOIN tags tg ON tt.tag_id = tg.id
             WHERE t.user_id = $1 AND NOT t.is_active
             GROUP BY t.id
             HAVING $2::TEXT IS NULL OR BOOL_OR(tg.name = $2)
             ORDER BY t.start_time DESC",
        )
        .bind(user_id)
        .bind(tag_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// One owned task with its tag names
    pub async fn get(&self, user_id: &str, task_id: i64) -> Result<TaskWithTags, DatabaseError> {
        sqlx::query_as::<_, TaskWithTags>(
            "SELECT t.id, t.user_id, t.title, t.priority, t.start_time, t.end_time, t.is_active,
                    t.total_time, t.project_id, t.created_at,
                    COALESCE(ARRAY_AGG(tg.name ORDER BY tg.name) FILTER (WHERE tg.name IS NOT NULL),
                             '{}'::TEXT[]) AS tags
             FROM tasks t
             LEFT JOIN task_tags tt ON t.id = tt.task_id
             LEFT JOIN tags tg ON tt.tag_id = tg.id
             WHERE t.id = $1 AND t.user_id = $2
             GROUP BY t.id",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Task not found".to_string()))
    }

    /// Ownership-scoped lookup used before any mutation
    pub async fn find_owned(&self, user_id: &str, task_id: i64) -> Result<Task, DatabaseError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1 AND user_id = $2", TASK_COLUMNS);
        sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                DatabaseError::NotFound("Task not found or does not belong to you".to_string())
            })
    }

    /// Delete an owned task; its tag associations go with it
    pub async fn delete(&self, user_id: &str, task_id: i64) -> Result<(), DatabaseError> {
        self.find_owned(user_id, task_id).await?;

        sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        info!("Task {} deleted for user {}", task_id, user_id);
        Ok(())
    }

    /// Point an owned task at an owned project
    pub async fn assign_project(
        &self,
        user_id: &str,
        task_id: i64,
        project_id: i64,
    ) -> Result<(), DatabaseError> {
        self.find_owned(user_id, task_id).await?;

        let project_owned: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        if project_owned.is_none() {
            return Err(DatabaseError::NotFound(
                "Project not found or does not belong to you".to_string(),
            ));
        }

        sqlx::query("UPDATE tasks SET project_id = $1 WHERE id = $2 AND user_id = $3")
            .bind(project_id)
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Clear the project association of an owned task
    pub async fn remove_project(&self, user_id: &str, task_id: i64) -> Result<(), DatabaseError> {
        self.find_owned(user_id, task_id).await?;

        sqlx::query("UPDATE tasks SET project_id = NULL WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Tasks of a project, regardless of state
    pub async fn list_for_project(
        &self,
        user_id: &str,
        project_id: i64,
    ) -> Result<Vec<Task>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE project_id = $1 AND user_id = $2 ORDER BY start_time DESC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(project_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }
}
