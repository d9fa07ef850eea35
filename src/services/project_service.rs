use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::project::{Project, ProjectInput};

const PROJECT_COLUMNS: &str = "id, user_id, name, description, created_at, updated_at";

pub struct ProjectService {
    pool: PgPool,
}

impl ProjectService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: &str, input: ProjectInput) -> Result<Project, DatabaseError> {
        let sql = format!(
            "INSERT INTO projects (user_id, name, description) VALUES ($1, $2, $3) RETURNING {}",
            PROJECT_COLUMNS
        );
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&self.pool)
            .await?;

        info!("Project {} created for user {}", project.id, user_id);
        Ok(project)
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Project>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM projects WHERE user_id = $1 ORDER BY created_at, id",
            PROJECT_COLUMNS
        );
        let projects = sqlx::query_as::<_, Project>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }

    /// Ownership-scoped lookup; absent and foreign rows both read as not found
    pub async fn get(&self, user_id: &str, project_id: i64) -> Result<Project, DatabaseError> {
        let sql = format!("SELECT {} FROM projects WHERE id = $1 AND user_id = $2", PROJECT_COLUMNS);
        sqlx::query_as::<_, Project>(&sql)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn update(
        &self,
        user_id: &str,
        project_id: i64,
        input: ProjectInput,
    ) -> Result<Project, DatabaseError> {
        let sql = format!(
            "UPDATE projects
             SET name = $1, description = $2, updated_at = CURRENT_TIMESTAMP
             WHERE id = $3 AND user_id = $4
             RETURNING {}",
            PROJECT_COLUMNS
        );
        sqlx::query_as::<_, Project>(&sql)
            .bind(&input.name)
            .bind(&input.description)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    /// Delete an owned project. Its tasks survive with `project_id` cleared.
    pub async fn delete(&self, user_id: &str, project_id: i64) -> Result<(), DatabaseError> {
        self.get(user_id, project_id).await?;

        sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        info!("Project {} deleted for user {}", project_id, user_id);
        Ok(())
    }
}

fn not_found() -> DatabaseError {
    DatabaseError::NotFound("Project not found or does not belong to you".to_string())
}
