// handlers/protected/projects.rs - Project CRUD and project task listing

use axum::{extract::State, Extension};
use serde_json::Value;

use crate::auth::AuthUser;
use crate::database::models::project::{Project, ProjectInput};
use crate::database::models::task::Task;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{ProjectService, TaskService};
use crate::state::AppState;

/// POST /projects
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<ProjectInput>,
) -> ApiResult<Project> {
    let input = payload.validate()?;
    let project = ProjectService::new(state.pool).create(&user.uid, input).await?;
    Ok(ApiResponse::created(project))
}

/// GET /projects
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Project>> {
    let projects = ProjectService::new(state.pool).list(&user.uid).await?;
    Ok(ApiResponse::success(projects))
}

/// GET /projects/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Project> {
    let project = ProjectService::new(state.pool).get(&user.uid, id).await?;
    Ok(ApiResponse::success(project))
}

/// PUT /projects/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ProjectInput>,
) -> ApiResult<Project> {
    let input = payload.validate()?;
    let project = ProjectService::new(state.pool)
        .update(&user.uid, id, input)
        .await?;
    Ok(ApiResponse::success(project))
}

/// DELETE /projects/:id - Tasks are kept and detached from the project
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    ProjectService::new(state.pool).delete(&user.uid, id).await?;
    Ok(ApiResponse::message("Project deleted successfully"))
}

/// GET /projects/:id/tasks
pub async fn tasks(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Vec<Task>> {
    ProjectService::new(state.pool.clone()).get(&user.uid, id).await?;
    let tasks = TaskService::new(state.pool)
        .list_for_project(&user.uid, id)
        .await?;
    Ok(ApiResponse::success(tasks))
}
