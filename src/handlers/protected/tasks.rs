// handlers/protected/tasks.rs - Task lifecycle endpoints
//
// POST /tasks starts a task, PUT /tasks/:id/stop ends it. A stopped task is
// never restarted; the client creates a new one instead.

use axum::{extract::State, Extension};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::database::models::task::{NewTask, StoppedTaskView, Task, TaskWithTags};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::TaskService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompletedQuery {
    /// Only tasks carrying this tag
    #[serde(rename = "tagName")]
    pub tag_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectActionQuery {
    pub action: Option<String>,
}

/// POST /tasks
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<NewTask>,
) -> ApiResult<Task> {
    let input = payload.validate()?;
    let task = TaskService::new(state.pool)
        .start(&user.uid, input, Utc::now())
        .await?;
    Ok(ApiResponse::created(task))
}

/// GET /tasks/active
pub async fn active(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Value> {
    let active = TaskService::new(state.pool).active(&user.uid).await?;

    let body = match active {
        Some(task) => serde_json::to_value(task.view_at(Utc::now())).map_err(|e| {
            tracing::error!("Failed to serialize active task: {}", e);
            ApiError::internal_server_error("Server error")
        })?,
        None => json!({ "message": "No active task found." }),
    };
    Ok(ApiResponse::success(body))
}

/// PUT /tasks/:id/stop
pub async fn stop(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StoppedTaskView> {
    let task = TaskService::new(state.pool)
        .stop(&user.uid, id, Utc::now())
        .await?;
    Ok(ApiResponse::success(StoppedTaskView::from(task)))
}

/// GET /tasks?tagName= - Completed tasks with their tags
pub async fn list_completed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<CompletedQuery>,
) -> ApiResult<Vec<TaskWithTags>> {
    let tag_name = query.tag_name.as_deref().filter(|name| !name.is_empty());
    let tasks = TaskService::new(state.pool)
        .list_completed(&user.uid, tag_name)
        .await?;
    Ok(ApiResponse::success(tasks))
}

/// GET /tasks/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<TaskWithTags> {
    let task = TaskService::new(state.pool).get(&user.uid, id).await?;
    Ok(ApiResponse::success(task))
}

/// DELETE /tasks/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    TaskService::new(state.pool).delete(&user.uid, id).await?;
    Ok(ApiResponse::message("Task deleted successfully"))
}

/// PUT /tasks/:id/project/:project_id
pub async fn assign_project(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((id, project_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Value> {
    TaskService::new(state.pool)
        .assign_project(&user.uid, id, project_id)
        .await?;
    Ok(ApiResponse::message("Task added to project"))
}

/// PUT /tasks/:id/project?action=remove
pub async fn update_project(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<ProjectActionQuery>,
) -> ApiResult<Value> {
    if query.action.as_deref() != Some("remove") {
        return Err(ApiError::bad_request("Invalid action"));
    }

    TaskService::new(state.pool).remove_project(&user.uid, id).await?;
    Ok(ApiResponse::message("Task removed from project"))
}
