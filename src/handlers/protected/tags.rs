// handlers/protected/tags.rs - Tags and task/tag associations

use axum::{extract::State, Extension};
use serde_json::Value;

use crate::auth::AuthUser;
use crate::database::models::tag::{AttachTagInput, Tag, TagInput, TaskTag};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::TagService;
use crate::state::AppState;

/// POST /tags
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<TagInput>,
) -> ApiResult<Tag> {
    let input = payload.validate()?;
    let tag = TagService::new(state.pool).create(&user.uid, input).await?;
    Ok(ApiResponse::created(tag))
}

/// GET /tags
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Tag>> {
    let tags = TagService::new(state.pool).list(&user.uid).await?;
    Ok(ApiResponse::success(tags))
}

/// PUT /tags/:id
pub async fn rename(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<TagInput>,
) -> ApiResult<Tag> {
    let input = payload.validate()?;
    let tag = TagService::new(state.pool).rename(&user.uid, id, input).await?;
    Ok(ApiResponse::success(tag))
}

/// DELETE /tags/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    TagService::new(state.pool).delete(&user.uid, id).await?;
    Ok(ApiResponse::message("Tag deleted successfully"))
}

/// POST /tasks/:id/tags
pub async fn attach(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(task_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<AttachTagInput>,
) -> ApiResult<TaskTag> {
    let link = TagService::new(state.pool)
        .attach(&user.uid, task_id, payload.tag_id)
        .await?;
    Ok(ApiResponse::created(link))
}

/// GET /tasks/:id/tags
pub async fn list_for_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(task_id): ApiPath<i64>,
) -> ApiResult<Vec<Tag>> {
    let tags = TagService::new(state.pool)
        .list_for_task(&user.uid, task_id)
        .await?;
    Ok(ApiResponse::success(tags))
}

/// DELETE /tasks/:id/tags/:tag_id
pub async fn detach(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath((task_id, tag_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Value> {
    TagService::new(state.pool)
        .detach(&user.uid, task_id, tag_id)
        .await?;
    Ok(ApiResponse::message("Tag removed from task successfully"))
}
