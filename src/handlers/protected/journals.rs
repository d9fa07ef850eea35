// handlers/protected/journals.rs - Journal entries
//
// Entry length is checked here, before anything touches the database.

use axum::{extract::State, Extension};
use serde_json::Value;

use crate::auth::AuthUser;
use crate::database::models::journal::{
    validate_entry, JournalEntry, JournalEntryUpdate, NewJournalEntry,
};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::JournalService;
use crate::state::AppState;

/// POST /journals
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<NewJournalEntry>,
) -> ApiResult<JournalEntry> {
    validate_entry(&payload.entry)?;
    let entry = JournalService::new(state.pool).create(&user.uid, payload).await?;
    Ok(ApiResponse::created(entry))
}

/// GET /journals - Newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<JournalEntry>> {
    let entries = JournalService::new(state.pool).list(&user.uid).await?;
    Ok(ApiResponse::success(entries))
}

/// GET /journals/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<JournalEntry> {
    let entry = JournalService::new(state.pool).get(&user.uid, id).await?;
    Ok(ApiResponse::success(entry))
}

/// PUT /journals/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<JournalEntryUpdate>,
) -> ApiResult<JournalEntry> {
    validate_entry(&payload.entry)?;
    let entry = JournalService::new(state.pool)
        .update(&user.uid, id, payload)
        .await?;
    Ok(ApiResponse::success(entry))
}

/// DELETE /journals/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    JournalService::new(state.pool).delete(&user.uid, id).await?;
    Ok(ApiResponse::message("Journal entry deleted successfully"))
}
