// handlers/protected/calendar.rs - Calendar events

use axum::{extract::State, Extension};
use serde_json::Value;

use crate::auth::AuthUser;
use crate::database::models::calendar::{CalendarEvent, CalendarEventInput};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CalendarService;
use crate::state::AppState;

/// POST /calendar
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<CalendarEventInput>,
) -> ApiResult<CalendarEvent> {
    let input = payload.validate()?;
    let event = CalendarService::new(state.pool).create(&user.uid, input).await?;
    Ok(ApiResponse::created(event))
}

/// GET /calendar - Ordered by start time
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<CalendarEvent>> {
    let events = CalendarService::new(state.pool).list(&user.uid).await?;
    Ok(ApiResponse::success(events))
}

/// GET /calendar/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<CalendarEvent> {
    let event = CalendarService::new(state.pool).get(&user.uid, id).await?;
    Ok(ApiResponse::success(event))
}

/// PUT /calendar/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<CalendarEventInput>,
) -> ApiResult<CalendarEvent> {
    let input = payload.validate()?;
    let event = CalendarService::new(state.pool)
        .update(&user.uid, id, input)
        .await?;
    Ok(ApiResponse::success(event))
}

/// DELETE /calendar/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    CalendarService::new(state.pool).delete(&user.uid, id).await?;
    Ok(ApiResponse::message("Calendar event deleted successfully"))
}
