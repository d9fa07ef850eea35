// handlers/protected/identity.rs - GET /api/test

use axum::Extension;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/test - Echo the identity the gate attached to this request
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "message": "This is a protected route",
        "user": user
    })))
}
