use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthError, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

/// Bearer-token gate for protected routes.
///
/// Verifies the token with the configured identity provider and injects the
/// resulting [`AuthUser`] into request extensions. Any failure ends the
/// request with 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = request.uri().path().to_owned();

    let token = extract_bearer_token(request.headers())
        .map_err(|e| {
            tracing::debug!("Rejected {}: {}", path, e);
            ApiError::from(e)
        })?
        .to_owned();

    let claims = state.verifier.verify(&token).await.map_err(|e| {
        match &e {
            AuthError::KeySetUnavailable(_) => {
                tracing::error!("Token verification failed for {}: {}", path, e)
            }
            _ => tracing::warn!("Token rejected for {}: {}", path, e),
        }
        ApiError::from(e)
    })?;

    let auth_user = AuthUser::from(claims);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidScheme)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidScheme)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    Ok(token)
}
