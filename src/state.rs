use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenVerifier;

/// Shared handler dependencies
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(pool: PgPool, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { pool, verifier }
    }
}
