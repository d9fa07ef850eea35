pub mod jwks;
pub mod shared_secret;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{AuthConfig, AuthProvider};

pub use jwks::JwksVerifier;
pub use shared_secret::SharedSecretVerifier;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header must use Bearer token format")]
    InvalidScheme,

    #[error("Empty bearer token")]
    EmptyToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Token has no subject")]
    MissingSubject,

    #[error("Unsupported token algorithm {0:?}")]
    UnsupportedAlgorithm(Algorithm),

    #[error("Token header has no key id")]
    MissingKeyId,

    #[error("Unknown signing key: {0}")]
    UnknownKey(String),

    #[error("Signing keys unavailable: {0}")]
    KeySetUnavailable(String),

    #[error("Token verification is not configured")]
    NotConfigured,
}

/// Claims read from a verified identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Provider-assigned user id
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

/// Authenticated user context attached to each protected request
#[derive(Clone, Debug, Serialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
}

impl From<IdentityClaims> for AuthUser {
    fn from(claims: IdentityClaims) -> Self {
        Self {
            uid: claims.sub,
            email: claims.email,
        }
    }
}

/// Checks a bearer token with the identity provider
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError>;
}

/// Reject tokens whose subject is blank
fn require_subject(claims: IdentityClaims) -> Result<IdentityClaims, AuthError> {
    if claims.sub.trim().is_empty() {
        return Err(AuthError::MissingSubject);
    }
    Ok(claims)
}

/// Build the verifier named by configuration
pub fn build_verifier(config: &AuthConfig) -> Result<Arc<dyn TokenVerifier>, AuthError> {
    match &config.provider {
        AuthProvider::Jwks { url, issuer, audience } => Ok(Arc::new(JwksVerifier::new(
            url.clone(),
            issuer.clone(),
            audience.clone(),
            Duration::from_secs(config.jwks_cache_secs),
            config.leeway_secs,
        )?)),
        AuthProvider::SharedSecret { secret } => {
            Ok(Arc::new(SharedSecretVerifier::new(secret.clone(), config.leeway_secs)))
        }
        AuthProvider::Unconfigured => Err(AuthError::NotConfigured),
    }
}
