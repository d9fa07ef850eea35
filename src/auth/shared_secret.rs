use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{require_subject, AuthError, IdentityClaims, TokenVerifier};

/// HS256 tokens signed with a shared secret. Meant for development and tests.
pub struct SharedSecretVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SharedSecretVerifier {
    pub fn new(secret: String, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl TokenVerifier for SharedSecretVerifier {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        let data = decode::<IdentityClaims>(token, &self.key, &self.validation)?;
        require_subject(data.claims)
    }
}

/// Mint a token the shared-secret verifier accepts
pub fn sign_token(
    secret: &str,
    subject: &str,
    email: Option<String>,
    ttl: Duration,
) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::NotConfigured);
    }

    let now = Utc::now();
    let claims = IdentityClaims {
        sub: subject.to_string(),
        email,
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}
