use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::{require_subject, AuthError, IdentityClaims, TokenVerifier};

/// Unknown key ids trigger a refetch, but not more often than this.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

impl CachedKeys {
    fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }
}

/// Verifies RS256 identity tokens against the provider's published key set.
///
/// Keys are cached for `cache_ttl`; a token naming an unknown key id forces a
/// refresh so provider key rotation is picked up without a restart.
pub struct JwksVerifier {
    client: reqwest::Client,
    url: String,
    validation: Validation,
    cache_ttl: Duration,
    cache: RwLock<Option<CachedKeys>>,
    refresh: Mutex<()>,
}

impl JwksVerifier {
    pub fn new(
        url: String,
        issuer: String,
        audience: String,
        cache_ttl: Duration,
        leeway_secs: u64,
    ) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = leeway_secs;
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        Ok(Self {
            client,
            url,
            validation,
            cache_ttl,
            cache: RwLock::new(None),
            refresh: Mutex::new(()),
        })
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(answer) = self.cached_key(kid).await {
            return answer;
        }

        // One refresh at a time; waiters re-check what the winner stored
        let _refresh = self.refresh.lock().await;
        if let Some(answer) = self.cached_key(kid).await {
            return answer;
        }

        match self.fetch_keys().await {
            Ok(keys) => {
                let key = keys.find(kid).map(DecodingKey::from_jwk).transpose()?;
                *self.cache.write().await = Some(CachedKeys {
                    keys,
                    fetched_at: Instant::now(),
                });
                key.ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
            }
            Err(err) => {
                // Stale keys keep known signers working while the provider is down
                let cache = self.cache.read().await;
                match cache.as_ref().and_then(|cached| cached.keys.find(kid)) {
                    Some(jwk) => {
                        warn!("Key refresh failed, using cached key {}: {}", kid, err);
                        Ok(DecodingKey::from_jwk(jwk)?)
                    }
                    None => Err(err),
                }
            }
        }
    }

    /// Answer from the cache when no fetch is due
    async fn cached_key(&self, kid: &str) -> Option<Result<DecodingKey, AuthError>> {
        let cache = self.cache.read().await;
        let cached = cache.as_ref()?;
        if cached.age() >= self.cache_ttl {
            return None;
        }
        if let Some(jwk) = cached.keys.find(kid) {
            return Some(DecodingKey::from_jwk(jwk).map_err(AuthError::from));
        }
        if cached.age() < MIN_REFRESH_INTERVAL {
            return Some(Err(AuthError::UnknownKey(kid.to_string())));
        }
        None
    }

    async fn fetch_keys(&self) -> Result<JwkSet, AuthError> {
        debug!("Fetching signing keys from {}", self.url);

        let keys = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;

        info!("Loaded {} signing keys from {}", keys.keys.len(), self.url);
        Ok(keys)
    }
}

#[async_trait]
impl TokenVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        let key = self.decoding_key(&kid).await?;
        let data = decode::<IdentityClaims>(token, &key, &self.validation)?;
        require_subject(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::shared_secret::sign_token;

    fn verifier() -> JwksVerifier {
        // Unroutable address; these tests must fail before any fetch happens
        JwksVerifier::new(
            "http://127.0.0.1:9/jwks".to_string(),
            "https://securetoken.google.com/focus-app".to_string(),
            "focus-app".to_string(),
            Duration::from_secs(300),
            0,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn rejects_symmetric_tokens_without_fetching() {
        let token = sign_token("secret", "uid-1", None, chrono::Duration::hours(1)).unwrap();
        let result = verifier().verify(&token).await;
        assert!(matches!(result, Err(AuthError::UnsupportedAlgorithm(Algorithm::HS256))));
    }

    #[tokio::test]
    async fn rejects_malformed_tokens() {
        let result = verifier().verify("definitely-not-a-jwt").await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn cache_starts_empty() {
        assert!(verifier().cache.read().await.is_none());
    }

    // RFC 7517 appendix A.1 public key
    fn key_set() -> JwkSet {
        serde_json::from_value(serde_json::json!({
            "keys": [{
                "kty": "RSA",
                "kid": "k1",
                "alg": "RS256",
                "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
                "e": "AQAB"
            }]
        }))
        .unwrap()
    }

    async fn seed_cache(verifier: &JwksVerifier, age: Duration) {
        let fetched_at = Instant::now().checked_sub(age).unwrap_or_else(Instant::now);
        *verifier.cache.write().await = Some(CachedKeys {
            keys: key_set(),
            fetched_at,
        });
    }

    #[tokio::test]
    async fn fresh_cache_answers_without_fetching() {
        let verifier = verifier();
        seed_cache(&verifier, Duration::ZERO).await;

        assert!(verifier.decoding_key("k1").await.is_ok());
        assert!(matches!(
            verifier.decoding_key("k2").await,
            Err(AuthError::UnknownKey(_))
        ));
    }

    #[tokio::test]
    async fn stale_keys_survive_a_failed_refresh() {
        let verifier = verifier();
        seed_cache(&verifier, Duration::from_secs(600)).await;

        // Fetch fails (nothing listens on port 9); the cached key still verifies
        assert!(verifier.decoding_key("k1").await.is_ok());
        assert!(verifier.cache.read().await.is_some());

        assert!(matches!(
            verifier.decoding_key("k2").await,
            Err(AuthError::KeySetUnavailable(_))
        ));
    }
}
