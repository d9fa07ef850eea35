use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// Google's published keys for Firebase ID tokens.
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub provider: AuthProvider,
    pub jwks_cache_secs: u64,
    pub leeway_secs: u64,
}

/// Where bearer tokens are verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthProvider {
    /// RS256 tokens checked against a published JSON Web Key Set.
    Jwks {
        url: String,
        issuer: String,
        audience: String,
    },
    /// HS256 tokens signed with a shared secret (local development, tests).
    SharedSecret {
        #[serde(skip_serializing, default)]
        secret: String,
    },
    Unconfigured,
}

impl AuthProvider {
    /// Firebase ID tokens: issuer and audience are derived from the project id.
    pub fn firebase(project_id: &str) -> Self {
        AuthProvider::Jwks {
            url: FIREBASE_JWKS_URL.to_string(),
            issuer: format!("https://securetoken.google.com/{}", project_id),
            audience: project_id.to_string(),
        }
    }

    /// Resolve the provider from variables, first match wins:
    /// FIREBASE_PROJECT_ID, then AUTH_JWKS_URL + AUTH_ISSUER + AUTH_AUDIENCE,
    /// then AUTH_HMAC_SECRET.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(project_id) = non_empty("FIREBASE_PROJECT_ID") {
            return Self::firebase(project_id.trim());
        }

        if let (Some(url), Some(issuer), Some(audience)) = (
            non_empty("AUTH_JWKS_URL"),
            non_empty("AUTH_ISSUER"),
            non_empty("AUTH_AUDIENCE"),
        ) {
            return AuthProvider::Jwks { url, issuer, audience };
        }

        if let Some(secret) = non_empty("AUTH_HMAC_SECRET") {
            return AuthProvider::SharedSecret { secret };
        }

        AuthProvider::Unconfigured
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("BIND_ADDRESS") {
            self.server.bind_address = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // Auth overrides
        self.auth.provider = AuthProvider::from_lookup(|key| env::var(key).ok());
        if let Ok(v) = env::var("AUTH_JWKS_CACHE_SECS") {
            self.auth.jwks_cache_secs = v.parse().unwrap_or(self.auth.jwks_cache_secs);
        }
        if let Ok(v) = env::var("AUTH_LEEWAY_SECS") {
            self.auth.leeway_secs = v.parse().unwrap_or(self.auth.leeway_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                bind_address: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            auth: AuthConfig {
                provider: AuthProvider::Unconfigured,
                jwks_cache_secs: 300,
                leeway_secs: 60,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                bind_address: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                run_migrations: true,
            },
            auth: AuthConfig {
                provider: AuthProvider::Unconfigured,
                jwks_cache_secs: 3600,
                leeway_secs: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                bind_address: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            auth: AuthConfig {
                provider: AuthProvider::Unconfigured,
                jwks_cache_secs: 3600,
                leeway_secs: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 3000);
        assert!(config.database.run_migrations);
        assert!(config.security.cors_origins.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.database.run_migrations);
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.security.cors_origins, vec!["https://app.example.com"]);
    }

    #[test]
    fn firebase_project_wins_over_other_providers() {
        let provider = AuthProvider::from_lookup(lookup(&[
            ("FIREBASE_PROJECT_ID", "focus-app"),
            ("AUTH_HMAC_SECRET", "dev-secret"),
        ]));
        assert_eq!(
            provider,
            AuthProvider::Jwks {
                url: FIREBASE_JWKS_URL.to_string(),
                issuer: "https://securetoken.google.com/focus-app".to_string(),
                audience: "focus-app".to_string(),
            }
        );
    }

    #[test]
    fn explicit_jwks_requires_all_three_values() {
        let partial = AuthProvider::from_lookup(lookup(&[
            ("AUTH_JWKS_URL", "https://idp.example.com/jwks"),
            ("AUTH_ISSUER", "https://idp.example.com"),
        ]));
        assert_eq!(partial, AuthProvider::Unconfigured);

        let full = AuthProvider::from_lookup(lookup(&[
            ("AUTH_JWKS_URL", "https://idp.example.com/jwks"),
            ("AUTH_ISSUER", "https://idp.example.com"),
            ("AUTH_AUDIENCE", "focus"),
        ]));
        assert!(matches!(full, AuthProvider::Jwks { ref audience, .. } if audience == "focus"));
    }

    #[test]
    fn shared_secret_ignores_blank_values() {
        let blank = AuthProvider::from_lookup(lookup(&[("AUTH_HMAC_SECRET", "   ")]));
        assert_eq!(blank, AuthProvider::Unconfigured);

        let set = AuthProvider::from_lookup(lookup(&[("AUTH_HMAC_SECRET", "s3cret")]));
        assert_eq!(set, AuthProvider::SharedSecret { secret: "s3cret".to_string() });
    }

    #[test]
    fn shared_secret_is_never_serialized() {
        let provider = AuthProvider::SharedSecret { secret: "s3cret".to_string() };
        let rendered = serde_json::to_string(&provider).unwrap();
        assert!(!rendered.contains("s3cret"));
    }
}
