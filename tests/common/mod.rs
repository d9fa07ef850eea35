#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;

use focus_api::auth::shared_secret::sign_token;

pub const TEST_SECRET: &str = "integration-test-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_focus-api"));
        cmd.env("PORT", port.to_string())
            .env("BIND_ADDRESS", "127.0.0.1")
            .env("DATABASE_RUN_MIGRATIONS", "true")
            .env("AUTH_HMAC_SECRET", TEST_SECRET)
            .env_remove("FIREBASE_PROJECT_ID")
            .env_remove("AUTH_JWKS_URL")
            .env_remove("AUTH_ISSUER")
            .env_remove("AUTH_AUDIENCE")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // DATABASE_URL is inherited from the test environment
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Running server, or None when no database is configured for this run
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return Ok(None);
    }

    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(20)).await?;
    Ok(Some(server))
}

/// Direct connection for arranging rows the API cannot reach, such as backdating
pub async fn db_pool() -> Result<sqlx::PgPool> {
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL not set")?;
    Ok(sqlx::PgPool::connect(&url).await?)
}

/// HTTP client acting as one freshly minted user
pub struct TestUser {
    pub uid: String,
    token: String,
    base_url: String,
    client: Client,
}

impl TestUser {
    pub fn new(server: &TestServer) -> Result<Self> {
        let uid = format!("user-{}", uuid::Uuid::new_v4());
        let token = sign_token(TEST_SECRET, &uid, None, chrono::Duration::hours(1))?;
        Ok(Self {
            uid,
            token,
            base_url: server.base_url.clone(),
            client: Client::new(),
        })
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
    }

    pub async fn send(&self, builder: RequestBuilder) -> Result<(StatusCode, Value)> {
        let res = builder.send().await?;
        let status = res.status();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.send(self.request(Method::DELETE, path)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(self.request(Method::POST, path).json(&body)).await
    }

    pub async fn put(&self, path: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let builder = self.request(Method::PUT, path);
        let builder = match body {
            Some(json) => builder.json(&json),
            None => builder,
        };
        self.send(builder).await
    }
}
