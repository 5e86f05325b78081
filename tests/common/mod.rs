#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use recipe_api::config::AppConfig;
use recipe_api::database::MemoryStore;
use recipe_api::{app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

/// In-process router over a fresh in-memory store
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig::development();
        let state = AppState::with_memory_store(MemoryStore::new(), &config);
        Self {
            router: app(state, &config),
        }
    }

    /// Send one request; returns the status and the JSON body (`Null` when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        match body {
            Some(json) => {
                let raw = serde_json::to_vec(&json)?;
                self.send(method, uri, authorization, Some("application/json"), raw)
                    .await
            }
            None => self.send(method, uri, authorization, None, Vec::new()).await,
        }
    }

    /// Send raw bytes with an optional content type, for bodies that are not valid JSON
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        content_type: Option<&str>,
        body: impl Into<Vec<u8>>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        if let Some(value) = content_type {
            builder = builder.header(header::CONTENT_TYPE, value);
        }
        let request = builder.body(Body::from(body.into()))?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .with_context(|| format!("non-JSON body: {}", String::from_utf8_lossy(&bytes)))?
        };
        Ok((status, value))
    }

    pub async fn as_user(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let bearer = format!("Bearer {}", token);
        self.request(method, uri, Some(&bearer), body).await
    }

    /// Register and sign in; returns the bearer token
    pub async fn sign_up_and_in(&self, email: &str) -> Result<String> {
        let credentials = json!({
            "credentials": {
                "email": email,
                "password": "secret",
                "password_confirmation": "secret"
            }
        });
        let (status, body) = self
            .request(Method::POST, "/sign-up", None, Some(credentials.clone()))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "sign-up failed: {} {}", status, body);

        let (status, body) = self
            .request(Method::POST, "/sign-in", None, Some(credentials))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "sign-in failed: {} {}", status, body);

        body["user"]["token"]
            .as_str()
            .map(str::to_string)
            .context("sign-in response missing token")
    }
}

pub fn soup() -> Value {
    json!({
        "name": "Soup",
        "ingredients": "water",
        "instructions": "boil",
        "calories": 10,
        "type": "dinner",
        "cuisine": "french",
        "favorite": false
    })
}

/// The built binary running against the in-memory store on a free port.
/// Killed when dropped.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_recipe-api"))
            .arg("serve")
            .env("APP_ENV", "development")
            .env("RECIPES_STORE", "memory")
            .env("RECIPES_BIND", "127.0.0.1")
            .env("RECIPES_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        let server = Self { port, base_url, child };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
