#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use blog_api_rust::app::{app, AppState};
use blog_api_rust::config::AppConfig;
use blog_api_rust::database::{DynRepository, MemoryRepository};
use reqwest::StatusCode;
use serde_json::{json, Value};

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub http: reqwest::Client,
}

impl TestServer {
    /// Server on a fresh in-memory store
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(Arc::new(MemoryRepository::new())).await
    }

    /// Run the router in-process on an unused port over `repo`
    pub async fn spawn_with(repo: DynRepository) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let vars: HashMap<&str, String> = HashMap::from([
            ("JWT_SECRET", JWT_SECRET.to_string()),
            ("BLOG_STORE", "memory".to_string()),
            ("BLOG_API_HOST", "127.0.0.1".to_string()),
            ("PORT", port.to_string()),
        ]);
        let mut config = AppConfig::from_lookup(|key| vars.get(key).cloned())?;
        // Minimum bcrypt cost keeps the suite fast
        config.security.bcrypt_cost = 4;

        let listener = tokio::net::TcpListener::bind(config.bind_addr())
            .await
            .context("failed to bind test listener")?;
        let router = app(AppState::new(config, repo));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            port,
            base_url,
            http: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.http.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .http
            .post(self.url("/api/auth/register"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Register then log in, returning the bearer token
    pub async fn signup(&self, email: &str, password: &str) -> Result<String> {
        let res = self.register(email, password).await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let res = self.login(email, password).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["token"]
            .as_str()
            .map(String::from)
            .context("login response without token")
    }

    pub async fn create_blog(&self, token: &str, title: &str, content: &str) -> Result<Value> {
        let res = self
            .http
            .post(self.url("/api/blogs"))
            .bearer_auth(token)
            .json(&json!({ "title": title, "content": content }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
        Ok(res.json().await?)
    }

    pub async fn list_blogs(&self) -> Result<Vec<Value>> {
        let res = self.http.get(self.url("/api/blogs")).send().await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "list failed: {}", res.status());
        Ok(res.json().await?)
    }
}
