#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use flux_music_api::auth::TokenService;
use flux_music_api::config::AppConfig;
use flux_music_api::database::Database;
use flux_music_api::{app, AppState};

/// A server running inside the test's runtime with its own in-memory database
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub config: AppConfig,
    client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = AppConfig::for_tests();
        let db = Database::connect(&config.database).await?;
        let tokens = TokenService::new(&config.security.jwt_secret, config.security.jwt_expiry_days);
        let state = AppState::new(config.clone(), db, tokens)?;

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        Ok(Self {
            port,
            base_url,
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Send a request and return status plus JSON body
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let res = req.send().await?;
        let status = res.status();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, path, token, None).await
    }

    /// Register `username` with a derived email and return (user id, token)
    pub async fn register(&self, username: &str) -> Result<(String, String)> {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "secret123",
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, body);

        let id = body["data"]["user"]["id"].as_str().context("missing user id")?.to_string();
        let token = body["data"]["token"].as_str().context("missing token")?.to_string();
        Ok((id, token))
    }

    /// Create a song as `token`'s user and return its id
    pub async fn create_song(&self, token: &str, name: &str) -> Result<String> {
        let (status, body) = self
            .post(
                "/api/songs",
                Some(token),
                json!({
                    "name": name,
                    "artist": "Test Artist",
                    "image": "cover.jpg",
                    "file": "track.mp3",
                    "duration": "3:00",
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create song failed: {} {}", status, body);
        Ok(body["data"]["song"]["id"].as_str().context("missing song id")?.to_string())
    }

    /// Create a playlist and return its id
    pub async fn create_playlist(&self, token: &str, name: &str, is_public: bool) -> Result<String> {
        let (status, body) = self
            .post("/api/playlists", Some(token), json!({ "name": name, "isPublic": is_public }))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create playlist failed: {} {}", status, body);
        Ok(body["data"]["playlist"]["id"].as_str().context("missing playlist id")?.to_string())
    }
}
