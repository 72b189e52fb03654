use std::sync::Arc;
use std::time::Duration;

use account_service::domain::account::service::AccountService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryAccountRepository;
use auth::AuthConfig;
use auth::InMemorySessionStore;
use serde_json::json;

pub const SIGN_KEY: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const HASH_SECRET: &str = "test-hash-secret";

/// Test application that spawns a real server backed by in-memory stores
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub sessions: Arc<InMemorySessionStore>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_ttl(Duration::from_secs(3600)).await
    }

    pub async fn spawn_with_ttl(token_ttl: Duration) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let sessions = Arc::new(InMemorySessionStore::new());
        let account_service = AccountService::new(
            AuthConfig::new(SIGN_KEY, HASH_SECRET, token_ttl),
            Arc::new(InMemoryAccountRepository::new()),
            Arc::clone(&sessions),
        )
        .expect("Failed to create account service");

        let router = create_router(Arc::new(account_service));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            sessions,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make PUT request
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(&format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register an account with a derived email address
    pub async fn sign_up(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/auth/sign-up")
            .json(&json!({
                "username": username,
                "first_name": "Vasek",
                "last_name": "Novak",
                "email": format!("{}@example.com", username),
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/auth/sign-in")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Sign in and return the issued token, panicking on failure
    pub async fn token_for(&self, username: &str, password: &str) -> String {
        let response = self.sign_in(username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("token in response")
            .to_string()
    }

    pub async fn me(&self, token: &str) -> reqwest::Response {
        self.get_authenticated("/user/me", token)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
