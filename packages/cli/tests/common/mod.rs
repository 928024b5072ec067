// ABOUTME: Common test utilities for HTTP integration tests
// ABOUTME: Builds the router over an in-memory database and issues requests

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use quillpad_cli::{api::create_router, DbState};
use quillpad_storage::test_utils::memory_pool;
use quillpad_storage::DatabaseConfig;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

/// Router plus the pool and a valid token for authenticated calls
pub struct TestApp {
    pub router: Router,
    #[allow(dead_code)]
    pub pool: SqlitePool,
    pub token: String,
    _temp_dir: Option<TempDir>,
}

/// App over a single-connection in-memory database
pub async fn setup_app() -> TestApp {
    build_app(memory_pool().await, None).await
}

/// App over a file database with several pooled connections, for concurrent requests
#[allow(dead_code)]
pub async fn setup_file_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        path: temp_dir.path().join("quillpad.db"),
        max_connections: 4,
        ..DatabaseConfig::default()
    };

    let pool = quillpad_storage::connect(&config).await.unwrap();
    quillpad_storage::run_migrations(&pool).await.unwrap();

    build_app(pool, Some(temp_dir)).await
}

async fn build_app(pool: SqlitePool, temp_dir: Option<TempDir>) -> TestApp {
    let db = DbState::new(pool.clone());

    let token = db
        .token_storage
        .create_token("integration-tests")
        .await
        .expect("Failed to create API token")
        .token;

    TestApp {
        router: create_router(db),
        pool,
        token,
        _temp_dir: temp_dir,
    }
}

impl TestApp {
    /// Send a request and return the status with the parsed JSON body (`Null` when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    #[allow(dead_code)]
    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(&self.token), Some(body))
            .await
    }

    #[allow(dead_code)]
    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(&self.token), Some(body))
            .await
    }

    #[allow(dead_code)]
    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(&self.token), None)
            .await
    }

    /// Create a tag through the API and return its body
    #[allow(dead_code)]
    pub async fn create_tag(&self, name: &str) -> Value {
        let (status, body) = self
            .post("/tags/", serde_json::json!({"tag": {"name": name}}))
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", body);
        body["tag"].clone()
    }
}
