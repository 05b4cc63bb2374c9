//! Common test utilities for in-process API testing.
//!
//! This module provides a test fixture that builds the full router over an
//! in-memory opening collection, so API behaviour can be exercised without
//! data files or a listening socket.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use explorer_core::{
    Config, DataConfig, Opening, OpeningDataService, PopularityConfig, SearchConfig,
    ServerConfig,
};

/// Re-export fixtures for test convenience
pub use explorer_core::testing::fixtures;

/// Test fixture driving the real router in-process.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new();
///     let response = fixture.get("/api/v1/search?q=sicilian").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Data shared with the router's state
    pub data: Arc<OpeningDataService>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Fixture over the sample collection with default configuration.
    pub fn new() -> Self {
        Self::with_openings(fixtures::sample_collection())
    }

    pub fn with_openings(openings: Vec<Opening>) -> Self {
        Self::with_config(openings, TestConfig::default())
    }

    pub fn with_config(openings: Vec<Opening>, test_config: TestConfig) -> Self {
        let data = Arc::new(
            OpeningDataService::from_openings(openings).expect("Failed to build collection"),
        );

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            data: DataConfig::new("unused"),
            search: test_config.search,
            popularity: test_config.popularity,
        };

        let state = Arc::new(explorer_server::state::AppState::new(
            config,
            Arc::clone(&data),
        ));
        let router = explorer_server::api::create_router(state);

        Self { router, data }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    pub search: SearchConfig,
    pub popularity: PopularityConfig,
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
