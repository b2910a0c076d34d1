//! Shared setup for HTTP integration tests
//!
//! Every test gets its own SQLite file so tests can run in parallel.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use geotracker::api::jwt::JwtService;
use geotracker::api::services::AppState;
use geotracker::errors::{GeoTrackerError, Result};
use geotracker::services::{GeoIpProvider, GeoLookup, GeoResult, register_user};
use geotracker::storage::{SeaOrmStorage, User};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "password123";

/// 上游的行为
#[derive(Clone)]
pub enum MockBehavior {
    Success,
    Fail,
    Unreachable,
}

/// Fake upstream that answers without touching the network
pub struct MockGeo {
    pub behavior: Mutex<MockBehavior>,
    pub calls: AtomicUsize,
    pub last_ip: Mutex<Option<Option<String>>>,
}

impl MockGeo {
    pub fn new(behavior: MockBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior: Mutex::new(behavior),
            calls: AtomicUsize::new(0),
            last_ip: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_ip(&self) -> Option<Option<String>> {
        self.last_ip.lock().expect("lock").clone()
    }
}

pub fn sample_result(ip: &str) -> GeoResult {
    GeoResult {
        status: "success".to_string(),
        country: Some("United States".to_string()),
        country_code: Some("US".to_string()),
        region_name: Some("Virginia".to_string()),
        city: Some("Ashburn".to_string()),
        latitude: Some(39.03),
        longitude: Some(-77.5),
        timezone: Some("America/New_York".to_string()),
        isp: Some("Google LLC".to_string()),
        queried_ip: Some(ip.to_string()),
        ..Default::default()
    }
}

#[async_trait]
impl GeoLookup for MockGeo {
    async fn lookup(&self, ip: Option<&str>) -> Result<GeoResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_ip.lock().expect("lock") = Some(ip.map(String::from));

        let behavior = self.behavior.lock().expect("lock").clone();
        match behavior {
            MockBehavior::Success => Ok(sample_result(ip.unwrap_or("203.0.113.7"))),
            MockBehavior::Fail => Err(GeoTrackerError::invalid_address()),
            MockBehavior::Unreachable => Err(GeoTrackerError::upstream("connection refused")),
        }
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}

pub struct TestEnv {
    pub state: AppState,
    pub geo: Arc<MockGeo>,
    _dir: TempDir,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self::with_behavior(MockBehavior::Success).await
    }

    pub async fn with_behavior(behavior: MockBehavior) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("geotracker_test.db");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

        let storage = Arc::new(
            SeaOrmStorage::new(&db_url, "sqlite", 5)
                .await
                .expect("Failed to create storage"),
        );
        let jwt = Arc::new(JwtService::new(TEST_SECRET, 24));
        let geo = MockGeo::new(behavior);
        let provider = GeoIpProvider::with_lookup(geo.clone());

        Self {
            state: AppState::new(storage, jwt, provider),
            geo,
            _dir: dir,
        }
    }

    pub async fn create_user(&self, email: &str) -> User {
        register_user(&self.state.storage, email, TEST_PASSWORD)
            .await
            .expect("Failed to create user")
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state
            .jwt
            .generate_token(user.id, &user.email)
            .expect("Failed to sign token")
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
