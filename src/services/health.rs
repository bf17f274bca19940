use axum::{extract::State, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::storage::models::Reminder;
use crate::storage::DataStore;

pub const BANNER: &str = "MemoryPing - the reminder companion 🧠✨";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub active_reminders: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub store: DataStore,
    pub start_time: DateTime<Utc>,
}

/// Keep-alive HTTP endpoints for the hosting platform.
pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(store: DataStore) -> Self {
        let state = AppState {
            store,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/", get(banner))
            .route("/health", get(health_check))
            .route("/health/live", get(liveness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn banner() -> &'static str {
    BANNER
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let now = Utc::now();
    let uptime = now.signed_duration_since(state.start_time).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime_seconds: uptime,
        active_reminders: Reminder::count_active(&state.store),
    })
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use tempfile::TempDir;

    fn create_test_health_service() -> (HealthService, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = DataStore::open(temp_dir.path()).expect("Failed to open test store");
        (HealthService::new(store), temp_dir)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (health_service, _temp_dir) = create_test_health_service();
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let health_response: HealthResponse = response.json();
        assert_eq!(health_response.status, "healthy");
        assert_eq!(health_response.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(health_response.active_reminders, 0);
    }

    #[tokio::test]
    async fn test_liveness_endpoint() {
        let (health_service, _temp_dir) = create_test_health_service();
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health/live").await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let alive_response: String = response.json();
        assert_eq!(alive_response, "alive");
    }

    #[tokio::test]
    async fn test_banner_endpoint() {
        let (health_service, _temp_dir) = create_test_health_service();
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), BANNER);
    }
}
