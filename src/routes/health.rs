/**
 * Health Routes
 * Endpoints for checking backend and content store health
 */
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::AppState;
use crate::content::ContentStore;

// Track server start time for uptime calculation
lazy_static::lazy_static! {
    static ref SERVER_START: Instant = Instant::now();
}

/// Initialize the server start time
pub fn init_start_time() {
    lazy_static::initialize(&SERVER_START);
}

/// Single service check result
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCheck {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceCheck {
    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Health checks for both content endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub published: ServiceCheck,
    pub preview: ServiceCheck,
}

/// Detailed health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    pub checks: HealthChecks,
}

/// Ready check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Simple health response
#[derive(Debug, Serialize, Deserialize)]
pub struct SimpleHealthResponse {
    pub status: String,
}

async fn check_store(store: &dyn ContentStore) -> ServiceCheck {
    let start = Instant::now();
    match store.ping().await {
        Ok(()) => ServiceCheck {
            status: "healthy".to_string(),
            response_time: Some(start.elapsed().as_millis() as u64),
            error: None,
        },
        Err(e) => ServiceCheck {
            status: "unhealthy".to_string(),
            response_time: None,
            error: Some(e.to_string()),
        },
    }
}

/// GET /health - Simple health ping
pub async fn health_ping() -> impl IntoResponse {
    Json(SimpleHealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /health/detailed - Both content endpoints
pub async fn health_detailed(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = SERVER_START.elapsed().as_secs();

    let published = check_store(state.content.store(false)).await;
    let preview = check_store(state.content.store(true)).await;

    // The backend itself is up even when the CMS is not
    let response = DetailedHealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        uptime: Some(uptime),
        checks: HealthChecks { published, preview },
    };

    (StatusCode::OK, Json(response))
}

/// GET /health/content - Published content endpoint
pub async fn health_content(State(state): State<AppState>) -> impl IntoResponse {
    let check = check_store(state.content.store(false)).await;
    (StatusCode::OK, Json(check))
}

/// GET /health/ready - Ready once published content can be served
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = SERVER_START.elapsed().as_secs();
    let check = check_store(state.content.store(false)).await;
    let is_ready = check.is_healthy();

    let response = ReadyResponse {
        status: if is_ready {
            "ready".to_string()
        } else {
            "not ready".to_string()
        },
        timestamp: Utc::now(),
        uptime: Some(uptime),
        reason: if is_ready { None } else { check.error },
    };

    let status = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::memory::MemoryStore;
    use crate::routes::test_support::{get_json, published_store, state_with};
    use axum::routing::get;
    use axum::Router;

    fn test_router(published: MemoryStore, preview: MemoryStore) -> Router {
        Router::new()
            .route("/health", get(health_ping))
            .route("/health/detailed", get(health_detailed))
            .route("/health/content", get(health_content))
            .route("/health/ready", get(health_ready))
            .with_state(state_with(published, preview))
    }

    fn healthy() -> Router {
        test_router(published_store(), MemoryStore::new("preview"))
    }

    fn cms_down() -> Router {
        test_router(MemoryStore::unavailable("published"), MemoryStore::unavailable("preview"))
    }

    #[test]
    fn test_service_check_has_required_fields() {
        let check = ServiceCheck {
            status: "healthy".to_string(),
            response_time: Some(10),
            error: None,
        };
        let json = serde_json::to_string(&check).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("responseTime"));
    }

    #[tokio::test]
    async fn test_health_ping_returns_ok() {
        init_start_time();
        let (status, body) = get_json::<SimpleHealthResponse>(cms_down(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn test_health_content_reports_store_state() {
        let (status, body) = get_json::<ServiceCheck>(healthy(), "/health/content").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "healthy");

        let (status, body) = get_json::<ServiceCheck>(cms_down(), "/health/content").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "unhealthy");
        assert!(body.error.is_some());
    }

    #[tokio::test]
    async fn test_health_detailed_ok_even_when_cms_down() {
        init_start_time();
        let (status, body) = get_json::<DetailedHealthResponse>(cms_down(), "/health/detailed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert!(body.uptime.is_some());
        assert_eq!(body.checks.published.status, "unhealthy");
        assert_eq!(body.checks.preview.status, "unhealthy");
    }

    #[tokio::test]
    async fn test_health_ready_follows_published_store() {
        let (status, body) = get_json::<ReadyResponse>(healthy(), "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ready");

        let (status, body) = get_json::<ReadyResponse>(cms_down(), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "not ready");
        assert!(body.reason.is_some());
    }
}
