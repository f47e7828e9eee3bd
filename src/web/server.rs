//! HTTP server for the cache read layer
//!
//! # Routes
//!
//! - `GET /health` - Liveness probe
//! - `GET /api/kpi/{job}` - Trend-catalog payload under `<job>`
//! - `GET /api/dashboard/{job}` - Latest-catalog payload under `kpidashboard-<job>`
//! - `GET /api/server/{addr}` - Per-host health under `server_health-<addr>`
//! - `GET /api/maps/mesh` - Recent mesh GPS positions
//! - `GET /api/maps/fixed` - Fixed PMP locations
//! - `GET /api/maps/snr` - SNR heat-map samples
//! - `GET /api/topology/status` - Device topology with latency status
//! - `GET /api/topology/predicted` - Devices with RX-level predictions
//! - `GET /api/status/database` - Telemetry table freshness flags
//!
//! Payloads are returned byte-for-byte as published; the refresh engine is
//! the only writer.

use crate::cache::CacheStore;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared server state
struct AppState {
    cache: Arc<dyn CacheStore>,
}

/// HTTP server over the cache
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self {
            state: Arc::new(AppState { cache }),
        }
    }

    /// Build the router
    fn router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/api/kpi/{job}", get(read_kpi))
            .route("/api/dashboard/{job}", get(read_dashboard))
            .route("/api/server/{addr}", get(read_server_health))
            .route("/api/maps/mesh", get(read_mesh_map))
            .route("/api/maps/fixed", get(read_fixed_map))
            .route("/api/maps/snr", get(read_snr_map))
            .route("/api/topology/status", get(read_topology))
            .route("/api/topology/predicted", get(read_predicted))
            .route("/api/status/database", get(read_database_status))
            .with_state(state)
    }

    /// Run the server on the given address
    pub async fn run(self, addr: &str) -> crate::Result<()> {
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(addr = addr, "Read API listening");

        axum::serve(listener, Self::router(self.state))
            .await
            .map_err(crate::MeshboardError::Io)
    }
}

/// Error response body
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Serve one cache key verbatim; absent means "not yet warmed", not an error
async fn read_key(state: &AppState, key: &str) -> Response {
    match state.cache.get(key).await {
        Ok(payload) => {
            let body = payload.unwrap_or_else(|| "null".to_string());
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(key = key, error = %e, "Cache read failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn read_kpi(State(state): State<Arc<AppState>>, Path(job): Path<String>) -> Response {
    read_key(&state, &job).await
}

async fn read_dashboard(State(state): State<Arc<AppState>>, Path(job): Path<String>) -> Response {
    read_key(&state, &format!("kpidashboard-{}", job)).await
}

async fn read_server_health(
    State(state): State<Arc<AppState>>,
    Path(addr): Path<String>,
) -> Response {
    read_key(&state, &format!("server_health-{}", addr)).await
}

async fn read_mesh_map(State(state): State<Arc<AppState>>) -> Response {
    read_key(&state, "mesh_gps_recent").await
}

async fn read_fixed_map(State(state): State<Arc<AppState>>) -> Response {
    read_key(&state, "pmp_locations").await
}

async fn read_snr_map(State(state): State<Arc<AppState>>) -> Response {
    read_key(&state, "snr_map").await
}

async fn read_topology(State(state): State<Arc<AppState>>) -> Response {
    read_key(&state, "topology_status").await
}

async fn read_predicted(State(state): State<Arc<AppState>>) -> Response {
    read_key(&state, "predicted_rx").await
}

async fn read_database_status(State(state): State<Arc<AppState>>) -> Response {
    read_key(&state, "database_status").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn test_app(cache: Arc<MemoryCache>) -> Router {
        ApiServer::router(Arc::new(AppState { cache }))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = test_app(Arc::new(MemoryCache::new()));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_kpi_payload_served_verbatim() {
        let cache = Arc::new(MemoryCache::new());
        cache
            .set("latency", r#"[{"ip":"10.20.0.1","latency_ms":42}]"#)
            .await
            .unwrap();
        let app = test_app(cache);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/kpi/latency")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"[{"ip":"10.20.0.1","latency_ms":42}]"#
        );
    }

    #[tokio::test]
    async fn test_absent_key_served_as_null() {
        let app = test_app(Arc::new(MemoryCache::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/kpi/latency")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "null");
    }

    #[tokio::test]
    async fn test_dashboard_route_uses_prefixed_key() {
        let cache = Arc::new(MemoryCache::new());
        cache.set("kpidashboard-operability", "[]").await.unwrap();
        let app = test_app(cache);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/dashboard/operability")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_string(response).await, "[]");
    }

    #[tokio::test]
    async fn test_server_route_uses_suffixed_key() {
        let cache = Arc::new(MemoryCache::new());
        cache
            .set("server_health-192.168.2.60", r#"[{"ip":"192.168.2.60"}]"#)
            .await
            .unwrap();
        let app = test_app(cache);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/server/192.168.2.60")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_string(response).await, r#"[{"ip":"192.168.2.60"}]"#);
    }
}
