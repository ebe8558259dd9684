//! HTTP server for health and metrics.

use anyhow::{Context, Result};
use axum::{Router, extract::State, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::health_api::{self, HealthState};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub health: HealthState,
    pub metrics: PrometheusHandle,
}

async fn render_metrics(State(state): State<GatewayState>) -> String {
    state.metrics.render()
}

pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health_api::liveness))
        .route("/api/health", get(health_api::get_health))
        .route("/metrics", get(render_metrics))
        .with_state(state)
}

/// Serve until `cancel` fires, then finish in-flight requests and return.
#[instrument(skip(state, cancel))]
pub async fn start_server(
    addr: SocketAddr,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<()> {
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {addr}"))?;
    info!("Health server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    info!("Health server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health_api::HealthReport;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn state(connected: Arc<AtomicBool>) -> GatewayState {
        GatewayState {
            health: HealthState::new(connected),
            metrics: PrometheusBuilder::new().build_recorder().handle(),
        }
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn liveness_returns_ok() {
        let (status, body) = get_body(router(state(Arc::default())), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn health_report_tracks_connection_flag() {
        let connected = Arc::new(AtomicBool::new(false));
        let app = router(state(connected.clone()));

        let (status, body) = get_body(app.clone(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        let report: HealthReport = serde_json::from_str(&body).unwrap();
        assert_eq!(report.status, "degraded");
        assert!(!report.discord_connected);

        connected.store(true, Ordering::SeqCst);
        let (_, body) = get_body(app, "/api/health").await;
        let report: HealthReport = serde_json::from_str(&body).unwrap();
        assert_eq!(report.status, "ok");
        assert!(report.discord_connected);
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_text() {
        let (status, _body) = get_body(router(state(Arc::default())), "/metrics").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (status, _) = get_body(router(state(Arc::default())), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn server_stops_on_cancel() {
        let cancel = CancellationToken::new();
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let task = tokio::spawn(start_server(addr, state(Arc::default()), cancel.clone()));
        cancel.cancel();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
