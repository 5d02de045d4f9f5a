//! Health Check Server - Liveness, Readiness and Metrics
//!
//! Exposes /live, /ready and /metrics via axum 0.7 while the client
//! runs in `watch` mode. Readiness follows the outcome of the most
//! recent snapshot refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::sync::broadcast;
use tracing::{info, instrument};

use super::prometheus::MetricsRegistry;

/// Shared health state polled by readiness probes.
#[derive(Debug)]
pub struct HealthState {
    /// Whether the last snapshot refresh succeeded.
    refresh_ok: AtomicBool,
}

impl HealthState {
    /// Not ready until the first refresh succeeds.
    pub fn new() -> Self {
        Self {
            refresh_ok: AtomicBool::new(false),
        }
    }

    pub fn set_refresh_ok(&self, ok: bool) {
        self.refresh_ok.store(ok, Ordering::Relaxed);
    }

    /// Check if the client currently reflects on-chain state.
    pub fn is_ready(&self) -> bool {
        self.refresh_ok.load(Ordering::Relaxed)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
struct AppState {
    health: Arc<HealthState>,
    metrics: Arc<MetricsRegistry>,
}

/// Axum-based health and metrics HTTP server.
pub struct HealthServer {
    health: Arc<HealthState>,
    metrics: Arc<MetricsRegistry>,
    /// Bind address (from config).
    bind_address: String,
}

impl HealthServer {
    /// Create a new health server.
    pub fn new(health: Arc<HealthState>, metrics: Arc<MetricsRegistry>, bind_address: String) -> Self {
        Self {
            health,
            metrics,
            bind_address,
        }
    }

    /// Serve until the shutdown signal fires.
    #[instrument(skip(self, shutdown_rx), fields(address = %self.bind_address))]
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let app = Router::new()
            .route("/live", get(Self::liveness))
            .route("/ready", get(Self::readiness))
            .route("/metrics", get(Self::metrics))
            .with_state(AppState {
                health: self.health,
                metrics: self.metrics,
            });

        let listener = tokio::net::TcpListener::bind(&self.bind_address).await?;

        info!("Health server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }

    /// Liveness probe: always returns 200 if the process is running.
    async fn liveness() -> impl IntoResponse {
        (StatusCode::OK, "OK")
    }

    /// Readiness probe: 200 only after a successful refresh.
    async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
        if state.health.is_ready() {
            (StatusCode::OK, "READY")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
        }
    }

    async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
        state.metrics.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_follows_refresh() {
        let state = HealthState::new();
        assert!(!state.is_ready());
        state.set_refresh_ok(true);
        assert!(state.is_ready());
        state.set_refresh_ok(false);
        assert!(!state.is_ready());
    }
}
