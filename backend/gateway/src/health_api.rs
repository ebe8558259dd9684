//! Health API
//!
//! `GET /health` is a plain liveness probe; `GET /api/health` reports uptime
//! and whether the Discord session is connected.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

/// Process start time plus the connection flag shared with the platform adapter.
#[derive(Clone)]
pub struct HealthState {
    started: Instant,
    connected: Arc<AtomicBool>,
}

impl HealthState {
    pub fn new(connected: Arc<AtomicBool>) -> Self {
        Self {
            started: Instant::now(),
            connected,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// "ok" while connected, "degraded" otherwise.
    pub status: String,
    pub uptime_seconds: u64,
    pub discord_connected: bool,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    pub fn from_state(state: &HealthState) -> Self {
        let connected = state.is_connected();
        Self {
            status: if connected { "ok" } else { "degraded" }.into(),
            uptime_seconds: state.uptime_seconds(),
            discord_connected: connected,
            timestamp: Utc::now(),
        }
    }
}

/// Handler for `GET /health`
pub async fn liveness() -> &'static str {
    "OK"
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport::from_state(&state.health))
}
