//! buzzbot HTTP surface: liveness, health report and Prometheus metrics.

pub mod health_api;
pub mod prometheus;
pub mod server;

pub use health_api::{HealthReport, HealthState};
pub use prometheus::{PrometheusMetrics, install_recorder};
pub use server::{GatewayState, router, start_server};
