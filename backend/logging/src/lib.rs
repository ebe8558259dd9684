//! Structured logging for buzzbot.
//!
//! Handles token redaction, console/NDJSON output, file rotation, and the
//! per-message dispatch event log.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{DispatchEvent, DispatchLogger};
pub use logger::{LogFormat, init_logger};
pub use redact::redact_sensitive_data;
