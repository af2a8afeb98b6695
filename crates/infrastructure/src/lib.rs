//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer, and owns process-wide
//! concerns: configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, ConfigError};
pub use telemetry::{
    DEFAULT_LOG_FILTER, LogFormat, TelemetryConfig, TelemetryError, init_telemetry,
};
