//! Application services - Use case implementations

mod analysis_service;
mod date_window;
mod health_service;

pub use analysis_service::{AnalysisConfig, AnalysisService, MAX_FORECAST_DAYS};
pub use date_window::DateWindow;
pub use health_service::{HealthReport, HealthService, ServiceHealth};
