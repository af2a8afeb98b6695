//! Health aggregation service
//!
//! Checks the geocoding and forecast services with a timeout and reports
//! each one's status individually.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::ports::{ForecastPort, GeocodingPort};

/// Default timeout for health checks in seconds
const DEFAULT_HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// Status of an individual service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Whether the service is healthy
    pub healthy: bool,
    /// Response time in milliseconds (if check was performed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    /// Create a healthy status
    #[must_use]
    pub const fn healthy() -> Self {
        Self {
            healthy: true,
            response_time_ms: None,
            error: None,
        }
    }

    /// Create an unhealthy status
    #[must_use]
    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            response_time_ms: None,
            error: Some(error.into()),
        }
    }

    /// Create an unhealthy status due to timeout
    #[must_use]
    pub fn timeout() -> Self {
        Self::unhealthy("Health check timed out")
    }

    /// Add response time to the status
    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }
}

/// Health report for all external services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// True if every service is healthy
    pub healthy: bool,
    /// Individual service statuses, keyed by service name
    pub services: BTreeMap<String, ServiceHealth>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    /// Create a new health report
    #[must_use]
    pub fn new(services: BTreeMap<String, ServiceHealth>) -> Self {
        let healthy = services.values().all(|s| s.healthy);

        Self {
            healthy,
            services,
            checked_at: chrono::Utc::now(),
        }
    }

    /// Get status of a specific service
    #[must_use]
    pub fn service_status(&self, name: &str) -> Option<&ServiceHealth> {
        self.services.get(name)
    }
}

/// Service for checking both Open-Meteo endpoints
pub struct HealthService {
    geocoder: Arc<dyn GeocodingPort>,
    forecast: Arc<dyn ForecastPort>,
    timeout: Duration,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HealthService {
    /// Create a new health service with the default timeout
    #[must_use]
    pub fn new(geocoder: Arc<dyn GeocodingPort>, forecast: Arc<dyn ForecastPort>) -> Self {
        Self {
            geocoder,
            forecast,
            timeout: Duration::from_secs(DEFAULT_HEALTH_CHECK_TIMEOUT_SECS),
        }
    }

    /// Set the per-service timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check health of all services
    #[instrument(skip(self))]
    pub async fn check_all(&self) -> HealthReport {
        let mut services = BTreeMap::new();
        services.insert("geocoding".to_string(), self.check_geocoding().await);
        services.insert("forecast".to_string(), self.check_forecast().await);
        HealthReport::new(services)
    }

    /// Check the geocoding service
    #[instrument(skip(self))]
    pub async fn check_geocoding(&self) -> ServiceHealth {
        check_service("geocoding", self.timeout, self.geocoder.is_available()).await
    }

    /// Check the forecast service
    #[instrument(skip(self))]
    pub async fn check_forecast(&self) -> ServiceHealth {
        check_service("forecast", self.timeout, self.forecast.is_available()).await
    }
}

async fn check_service(
    service: &str,
    limit: Duration,
    check: impl std::future::Future<Output = bool>,
) -> ServiceHealth {
    let start = Instant::now();

    let Ok(available) = timeout(limit, check).await else {
        warn!(service, "Health check timed out");
        return ServiceHealth::timeout();
    };

    // Bounded by the timeout, so milliseconds fit in u64
    #[allow(clippy::cast_possible_truncation)]
    let response_time = start.elapsed().as_millis() as u64;

    if available {
        debug!(service, response_time_ms = response_time, "Service healthy");
        ServiceHealth::healthy().with_response_time(response_time)
    } else {
        warn!(service, response_time_ms = response_time, "Service unhealthy");
        ServiceHealth::unhealthy(format!("{service} service unavailable"))
            .with_response_time(response_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockForecastPort, MockGeocodingPort};

    fn service(geocoding_up: bool, forecast_up: bool) -> HealthService {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_is_available()
            .returning(move || geocoding_up);
        let mut forecast = MockForecastPort::new();
        forecast
            .expect_is_available()
            .returning(move || forecast_up);
        HealthService::new(Arc::new(geocoder), Arc::new(forecast))
    }

    #[tokio::test]
    async fn all_healthy() {
        let report = service(true, true).check_all().await;
        assert!(report.healthy);
        assert_eq!(report.services.len(), 2);
        assert!(report.service_status("geocoding").is_some_and(|s| s.healthy));
        assert!(report.service_status("forecast").is_some_and(|s| s.healthy));
    }

    #[tokio::test]
    async fn one_unhealthy_service_fails_report() {
        let report = service(true, false).check_all().await;
        assert!(!report.healthy);
        let forecast = report.service_status("forecast").unwrap();
        assert_eq!(
            forecast.error.as_deref(),
            Some("forecast service unavailable")
        );
        assert!(forecast.response_time_ms.is_some());
    }

    #[test]
    fn service_health_constructors() {
        assert!(ServiceHealth::healthy().healthy);
        let timed_out = ServiceHealth::timeout();
        assert!(!timed_out.healthy);
        assert_eq!(timed_out.error.as_deref(), Some("Health check timed out"));
    }

    #[test]
    fn report_serializes_without_empty_fields() {
        let mut services = BTreeMap::new();
        services.insert("geocoding".to_string(), ServiceHealth::healthy());
        let json = serde_json::to_string(&HealthReport::new(services)).unwrap();
        assert!(json.contains("\"healthy\":true"));
        assert!(!json.contains("error"));
    }
}
