//! Analysis service - Geocode, forecast, classify
//!
//! Drives an [`AnalysisFlow`] to a terminal state against the injected ports.
//! Calls are strictly sequential and never retried.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use domain::{DailyWeather, Place};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use super::date_window::DateWindow;
use crate::error::ApplicationError;
use crate::flow::{AnalysisEvent, AnalysisFlow, AnalysisRequest, AnalysisState};
use crate::ports::{ForecastPort, GeocodingPort};

/// Default per-call timeout in seconds
const DEFAULT_CALL_TIMEOUT_SECS: u64 = 15;

/// Default forecast window in days
const DEFAULT_MAX_DAYS_AHEAD: u32 = 14;

/// Open-Meteo serves at most this many forecast days
pub const MAX_FORECAST_DAYS: u32 = 16;

/// Configuration for the analysis use case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AnalysisConfig {
    /// Reject dates outside today..=today + `max_days_ahead` before calling
    /// the forecast service (default: true)
    #[serde(default = "default_enforce_date_window")]
    pub enforce_date_window: bool,

    /// Forecast window size in days (default: 14)
    #[serde(default = "default_max_days_ahead")]
    #[validate(range(max = MAX_FORECAST_DAYS, message = "must be at most 16"))]
    pub max_days_ahead: u32,

    /// Timeout for each port call in seconds (default: 15)
    #[serde(default = "default_call_timeout")]
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub call_timeout_secs: u64,
}

const fn default_enforce_date_window() -> bool {
    true
}

const fn default_max_days_ahead() -> u32 {
    DEFAULT_MAX_DAYS_AHEAD
}

const fn default_call_timeout() -> u64 {
    DEFAULT_CALL_TIMEOUT_SECS
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enforce_date_window: default_enforce_date_window(),
            max_days_ahead: default_max_days_ahead(),
            call_timeout_secs: default_call_timeout(),
        }
    }
}

impl AnalysisConfig {
    /// Per-call timeout as a `Duration`
    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Date window, if enforced
    #[must_use]
    pub const fn date_window(&self) -> Option<DateWindow> {
        if self.enforce_date_window {
            Some(DateWindow::new(self.max_days_ahead))
        } else {
            None
        }
    }
}

/// Use case: will the weather spoil an outdoor event?
pub struct AnalysisService {
    geocoder: Arc<dyn GeocodingPort>,
    forecast: Arc<dyn ForecastPort>,
    config: AnalysisConfig,
}

impl std::fmt::Debug for AnalysisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AnalysisService {
    /// Create a new analysis service with default configuration
    #[must_use]
    pub fn new(geocoder: Arc<dyn GeocodingPort>, forecast: Arc<dyn ForecastPort>) -> Self {
        Self {
            geocoder,
            forecast,
            config: AnalysisConfig::default(),
        }
    }

    /// Set the analysis configuration
    #[must_use]
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Submit a request on `flow` and drive it until it is done or failed
    ///
    /// The date window is evaluated against the local calendar date.
    pub async fn analyze(
        &self,
        flow: AnalysisFlow,
        location: &str,
        date: Option<NaiveDate>,
    ) -> AnalysisFlow {
        self.analyze_on(flow, location, date, Local::now().date_naive())
            .await
    }

    /// Same as [`analyze`](Self::analyze) with an explicit "today"
    #[instrument(skip(self, flow))]
    pub async fn analyze_on(
        &self,
        flow: AnalysisFlow,
        location: &str,
        date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> AnalysisFlow {
        let mut flow = flow.apply(AnalysisEvent::Submit {
            location: location.to_string(),
            date,
        });

        loop {
            let event = match flow.state() {
                AnalysisState::Geocoding { request } => {
                    let request_id = request.id;
                    match self.locate(&request.location).await {
                        Ok(place) => AnalysisEvent::GeocodeSucceeded { request_id, place },
                        Err(error) => {
                            warn!(error = %error, "Geocoding failed");
                            AnalysisEvent::GeocodeFailed { request_id, error }
                        },
                    }
                },
                AnalysisState::Forecasting { request, place } => {
                    let request_id = request.id;
                    match self.fetch(request, place, today).await {
                        Ok(weather) => AnalysisEvent::ForecastSucceeded {
                            request_id,
                            weather,
                        },
                        Err(error) => {
                            warn!(error = %error, "Forecast failed");
                            AnalysisEvent::ForecastFailed { request_id, error }
                        },
                    }
                },
                AnalysisState::Done { result } => {
                    info!(
                        place = %result.place,
                        date = %result.date,
                        advisories = result.advisories.len(),
                        safe = result.safe(),
                        "Analysis complete"
                    );
                    return flow;
                },
                AnalysisState::Idle | AnalysisState::Failed { .. } => return flow,
            };
            flow = flow.apply(event);
        }
    }

    async fn locate(&self, query: &str) -> Result<Place, ApplicationError> {
        let place = timeout(self.config.call_timeout(), self.geocoder.find_place(query))
            .await
            .map_err(|_| ApplicationError::Timeout("geocoding service".to_string()))??;

        match place {
            Some(place) => {
                debug!(place = %place, location = %place.location, "Location resolved");
                Ok(place)
            },
            None => Err(ApplicationError::LocationNotFound(query.to_string())),
        }
    }

    async fn fetch(
        &self,
        request: &AnalysisRequest,
        place: &Place,
        today: NaiveDate,
    ) -> Result<DailyWeather, ApplicationError> {
        if let Some(window) = self.config.date_window() {
            window.check(request.date, today)?;
        }

        let weather = timeout(
            self.config.call_timeout(),
            self.forecast.daily_weather(&place.location, request.date),
        )
        .await
        .map_err(|_| ApplicationError::Timeout("forecast service".to_string()))??;

        let weather = weather.ok_or(ApplicationError::ForecastUnavailable(request.date))?;
        debug!(summary = %weather.summary(), "Forecast received");
        Ok(weather)
    }
}
