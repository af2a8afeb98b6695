//! Analysis state machine
//!
//! One analysis moves through `Idle -> Geocoding -> Forecasting -> Done`, or
//! lands in `Failed` at any step. The flow is an immutable value: `apply`
//! consumes it and returns the next one. Every submission gets a fresh request
//! id, and events tagged with any other id are dropped, so a new submission
//! supersedes whatever was in flight.

use chrono::NaiveDate;
use domain::{AnalysisResult, DailyWeather, Place, classify};
use tracing::debug;

use crate::error::{ApplicationError, FailureKind};

/// A validated user request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Monotonic id of this submission
    pub id: u64,
    /// Trimmed location query
    pub location: String,
    /// Requested date
    pub date: NaiveDate,
}

/// Where an analysis currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    /// Nothing submitted yet
    Idle,
    /// Waiting for the geocoder
    Geocoding {
        /// Request being served
        request: AnalysisRequest,
    },
    /// Waiting for the forecast
    Forecasting {
        /// Request being served
        request: AnalysisRequest,
        /// Place resolved by the geocoder
        place: Place,
    },
    /// Analysis finished
    Done {
        /// Classified result
        result: AnalysisResult,
    },
    /// Analysis failed
    Failed {
        /// Failure category
        kind: FailureKind,
        /// Fixed user-facing text
        message: String,
    },
}

/// Inputs that move the state machine
#[derive(Debug)]
pub enum AnalysisEvent {
    /// User submitted a location and date
    Submit {
        /// Raw location text
        location: String,
        /// Selected date, if any
        date: Option<NaiveDate>,
    },
    /// Geocoder found a place
    GeocodeSucceeded {
        /// Request the answer belongs to
        request_id: u64,
        /// Resolved place
        place: Place,
    },
    /// Geocoder call failed or found nothing
    GeocodeFailed {
        /// Request the answer belongs to
        request_id: u64,
        /// Cause
        error: ApplicationError,
    },
    /// Forecast returned data for the date
    ForecastSucceeded {
        /// Request the answer belongs to
        request_id: u64,
        /// Daily aggregate
        weather: DailyWeather,
    },
    /// Forecast call failed or had no data
    ForecastFailed {
        /// Request the answer belongs to
        request_id: u64,
        /// Cause
        error: ApplicationError,
    },
}

/// Immutable analysis flow
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisFlow {
    state: AnalysisState,
    last_result: Option<AnalysisResult>,
    last_request_id: u64,
}

impl Default for AnalysisFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisFlow {
    /// Create an idle flow
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AnalysisState::Idle,
            last_result: None,
            last_request_id: 0,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// Most recent successful result, kept across later failures
    #[must_use]
    pub const fn last_result(&self) -> Option<&AnalysisResult> {
        self.last_result.as_ref()
    }

    /// True while a network step is outstanding
    #[must_use]
    pub const fn pending(&self) -> bool {
        matches!(
            self.state,
            AnalysisState::Geocoding { .. } | AnalysisState::Forecasting { .. }
        )
    }

    /// Request being served, if any
    #[must_use]
    pub const fn current_request(&self) -> Option<&AnalysisRequest> {
        match &self.state {
            AnalysisState::Geocoding { request } | AnalysisState::Forecasting { request, .. } => {
                Some(request)
            },
            _ => None,
        }
    }

    /// Apply an event and return the next flow
    #[must_use]
    pub fn apply(self, event: AnalysisEvent) -> Self {
        match event {
            AnalysisEvent::Submit { location, date } => self.submit(&location, date),
            AnalysisEvent::GeocodeSucceeded { request_id, place } => {
                match self.state {
                    AnalysisState::Geocoding { request } if request.id == request_id => Self {
                        state: AnalysisState::Forecasting { request, place },
                        ..self
                    },
                    state => Self { state, ..self }.ignore("geocode success", request_id),
                }
            },
            AnalysisEvent::GeocodeFailed { request_id, error } => {
                if self.is_current(request_id, false) {
                    self.fail(&error)
                } else {
                    self.ignore("geocode failure", request_id)
                }
            },
            AnalysisEvent::ForecastSucceeded {
                request_id,
                weather,
            } => match self.state {
                AnalysisState::Forecasting { request, place } if request.id == request_id => {
                    let classification = classify(&weather);
                    let result = AnalysisResult::new(place, request.date, weather, classification);
                    Self {
                        last_result: Some(result.clone()),
                        state: AnalysisState::Done { result },
                        ..self
                    }
                },
                state => Self { state, ..self }.ignore("forecast success", request_id),
            },
            AnalysisEvent::ForecastFailed { request_id, error } => {
                if self.is_current(request_id, true) {
                    self.fail(&error)
                } else {
                    self.ignore("forecast failure", request_id)
                }
            },
        }
    }

    fn submit(self, location: &str, date: Option<NaiveDate>) -> Self {
        let id = self.last_request_id + 1;
        let location = location.trim();

        let state = match (location.is_empty(), date) {
            (false, Some(date)) => AnalysisState::Geocoding {
                request: AnalysisRequest {
                    id,
                    location: location.to_string(),
                    date,
                },
            },
            (true, _) => rejected(&ApplicationError::MissingInput("location".to_string())),
            (false, None) => rejected(&ApplicationError::MissingInput("date".to_string())),
        };

        Self {
            state,
            last_request_id: id,
            ..self
        }
    }

    fn is_current(&self, request_id: u64, forecasting: bool) -> bool {
        match &self.state {
            AnalysisState::Geocoding { request } => !forecasting && request.id == request_id,
            AnalysisState::Forecasting { request, .. } => forecasting && request.id == request_id,
            _ => false,
        }
    }

    fn fail(self, error: &ApplicationError) -> Self {
        Self {
            state: failed(error.failure_kind()),
            ..self
        }
    }

    fn ignore(self, what: &str, request_id: u64) -> Self {
        debug!(
            event = what,
            request_id,
            current = ?self.current_request().map(|r| r.id),
            "Ignoring event that does not match the current state"
        );
        self
    }
}

fn rejected(error: &ApplicationError) -> AnalysisState {
    debug!(error = %error, "Submission rejected");
    failed(error.failure_kind())
}

fn failed(kind: FailureKind) -> AnalysisState {
    AnalysisState::Failed {
        kind,
        message: kind.user_message().to_string(),
    }
}
