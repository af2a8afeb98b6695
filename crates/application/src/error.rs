//! Application-level errors

use chrono::NaiveDate;
use domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Location or date was not supplied
    #[error("Missing required input: {0}")]
    MissingInput(String),

    /// The geocoder returned no match
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// The forecast provider has no data for the date
    #[error("No forecast data for {0}")]
    ForecastUnavailable(NaiveDate),

    /// The date lies outside the forecast window
    #[error("Date {date} is outside the forecast window (today to {max_days_ahead} days ahead)")]
    DateOutOfRange {
        /// Requested date
        date: NaiveDate,
        /// Window size in days
        max_days_ahead: u32,
    },

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// A port call did not finish in time
    #[error("Timed out waiting for {0}")]
    Timeout(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Classify the error into one of the user-facing failure kinds
    #[must_use]
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::MissingInput(_) | Self::Domain(DomainError::InvalidDateTime(_)) => {
                FailureKind::MissingInput
            },
            Self::LocationNotFound(_) => FailureKind::LocationNotFound,
            Self::ForecastUnavailable(_) | Self::DateOutOfRange { .. } => {
                FailureKind::ForecastUnavailable
            },
            Self::Domain(DomainError::InvalidCoordinates(_))
            | Self::ExternalService(_)
            | Self::Timeout(_)
            | Self::RateLimited
            | Self::Configuration(_)
            | Self::Internal(_) => FailureKind::FetchFailed,
        }
    }

    /// Fixed message shown to the user for this error
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        self.failure_kind().user_message()
    }
}

/// User-facing failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Location or date missing; no network call was made
    MissingInput,
    /// Geocoder found nothing
    LocationNotFound,
    /// No forecast for the date
    ForecastUnavailable,
    /// Transport or parse failure in either call
    FetchFailed,
}

impl FailureKind {
    /// Fixed message shown to the user
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::MissingInput => "Please enter both location and date",
            Self::LocationNotFound => "Location not found. Try a different city name.",
            Self::ForecastUnavailable => "Weather data not available for this date.",
            Self::FetchFailed => "Failed to fetch weather data. Please try again.",
        }
    }
}
