//! Forecast port
//!
//! Defines the interface for daily weather aggregates.

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{DailyWeather, GeoLocation};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for single-day forecasts
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ForecastPort: Send + Sync {
    /// Get the daily aggregate for `date` at `location`
    ///
    /// Returns `Ok(None)` when the provider has no data for that date.
    async fn daily_weather(
        &self,
        location: &GeoLocation,
        date: NaiveDate,
    ) -> Result<Option<DailyWeather>, ApplicationError>;

    /// Check if the forecast service is reachable
    async fn is_available(&self) -> bool;
}
