//! Daily weather aggregate for a single calendar date

use serde::{Deserialize, Serialize};

/// Summarized weather for one day
///
/// Values are taken as the forecast provider reports them; nothing here is
/// range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    /// Maximum temperature in Celsius
    pub temp_max: f64,
    /// Minimum temperature in Celsius
    pub temp_min: f64,
    /// Total precipitation in mm
    pub precipitation_sum: f64,
    /// Maximum wind speed in km/h
    pub wind_speed_max: f64,
    /// Mean relative humidity in percent
    pub humidity_mean: f64,
}

impl DailyWeather {
    /// Get a one-line summary of the day
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}°C/{}°C, rain {}mm, wind {} km/h, humidity {}%",
            self.temp_max,
            self.temp_min,
            self.precipitation_sum,
            self.wind_speed_max,
            self.humidity_mean
        )
    }
}
