//! Open-Meteo data models
//!
//! Raw response shapes for the geocoding and forecast endpoints, plus the
//! cleaned-up types the client hands back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily metrics requested from the forecast endpoint, in response order
pub(crate) const DAILY_METRICS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,\
                                         windspeed_10m_max,relative_humidity_2m_mean";

/// A place returned by the geocoding search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPlace {
    /// Place name
    pub name: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Country name
    pub country: Option<String>,
    /// First-level administrative area
    pub admin1: Option<String>,
    /// IANA timezone
    pub timezone: Option<String>,
}

/// Daily aggregate for a single date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    /// Date the values apply to
    pub date: NaiveDate,
    /// Maximum temperature in Celsius
    pub temperature_max: f64,
    /// Minimum temperature in Celsius
    pub temperature_min: f64,
    /// Precipitation sum in mm
    pub precipitation_sum: f64,
    /// Maximum wind speed at 10 m in km/h
    pub wind_speed_max: f64,
    /// Mean relative humidity at 2 m in percent
    pub humidity_mean: f64,
}

// ============================================================================
// Raw API responses
// ============================================================================

/// Geocoding search response
///
/// `results` is omitted entirely when nothing matches.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodingResponse {
    #[serde(default)]
    pub results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub admin1: Option<String>,
    pub timezone: Option<String>,
}

impl From<GeocodingResult> for GeocodedPlace {
    fn from(raw: GeocodingResult) -> Self {
        Self {
            name: raw.name,
            latitude: raw.latitude,
            longitude: raw.longitude,
            country: raw.country,
            admin1: raw.admin1,
            timezone: raw.timezone,
        }
    }
}

/// Forecast response
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub timezone: Option<String>,
    pub daily: Option<DailyData>,
}

/// Parallel arrays, one entry per day
///
/// Open-Meteo reports `null` for days it has no model data for, so each
/// metric is an array of options.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DailyData {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    pub windspeed_10m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m_mean: Vec<Option<f64>>,
}

impl DailyData {
    /// Values for the first day, or `None` if any metric is missing
    pub fn first_day(&self) -> Option<(&str, [f64; 5])> {
        let first = |values: &[Option<f64>]| values.first().copied().flatten();

        let date = self.time.first()?;
        Some((
            date.as_str(),
            [
                first(&self.temperature_2m_max)?,
                first(&self.temperature_2m_min)?,
                first(&self.precipitation_sum)?,
                first(&self.windspeed_10m_max)?,
                first(&self.relative_humidity_2m_mean)?,
            ],
        ))
    }
}

/// Error body Open-Meteo sends with HTTP 400
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocoding_response_without_results() {
        let response: GeocodingResponse =
            serde_json::from_str(r#"{"generationtime_ms": 0.5}"#).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn geocoding_result_converts() {
        let response: GeocodingResponse = serde_json::from_str(
            r#"{"results": [{
                "id": 2643743,
                "name": "London",
                "latitude": 51.50853,
                "longitude": -0.12574,
                "country": "United Kingdom",
                "country_code": "GB",
                "admin1": "England",
                "timezone": "Europe/London",
                "population": 7556900,
                "feature_code": "PPLC"
            }]}"#,
        )
        .unwrap();

        let place = GeocodedPlace::from(response.results.into_iter().next().unwrap());
        assert_eq!(place.name, "London");
        assert_eq!(place.country.as_deref(), Some("United Kingdom"));
        assert_eq!(place.admin1.as_deref(), Some("England"));
    }

    #[test]
    fn first_day_reads_index_zero() {
        let daily: DailyData = serde_json::from_str(
            r#"{
                "time": ["2026-10-20"],
                "temperature_2m_max": [22.5],
                "temperature_2m_min": [11.0],
                "precipitation_sum": [0.4],
                "windspeed_10m_max": [18.3],
                "relative_humidity_2m_mean": [64]
            }"#,
        )
        .unwrap();

        let (date, values) = daily.first_day().unwrap();
        assert_eq!(date, "2026-10-20");
        assert!((values[0] - 22.5).abs() < f64::EPSILON);
        assert!((values[4] - 64.0).abs() < f64::EPSILON);
    }

    #[test]
    fn first_day_missing_when_a_metric_is_null() {
        let daily: DailyData = serde_json::from_str(
            r#"{
                "time": ["2026-10-20"],
                "temperature_2m_max": [22.5],
                "temperature_2m_min": [11.0],
                "precipitation_sum": [null],
                "windspeed_10m_max": [18.3],
                "relative_humidity_2m_mean": [64]
            }"#,
        )
        .unwrap();
        assert!(daily.first_day().is_none());
    }

    #[test]
    fn first_day_missing_when_empty() {
        assert!(DailyData::default().first_day().is_none());
    }

    #[test]
    fn error_body_parses() {
        let body: ApiErrorResponse =
            serde_json::from_str(r#"{"error": true, "reason": "Parameter 'start_date' is out of allowed range"}"#)
                .unwrap();
        assert!(body.error);
        assert!(body.reason.contains("start_date"));
    }
}
