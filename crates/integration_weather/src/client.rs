//! Open-Meteo client
//!
//! HTTP client for the Open-Meteo geocoding and forecast APIs.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use validator::{Validate, ValidationError};

use crate::models::{
    ApiErrorResponse, DAILY_METRICS, DailyAggregate, ForecastResponse, GeocodedPlace,
    GeocodingResponse,
};

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Weather service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct WeatherConfig {
    /// Forecast API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_forecast_base_url")]
    #[validate(
        url(message = "must be a valid URL"),
        custom(function = "validate_http_scheme")
    )]
    pub forecast_base_url: String,

    /// Geocoding API base URL (default: <https://geocoding-api.open-meteo.com/v1>)
    #[serde(default = "default_geocoding_base_url")]
    #[validate(
        url(message = "must be a valid URL"),
        custom(function = "validate_http_scheme")
    )]
    pub geocoding_base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub timeout_secs: u64,

    /// Language for geocoding results (default: "en")
    #[serde(default = "default_language")]
    #[validate(
        length(min = 1, message = "must not be empty"),
        custom(function = "validate_not_blank")
    )]
    pub language: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

fn default_language() -> String {
    "en".to_string()
}

fn default_user_agent() -> String {
    concat!("paradecast/", env!("CARGO_PKG_VERSION")).to_string()
}

fn validate_http_scheme(url: &str) -> Result<(), ValidationError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("http_scheme").with_message("must use http or https".into()))
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("must not be blank".into()))
    } else {
        Ok(())
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_base_url: default_forecast_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            timeout_secs: default_timeout(),
            language: default_language(),
            user_agent: default_user_agent(),
        }
    }
}

/// Weather client trait for geocoding and daily forecasts
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Search places by name, best match first
    async fn search_places(
        &self,
        name: &str,
        count: u8,
    ) -> Result<Vec<GeocodedPlace>, WeatherError>;

    /// Get the daily aggregate for one date
    ///
    /// Returns `Ok(None)` when the provider has no data for that date.
    async fn get_daily(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<Option<DailyAggregate>, WeatherError>;

    /// Check if the geocoding endpoint answers
    async fn is_geocoding_healthy(&self) -> bool;

    /// Check if the forecast endpoint answers
    async fn is_forecast_healthy(&self) -> bool;
}

/// Open-Meteo HTTP client implementation
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Client configuration
    #[must_use]
    pub const fn config(&self) -> &WeatherConfig {
        &self.config
    }

    /// Validate coordinates
    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(())
    }

    async fn send(request: RequestBuilder) -> Result<Response, WeatherError> {
        request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                WeatherError::ConnectionFailed(e.to_string())
            } else {
                WeatherError::RequestFailed(e.to_string())
            }
        })
    }

    fn check_status(status: StatusCode) -> Result<(), WeatherError> {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
        }
        Ok(())
    }

    fn parse_place(raw: crate::models::GeocodingResult) -> Result<GeocodedPlace, WeatherError> {
        Self::validate_coordinates(raw.latitude, raw.longitude).map_err(|_| {
            WeatherError::ParseError(format!(
                "Geocoding result '{}' has invalid coordinates ({}, {})",
                raw.name, raw.latitude, raw.longitude
            ))
        })?;
        Ok(raw.into())
    }

    /// Turn an HTTP 400 into "no data" when it carries Open-Meteo's error body
    async fn handle_bad_request(response: Response) -> Result<Option<DailyAggregate>, WeatherError> {
        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) if api_error.error => {
                debug!(reason = %api_error.reason, "Forecast rejected the request");
                Ok(None)
            },
            _ => Err(WeatherError::RequestFailed(format!(
                "HTTP {}",
                StatusCode::BAD_REQUEST
            ))),
        }
    }

    fn parse_daily(
        api_response: &ForecastResponse,
        requested: NaiveDate,
    ) -> Result<Option<DailyAggregate>, WeatherError> {
        let Some(daily) = api_response.daily.as_ref() else {
            debug!("No daily block in forecast response");
            return Ok(None);
        };

        let Some((time, [max, min, precipitation, wind, humidity])) = daily.first_day() else {
            debug!("Daily block has no complete entry");
            return Ok(None);
        };

        let date = NaiveDate::parse_from_str(time, "%Y-%m-%d")
            .map_err(|e| WeatherError::ParseError(format!("Invalid date '{time}': {e}")))?;

        if date != requested {
            warn!(%date, %requested, "Forecast returned a different date");
            return Ok(None);
        }

        Ok(Some(DailyAggregate {
            date,
            temperature_max: max,
            temperature_min: min,
            precipitation_sum: precipitation,
            wind_speed_max: wind,
            humidity_mean: humidity,
        }))
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn search_places(
        &self,
        name: &str,
        count: u8,
    ) -> Result<Vec<GeocodedPlace>, WeatherError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/search", self.config.geocoding_base_url);
        let count = count.max(1).to_string();
        debug!(url = %url, "Searching places");

        let request = self.client.get(&url).query(&[
            ("name", name),
            ("count", count.as_str()),
            ("language", self.config.language.as_str()),
            ("format", "json"),
        ]);
        let response = Self::send(request).await?;
        Self::check_status(response.status())?;

        let api_response: GeocodingResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        debug!(results = api_response.results.len(), "Geocoding answered");

        api_response
            .results
            .into_iter()
            .map(Self::parse_place)
            .collect()
    }

    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude, date = %date))]
    async fn get_daily(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<Option<DailyAggregate>, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;

        let url = format!("{}/forecast", self.config.forecast_base_url);
        let day = date.format("%Y-%m-%d").to_string();
        debug!(url = %url, "Fetching daily forecast");

        let request = self.client.get(&url).query(&[
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("daily", DAILY_METRICS.to_string()),
            ("timezone", "auto".to_string()),
            ("start_date", day.clone()),
            ("end_date", day),
        ]);
        let response = Self::send(request).await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            return Self::handle_bad_request(response).await;
        }
        Self::check_status(status)?;

        let api_response: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        debug!(timezone = ?api_response.timezone, "Forecast answered");

        Self::parse_daily(&api_response, date)
    }

    async fn is_geocoding_healthy(&self) -> bool {
        self.search_places("Berlin", 1).await.is_ok()
    }

    async fn is_forecast_healthy(&self) -> bool {
        // Berlin, today
        self.get_daily(52.52, 13.405, Utc::now().date_naive())
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = WeatherConfig::default();
        assert_eq!(config.forecast_base_url, "https://api.open-meteo.com/v1");
        assert_eq!(
            config.geocoding_base_url,
            "https://geocoding-api.open-meteo.com/v1"
        );
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.language, "en");
        assert!(config.user_agent.starts_with("paradecast/"));
    }

    #[test]
    fn test_validate_coordinates_valid() {
        assert!(OpenMeteoClient::validate_coordinates(0.0, 0.0).is_ok());
        assert!(OpenMeteoClient::validate_coordinates(90.0, 180.0).is_ok());
        assert!(OpenMeteoClient::validate_coordinates(-90.0, -180.0).is_ok());
        assert!(OpenMeteoClient::validate_coordinates(52.52, 13.41).is_ok());
    }

    #[test]
    fn test_validate_coordinates_invalid() {
        assert!(OpenMeteoClient::validate_coordinates(91.0, 0.0).is_err());
        assert!(OpenMeteoClient::validate_coordinates(-91.0, 0.0).is_err());
        assert!(OpenMeteoClient::validate_coordinates(0.0, 181.0).is_err());
        assert!(OpenMeteoClient::validate_coordinates(0.0, -181.0).is_err());
        assert!(OpenMeteoClient::validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_check_status() {
        assert!(OpenMeteoClient::check_status(StatusCode::OK).is_ok());
        assert!(matches!(
            OpenMeteoClient::check_status(StatusCode::TOO_MANY_REQUESTS),
            Err(WeatherError::RateLimitExceeded)
        ));
        assert!(matches!(
            OpenMeteoClient::check_status(StatusCode::BAD_GATEWAY),
            Err(WeatherError::ServiceUnavailable(_))
        ));
        assert!(matches!(
            OpenMeteoClient::check_status(StatusCode::NOT_FOUND),
            Err(WeatherError::RequestFailed(_))
        ));
    }

    #[test]
    fn test_daily_metrics_list() {
        assert_eq!(
            DAILY_METRICS,
            "temperature_2m_max,temperature_2m_min,precipitation_sum,windspeed_10m_max,relative_humidity_2m_mean"
        );
    }

    #[test]
    fn test_weather_error_display() {
        let err = WeatherError::InvalidCoordinates;
        assert!(err.to_string().contains("latitude"));
        assert!(err.to_string().contains("longitude"));

        let err = WeatherError::RateLimitExceeded;
        assert!(err.to_string().contains("Rate limit"));
    }

    #[test]
    fn test_client_creation() {
        let client = OpenMeteoClient::new(WeatherConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(WeatherConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_url_without_host() {
        let config = WeatherConfig {
            forecast_base_url: "https://".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("forecast_base_url"));
    }

    #[test]
    fn test_config_rejects_non_http_scheme() {
        let config = WeatherConfig {
            geocoding_base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["geocoding_base_url"][0].code, "http_scheme");
    }

    #[test]
    fn test_config_rejects_zero_timeout_and_blank_language() {
        let config = WeatherConfig {
            timeout_secs: 0,
            language: "  ".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("timeout_secs"));
        assert!(fields.contains_key("language"));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: WeatherConfig =
            serde_json::from_str(r#"{"forecast_base_url": "https://custom.api.com"}"#)
                .expect("should deserialize");

        assert_eq!(config.forecast_base_url, "https://custom.api.com");
        assert_eq!(
            config.geocoding_base_url,
            "https://geocoding-api.open-meteo.com/v1"
        );
        assert_eq!(config.timeout_secs, 30);
    }
}
