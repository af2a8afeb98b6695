//! Open-Meteo adapter - Implements GeocodingPort and ForecastPort using integration_weather

use application::error::ApplicationError;
use application::ports::{ForecastPort, GeocodingPort};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{DailyWeather, DomainError, GeoLocation, Place};
use integration_weather::{
    DailyAggregate, GeocodedPlace, OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError,
};
use tracing::{debug, instrument};
use validator::Validate;

/// Adapter for the Open-Meteo geocoding and forecast APIs
pub struct OpenMeteoAdapter {
    client: OpenMeteoClient,
}

impl std::fmt::Debug for OpenMeteoAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenMeteoAdapter")
            .field("forecast_base_url", &self.client.config().forecast_base_url)
            .field("geocoding_base_url", &self.client.config().geocoding_base_url)
            .finish()
    }
}

impl OpenMeteoAdapter {
    /// Create a new adapter with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new() -> Result<Self, ApplicationError> {
        Self::with_config(WeatherConfig::default())
    }

    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the settings are invalid
    /// or the HTTP client fails to initialize.
    pub fn with_config(config: WeatherConfig) -> Result<Self, ApplicationError> {
        config
            .validate()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        let client = OpenMeteoClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e)
            | WeatherError::RequestFailed(e)
            | WeatherError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            WeatherError::ParseError(e) => ApplicationError::Internal(e),
            WeatherError::InvalidCoordinates => {
                ApplicationError::Internal("Invalid coordinates".into())
            },
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
        }
    }

    /// Convert a geocoding hit to a domain place
    fn map_place(place: GeocodedPlace) -> Result<Place, ApplicationError> {
        let location =
            GeoLocation::new(place.latitude, place.longitude).map_err(DomainError::from)?;

        Ok(Place {
            name: place.name,
            country: place.country.unwrap_or_default(),
            location,
            admin1: place.admin1,
            timezone: place.timezone,
        })
    }

    /// Convert a daily aggregate to domain weather
    const fn map_daily(daily: &DailyAggregate) -> DailyWeather {
        DailyWeather {
            temp_max: daily.temperature_max,
            temp_min: daily.temperature_min,
            precipitation_sum: daily.precipitation_sum,
            wind_speed_max: daily.wind_speed_max,
            humidity_mean: daily.humidity_mean,
        }
    }
}

#[async_trait]
impl GeocodingPort for OpenMeteoAdapter {
    #[instrument(skip(self))]
    async fn find_place(&self, query: &str) -> Result<Option<Place>, ApplicationError> {
        let places = self
            .client
            .search_places(query.trim(), 1)
            .await
            .map_err(Self::map_error)?;

        let Some(first) = places.into_iter().next() else {
            debug!("No place matched");
            return Ok(None);
        };

        let place = Self::map_place(first)?;
        debug!(place = %place, location = %place.location, "Geocoded");
        Ok(Some(place))
    }

    #[instrument(skip(self))]
    async fn is_available(&self) -> bool {
        self.client.is_geocoding_healthy().await
    }
}

#[async_trait]
impl ForecastPort for OpenMeteoAdapter {
    #[instrument(skip(self), fields(lat = location.latitude(), lon = location.longitude()))]
    async fn daily_weather(
        &self,
        location: &GeoLocation,
        date: NaiveDate,
    ) -> Result<Option<DailyWeather>, ApplicationError> {
        let result = self
            .client
            .get_daily(location.latitude(), location.longitude(), date)
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(Some(daily)) => {
                debug!(
                    temp_max = daily.temperature_max,
                    precipitation = daily.precipitation_sum,
                    "Retrieved daily forecast"
                );
            },
            Ok(None) => debug!("No forecast data for date"),
            Err(e) => debug!(error = %e, "Failed to get daily forecast"),
        }

        result.map(|daily| daily.as_ref().map(Self::map_daily))
    }

    #[instrument(skip(self))]
    async fn is_available(&self) -> bool {
        self.client.is_forecast_healthy().await
    }
}
