//! Open-Meteo integration
//!
//! Client for the Open-Meteo geocoding and forecast APIs (<https://open-meteo.com>).
//! Resolves place names to coordinates and fetches single-day aggregates
//! without requiring an API key.

pub mod client;
mod models;

pub use client::{OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError};
pub use models::{DailyAggregate, GeocodedPlace};
