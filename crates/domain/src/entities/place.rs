//! Place entity - A geocoded location

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::GeoLocation;

/// A place resolved by the geocoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Canonical place name (e.g. "London")
    pub name: String,
    /// Country name, empty when the geocoder did not report one
    pub country: String,
    /// Coordinates of the place
    pub location: GeoLocation,
    /// First-level administrative area (state, region)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin1: Option<String>,
    /// IANA timezone of the place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Place {
    /// Create a place with just name, country, and coordinates
    #[must_use]
    pub fn new(name: impl Into<String>, country: impl Into<String>, location: GeoLocation) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            location,
            admin1: None,
            timezone: None,
        }
    }

    /// Latitude in degrees
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.latitude()
    }

    /// Longitude in degrees
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.longitude()
    }

    /// Label in the form "Name, Country"
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}
