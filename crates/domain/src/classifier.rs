//! Weather-to-advisory classifier
//!
//! Maps one day's aggregates to an ordered list of advisories. The function is
//! pure and total: any finite or non-finite input yields a result, and a NaN
//! field never fires a rule because every comparison against it is false.

use serde::{Deserialize, Serialize};

use crate::entities::{Advisory, AdvisoryKind, DailyWeather};

/// Rule thresholds. All comparisons are strict.
pub mod thresholds {
    /// Maximum temperature above which the day is very hot (°C)
    pub const VERY_HOT_MAX_C: f64 = 35.0;
    /// Minimum temperature below which the day is very cold (°C)
    pub const VERY_COLD_MIN_C: f64 = 0.0;
    /// Precipitation above which the day is very wet (mm)
    pub const VERY_WET_MM: f64 = 10.0;
    /// Precipitation above which light rain is expected (mm)
    pub const LIGHT_RAIN_MM: f64 = 2.0;
    /// Wind speed above which the day is very windy (km/h)
    pub const VERY_WINDY_KMH: f64 = 40.0;
    /// Maximum temperature above which humidity becomes uncomfortable (°C)
    pub const UNCOMFORTABLE_TEMP_C: f64 = 28.0;
    /// Mean humidity above which heat becomes uncomfortable (%)
    pub const UNCOMFORTABLE_HUMIDITY: f64 = 70.0;
}

/// Classifier output
///
/// The day is safe exactly when no rule fired, so `safe` is computed from the
/// advisory list and only appears as a field in serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ClassificationRecord", from = "ClassificationRecord")]
pub struct Classification {
    /// Advisories in rule-evaluation order
    pub advisories: Vec<Advisory>,
}

impl Classification {
    /// True iff no rule fired
    #[must_use]
    pub fn safe(&self) -> bool {
        self.advisories.is_empty()
    }
}

/// Wire form of [`Classification`]; an incoming `safe` flag is ignored
#[derive(Serialize, Deserialize)]
struct ClassificationRecord {
    advisories: Vec<Advisory>,
    #[serde(default)]
    safe: bool,
}

impl From<Classification> for ClassificationRecord {
    fn from(classification: Classification) -> Self {
        Self {
            safe: classification.safe(),
            advisories: classification.advisories,
        }
    }
}

impl From<ClassificationRecord> for Classification {
    fn from(record: ClassificationRecord) -> Self {
        Self {
            advisories: record.advisories,
        }
    }
}

/// Classify a day's weather into advisories
///
/// Rules run in a fixed order: heat, cold, precipitation (very wet takes
/// priority over light rain), wind, then heat with humidity. The output keeps
/// that order regardless of severity.
#[must_use]
pub fn classify(weather: &DailyWeather) -> Classification {
    use thresholds::{
        LIGHT_RAIN_MM, UNCOMFORTABLE_HUMIDITY, UNCOMFORTABLE_TEMP_C, VERY_COLD_MIN_C,
        VERY_HOT_MAX_C, VERY_WET_MM, VERY_WINDY_KMH,
    };

    let mut advisories = Vec::new();

    if weather.temp_max > VERY_HOT_MAX_C {
        advisories.push(Advisory::new(
            AdvisoryKind::VeryHot,
            format!("Very Hot: {}°C expected", weather.temp_max),
        ));
    }

    if weather.temp_min < VERY_COLD_MIN_C {
        advisories.push(Advisory::new(
            AdvisoryKind::VeryCold,
            format!("Very Cold: {}°C expected", weather.temp_min),
        ));
    }

    if weather.precipitation_sum > VERY_WET_MM {
        advisories.push(Advisory::new(
            AdvisoryKind::VeryWet,
            format!("Very Wet: {}mm rain expected", weather.precipitation_sum),
        ));
    } else if weather.precipitation_sum > LIGHT_RAIN_MM {
        advisories.push(Advisory::new(
            AdvisoryKind::LightRain,
            format!("Light Rain: {}mm expected", weather.precipitation_sum),
        ));
    }

    if weather.wind_speed_max > VERY_WINDY_KMH {
        advisories.push(Advisory::new(
            AdvisoryKind::VeryWindy,
            format!("Very Windy: {} km/h gusts", weather.wind_speed_max),
        ));
    }

    if weather.temp_max > UNCOMFORTABLE_TEMP_C && weather.humidity_mean > UNCOMFORTABLE_HUMIDITY {
        advisories.push(Advisory::new(
            AdvisoryKind::VeryUncomfortable,
            format!(
                "Uncomfortable: High heat + {}% humidity",
                weather.humidity_mean
            ),
        ));
    }

    Classification { advisories }
}
