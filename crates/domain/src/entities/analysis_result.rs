//! Analysis result - Everything produced by one successful analysis

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Advisory, DailyWeather, Place};
use crate::classifier::Classification;

/// Outcome of analyzing one place on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "AnalysisResultRecord", from = "AnalysisResultRecord")]
pub struct AnalysisResult {
    /// Geocoded place
    pub place: Place,
    /// Requested date
    pub date: NaiveDate,
    /// Daily aggregate for that date
    pub weather: DailyWeather,
    /// Advisories in rule-evaluation order
    pub advisories: Vec<Advisory>,
}

impl AnalysisResult {
    /// Assemble a result from a classification
    #[must_use]
    pub fn new(
        place: Place,
        date: NaiveDate,
        weather: DailyWeather,
        classification: Classification,
    ) -> Self {
        Self {
            place,
            date,
            weather,
            advisories: classification.advisories,
        }
    }

    /// True when no advisory fired
    #[must_use]
    pub fn safe(&self) -> bool {
        self.advisories.is_empty()
    }

    /// Date formatted for display, e.g. "Tuesday, October 20, 2026"
    #[must_use]
    pub fn display_date(&self) -> String {
        self.date.format("%A, %B %-d, %Y").to_string()
    }
}

#[derive(Serialize, Deserialize)]
struct AnalysisResultRecord {
    place: Place,
    date: NaiveDate,
    weather: DailyWeather,
    advisories: Vec<Advisory>,
    #[serde(default)]
    safe: bool,
}

impl From<AnalysisResult> for AnalysisResultRecord {
    fn from(result: AnalysisResult) -> Self {
        Self {
            safe: result.safe(),
            place: result.place,
            date: result.date,
            weather: result.weather,
            advisories: result.advisories,
        }
    }
}

impl From<AnalysisResultRecord> for AnalysisResult {
    fn from(record: AnalysisResultRecord) -> Self {
        Self {
            place: record.place,
            date: record.date,
            weather: record.weather,
            advisories: record.advisories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeoLocation, classify};

    fn sample(weather: DailyWeather) -> AnalysisResult {
        let place = Place::new("Tokyo", "Japan", GeoLocation::new(35.6895, 139.6917).unwrap());
        let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        AnalysisResult::new(place, date, weather, classify(&weather))
    }

    #[test]
    fn safe_follows_classification() {
        let calm = DailyWeather {
            temp_max: 20.0,
            temp_min: 10.0,
            precipitation_sum: 0.0,
            wind_speed_max: 5.0,
            humidity_mean: 40.0,
        };
        let result = sample(calm);
        assert!(result.safe());
        assert!(result.advisories.is_empty());

        let stormy = DailyWeather {
            wind_speed_max: 60.0,
            ..calm
        };
        let result = sample(stormy);
        assert!(!result.safe());
        assert_eq!(result.advisories.len(), 1);
    }

    #[test]
    fn display_date_is_long_form() {
        let result = sample(DailyWeather {
            temp_max: 20.0,
            temp_min: 10.0,
            precipitation_sum: 0.0,
            wind_speed_max: 5.0,
            humidity_mean: 40.0,
        });
        assert_eq!(result.display_date(), "Tuesday, October 20, 2026");
    }

    #[test]
    fn deserialized_safe_follows_advisories() {
        let stormy = sample(DailyWeather {
            temp_max: 20.0,
            temp_min: 10.0,
            precipitation_sum: 0.0,
            wind_speed_max: 60.0,
            humidity_mean: 40.0,
        });
        let mut json = serde_json::to_value(&stormy).unwrap();
        assert_eq!(json["safe"], false);

        json["safe"] = serde_json::Value::Bool(true);
        let parsed: AnalysisResult = serde_json::from_value(json).unwrap();
        assert!(!parsed.safe());
        assert_eq!(parsed, stormy);
    }
}
