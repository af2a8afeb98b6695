//! Text and JSON rendering for command output

use std::fmt::Write as _;

use application::{FailureKind, HealthReport};
use domain::{Advisory, AnalysisResult, Classification, DailyWeather};
use serde::Serialize;

const ALL_CLEAR: &str = "☀️ All Clear!";
const ALL_CLEAR_DETAIL: &str =
    "Weather conditions look favorable for your outdoor event. Have a great time!";

/// Machine-readable outcome of `check`
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutput<'a> {
    /// Analysis finished
    Ok {
        /// Classified result
        result: &'a AnalysisResult,
    },
    /// Analysis failed
    Error {
        /// Failure category
        kind: FailureKind,
        /// Fixed user-facing text
        message: &'a str,
    },
}

/// Machine-readable outcome of `classify`
#[derive(Debug, Serialize)]
pub struct ClassifyOutput<'a> {
    /// Input aggregates
    pub weather: &'a DailyWeather,
    /// Classifier output
    #[serde(flatten)]
    pub classification: &'a Classification,
}

/// Full report for a finished analysis
pub fn report(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📍 {}", result.place);
    let _ = writeln!(out, "📅 {}", result.display_date());
    out.push('\n');
    out.push_str(&metrics(&result.weather));
    out.push('\n');
    out.push_str(&advisories(&result.advisories));
    out
}

/// The four headline metrics
pub fn metrics(weather: &DailyWeather) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🌡️  High: {}°C", weather.temp_max);
    let _ = writeln!(out, "🌡️  Low:  {}°C", weather.temp_min);
    let _ = writeln!(out, "🌧️  Rain: {}mm", weather.precipitation_sum);
    let _ = writeln!(out, "💨 Wind: {} km/h", weather.wind_speed_max);
    out
}

/// Advisory list, or the all-clear banner when there is none
pub fn advisories(advisories: &[Advisory]) -> String {
    let mut out = String::new();

    if advisories.is_empty() {
        let _ = writeln!(out, "{ALL_CLEAR}");
        let _ = writeln!(out, "{ALL_CLEAR_DETAIL}");
        return out;
    }

    let _ = writeln!(out, "⚠️  Weather Advisories");
    for advisory in advisories {
        let _ = writeln!(
            out,
            "{} {} [{} {}]",
            advisory.kind.emoji(),
            advisory.message,
            advisory.severity.emoji(),
            advisory.severity.label()
        );
        let _ = writeln!(out, "   {}", advisory.advice);
    }
    out
}

/// One line per checked service
pub fn health(report: &HealthReport) -> String {
    let mut out = String::new();

    for (name, status) in &report.services {
        let icon = if status.healthy { "✅" } else { "❌" };
        let _ = write!(out, "{icon} {name}");
        if let Some(ms) = status.response_time_ms {
            let _ = write!(out, " ({ms}ms)");
        }
        if let Some(error) = &status.error {
            let _ = write!(out, ": {error}");
        }
        out.push('\n');
    }

    let overall = if report.healthy {
        "✅ Healthy"
    } else {
        "❌ Unhealthy"
    };
    let _ = writeln!(out, "{overall}");
    out
}
