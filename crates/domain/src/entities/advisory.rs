//! Advisory entity - One hazardous condition found in a day's weather

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Severity;

/// Class of hazardous condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    /// Maximum temperature above the heat threshold
    VeryHot,
    /// Minimum temperature below freezing
    VeryCold,
    /// Heavy precipitation
    VeryWet,
    /// Moderate precipitation
    LightRain,
    /// Strong wind
    VeryWindy,
    /// Heat combined with high humidity
    VeryUncomfortable,
}

impl AdvisoryKind {
    /// Get a human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::VeryHot => "Very Hot",
            Self::VeryCold => "Very Cold",
            Self::VeryWet => "Very Wet",
            Self::LightRain => "Light Rain",
            Self::VeryWindy => "Very Windy",
            Self::VeryUncomfortable => "Uncomfortable",
        }
    }

    /// Get an emoji representation
    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::VeryHot => "🔥",
            Self::VeryCold => "❄️",
            Self::VeryWet => "🌧️",
            Self::LightRain => "🌦️",
            Self::VeryWindy => "💨",
            Self::VeryUncomfortable => "😰",
        }
    }

    /// Severity attached to this kind of advisory
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::LightRain | Self::VeryUncomfortable => Severity::Medium,
            Self::VeryHot | Self::VeryCold | Self::VeryWet | Self::VeryWindy => Severity::High,
        }
    }

    /// Recommended action for this condition
    #[must_use]
    pub const fn advice(&self) -> &'static str {
        match self {
            Self::VeryHot => "Stay hydrated, seek shade, avoid midday activities",
            Self::VeryCold => "Dress warmly, protect extremities, check for ice",
            Self::VeryWet => "Bring waterproof gear, consider indoor backup plan",
            Self::LightRain => "Pack an umbrella or light rain jacket",
            Self::VeryWindy => "Secure loose items, avoid tall structures",
            Self::VeryUncomfortable => "Heat index will feel much hotter, limit outdoor activities",
        }
    }
}

impl fmt::Display for AdvisoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A warning describing one hazardous condition with recommended action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    /// Condition class
    pub kind: AdvisoryKind,
    /// Display severity
    pub severity: Severity,
    /// Headline including the triggering value
    pub message: String,
    /// What to do about it
    pub advice: String,
}

impl Advisory {
    /// Create an advisory of the given kind with a headline message
    ///
    /// Severity and advice are fixed per kind.
    #[must_use]
    pub fn new(kind: AdvisoryKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
            advice: kind.advice().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_per_kind() {
        assert_eq!(AdvisoryKind::VeryHot.severity(), Severity::High);
        assert_eq!(AdvisoryKind::VeryCold.severity(), Severity::High);
        assert_eq!(AdvisoryKind::VeryWet.severity(), Severity::High);
        assert_eq!(AdvisoryKind::VeryWindy.severity(), Severity::High);
        assert_eq!(AdvisoryKind::LightRain.severity(), Severity::Medium);
        assert_eq!(AdvisoryKind::VeryUncomfortable.severity(), Severity::Medium);
    }

    #[test]
    fn new_fills_severity_and_advice() {
        let advisory = Advisory::new(AdvisoryKind::LightRain, "Light Rain: 5mm expected");
        assert_eq!(advisory.severity, Severity::Medium);
        assert_eq!(advisory.advice, "Pack an umbrella or light rain jacket");
        assert_eq!(advisory.message, "Light Rain: 5mm expected");
    }

    #[test]
    fn kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&AdvisoryKind::VeryUncomfortable).expect("serialize");
        assert_eq!(json, "\"very_uncomfortable\"");
    }

    #[test]
    fn kind_display_uses_label() {
        assert_eq!(AdvisoryKind::VeryWindy.to_string(), "Very Windy");
    }
}
