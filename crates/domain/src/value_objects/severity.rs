//! Advisory severity value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious an advisory is
///
/// Severity is display metadata (it picks the styling of an advisory).
/// It is never used to reorder advisories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Conditions that can ruin or endanger an outdoor event
    High,
    /// Conditions worth preparing for
    Medium,
}

impl Severity {
    /// Get a human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }

    /// Get an emoji marker for terminal output
    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::High => "🔴",
            Self::Medium => "🟡",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
