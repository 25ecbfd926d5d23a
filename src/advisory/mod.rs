//! Advisory module - operator-facing alerts and ranked suggestions
//!
//! Both derivers run over a point-in-time snapshot of the zone store and
//! produce fresh output on every pass; nothing here is persisted or
//! deduplicated between polls.

mod alerts;
mod suggestions;

pub use alerts::derive_alerts;
pub use suggestions::derive_suggestions;

use serde::{Deserialize, Serialize};

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Critical,
    Warn,
}

/// A threshold alert derived from the current zone state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub text: String,
}

/// Suggestion urgency. Ordering (critical first) is the operator-facing
/// ranking contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionLevel {
    Critical,
    Warn,
    Info,
    Monitor,
}

impl SuggestionLevel {
    pub fn priority(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Warn => 1,
            Self::Info => 2,
            Self::Monitor => 3,
        }
    }
}

/// One ranked operator suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub zone: String,
    pub title: String,
    pub level: SuggestionLevel,
    pub rationale: String,
    pub people: u32,
}
