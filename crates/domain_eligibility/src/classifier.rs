//! Extraordinary-circumstances classification
//!
//! Disruption reasons arrive as free text from providers and passengers.
//! The classifier maps them onto a closed category set via an ordered
//! keyword list; deployments can extend the list through configuration
//! rather than code changes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of disruption-cause categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircumstanceCategory {
    Weather,
    AirTrafficControl,
    Security,
    /// Strike by parties outside the airline's control (airport staff, ATC)
    ExternalStrike,
    /// Within the airline's control: technical faults, crew issues, rotations
    AirlineOperational,
}

impl CircumstanceCategory {
    /// True if this category excludes compensation under EU-style regimes
    pub fn is_extraordinary(&self) -> bool {
        !matches!(self, CircumstanceCategory::AirlineOperational)
    }
}

impl fmt::Display for CircumstanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CircumstanceCategory::Weather => "weather",
            CircumstanceCategory::AirTrafficControl => "air traffic control",
            CircumstanceCategory::Security => "security",
            CircumstanceCategory::ExternalStrike => "strike external to the airline",
            CircumstanceCategory::AirlineOperational => "airline operational",
        };
        write!(f, "{label}")
    }
}

/// One keyword-to-category rule; first match wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierRule {
    pub keyword: String,
    pub category: CircumstanceCategory,
}

/// Keyword classifier over free-text disruption reasons
#[derive(Debug, Clone)]
pub struct CircumstanceClassifier {
    rules: Vec<ClassifierRule>,
}

impl Default for CircumstanceClassifier {
    fn default() -> Self {
        let rule = |keyword: &str, category| ClassifierRule {
            keyword: keyword.to_string(),
            category,
        };
        Self {
            rules: vec![
                rule("weather", CircumstanceCategory::Weather),
                rule("storm", CircumstanceCategory::Weather),
                rule("snow", CircumstanceCategory::Weather),
                rule("ice", CircumstanceCategory::Weather),
                rule("fog", CircumstanceCategory::Weather),
                rule("lightning", CircumstanceCategory::Weather),
                rule("air traffic", CircumstanceCategory::AirTrafficControl),
                rule("atc", CircumstanceCategory::AirTrafficControl),
                rule("airspace", CircumstanceCategory::AirTrafficControl),
                rule("security", CircumstanceCategory::Security),
                rule("bomb", CircumstanceCategory::Security),
                // Strikes by the airline's own staff are within its control
                rule("crew strike", CircumstanceCategory::AirlineOperational),
                rule("pilot strike", CircumstanceCategory::AirlineOperational),
                rule("cabin crew strike", CircumstanceCategory::AirlineOperational),
                rule("strike", CircumstanceCategory::ExternalStrike),
                rule("technical", CircumstanceCategory::AirlineOperational),
                rule("crew", CircumstanceCategory::AirlineOperational),
                rule("rotation", CircumstanceCategory::AirlineOperational),
                rule("maintenance", CircumstanceCategory::AirlineOperational),
            ],
        }
    }
}

impl CircumstanceClassifier {
    /// Builds a classifier from explicit rules (e.g. from configuration)
    pub fn from_rules(rules: Vec<ClassifierRule>) -> Self {
        Self { rules }
    }

    /// Prepends a rule so configured entries win over the defaults
    pub fn with_rule(
        mut self,
        keyword: impl Into<String>,
        category: CircumstanceCategory,
    ) -> Self {
        self.rules.insert(
            0,
            ClassifierRule {
                keyword: keyword.into(),
                category,
            },
        );
        self
    }

    /// Classifies a free-text reason; `None` when no rule matches
    pub fn classify(&self, reason: &str) -> Option<CircumstanceCategory> {
        let folded = reason.to_lowercase();
        self.rules
            .iter()
            .find(|rule| folded.contains(&rule.keyword.to_lowercase()))
            .map(|rule| rule.category)
    }

    /// Returns the category when the reason is an extraordinary circumstance
    pub fn extraordinary_category(&self, reason: Option<&str>) -> Option<CircumstanceCategory> {
        reason
            .and_then(|r| self.classify(r))
            .filter(CircumstanceCategory::is_extraordinary)
    }
}
