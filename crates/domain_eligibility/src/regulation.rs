//! Regulatory regimes and jurisdiction resolution

use serde::{Deserialize, Serialize};
use std::fmt;

/// EU member states, ISO 3166-1 alpha-2
const EU_MEMBERS: &[&str] = &[
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE", "IT",
    "LV", "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE",
];

/// A passenger-compensation regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regulation {
    Eu261,
    Uk261,
    UsDot,
    CanadaAppr,
    SwissPassengerRights,
    NorwayPassengerRights,
}

impl fmt::Display for Regulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Regulation::Eu261 => "EU261",
            Regulation::Uk261 => "UK261",
            Regulation::UsDot => "US DOT",
            Regulation::CanadaAppr => "Canada APPR",
            Regulation::SwissPassengerRights => "Swiss passenger rights",
            Regulation::NorwayPassengerRights => "Norwegian passenger rights",
        };
        write!(f, "{name}")
    }
}

/// The journey and carrier facts that select a regime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Departure country, ISO 3166-1 alpha-2
    pub origin_country: String,
    /// Arrival country, ISO 3166-1 alpha-2
    pub destination_country: String,
    /// Country the operating carrier is licensed in
    pub carrier_country: String,
    /// Great-circle distance of the whole journey in kilometers
    pub distance_km: f64,
}

fn is_eu(country: &str) -> bool {
    EU_MEMBERS.contains(&country)
}

impl Route {
    pub fn new(
        origin_country: impl Into<String>,
        destination_country: impl Into<String>,
        carrier_country: impl Into<String>,
        distance_km: f64,
    ) -> Self {
        Self {
            origin_country: origin_country.into(),
            destination_country: destination_country.into(),
            carrier_country: carrier_country.into(),
            distance_km,
        }
    }

    /// Resolves the governing regime for this route
    ///
    /// Departure jurisdiction wins; for arrivals the carrier must be licensed
    /// in the arrival jurisdiction (the EU261 "arriving on a Community
    /// carrier" shape, mirrored by the other regimes).
    pub fn resolve_regulation(&self) -> Option<Regulation> {
        let origin = self.origin_country.as_str();
        let destination = self.destination_country.as_str();
        let carrier = self.carrier_country.as_str();

        let by_departure = match origin {
            "GB" => Some(Regulation::Uk261),
            "CH" => Some(Regulation::SwissPassengerRights),
            "NO" => Some(Regulation::NorwayPassengerRights),
            "US" => Some(Regulation::UsDot),
            "CA" => Some(Regulation::CanadaAppr),
            _ if is_eu(origin) => Some(Regulation::Eu261),
            _ => None,
        };
        if by_departure.is_some() {
            return by_departure;
        }

        match destination {
            "GB" if carrier == "GB" => Some(Regulation::Uk261),
            "CH" if carrier == "CH" => Some(Regulation::SwissPassengerRights),
            "NO" if carrier == "NO" => Some(Regulation::NorwayPassengerRights),
            "CA" if carrier == "CA" => Some(Regulation::CanadaAppr),
            _ if is_eu(destination) && is_eu(carrier) => Some(Regulation::Eu261),
            _ => None,
        }
    }
}
