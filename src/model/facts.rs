use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::geo::GeoPoint;

/// Building form of a listing. Ordinal order matters: the comparator
/// scores property types by their distance on this 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    Detached,
    #[serde(alias = "semi", alias = "semidetached", alias = "semi_detached")]
    SemiDetached,
    #[serde(alias = "terrace")]
    Terraced,
    #[serde(alias = "apartment")]
    Flat,
    Bungalow,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::Detached,
        PropertyType::SemiDetached,
        PropertyType::Terraced,
        PropertyType::Flat,
        PropertyType::Bungalow,
    ];

    /// Position on the 1-5 scale (Detached=1 .. Bungalow=5)
    pub fn ordinal(self) -> u32 {
        match self {
            PropertyType::Detached => 1,
            PropertyType::SemiDetached => 2,
            PropertyType::Terraced => 3,
            PropertyType::Flat => 4,
            PropertyType::Bungalow => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PropertyType::Detached => "Detached",
            PropertyType::SemiDetached => "Semi-Detached",
            PropertyType::Terraced => "Terraced",
            PropertyType::Flat => "Flat",
            PropertyType::Bungalow => "Bungalow",
        }
    }

    /// Map a free-text listing description ("End of Terrace House",
    /// "Apartment", "Detached Bungalow") onto one of the five types.
    ///
    /// "semi" is checked before "detached" so semi-detached houses never
    /// collapse into detached ones; bungalows win over "detached" for the
    /// same reason. Returns `None` for empty, "N/A" or unrecognised text.
    pub fn from_listing_text(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();
        if lower.is_empty() || lower == "n/a" {
            return None;
        }

        if lower.contains("semi") {
            Some(PropertyType::SemiDetached)
        } else if lower.contains("bungalow") {
            Some(PropertyType::Bungalow)
        } else if lower.contains("terrace") || lower.contains("townhouse") {
            Some(PropertyType::Terraced)
        } else if ["flat", "apartment", "maisonette", "studio", "penthouse"]
            .iter()
            .any(|k| lower.contains(k))
        {
            Some(PropertyType::Flat)
        } else if lower.contains("detached") || lower.contains("cottage") {
            Some(PropertyType::Detached)
        } else {
            None
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tri-state feature flag (garden, parking, garage).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "PresenceRepr")]
pub enum Presence {
    Yes,
    No,
    #[default]
    Unknown,
}

/// Listings feed these as booleans, as "Yes"/"No"/"N/A" strings, or as
/// null when the source had nothing to say.
#[derive(Deserialize)]
#[serde(untagged)]
enum PresenceRepr {
    Flag(bool),
    Text(String),
    Missing(Option<()>),
}

impl From<PresenceRepr> for Presence {
    fn from(value: PresenceRepr) -> Self {
        match value {
            PresenceRepr::Flag(true) => Presence::Yes,
            PresenceRepr::Flag(false) => Presence::No,
            PresenceRepr::Text(text) => Presence::from_listing_text(&text),
            PresenceRepr::Missing(_) => Presence::Unknown,
        }
    }
}

impl Presence {
    pub fn from_listing_text(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "yes" | "true" | "y" => Presence::Yes,
            "no" | "false" | "n" => Presence::No,
            _ => Presence::Unknown,
        }
    }

    /// `Yes` when any feature bullet mentions any keyword, case-insensitively.
    /// A listing that states its features but never mentions one is `No`.
    pub fn from_features(features: &[String], keywords: &[&str]) -> Self {
        let found = features.iter().any(|feature| {
            let feature = feature.to_lowercase();
            keywords
                .iter()
                .any(|keyword| feature.contains(&keyword.to_lowercase()))
        });
        if found {
            Presence::Yes
        } else {
            Presence::No
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Presence::Yes => "Yes",
            Presence::No => "No",
            Presence::Unknown => "N/A",
        }
    }
}

/// A recorded historical sale of the listed property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricePoint {
    pub year: i32,
    pub price: f64,
}

/// Facts about the listing itself. Anything the ingestion side could not
/// establish is `None` / `Unknown` and is never substituted downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyFacts {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,

    /// Asking price in pounds
    pub price: f64,

    #[serde(default)]
    pub floor_area_sqm: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub property_type: Option<PropertyType>,

    #[serde(default)]
    pub garden: Presence,
    #[serde(default)]
    pub parking: Presence,
    #[serde(default)]
    pub garage: Presence,

    #[serde(default)]
    pub listed_date: Option<NaiveDate>,

    #[serde(default)]
    pub distance_to_preferred_location_km: Option<f64>,
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,

    /// Chronological sale history, oldest first
    #[serde(default)]
    pub price_history: Vec<PricePoint>,
}

impl PropertyFacts {
    /// Asking price divided by floor area; `None` when either is unusable.
    pub fn price_per_sqm(&self) -> Option<f64> {
        let area = self.floor_area_sqm?;
        if !(self.price > 0.0) || !(area > 0.0) || !area.is_finite() {
            return None;
        }
        Some(self.price / area)
    }

    /// Whole days between listing and `reference`. Listing dates after the
    /// reference (clock skew) count as zero days.
    pub fn days_on_market(&self, reference: NaiveDate) -> Option<i64> {
        let listed = self.listed_date?;
        Some((reference - listed).num_days().max(0))
    }

    /// Earliest recorded sale, by year.
    pub fn earliest_sale(&self) -> Option<&PricePoint> {
        self.price_history.iter().min_by_key(|p| p.year)
    }
}
