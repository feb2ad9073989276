use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::PricePerSqmBasis;

/// Scoring settings from the config file.
///
/// Every field is optional; unset fields fall back to values derived from
/// the reference date.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   reference_year: 2025
///   price_per_sqm_basis: weighted
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringSettings {
    /// Year the asking price is dated at for property growth (default: the
    /// reference date's year)
    #[serde(default)]
    pub reference_year: Option<i32>,

    /// Which area average PPQM compares against (default: weighted)
    #[serde(default)]
    pub price_per_sqm_basis: Option<PricePerSqmBasis>,
}

/// Everything time-dependent or configurable the engine needs, injected so
/// scoring stays reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringContext {
    pub reference_date: NaiveDate,
    pub reference_year: i32,
    pub price_per_sqm_basis: PricePerSqmBasis,
}

impl ScoringContext {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            reference_year: reference_date.year(),
            price_per_sqm_basis: PricePerSqmBasis::default(),
        }
    }

    /// Apply config file settings on top of the date-derived defaults.
    pub fn with_settings(mut self, settings: &ScoringSettings) -> Self {
        if let Some(year) = settings.reference_year {
            self.reference_year = year;
        }
        if let Some(basis) = settings.price_per_sqm_basis {
            self.price_per_sqm_basis = basis;
        }
        self
    }
}
