use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which price-per-square-metre figure the market collaborator's output
/// should feed into PPQM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricePerSqmBasis {
    /// Sum of prices over sum of matched floor areas
    #[default]
    Weighted,
    /// Mean of the per-sale price/area ratios
    Simple,
}

/// Area statistics for the listing's outcode and property type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketContext {
    /// Trailing 12-month, floor-area weighted average price per sqm
    #[serde(default)]
    pub average_price_per_sqm: Option<f64>,

    /// Trailing 12-month unweighted mean of price per sqm
    #[serde(default)]
    pub simple_average_price_per_sqm: Option<f64>,

    /// Average sale price per calendar year, at most five years
    #[serde(default)]
    pub yearly_average_sale_price: BTreeMap<i32, f64>,

    /// Sale-count weighted average sale price across those years
    #[serde(default)]
    pub average_sale_price: Option<f64>,

    /// Completed sales in the listing's full postcode over the past 12 months
    #[serde(default)]
    pub sales_count_past_12_months: Option<u32>,
}

impl MarketContext {
    pub fn average_price_per_sqm(&self, basis: PricePerSqmBasis) -> Option<f64> {
        match basis {
            PricePerSqmBasis::Weighted => self.average_price_per_sqm,
            PricePerSqmBasis::Simple => self.simple_average_price_per_sqm,
        }
    }

    /// First and last entries of the yearly averages, when there are at
    /// least two distinct years.
    pub fn yearly_span(&self) -> Option<((i32, f64), (i32, f64))> {
        if self.yearly_average_sale_price.len() < 2 {
            return None;
        }
        let first = self.yearly_average_sale_price.iter().next()?;
        let last = self.yearly_average_sale_price.iter().next_back()?;
        Some(((*first.0, *first.1), (*last.0, *last.1)))
    }
}
