use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scoring::validation::MAX_YEARLY_AVERAGES;

/// One row of the land registry's per-year aggregate for an outcode and
/// property type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YearlySaleBucket {
    pub year: i32,
    #[serde(default)]
    pub average_price: Option<f64>,
    #[serde(default)]
    pub sale_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearlyAverages {
    pub by_year: BTreeMap<i32, f64>,
    /// Sale-count weighted mean over the kept years
    pub overall_average: Option<f64>,
}

/// Keep the most recent years that actually had sales with a usable
/// average.
pub fn yearly_averages(buckets: &[YearlySaleBucket]) -> YearlyAverages {
    let mut usable: Vec<&YearlySaleBucket> = buckets
        .iter()
        .filter(|b| b.sale_count > 0)
        .filter(|b| b.average_price.is_some_and(|p| p.is_finite() && p > 0.0))
        .collect();
    usable.sort_by_key(|b| std::cmp::Reverse(b.year));
    usable.dedup_by_key(|b| b.year);
    usable.truncate(MAX_YEARLY_AVERAGES);

    let mut by_year = BTreeMap::new();
    let mut weighted_sum = 0.0;
    let mut total_count = 0u64;
    for bucket in usable {
        if let Some(price) = bucket.average_price {
            by_year.insert(bucket.year, price);
            weighted_sum += price * f64::from(bucket.sale_count);
            total_count += u64::from(bucket.sale_count);
        }
    }

    YearlyAverages {
        by_year,
        overall_average: (total_count > 0).then(|| weighted_sum / total_count as f64),
    }
}

/// Transfers on or after the same calendar day twelve months before
/// `reference`.
pub fn count_sales_past_12_months(transfer_dates: &[NaiveDate], reference: NaiveDate) -> u32 {
    let cutoff = reference
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN);
    let count = transfer_dates.iter().filter(|d| **d >= cutoff).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
