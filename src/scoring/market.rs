//! The five market sub-scores: PPQM, DOM, PGPY, PCT and NOS.
//!
//! Every calculator is a pure function from a nullable observation to a
//! nullable 0-100 score. A missing or degenerate observation yields `None`;
//! nothing is ever substituted with a default.

use serde::Serialize;
use std::fmt;

use super::config::ScoringContext;
use super::curve::{bounded_score, lookup, piecewise, round_half_up, Breakpoint};
use crate::model::{MarketContext, PropertyFacts};

/// Listings on the market this long or less get full marks.
pub const DOM_FULL_SCORE_DAYS: i64 = 30;
/// Listings on the market this long or more score zero.
pub const DOM_ZERO_SCORE_DAYS: i64 = 361;

/// Average minus property price per sqm, in pounds. Both branches of the
/// rule (`(diff + 1000) / 20` at or below zero, `50 + diff / 20` above) lie
/// on this line.
const PPQM_CURVE: &[Breakpoint] = &[
    Breakpoint::new(-1000.0, 0.0),
    Breakpoint::new(0.0, 50.0),
    Breakpoint::new(1000.0, 100.0),
];

const DOM_CURVE: &[Breakpoint] = &[
    Breakpoint::new(DOM_FULL_SCORE_DAYS as f64, 100.0),
    Breakpoint::new(360.0, 0.0),
];

/// Property CAGR in percent
const PGPY_CURVE: &[Breakpoint] = &[
    Breakpoint::new(-3.0, 0.0),
    Breakpoint::new(0.0, 50.0),
    Breakpoint::new(10.0, 100.0),
];

/// Area CAGR in percent
const PCT_CURVE: &[Breakpoint] = &[Breakpoint::new(-6.0, 0.0), Breakpoint::new(6.0, 100.0)];

/// Indexed by sales count; seven or more sales score 0.
const NOS_TABLE: [f64; 7] = [100.0, 85.0, 70.0, 55.0, 40.0, 25.0, 10.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketMetric {
    Ppqm,
    Dom,
    Pgpy,
    Pct,
    Nos,
}

impl MarketMetric {
    pub const ALL: [MarketMetric; 5] = [
        MarketMetric::Ppqm,
        MarketMetric::Dom,
        MarketMetric::Pgpy,
        MarketMetric::Pct,
        MarketMetric::Nos,
    ];

    pub fn code(self) -> &'static str {
        match self {
            MarketMetric::Ppqm => "PPQM",
            MarketMetric::Dom => "DOM",
            MarketMetric::Pgpy => "PGPY",
            MarketMetric::Pct => "PCT",
            MarketMetric::Nos => "NOS",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarketMetric::Ppqm => "Price per sqm vs area",
            MarketMetric::Dom => "Days on market",
            MarketMetric::Pgpy => "Property growth per year",
            MarketMetric::Pct => "Area price trend",
            MarketMetric::Nos => "Competing sales",
        }
    }
}

impl fmt::Display for MarketMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Raw observations behind the market sub-scores, kept for the breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketMetrics {
    pub property_price_per_sqm: Option<f64>,
    pub average_price_per_sqm: Option<f64>,
    pub days_on_market: Option<i64>,
    /// Annualised growth of the property's own price, percent
    pub property_growth_percent: Option<f64>,
    /// Annualised growth of the area's yearly average, percent
    pub area_growth_percent: Option<f64>,
    pub sales_count: Option<u32>,
}

impl MarketMetrics {
    pub fn observe(facts: &PropertyFacts, market: &MarketContext, ctx: &ScoringContext) -> Self {
        Self {
            property_price_per_sqm: facts.price_per_sqm(),
            average_price_per_sqm: market.average_price_per_sqm(ctx.price_per_sqm_basis),
            days_on_market: facts.days_on_market(ctx.reference_date),
            property_growth_percent: property_growth_percent(facts, ctx.reference_year),
            area_growth_percent: area_growth_percent(market),
            sales_count: market.sales_count_past_12_months,
        }
    }

    /// Average minus property price per sqm; positive means the listing is
    /// cheaper than its area.
    pub fn price_per_sqm_difference(&self) -> Option<f64> {
        Some(self.average_price_per_sqm? - self.property_price_per_sqm?)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MarketSubScores {
    pub ppqm: Option<f64>,
    pub dom: Option<f64>,
    pub pgpy: Option<f64>,
    pub pct: Option<f64>,
    pub nos: Option<f64>,
}

impl MarketSubScores {
    pub fn from_metrics(metrics: &MarketMetrics) -> Self {
        Self {
            ppqm: ppqm(metrics.property_price_per_sqm, metrics.average_price_per_sqm),
            dom: dom(metrics.days_on_market),
            pgpy: pgpy(metrics.property_growth_percent),
            pct: pct(metrics.area_growth_percent),
            nos: nos(metrics.sales_count),
        }
    }

    pub fn get(&self, metric: MarketMetric) -> Option<f64> {
        match metric {
            MarketMetric::Ppqm => self.ppqm,
            MarketMetric::Dom => self.dom,
            MarketMetric::Pgpy => self.pgpy,
            MarketMetric::Pct => self.pct,
            MarketMetric::Nos => self.nos,
        }
    }

    /// Sum of all five, or `None` as soon as one is missing.
    pub fn total(&self) -> Option<f64> {
        MarketMetric::ALL
            .iter()
            .map(|m| self.get(*m))
            .sum::<Option<f64>>()
    }
}

/// Compound annual growth rate in percent.
/// `None` for a non-positive span or non-positive prices.
pub fn cagr_percent(earliest_price: f64, latest_price: f64, years: i32) -> Option<f64> {
    if years <= 0 || !(earliest_price > 0.0) || !(latest_price > 0.0) {
        return None;
    }
    let growth = ((latest_price / earliest_price).powf(1.0 / f64::from(years)) - 1.0) * 100.0;
    growth.is_finite().then_some(growth)
}

/// Growth from the earliest recorded sale to today's asking price, with
/// the asking price dated at `reference_year`.
pub fn property_growth_percent(facts: &PropertyFacts, reference_year: i32) -> Option<f64> {
    let earliest = facts.earliest_sale()?;
    cagr_percent(earliest.price, facts.price, reference_year - earliest.year)
}

/// Growth across the span of the area's yearly averages. The averages are
/// taken to whole pounds first.
pub fn area_growth_percent(market: &MarketContext) -> Option<f64> {
    let ((first_year, first_price), (last_year, last_price)) = market.yearly_span()?;
    cagr_percent(
        round_half_up(first_price),
        round_half_up(last_price),
        last_year - first_year,
    )
}

pub fn ppqm(property_price_per_sqm: Option<f64>, average_price_per_sqm: Option<f64>) -> Option<f64> {
    let property = property_price_per_sqm?;
    let average = average_price_per_sqm?;
    let diff = average - property;
    if !diff.is_finite() {
        return None;
    }
    Some(bounded_score(piecewise(diff, PPQM_CURVE)))
}

pub fn dom(days_on_market: Option<i64>) -> Option<f64> {
    let days = days_on_market?.max(0);
    if days <= DOM_FULL_SCORE_DAYS {
        return Some(100.0);
    }
    if days >= DOM_ZERO_SCORE_DAYS {
        return Some(0.0);
    }
    Some(bounded_score(piecewise(days as f64, DOM_CURVE)))
}

pub fn pgpy(growth_percent: Option<f64>) -> Option<f64> {
    let growth = growth_percent.filter(|g| g.is_finite())?;
    Some(bounded_score(piecewise(growth, PGPY_CURVE)))
}

pub fn pct(growth_percent: Option<f64>) -> Option<f64> {
    let growth = growth_percent.filter(|g| g.is_finite())?;
    Some(bounded_score(piecewise(growth, PCT_CURVE)))
}

pub fn nos(sales_count: Option<u32>) -> Option<f64> {
    Some(lookup(sales_count?, &NOS_TABLE, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PricePoint;

    #[test]
    fn test_ppqm_below_average_price() {
        // Property 3000/sqm vs average 2800/sqm: diff -200 -> (800)/20 = 40
        assert_eq!(ppqm(Some(3000.0), Some(2800.0)), Some(40.0));
    }

    #[test]
    fn test_ppqm_cheaper_than_area() {
        // diff +300 -> 50 + 15 = 65
        assert_eq!(ppqm(Some(2500.0), Some(2800.0)), Some(65.0));
        assert_eq!(ppqm(Some(2800.0), Some(2800.0)), Some(50.0));
    }

    #[test]
    fn test_ppqm_clamps() {
        assert_eq!(ppqm(Some(5000.0), Some(2800.0)), Some(0.0));
        assert_eq!(ppqm(Some(1000.0), Some(2800.0)), Some(100.0));
    }

    #[test]
    fn test_ppqm_null_inputs() {
        assert_eq!(ppqm(None, Some(2800.0)), None);
        assert_eq!(ppqm(Some(3000.0), None), None);
    }

    #[test]
    fn test_ppqm_monotone_in_overpricing() {
        let average = 3000.0;
        let mut previous = f64::INFINITY;
        for step in -150..=150 {
            let property = average + f64::from(step) * 10.0;
            let score = ppqm(Some(property), Some(average)).unwrap();
            assert!(score <= previous, "ppqm rose at property={}", property);
            previous = score;
        }
    }

    #[test]
    fn test_dom_boundaries() {
        assert_eq!(dom(Some(0)), Some(100.0));
        assert_eq!(dom(Some(30)), Some(100.0));
        assert_eq!(dom(Some(360)), Some(0.0));
        assert_eq!(dom(Some(361)), Some(0.0));
        assert_eq!(dom(Some(5000)), Some(0.0));
    }

    #[test]
    fn test_dom_interpolates() {
        // 100 - 15 * 100 / 330 = 95.45
        assert_eq!(dom(Some(45)), Some(95.0));
        // midpoint of the slope
        assert_eq!(dom(Some(195)), Some(50.0));
    }

    #[test]
    fn test_dom_negative_days_count_as_zero() {
        assert_eq!(dom(Some(-3)), Some(100.0));
    }

    #[test]
    fn test_dom_null() {
        assert_eq!(dom(None), None);
    }

    #[test]
    fn test_dom_monotone() {
        let mut previous = f64::INFINITY;
        for days in 0..=400 {
            let score = dom(Some(days)).unwrap();
            assert!(score <= previous, "dom rose at day {}", days);
            previous = score;
        }
    }

    #[test]
    fn test_pgpy_anchor_points() {
        assert_eq!(pgpy(Some(0.0)), Some(50.0));
        assert_eq!(pgpy(Some(-3.0)), Some(0.0));
        assert_eq!(pgpy(Some(10.0)), Some(100.0));
        assert_eq!(pgpy(Some(-3.1)), Some(0.0));
        assert_eq!(pgpy(Some(10.1)), Some(100.0));
    }

    #[test]
    fn test_pgpy_segments() {
        // segment A: -1.5% is halfway to 50
        assert_eq!(pgpy(Some(-1.5)), Some(25.0));
        // segment B: 5% is halfway between 50 and 100
        assert_eq!(pgpy(Some(5.0)), Some(75.0));
        assert_eq!(pgpy(None), None);
        assert_eq!(pgpy(Some(f64::NAN)), None);
    }

    #[test]
    fn test_pct_anchor_points() {
        assert_eq!(pct(Some(0.0)), Some(50.0));
        assert_eq!(pct(Some(-6.0)), Some(0.0));
        assert_eq!(pct(Some(6.0)), Some(100.0));
        assert_eq!(pct(Some(-9.0)), Some(0.0));
        assert_eq!(pct(Some(3.0)), Some(75.0));
        assert_eq!(pct(None), None);
    }

    #[test]
    fn test_nos_lookup() {
        assert_eq!(nos(Some(0)), Some(100.0));
        assert_eq!(nos(Some(1)), Some(85.0));
        assert_eq!(nos(Some(2)), Some(70.0));
        assert_eq!(nos(Some(3)), Some(55.0));
        assert_eq!(nos(Some(6)), Some(10.0));
        assert_eq!(nos(Some(7)), Some(0.0));
        assert_eq!(nos(Some(100)), Some(0.0));
        assert_eq!(nos(None), None);
    }

    #[test]
    fn test_cagr_percent() {
        // doubling over ~7.27 years at 10%
        let growth = cagr_percent(100_000.0, 121_000.0, 2).unwrap();
        assert!((growth - 10.0).abs() < 1e-9);

        assert_eq!(cagr_percent(100_000.0, 100_000.0, 5), Some(0.0));
        assert_eq!(cagr_percent(100_000.0, 120_000.0, 0), None);
        assert_eq!(cagr_percent(100_000.0, 120_000.0, -2), None);
        assert_eq!(cagr_percent(0.0, 120_000.0, 3), None);
        assert_eq!(cagr_percent(100_000.0, 0.0, 3), None);
    }

    #[test]
    fn test_property_growth_uses_asking_price_at_reference_year() {
        let facts = PropertyFacts {
            price: 121_000.0,
            price_history: vec![PricePoint { year: 2023, price: 100_000.0 }],
            ..Default::default()
        };
        let growth = property_growth_percent(&facts, 2025).unwrap();
        assert!((growth - 10.0).abs() < 1e-9);

        // Sale in the reference year itself has no span
        assert_eq!(property_growth_percent(&facts, 2023), None);
    }

    #[test]
    fn test_property_growth_needs_history() {
        let facts = PropertyFacts {
            price: 300_000.0,
            ..Default::default()
        };
        assert_eq!(property_growth_percent(&facts, 2025), None);
    }

    #[test]
    fn test_area_growth() {
        let mut market = MarketContext::default();
        market.yearly_average_sale_price.insert(2020, 200_000.0);
        market.yearly_average_sale_price.insert(2022, 242_000.0);
        let growth = area_growth_percent(&market).unwrap();
        assert!((growth - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_area_growth_uses_whole_pounds() {
        let mut market = MarketContext::default();
        market.yearly_average_sale_price.insert(2023, 100.4);
        market.yearly_average_sale_price.insert(2024, 120.6);
        let growth = area_growth_percent(&market).unwrap();
        assert!((growth - 21.0).abs() < 1e-9);

        market.yearly_average_sale_price.insert(2022, 0.4);
        assert_eq!(area_growth_percent(&market), None);
    }

    #[test]
    fn test_price_per_sqm_difference() {
        let metrics = MarketMetrics {
            property_price_per_sqm: Some(3000.0),
            average_price_per_sqm: Some(2800.0),
            ..Default::default()
        };
        assert_eq!(metrics.price_per_sqm_difference(), Some(-200.0));
        assert_eq!(MarketMetrics::default().price_per_sqm_difference(), None);
    }

    #[test]
    fn test_market_total_requires_all_five() {
        let mut scores = MarketSubScores {
            ppqm: Some(40.0),
            dom: Some(95.0),
            pgpy: Some(60.0),
            pct: Some(55.0),
            nos: Some(70.0),
        };
        assert_eq!(scores.total(), Some(320.0));

        scores.pct = None;
        assert_eq!(scores.total(), None);
    }
}
