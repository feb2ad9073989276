use serde::Serialize;
use tracing::debug;

use super::band::{Band, COMPOSITE_CEILING};
use super::comparator::match_score;
use super::config::ScoringContext;
use super::curve::round_half_up;
use super::market::{MarketMetrics, MarketSubScores};
use super::weights::normalize;
use crate::model::{Category, MarketContext, PropertyFacts, UserPreferences};

/// Preference totals are scaled from a 0-100 weighted mean to 0-500, the
/// same range as the market total.
pub const PREFERENCE_SCALE: f64 = 5.0;

/// How one preference category contributed to the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceScore {
    pub category: Category,
    /// Raw slider value, 0-100
    pub importance: Option<u8>,
    /// Slider as a fraction of all set sliders, 0-1
    pub weight: Option<f64>,
    /// How well the listing matches, 0-100
    pub matched: Option<f64>,
    /// weight x matched
    pub weighted: Option<f64>,
}

/// Full breakdown of a listing's score. Every intermediate value is kept
/// so the report can show where the composite came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub metrics: MarketMetrics,
    pub market: MarketSubScores,
    pub market_total: Option<f64>,
    pub preferences: Vec<PreferenceScore>,
    pub weights_total: Option<f64>,
    pub preference_total: Option<f64>,
    pub composite: Option<u16>,
    pub band: Option<Band>,
}

impl ScoreResult {
    pub fn preference(&self, category: Category) -> Option<&PreferenceScore> {
        self.preferences.iter().find(|p| p.category == category)
    }
}

/// Score one listing. Pure: the same inputs and context always give the
/// same result.
pub fn compute_score(
    facts: &PropertyFacts,
    market: &MarketContext,
    preferences: &UserPreferences,
    ctx: &ScoringContext,
) -> ScoreResult {
    let metrics = MarketMetrics::observe(facts, market, ctx);
    let market_scores = MarketSubScores::from_metrics(&metrics);
    let market_total = market_scores.total();
    debug!(?market_scores, ?market_total, "market sub-scores");

    let weights = normalize(&preferences.importance);
    let preference_scores: Vec<PreferenceScore> = Category::ALL
        .iter()
        .map(|&category| {
            let weight = weights.get(category);
            let matched = match_score(category, preferences, facts);
            PreferenceScore {
                category,
                importance: preferences.importance.get(category),
                weight,
                matched,
                weighted: weight.zip(matched).map(|(w, m)| w * m),
            }
        })
        .collect();

    // All-or-nothing: one unknown category nulls the whole total.
    let preference_total = preference_scores
        .iter()
        .map(|p| p.weighted)
        .sum::<Option<f64>>()
        .map(|sum| PREFERENCE_SCALE * sum);
    debug!(
        weights_total = ?weights.total,
        ?preference_total,
        "preference scores"
    );

    let composite = market_total
        .zip(preference_total)
        .map(|(m, p)| finalize_composite(m + p));
    let band = composite.map(Band::classify);
    debug!(?composite, ?band, "composite");

    ScoreResult {
        metrics,
        market: market_scores,
        market_total,
        preferences: preference_scores,
        weights_total: weights.total,
        preference_total,
        composite,
        band,
    }
}

/// Round half-up and clamp into the displayable 0-999 range.
fn finalize_composite(raw: f64) -> u16 {
    let rounded = round_half_up(raw).clamp(0.0, f64::from(COMPOSITE_CEILING));
    rounded as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Importance, Presence, PricePoint, PropertyType, SizeRange};
    use chrono::NaiveDate;

    fn reference_ctx() -> ScoringContext {
        ScoringContext::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
    }

    fn sample_facts() -> PropertyFacts {
        PropertyFacts {
            price: 300_000.0,
            floor_area_sqm: Some(100.0),
            bedrooms: Some(3),
            bathrooms: Some(2),
            property_type: Some(PropertyType::SemiDetached),
            garden: Presence::Yes,
            parking: Presence::Yes,
            garage: Presence::No,
            // 45 days before the reference date
            listed_date: NaiveDate::from_ymd_opt(2025, 4, 17),
            distance_to_preferred_location_km: Some(8.0),
            price_history: vec![PricePoint {
                year: 2015,
                price: 200_000.0,
            }],
            ..Default::default()
        }
    }

    fn sample_market() -> MarketContext {
        let mut market = MarketContext {
            average_price_per_sqm: Some(2800.0),
            sales_count_past_12_months: Some(2),
            ..Default::default()
        };
        market.yearly_average_sale_price.insert(2021, 250_000.0);
        market.yearly_average_sale_price.insert(2024, 250_000.0);
        market
    }

    fn sample_preferences() -> UserPreferences {
        UserPreferences {
            bedrooms: Some(3),
            bathrooms: Some(2),
            property_type: Some(PropertyType::SemiDetached),
            size: Some(SizeRange::parse("91-105").unwrap()),
            location: None,
            importance: Importance::uniform(50),
        }
    }

    #[test]
    fn test_partial_market_data_nulls_composite() {
        let facts = PropertyFacts {
            price: 300_000.0,
            floor_area_sqm: Some(100.0),
            listed_date: NaiveDate::from_ymd_opt(2025, 4, 17),
            ..Default::default()
        };
        let market = MarketContext {
            average_price_per_sqm: Some(2800.0),
            sales_count_past_12_months: Some(2),
            ..Default::default()
        };
        let result = compute_score(&facts, &market, &sample_preferences(), &reference_ctx());

        assert_eq!(result.market.ppqm, Some(40.0));
        assert_eq!(result.market.dom, Some(95.0));
        assert_eq!(result.market.nos, Some(70.0));
        assert_eq!(result.market.pgpy, None);
        assert_eq!(result.market.pct, None);
        assert_eq!(result.market_total, None);
        assert_eq!(result.composite, None);
        assert_eq!(result.band, None);
    }

    #[test]
    fn test_full_breakdown() {
        let result = compute_score(
            &sample_facts(),
            &sample_market(),
            &sample_preferences(),
            &reference_ctx(),
        );

        // 1.5x over ten years is ~4.14% a year -> 70.7
        assert_eq!(result.market.pgpy, Some(71.0));
        assert_eq!(result.market.pct, Some(50.0));
        assert_eq!(result.market_total, Some(40.0 + 95.0 + 71.0 + 50.0 + 70.0));

        assert_eq!(result.weights_total, Some(400.0));
        let garage = result.preference(Category::Garage).unwrap();
        assert_eq!(garage.weight, Some(0.125));
        assert_eq!(garage.matched, Some(0.0));
        assert_eq!(garage.weighted, Some(0.0));

        // seven perfect matches and one miss, equally weighted
        assert_eq!(result.preference_total, Some(437.5));
        assert_eq!(result.composite, Some(764));
        assert_eq!(result.band, Some(Band::VeryGood));
    }

    #[test]
    fn test_one_unknown_category_nulls_preference_total() {
        let mut facts = sample_facts();
        facts.garage = Presence::Unknown;
        let result = compute_score(&facts, &sample_market(), &sample_preferences(), &reference_ctx());

        assert_eq!(result.preference(Category::Garage).unwrap().matched, None);
        assert_eq!(result.preference(Category::Garden).unwrap().matched, Some(100.0));
        assert_eq!(result.preference_total, None);
        assert!(result.market_total.is_some());
        assert_eq!(result.composite, None);
        assert_eq!(result.band, None);
    }

    #[test]
    fn test_unset_slider_nulls_preference_total() {
        let mut prefs = sample_preferences();
        prefs.importance.location = None;
        let result = compute_score(&sample_facts(), &sample_market(), &prefs, &reference_ctx());

        assert_eq!(result.preference(Category::Location).unwrap().weight, None);
        assert_eq!(result.weights_total, Some(350.0));
        assert_eq!(result.preference_total, None);
    }

    #[test]
    fn test_zero_slider_still_counts() {
        let mut prefs = sample_preferences();
        prefs.importance.garage = Some(0);
        let result = compute_score(&sample_facts(), &sample_market(), &prefs, &reference_ctx());

        let garage = result.preference(Category::Garage).unwrap();
        assert_eq!(garage.weight, Some(0.0));
        assert_eq!(garage.weighted, Some(0.0));
        // remaining seven all match perfectly
        let total = result.preference_total.unwrap();
        assert!((total - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_idempotent() {
        let ctx = reference_ctx();
        let first = compute_score(&sample_facts(), &sample_market(), &sample_preferences(), &ctx);
        let second = compute_score(&sample_facts(), &sample_market(), &sample_preferences(), &ctx);
        assert_eq!(first, second);
    }

    #[test]
    fn test_composite_clamped_to_ceiling() {
        let mut facts = sample_facts();
        facts.garage = Presence::Yes;
        facts.listed_date = NaiveDate::from_ymd_opt(2025, 5, 25);
        // 1800/sqm against an area average of 2800
        facts.price = 180_000.0;
        facts.price_history = vec![PricePoint {
            year: 2020,
            price: 100_000.0,
        }];

        let mut market = sample_market();
        market.sales_count_past_12_months = Some(0);
        market.yearly_average_sale_price.insert(2024, 400_000.0);

        let result = compute_score(&facts, &market, &sample_preferences(), &reference_ctx());
        assert_eq!(result.market_total, Some(500.0));
        assert_eq!(result.composite, Some(999));
        assert_eq!(result.band, Some(Band::Excellent));
    }

    #[test]
    fn test_preferences_in_category_order() {
        let result = compute_score(
            &sample_facts(),
            &sample_market(),
            &sample_preferences(),
            &reference_ctx(),
        );
        let categories: Vec<Category> = result.preferences.iter().map(|p| p.category).collect();
        assert_eq!(categories, Category::ALL.to_vec());
    }

    #[test]
    fn test_composite_within_bounds() {
        let ctx = reference_ctx();
        for listed_days_ago in [0, 45, 200, 400] {
            for garage in [Presence::Yes, Presence::No] {
                let mut facts = sample_facts();
                facts.garage = garage;
                facts.listed_date =
                    Some(ctx.reference_date - chrono::Duration::days(listed_days_ago));
                let result = compute_score(&facts, &sample_market(), &sample_preferences(), &ctx);
                let composite = result.composite.unwrap();
                assert!(composite <= COMPOSITE_CEILING);
            }
        }
    }

    #[test]
    fn test_finalize_composite() {
        assert_eq!(finalize_composite(763.5), 764);
        assert_eq!(finalize_composite(763.49), 763);
        assert_eq!(finalize_composite(1000.0), 999);
        assert_eq!(finalize_composite(-3.0), 0);
    }
}
