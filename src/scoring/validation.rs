use crate::model::{Category, MarketContext, PropertyFacts, Snapshot, UserPreferences};

/// Most yearly averages the market-data side is expected to supply
pub const MAX_YEARLY_AVERAGES: usize = 5;

/// Validate buyer preferences before scoring.
/// Returns all validation errors at once (not just the first).
pub fn validate_preferences(prefs: &UserPreferences) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for category in Category::ALL {
        if let Some(value) = prefs.importance.get(category) {
            if value > 100 {
                errors.push(format!(
                    "preferences.importance.{}: must be between 0 and 100, got {}",
                    category.key(),
                    value
                ));
            }
        }
    }

    if Category::ALL
        .iter()
        .all(|c| prefs.importance.get(*c).is_none())
    {
        errors.push("preferences.importance: at least one slider must be set".to_string());
    }

    if let Some(ref location) = prefs.location {
        if location.postcode.trim().is_empty() {
            errors.push("preferences.location.postcode: must not be empty".to_string());
        }
        if let Some(point) = location.point {
            if !point.is_valid() {
                errors.push(format!(
                    "preferences.location.point: invalid coordinates ({}, {})",
                    point.latitude, point.longitude
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a listing snapshot. Missing values are fine; values that are
/// present but impossible are not.
pub fn validate_snapshot(snapshot: &Snapshot) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    check_property(&snapshot.property, &mut errors);
    check_market(&snapshot.market, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_property(facts: &PropertyFacts, errors: &mut Vec<String>) {
    if !facts.price.is_finite() || facts.price <= 0.0 {
        errors.push(format!(
            "property.price: must be a positive amount, got {}",
            facts.price
        ));
    }

    if let Some(area) = facts.floor_area_sqm {
        if !area.is_finite() || area < 0.0 {
            errors.push(format!(
                "property.floor_area_sqm: must be non-negative, got {}",
                area
            ));
        }
    }

    if let Some(km) = facts.distance_to_preferred_location_km {
        if !km.is_finite() || km < 0.0 {
            errors.push(format!(
                "property.distance_to_preferred_location_km: must be non-negative, got {}",
                km
            ));
        }
    }

    if let Some(point) = facts.coordinates {
        if !point.is_valid() {
            errors.push(format!(
                "property.coordinates: invalid coordinates ({}, {})",
                point.latitude, point.longitude
            ));
        }
    }

    for (i, sale) in facts.price_history.iter().enumerate() {
        if !sale.price.is_finite() || sale.price <= 0.0 {
            errors.push(format!(
                "property.price_history[{}].price: must be a positive amount, got {}",
                i, sale.price
            ));
        }
    }
    for (i, pair) in facts.price_history.windows(2).enumerate() {
        if pair[1].year < pair[0].year {
            errors.push(format!(
                "property.price_history[{}].year: {} is earlier than the entry before it ({})",
                i + 1,
                pair[1].year,
                pair[0].year
            ));
        }
    }
}

fn check_market(market: &MarketContext, errors: &mut Vec<String>) {
    let averages = [
        ("average_price_per_sqm", market.average_price_per_sqm),
        (
            "simple_average_price_per_sqm",
            market.simple_average_price_per_sqm,
        ),
        ("average_sale_price", market.average_sale_price),
    ];
    for (field, value) in averages {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!(
                    "market.{}: must be non-negative, got {}",
                    field, value
                ));
            }
        }
    }

    if market.yearly_average_sale_price.len() > MAX_YEARLY_AVERAGES {
        errors.push(format!(
            "market.yearly_average_sale_price: at most {} years allowed, got {}",
            MAX_YEARLY_AVERAGES,
            market.yearly_average_sale_price.len()
        ));
    }
    for (year, price) in &market.yearly_average_sale_price {
        if !price.is_finite() || *price <= 0.0 {
            errors.push(format!(
                "market.yearly_average_sale_price.{}: must be a positive amount, got {}",
                year, price
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GeoPoint, Importance, LocationPreference, PricePoint};

    fn valid_snapshot() -> Snapshot {
        Snapshot {
            property: PropertyFacts {
                price: 300_000.0,
                floor_area_sqm: Some(100.0),
                ..Default::default()
            },
            market: MarketContext::default(),
            evidence: None,
        }
    }

    #[test]
    fn test_valid_preferences() {
        let prefs = UserPreferences {
            importance: Importance::uniform(50),
            ..Default::default()
        };
        assert!(validate_preferences(&prefs).is_ok());
    }

    #[test]
    fn test_slider_out_of_range() {
        let prefs = UserPreferences {
            importance: Importance {
                garage: Some(150),
                ..Importance::uniform(50)
            },
            ..Default::default()
        };
        let errors = validate_preferences(&prefs).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("preferences.importance.garage"));
    }

    #[test]
    fn test_no_sliders_set() {
        let prefs = UserPreferences::default();
        let errors = validate_preferences(&prefs).unwrap_err();
        assert!(errors[0].contains("at least one slider"));
    }

    #[test]
    fn test_zero_sliders_are_set() {
        let prefs = UserPreferences {
            importance: Importance::uniform(0),
            ..Default::default()
        };
        assert!(validate_preferences(&prefs).is_ok());
    }

    #[test]
    fn test_invalid_location() {
        let prefs = UserPreferences {
            location: Some(LocationPreference {
                postcode: " ".to_string(),
                point: Some(GeoPoint::new(120.0, 0.0)),
            }),
            importance: Importance::uniform(50),
            ..Default::default()
        };
        let errors = validate_preferences(&prefs).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("preferences.location.postcode"));
        assert!(errors[1].contains("preferences.location.point"));
    }

    #[test]
    fn test_valid_snapshot() {
        assert!(validate_snapshot(&valid_snapshot()).is_ok());
    }

    #[test]
    fn test_missing_values_are_valid() {
        let snapshot = Snapshot {
            property: PropertyFacts {
                price: 250_000.0,
                ..Default::default()
            },
            market: MarketContext::default(),
            evidence: None,
        };
        assert!(validate_snapshot(&snapshot).is_ok());
    }

    #[test]
    fn test_non_positive_price() {
        let mut snapshot = valid_snapshot();
        snapshot.property.price = 0.0;
        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert!(errors[0].contains("property.price"));
    }

    #[test]
    fn test_price_history_out_of_order() {
        let mut snapshot = valid_snapshot();
        snapshot.property.price_history = vec![
            PricePoint { year: 2018, price: 180_000.0 },
            PricePoint { year: 2012, price: 150_000.0 },
        ];
        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("property.price_history[1].year"));
    }

    #[test]
    fn test_too_many_yearly_averages() {
        let mut snapshot = valid_snapshot();
        for year in 2018..2024 {
            snapshot
                .market
                .yearly_average_sale_price
                .insert(year, 250_000.0);
        }
        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert!(errors[0].contains("at most 5 years"));
    }

    #[test]
    fn test_negative_average_sale_price() {
        let mut snapshot = valid_snapshot();
        snapshot.market.average_sale_price = Some(-1.0);
        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("market.average_sale_price"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut snapshot = valid_snapshot();
        snapshot.property.price = -1.0; // Error 1
        snapshot.property.floor_area_sqm = Some(-20.0); // Error 2
        snapshot.property.price_history = vec![PricePoint { year: 2010, price: 0.0 }]; // Error 3
        snapshot.market.average_price_per_sqm = Some(-5.0); // Error 4
        let errors = validate_snapshot(&snapshot).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
