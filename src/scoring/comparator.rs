//! Per-category match scores between what the buyer wants and what the
//! listing offers.

use super::curve::{lookup, round_half_up};
use crate::model::{Category, GeoPoint, Presence, PropertyFacts, SizeRange, UserPreferences};

pub const KM_TO_MILES: f64 = 0.621371;

/// Score by absolute difference: exact 100, off by one 60, by two 20.
const DISCRETE_TABLE: [f64; 3] = [100.0, 60.0, 20.0];

/// Points lost per square metre outside the desired size range
const SIZE_PENALTY_PER_SQM: f64 = 3.0;

const LOCATION_FULL_SCORE_MILES: f64 = 5.0;
const LOCATION_ZERO_SCORE_MILES: f64 = 105.0;

/// Match score for one category, or `None` when either side is unknown.
pub fn match_score(
    category: Category,
    preferences: &UserPreferences,
    facts: &PropertyFacts,
) -> Option<f64> {
    match category {
        Category::Bedrooms => discrete_match(preferences.bedrooms, facts.bedrooms),
        Category::Bathrooms => discrete_match(preferences.bathrooms, facts.bathrooms),
        Category::PropertyType => discrete_match(
            preferences.property_type.map(|t| t.ordinal()),
            facts.property_type.map(|t| t.ordinal()),
        ),
        Category::Size => size_match(preferences.size.as_ref(), facts.floor_area_sqm),
        Category::Garden => presence_match(facts.garden),
        Category::Parking => presence_match(facts.parking),
        Category::Garage => presence_match(facts.garage),
        Category::Location => location_match(resolve_distance_km(preferences, facts)),
    }
}

pub fn discrete_match(desired: Option<u32>, actual: Option<u32>) -> Option<f64> {
    let diff = desired?.abs_diff(actual?);
    Some(lookup(diff, &DISCRETE_TABLE, 0.0))
}

pub fn size_match(desired: Option<&SizeRange>, actual_sqm: Option<f64>) -> Option<f64> {
    let range = desired?;
    let area = actual_sqm.filter(|a| a.is_finite() && *a > 0.0)?;
    let distance = range.distance(area);
    Some(round_half_up(100.0 - SIZE_PENALTY_PER_SQM * distance).max(0.0))
}

pub fn presence_match(presence: Presence) -> Option<f64> {
    match presence {
        Presence::Yes => Some(100.0),
        Presence::No => Some(0.0),
        Presence::Unknown => None,
    }
}

pub fn location_match(distance_km: Option<f64>) -> Option<f64> {
    let km = distance_km.filter(|d| d.is_finite() && *d >= 0.0)?;
    let miles = round_half_up(km * KM_TO_MILES);
    let score = if miles <= LOCATION_FULL_SCORE_MILES {
        100.0
    } else if miles >= LOCATION_ZERO_SCORE_MILES {
        0.0
    } else {
        LOCATION_ZERO_SCORE_MILES - miles
    };
    Some(score)
}

/// Distance supplied with the listing, falling back to the great-circle
/// distance between the listing and the buyer's resolved point.
pub fn resolve_distance_km(preferences: &UserPreferences, facts: &PropertyFacts) -> Option<f64> {
    if let Some(km) = facts.distance_to_preferred_location_km {
        return Some(km);
    }
    let target: &GeoPoint = preferences.location.as_ref()?.point.as_ref()?;
    let listing = facts.coordinates.as_ref()?;
    if !target.is_valid() || !listing.is_valid() {
        return None;
    }
    Some(listing.distance_km(target))
}
