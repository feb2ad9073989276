use serde::{Deserialize, Serialize};

pub const SQFT_TO_SQM: f64 = 0.092903;

/// Square-foot spellings, checked before the metric ones
const SQFT_UNITS: &[&str] = &[
    "sq. ft", "sq.ft", "sq ft", "sqft", "square feet", "square foot", "ft²", "ft2",
];

const SQM_UNITS: &[&str] = &[
    "sq. m", "sq.m", "sq m", "sqm", "square metres", "square meters", "square metre",
    "square meter", "m²", "m2",
];

/// Everything the ingestion side may know about a listing's floor area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FloorAreaSources {
    /// Listing portal's own size field, lower bound
    #[serde(default)]
    pub size_sq_feet_min: Option<f64>,
    /// Listing portal's own size field, upper bound
    #[serde(default)]
    pub size_sq_feet_max: Option<f64>,
    /// Square metres read off the floor-plan image
    #[serde(default)]
    pub floor_plan_sqm: Option<f64>,
    /// Free-text listing description
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorAreaOrigin {
    ListingField,
    FloorPlan,
    Description,
}

/// Resolve a floor area in square metres, trying the listing field, then
/// the floor plan, then the description.
pub fn resolve_floor_area(sources: &FloorAreaSources) -> Option<(f64, FloorAreaOrigin)> {
    let from_field = [sources.size_sq_feet_min, sources.size_sq_feet_max]
        .into_iter()
        .flatten()
        .find(|sqft| usable(*sqft))
        .map(sqft_to_sqm);
    if let Some(sqm) = from_field {
        return Some((sqm, FloorAreaOrigin::ListingField));
    }

    if let Some(sqm) = sources.floor_plan_sqm.filter(|a| usable(*a)) {
        return Some((sqm, FloorAreaOrigin::FloorPlan));
    }

    sources
        .description
        .as_deref()
        .and_then(extract_floor_area_from_text)
        .map(|sqm| (sqm, FloorAreaOrigin::Description))
}

/// Converted to square metres, rounded to two decimals.
pub fn sqft_to_sqm(sqft: f64) -> f64 {
    (sqft * SQFT_TO_SQM * 100.0).round() / 100.0
}

/// First "<number> <unit>" mention in `text`, in square metres.
///
/// Recognises "1,250 sq ft", "116 sqm", "116m²", "approx. 95 square
/// metres" and similar. Returns `None` when nothing matches.
pub fn extract_floor_area_from_text(text: &str) -> Option<f64> {
    let lower = text.to_lowercase();
    let mut rest = lower.as_str();

    while let Some(start) = rest.find(|c: char| c.is_ascii_digit()) {
        let tail = &rest[start..];
        let len = tail
            .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
            .unwrap_or(tail.len());
        let (number, after) = tail.split_at(len);
        rest = after;

        let value: f64 = match number
            .trim_end_matches(['.', ','])
            .replace(',', "")
            .parse()
        {
            Ok(v) => v,
            Err(_) => continue,
        };
        if !usable(value) {
            continue;
        }

        let unit_text = after.trim_start();
        if SQFT_UNITS.iter().any(|u| unit_text.starts_with(u)) {
            return Some(sqft_to_sqm(value));
        }
        if SQM_UNITS.iter().any(|u| unit_text.starts_with(u)) {
            return Some(value);
        }
    }
    None
}

fn usable(area: f64) -> bool {
    area.is_finite() && area > 0.0
}
