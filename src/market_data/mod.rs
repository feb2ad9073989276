//! Boundary helpers for the ingestion and market-data collaborators.
//!
//! A snapshot may carry raw evidence (feature bullets, matched sales, yearly
//! aggregates, transfer dates, floor area sources) instead of, or alongside, the
//! derived figures. [`fill_from_evidence`] derives whatever the snapshot
//! does not already state; values present in the snapshot always win.

pub mod floor_area;
pub mod sales;
pub mod stats;

pub use floor_area::{
    extract_floor_area_from_text, resolve_floor_area, FloorAreaOrigin, FloorAreaSources,
};
pub use sales::{count_sales_past_12_months, yearly_averages, YearlyAverages, YearlySaleBucket};
pub use stats::{price_per_sqm_stats, MatchedSale, PricePerSqmStats};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Presence, PropertyType, Snapshot};

pub const GARDEN_KEYWORDS: &[&str] = &["garden", "patio", "outdoor space", "yard"];
pub const PARKING_KEYWORDS: &[&str] = &["parking", "driveway", "off-street parking"];
pub const GARAGE_KEYWORDS: &[&str] = &["garage"];

/// Raw collaborator output for one listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Evidence {
    /// Listing's own property type wording, e.g. "End of Terrace"
    #[serde(default)]
    pub property_type_text: Option<String>,
    /// Listing's feature bullets; absent means the listing had none to read
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub floor_area: Option<FloorAreaSources>,
    /// Recent sales of the same type in the outcode, with floor areas
    #[serde(default)]
    pub matched_sales: Vec<MatchedSale>,
    #[serde(default)]
    pub yearly_sales: Vec<YearlySaleBucket>,
    /// Transfer dates in the listing's full postcode
    #[serde(default)]
    pub postcode_transfer_dates: Option<Vec<NaiveDate>>,
}

/// Fill gaps in `snapshot` from its evidence, if it has any.
pub fn fill_from_evidence(snapshot: &mut Snapshot, reference_date: NaiveDate) {
    let Some(evidence) = snapshot.evidence.as_ref() else {
        return;
    };
    let property = &mut snapshot.property;
    let market = &mut snapshot.market;

    if property.property_type.is_none() {
        property.property_type = evidence
            .property_type_text
            .as_deref()
            .and_then(PropertyType::from_listing_text);
    }

    if let Some(features) = evidence.features.as_deref() {
        for (presence, keywords) in [
            (&mut property.garden, GARDEN_KEYWORDS),
            (&mut property.parking, PARKING_KEYWORDS),
            (&mut property.garage, GARAGE_KEYWORDS),
        ] {
            if *presence == Presence::Unknown {
                *presence = Presence::from_features(features, keywords);
            }
        }
    }

    if property.floor_area_sqm.is_none() {
        if let Some((sqm, origin)) = evidence.floor_area.as_ref().and_then(resolve_floor_area) {
            debug!(sqm, ?origin, "floor area resolved");
            property.floor_area_sqm = Some(sqm);
        }
    }

    if !evidence.matched_sales.is_empty() {
        let stats = price_per_sqm_stats(&evidence.matched_sales);
        debug!(?stats, "price per sqm from matched sales");
        if market.average_price_per_sqm.is_none() {
            market.average_price_per_sqm = stats.weighted_average;
        }
        if market.simple_average_price_per_sqm.is_none() {
            market.simple_average_price_per_sqm = stats.simple_average;
        }
    }

    if !evidence.yearly_sales.is_empty() {
        let averages = yearly_averages(&evidence.yearly_sales);
        if market.average_sale_price.is_none() {
            market.average_sale_price = averages.overall_average;
        }
        if market.yearly_average_sale_price.is_empty() {
            market.yearly_average_sale_price = averages.by_year;
        }
    }

    if market.sales_count_past_12_months.is_none() {
        market.sales_count_past_12_months = evidence
            .postcode_transfer_dates
            .as_deref()
            .map(|dates| count_sales_past_12_months(dates, reference_date));
    }
}
