pub mod facts;
pub mod geo;
pub mod market;
pub mod preferences;

pub use facts::{Presence, PricePoint, PropertyFacts, PropertyType};
pub use geo::GeoPoint;
pub use market::{MarketContext, PricePerSqmBasis};
pub use preferences::{Category, Importance, LocationPreference, SizeRange, UserPreferences};

use serde::{Deserialize, Serialize};

use crate::market_data::Evidence;

/// One listing as handed over by the ingestion and market-data collaborators.
///
/// Example YAML:
/// ```yaml
/// property:
///   price: 300000
///   floor_area_sqm: 100
///   bedrooms: 3
///   listed_date: 2025-03-01
/// market:
///   average_price_per_sqm: 2800
///   sales_count_past_12_months: 2
/// evidence:
///   property_type_text: "Semi-Detached House"
///   postcode_transfer_dates: [2025-01-14, 2024-09-02]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    pub property: PropertyFacts,
    #[serde(default)]
    pub market: MarketContext,
    /// Raw collaborator output used to fill gaps in the two sections above
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}
