use serde::{Deserialize, Serialize};

/// A completed sale matched to an energy certificate, so its floor area is
/// known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchedSale {
    pub price: f64,
    pub floor_area_sqm: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PricePerSqmStats {
    /// Mean of each sale's own price per sqm
    pub simple_average: Option<f64>,
    /// Total price over total floor area
    pub weighted_average: Option<f64>,
    pub matched_sale_count: usize,
}

/// Both area averages over the usable sales. Sales with a non-positive
/// price or floor area are skipped.
pub fn price_per_sqm_stats(sales: &[MatchedSale]) -> PricePerSqmStats {
    let mut ratio_sum = 0.0;
    let mut price_sum = 0.0;
    let mut area_sum = 0.0;
    let mut count = 0usize;

    for sale in sales {
        if !usable(sale.price) || !usable(sale.floor_area_sqm) {
            continue;
        }
        ratio_sum += sale.price / sale.floor_area_sqm;
        price_sum += sale.price;
        area_sum += sale.floor_area_sqm;
        count += 1;
    }

    if count == 0 {
        return PricePerSqmStats::default();
    }

    PricePerSqmStats {
        simple_average: Some(ratio_sum / count as f64),
        weighted_average: (area_sum > 0.0).then(|| price_sum / area_sum),
        matched_sale_count: count,
    }
}

fn usable(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
