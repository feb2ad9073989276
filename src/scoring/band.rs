use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;

/// Highest composite a listing can be shown with.
pub const COMPOSITE_CEILING: u16 = 999;

/// Qualitative label for a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Band {
    Poor,
    BelowAverage,
    Average,
    VeryGood,
    Excellent,
}

impl Band {
    pub const ALL: [Band; 5] = [
        Band::Poor,
        Band::BelowAverage,
        Band::Average,
        Band::VeryGood,
        Band::Excellent,
    ];

    /// Composites above the ceiling classify as Excellent.
    pub fn classify(composite: u16) -> Band {
        Band::ALL
            .into_iter()
            .find(|band| band.range().contains(&composite))
            .unwrap_or(Band::Excellent)
    }

    pub fn range(self) -> RangeInclusive<u16> {
        match self {
            Band::Poor => 0..=200,
            Band::BelowAverage => 201..=399,
            Band::Average => 400..=600,
            Band::VeryGood => 601..=800,
            Band::Excellent => 801..=COMPOSITE_CEILING,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Poor => "Poor",
            Band::BelowAverage => "Below Average",
            Band::Average => "Average",
            Band::VeryGood => "Very Good",
            Band::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
