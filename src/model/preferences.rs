use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::facts::PropertyType;
use super::geo::GeoPoint;

/// The eight preference categories a buyer can weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bedrooms,
    Bathrooms,
    PropertyType,
    Size,
    Garden,
    Parking,
    Garage,
    Location,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Bedrooms,
        Category::Bathrooms,
        Category::PropertyType,
        Category::Size,
        Category::Garden,
        Category::Parking,
        Category::Garage,
        Category::Location,
    ];

    /// Position in `Category::ALL`
    pub fn index(self) -> usize {
        match self {
            Category::Bedrooms => 0,
            Category::Bathrooms => 1,
            Category::PropertyType => 2,
            Category::Size => 3,
            Category::Garden => 4,
            Category::Parking => 5,
            Category::Garage => 6,
            Category::Location => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Bedrooms => "Bedrooms",
            Category::Bathrooms => "Bathrooms",
            Category::PropertyType => "Property type",
            Category::Size => "Size",
            Category::Garden => "Garden",
            Category::Parking => "Parking",
            Category::Garage => "Garage",
            Category::Location => "Location",
        }
    }

    /// Config key, matches the serde name
    pub fn key(self) -> &'static str {
        match self {
            Category::Bedrooms => "bedrooms",
            Category::Bathrooms => "bathrooms",
            Category::PropertyType => "property_type",
            Category::Size => "size",
            Category::Garden => "garden",
            Category::Parking => "parking",
            Category::Garage => "garage",
            Category::Location => "location",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Desired floor area in square metres.
/// Format: "N-M" (inclusive) or "N+" (open-ended)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SizeRange {
    Between { min: f64, max: f64 },
    AtLeast { min: f64 },
}

impl SizeRange {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(min) = s.strip_suffix('+') {
            let min: f64 = min.trim().parse()?;
            if !min.is_finite() || min < 0.0 {
                bail!("Size must be a non-negative number: {}", s);
            }
            Ok(SizeRange::AtLeast { min })
        } else if let Some((low, high)) = s.split_once('-') {
            let min: f64 = low.trim().parse()?;
            let max: f64 = high.trim().parse()?;
            if !min.is_finite() || !max.is_finite() || min < 0.0 {
                bail!("Size must be a non-negative number: {}", s);
            }
            if min > max {
                bail!("Size range minimum exceeds maximum: {}", s);
            }
            Ok(SizeRange::Between { min, max })
        } else {
            bail!("Size must look like '71-90' or '171+': {}", s)
        }
    }

    pub fn contains(&self, area: f64) -> bool {
        match *self {
            SizeRange::Between { min, max } => area >= min && area <= max,
            SizeRange::AtLeast { min } => area >= min,
        }
    }

    /// Distance from `area` to the nearer bound; zero inside the range.
    /// Open ranges only count shortfall below the minimum.
    pub fn distance(&self, area: f64) -> f64 {
        if self.contains(area) {
            return 0.0;
        }
        match *self {
            SizeRange::Between { min, max } => (area - min).abs().min((area - max).abs()),
            SizeRange::AtLeast { min } => min - area,
        }
    }
}

impl TryFrom<String> for SizeRange {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        SizeRange::parse(&value)
    }
}

impl From<SizeRange> for String {
    fn from(value: SizeRange) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SizeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeRange::Between { min, max } => write!(f, "{}-{}", min, max),
            SizeRange::AtLeast { min } => write!(f, "{}+", min),
        }
    }
}

/// Parse a desired room count as offered by the preferences form: "3" or
/// the open-ended "6+" (scored as 6).
pub fn parse_room_count(s: &str) -> Result<u32> {
    let s = s.trim();
    let digits = s.strip_suffix('+').unwrap_or(s);
    Ok(digits.trim().parse()?)
}

/// Where the buyer wants to live. The point is resolved from the postcode
/// by the geocoding collaborator and may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationPreference {
    pub postcode: String,
    #[serde(default)]
    pub point: Option<GeoPoint>,
}

/// One importance slider (0-100) per category. `None` means the buyer left
/// the slider unset, which is different from setting it to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Importance {
    #[serde(default)]
    pub bedrooms: Option<u8>,
    #[serde(default)]
    pub bathrooms: Option<u8>,
    #[serde(default)]
    pub property_type: Option<u8>,
    #[serde(default)]
    pub size: Option<u8>,
    #[serde(default)]
    pub garden: Option<u8>,
    #[serde(default)]
    pub parking: Option<u8>,
    #[serde(default)]
    pub garage: Option<u8>,
    #[serde(default)]
    pub location: Option<u8>,
}

impl Importance {
    /// Every slider at the same value
    pub fn uniform(value: u8) -> Self {
        let mut importance = Importance::default();
        for category in Category::ALL {
            importance.set(category, Some(value));
        }
        importance
    }

    pub fn get(&self, category: Category) -> Option<u8> {
        match category {
            Category::Bedrooms => self.bedrooms,
            Category::Bathrooms => self.bathrooms,
            Category::PropertyType => self.property_type,
            Category::Size => self.size,
            Category::Garden => self.garden,
            Category::Parking => self.parking,
            Category::Garage => self.garage,
            Category::Location => self.location,
        }
    }

    pub fn set(&mut self, category: Category, value: Option<u8>) {
        let slot = match category {
            Category::Bedrooms => &mut self.bedrooms,
            Category::Bathrooms => &mut self.bathrooms,
            Category::PropertyType => &mut self.property_type,
            Category::Size => &mut self.size,
            Category::Garden => &mut self.garden,
            Category::Parking => &mut self.parking,
            Category::Garage => &mut self.garage,
            Category::Location => &mut self.location,
        };
        *slot = value;
    }
}

/// What the buyer is looking for and how much each aspect matters.
///
/// Example YAML:
/// ```yaml
/// bedrooms: 3
/// bathrooms: 2
/// property_type: semi-detached
/// size: "91-105"
/// location:
///   postcode: "LS6 2AB"
///   point: { latitude: 53.82, longitude: -1.57 }
/// importance:
///   bedrooms: 80
///   size: 60
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPreferences {
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    #[serde(default)]
    pub size: Option<SizeRange>,
    #[serde(default)]
    pub location: Option<LocationPreference>,
    #[serde(default)]
    pub importance: Importance,
}
