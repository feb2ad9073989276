use serde::{Deserialize, Serialize};

use crate::model::UserPreferences;
use crate::scoring::ScoringSettings;

/// Contents of `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional scoring settings (uses date-derived defaults when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringSettings>,

    pub preferences: UserPreferences,
}

impl Config {
    pub fn scoring_settings(&self) -> ScoringSettings {
        self.scoring.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Importance, PricePerSqmBasis, PropertyType, SizeRange};

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
scoring:
  reference_year: 2025
  price_per_sqm_basis: simple
preferences:
  bedrooms: 3
  bathrooms: 2
  property_type: semi-detached
  size: "91-105"
  location:
    postcode: "SW1A 1AA"
    point: { latitude: 51.501, longitude: -0.142 }
  importance:
    bedrooms: 80
    bathrooms: 50
    property_type: 60
    size: 70
    garden: 40
    parking: 30
    garage: 10
    location: 90
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let scoring = config.scoring.unwrap();
        assert_eq!(scoring.reference_year, Some(2025));
        assert_eq!(scoring.price_per_sqm_basis, Some(PricePerSqmBasis::Simple));
        assert_eq!(config.preferences.property_type, Some(PropertyType::SemiDetached));
        assert_eq!(
            config.preferences.size,
            Some(SizeRange::Between { min: 91.0, max: 105.0 })
        );
        assert_eq!(config.preferences.importance.location, Some(90));
    }

    #[test]
    fn test_config_without_scoring() {
        let yaml = r#"
preferences:
  bedrooms: 2
  importance:
    bedrooms: 100
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.scoring.is_none());
        assert_eq!(config.scoring_settings(), ScoringSettings::default());
        assert_eq!(config.preferences.bedrooms, Some(2));
    }

    #[test]
    fn test_config_requires_preferences() {
        let yaml = "scoring:\n  reference_year: 2025\n";
        let result: Result<Config, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            scoring: None,
            preferences: UserPreferences {
                bedrooms: Some(4),
                size: Some(SizeRange::AtLeast { min: 171.0 }),
                importance: Importance::uniform(50),
                ..Default::default()
            },
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
