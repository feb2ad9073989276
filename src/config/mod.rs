pub mod init;
mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::model::Snapshot;

/// Get the config directory path (~/.config/homescore/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("homescore"))
}

/// Get the default config file path (~/.config/homescore/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/homescore/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(path) => path,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `homescore init` to create one",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

/// Save configuration as YAML, atomically.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Load a listing snapshot. `.json` files are read as JSON, anything else
/// as YAML.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot at {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let snapshot: Snapshot = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: invalid JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: invalid YAML in {}", path.display()))?
    };

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Importance, UserPreferences};
    use std::env;

    #[test]
    fn test_load_missing_config() {
        let path = env::temp_dir().join("homescore_test_missing_config.yaml");
        let _ = fs::remove_file(&path);

        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = env::temp_dir()
            .join("homescore_test_roundtrip")
            .join("config.yaml");
        let _ = fs::remove_file(&path);

        let config = Config {
            scoring: None,
            preferences: UserPreferences {
                bedrooms: Some(3),
                importance: Importance::uniform(50),
                ..Default::default()
            },
        };
        save_config(&path, &config).unwrap();
        let loaded = load_config(Some(path.clone())).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml_config() {
        let path = env::temp_dir().join("homescore_test_invalid_config.yaml");
        fs::write(&path, "preferences: [unclosed").unwrap();

        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_yaml_snapshot() {
        let path = env::temp_dir().join("homescore_test_snapshot.yaml");
        fs::write(
            &path,
            "property:\n  price: 300000\n  floor_area_sqm: 100\nmarket:\n  average_price_per_sqm: 2800\n",
        )
        .unwrap();

        let snapshot = load_snapshot(&path).unwrap();
        assert_eq!(snapshot.property.price, 300_000.0);
        assert_eq!(snapshot.market.average_price_per_sqm, Some(2800.0));
        assert!(snapshot.evidence.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_json_snapshot() {
        let path = env::temp_dir().join("homescore_test_snapshot.json");
        fs::write(
            &path,
            r#"{"property": {"price": 250000, "garden": true}, "market": {"sales_count_past_12_months": 3}}"#,
        )
        .unwrap();

        let snapshot = load_snapshot(&path).unwrap();
        assert_eq!(snapshot.property.price, 250_000.0);
        assert_eq!(snapshot.market.sales_count_past_12_months, Some(3));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_snapshot_rejects_unknown_fields() {
        let path = env::temp_dir().join("homescore_test_snapshot_unknown.json");
        fs::write(&path, r#"{"property": {"price": 1, "pool": true}}"#).unwrap();

        assert!(load_snapshot(&path).is_err());

        let _ = fs::remove_file(&path);
    }
}
