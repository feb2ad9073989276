use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config};
use crate::model::preferences::parse_room_count;
use crate::model::{
    Category, GeoPoint, Importance, LocationPreference, PricePerSqmBasis, PropertyType, SizeRange,
    UserPreferences,
};
use crate::scoring::ScoringSettings;

const BEDROOM_CHOICES: &[&str] = &["1", "2", "3", "4", "5", "6+"];
const BATHROOM_CHOICES: &[&str] = &["1", "2", "3", "4+"];
const SIZE_CHOICES: &[&str] = &[
    "50-70", "71-90", "91-105", "106-120", "121-140", "141-170", "171+",
];
const DEFAULT_IMPORTANCE: u8 = 50;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

/// Ask for one of `choices`, or "skip" for no preference.
fn prompt_choice(message: &str, choices: &[&str], default: &str) -> Result<Option<String>> {
    loop {
        let input = prompt_with_default(
            &format!("{} ({}, or 'skip')", message, choices.join(", ")),
            default,
        )?;
        if input.eq_ignore_ascii_case("skip") {
            return Ok(None);
        }
        if choices.iter().any(|c| c.eq_ignore_ascii_case(&input)) {
            return Ok(Some(input));
        }
        println!("  Invalid: pick one of {}. Try again.", choices.join(", "));
    }
}

fn prompt_room_count(message: &str, choices: &[&str], default: &str) -> Result<Option<u32>> {
    match prompt_choice(message, choices, default)? {
        Some(choice) => Ok(Some(parse_room_count(&choice)?)),
        None => Ok(None),
    }
}

fn prompt_property_type() -> Result<Option<PropertyType>> {
    let names: Vec<String> = PropertyType::ALL
        .iter()
        .map(|t| t.label().to_lowercase())
        .collect();
    let choices: Vec<&str> = names.iter().map(String::as_str).collect();
    let choice = prompt_choice("Property type", &choices, "semi-detached")?;
    Ok(choice.and_then(|c| PropertyType::from_listing_text(&c)))
}

fn prompt_size() -> Result<Option<SizeRange>> {
    typewriter("Floor area is in square metres. Pick a band or type your own, e.g. '85-100' or '150+'.");
    loop {
        let input = prompt_with_default(
            &format!("Size ({}, or 'skip')", SIZE_CHOICES.join(", ")),
            "91-105",
        )?;
        if input.eq_ignore_ascii_case("skip") {
            return Ok(None);
        }
        match SizeRange::parse(&input) {
            Ok(range) => return Ok(Some(range)),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

fn prompt_location() -> Result<Option<LocationPreference>> {
    let postcode = prompt("Preferred postcode (blank to skip): ")?;
    if postcode.is_empty() {
        return Ok(None);
    }

    typewriter("Coordinates let homescore work out distances when a listing doesn't state one.");
    let point = if prompt_yes_no("Enter latitude/longitude for this postcode?", false)? {
        loop {
            let latitude = prompt("  Latitude: ")?;
            let longitude = prompt("  Longitude: ")?;
            match (latitude.parse::<f64>(), longitude.parse::<f64>()) {
                (Ok(lat), Ok(lon)) if GeoPoint::new(lat, lon).is_valid() => {
                    break Some(GeoPoint::new(lat, lon));
                }
                _ => println!("  Invalid: latitude must be -90..90 and longitude -180..180. Try again."),
            }
        }
    } else {
        None
    };

    Ok(Some(LocationPreference {
        postcode: postcode.to_uppercase(),
        point,
    }))
}

fn prompt_importance() -> Result<Importance> {
    typewriter("Now rate how much each category matters to you, from 0 (not at all) to 100 (essential).");
    typewriter("Type 'skip' to leave a slider unset. A listing is only given a preference score when every slider is set.");
    let mut importance = Importance::default();
    for category in Category::ALL {
        let value = loop {
            let input = prompt_with_default(
                &format!("  {}", category.label()),
                &DEFAULT_IMPORTANCE.to_string(),
            )?;
            if input.eq_ignore_ascii_case("skip") {
                break None;
            }
            match input.parse::<u8>() {
                Ok(v) if v <= 100 => break Some(v),
                _ => println!("  Invalid: must be a whole number from 0 to 100. Try again."),
            }
        };
        importance.set(category, value);
    }
    Ok(importance)
}

fn prompt_scoring() -> Result<Option<ScoringSettings>> {
    typewriter("Price per square metre can be compared against a weighted area average (total price over total floor area) or a simple mean of each sale.");
    if !prompt_yes_no("Change scoring settings? (n keeps the defaults)", false)? {
        return Ok(None);
    }

    let basis = loop {
        let input = prompt_with_default("Price per sqm basis (weighted, simple)", "weighted")?;
        match input.to_lowercase().as_str() {
            "weighted" => break PricePerSqmBasis::Weighted,
            "simple" => break PricePerSqmBasis::Simple,
            _ => println!("  Invalid: must be 'weighted' or 'simple'. Try again."),
        }
    };

    let reference_year = loop {
        let input = prompt_with_default("Reference year for growth ('auto' uses today)", "auto")?;
        if input.eq_ignore_ascii_case("auto") {
            break None;
        }
        match input.parse::<i32>() {
            Ok(year) if year > 1900 => break Some(year),
            _ => println!("  Invalid: must be a year such as 2025, or 'auto'. Try again."),
        }
    };

    Ok(Some(ScoringSettings {
        reference_year,
        price_per_sqm_basis: Some(basis),
    }))
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("homescore Preferences Wizard");
    println!("============================");
    println!();

    typewriter("First, tell us what you're looking for.");
    let bedrooms = prompt_room_count("Bedrooms", BEDROOM_CHOICES, "3")?;
    let bathrooms = prompt_room_count("Bathrooms", BATHROOM_CHOICES, "2")?;
    let property_type = prompt_property_type()?;
    println!();
    let size = prompt_size()?;
    println!();
    let location = prompt_location()?;
    println!();
    let importance = prompt_importance()?;
    println!();
    let scoring = prompt_scoring()?;

    let config = Config {
        scoring,
        preferences: UserPreferences {
            bedrooms,
            bathrooms,
            property_type,
            size,
            location,
            importance,
        },
    };

    if let Err(errors) = crate::scoring::validate_preferences(&config.preferences) {
        println!();
        println!("These preferences won't produce a score:");
        for error in &errors {
            println!("  - {}", error);
        }
        if !prompt_yes_no("Save anyway?", false)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let default_config_path = match default_path {
        Some(path) => path,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `homescore score <snapshot.yaml>` to score a listing.");

    Ok(())
}
