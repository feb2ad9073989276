//! Traffic-light indicators for the raw market figures and match strengths.

use owo_colors::OwoColorize;

use crate::scoring::MarketMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Great,
    Good,
    Fair,
    Poor,
}

impl Tone {
    pub fn paint(self, text: &str, use_colors: bool) -> String {
        if !use_colors {
            return text.to_string();
        }
        match self {
            Tone::Great => text.green().bold().to_string(),
            Tone::Good => text.bright_green().to_string(),
            Tone::Fair => text.yellow().to_string(),
            Tone::Poor => text.red().to_string(),
        }
    }
}

/// Property price per sqm relative to the area average, in pounds.
pub fn price_per_sqm_tone(metrics: &MarketMetrics) -> Option<Tone> {
    let below = metrics.price_per_sqm_difference()?;
    let tone = if below < -50.0 {
        Tone::Poor
    } else if below > 150.0 {
        Tone::Great
    } else if below > 50.0 {
        Tone::Good
    } else {
        Tone::Fair
    };
    Some(tone)
}

pub fn days_on_market_tone(days: Option<i64>) -> Option<Tone> {
    let tone = match days? {
        i64::MIN..=30 => Tone::Great,
        31..=44 => Tone::Good,
        45..=60 => Tone::Fair,
        _ => Tone::Poor,
    };
    Some(tone)
}

pub fn sales_count_tone(count: Option<u32>) -> Option<Tone> {
    let tone = match count? {
        0 => Tone::Great,
        1 => Tone::Good,
        2 => Tone::Fair,
        _ => Tone::Poor,
    };
    Some(tone)
}

pub fn growth_tone(percent: Option<f64>) -> Option<Tone> {
    let percent = percent?;
    let tone = if percent < 0.0 {
        Tone::Poor
    } else if percent > 4.0 {
        Tone::Great
    } else if percent > 2.0 {
        Tone::Good
    } else {
        Tone::Fair
    };
    Some(tone)
}

/// Preference match: strong at 70 and above, weak below 50.
pub fn match_tone(matched: Option<f64>) -> Option<Tone> {
    let matched = matched?;
    let tone = if matched >= 70.0 {
        Tone::Great
    } else if matched >= 50.0 {
        Tone::Fair
    } else {
        Tone::Poor
    };
    Some(tone)
}
