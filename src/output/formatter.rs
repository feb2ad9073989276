use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use super::tone::{
    days_on_market_tone, growth_tone, match_tone, price_per_sqm_tone, sales_count_tone, Tone,
};
use crate::model::{MarketContext, PropertyFacts};
use crate::scoring::engine::PREFERENCE_SCALE;
use crate::scoring::{Band, MarketMetric, PreferenceScore, ScoreResult};

const NOT_AVAILABLE: &str = "N/A";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Whole-number score, or "N/A"
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:.0}", s),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Totals keep one decimal when they have one (437.5), otherwise none
pub fn format_total(total: Option<f64>) -> String {
    match total {
        Some(t) if t.fract() == 0.0 => format!("{:.0}", t),
        Some(t) => format!("{:.1}", t),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_composite(composite: Option<u16>) -> String {
    match composite {
        Some(c) => c.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Whole pounds with thousands separators: "£300,000"
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-£{}", grouped)
    } else {
        format!("£{}", grouped)
    }
}

pub fn format_price_per_sqm(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}/m²", format_currency(v)),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Fraction 0-1 as a percentage: 0.125 -> "12.5%"
pub fn format_weight(weight: Option<f64>) -> String {
    match weight {
        Some(w) => {
            let pct = w * 100.0;
            if (pct - pct.round()).abs() < 1e-9 {
                format!("{:.0}%", pct)
            } else {
                format!("{:.1}%", pct)
            }
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

fn format_days(days: Option<i64>) -> String {
    match days {
        Some(1) => "1 day".to_string(),
        Some(d) => format!("{} days", d),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn format_count(count: Option<u32>) -> String {
    match count {
        Some(c) => c.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn paint(text: String, tone: Option<Tone>, use_colors: bool) -> String {
    match tone {
        Some(tone) => tone.paint(&text, use_colors),
        None => text,
    }
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn dim(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

/// Raw figure behind a market sub-score, with its indicator tone
fn market_observation(metric: MarketMetric, result: &ScoreResult) -> (String, Option<Tone>) {
    let m = &result.metrics;
    match metric {
        MarketMetric::Ppqm => (
            format!(
                "{} vs {}",
                format_price_per_sqm(m.property_price_per_sqm),
                format_price_per_sqm(m.average_price_per_sqm)
            ),
            price_per_sqm_tone(m),
        ),
        MarketMetric::Dom => (
            format_days(m.days_on_market),
            days_on_market_tone(m.days_on_market),
        ),
        MarketMetric::Pgpy => (
            format!("{}/yr", format_percent(m.property_growth_percent)),
            growth_tone(m.property_growth_percent),
        ),
        MarketMetric::Pct => (
            format!("{}/yr", format_percent(m.area_growth_percent)),
            growth_tone(m.area_growth_percent),
        ),
        MarketMetric::Nos => (
            format!("{} sales", format_count(m.sales_count)),
            sales_count_tone(m.sales_count),
        ),
    }
}

fn format_preference_row(pref: &PreferenceScore, use_colors: bool) -> String {
    let importance = pref
        .importance
        .map(|i| i.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let matched = format!("{:>5}", format_score(pref.matched));
    format!(
        "  {:<14}{:>10}{:>8}  {}{:>10}",
        pref.category.label(),
        importance,
        format_weight(pref.weight),
        paint(matched, match_tone(pref.matched), use_colors),
        format_total(pref.weighted.map(|w| w * PREFERENCE_SCALE)),
    )
}

/// Full breakdown report for one listing.
pub fn format_report(
    facts: &PropertyFacts,
    market: &MarketContext,
    result: &ScoreResult,
    use_colors: bool,
) -> String {
    let mut lines = Vec::new();

    let title = facts
        .address
        .clone()
        .or_else(|| facts.postcode.clone())
        .unwrap_or_else(|| "Listing".to_string());
    let title = match get_terminal_width() {
        Some(width) if width > 20 => truncate_text(&title, width),
        Some(_) => truncate_text(&title, 20),
        None => title,
    };
    lines.push(heading(&title, use_colors));
    lines.push(dim(
        &format!(
            "{}  {}",
            format_currency(facts.price),
            facts
                .property_type
                .map(|t| t.label())
                .unwrap_or(NOT_AVAILABLE)
        ),
        use_colors,
    ));
    lines.push(dim(
        &format!(
            "Garden: {}  Parking: {}  Garage: {}",
            facts.garden.label(),
            facts.parking.label(),
            facts.garage.label()
        ),
        use_colors,
    ));
    lines.push(String::new());

    let band = result.band.map(|b| b.label()).unwrap_or(NOT_AVAILABLE);
    lines.push(format!(
        "{} {} / 999  ({})",
        heading("Score:", use_colors),
        heading(&format_composite(result.composite), use_colors),
        band
    ));
    lines.push(String::new());

    lines.push(heading("Market", use_colors));
    for metric in MarketMetric::ALL {
        let (observation, tone) = market_observation(metric, result);
        lines.push(format!(
            "  {:<5} {:<26}{:>5}  {}",
            metric.code(),
            metric.label(),
            format_score(result.market.get(metric)),
            paint(observation, tone, use_colors),
        ));
    }
    lines.push(format!(
        "  {:<32}{:>5} / 500",
        "Market total",
        format_total(result.market_total)
    ));
    lines.push(dim(
        &format!(
            "  Area average sale price: {}",
            market
                .average_sale_price
                .map(format_currency)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        ),
        use_colors,
    ));
    lines.push(String::new());

    lines.push(heading("Preferences", use_colors));
    lines.push(dim(
        &format!(
            "  {:<14}{:>10}{:>8}  {:>5}{:>10}",
            "Category", "Importance", "Weight", "Match", "Points"
        ),
        use_colors,
    ));
    for pref in &result.preferences {
        lines.push(format_preference_row(pref, use_colors));
    }
    lines.push(format!(
        "  {:<32}{:>5} / 500",
        "Preference total",
        format_total(result.preference_total)
    ));

    lines.join("\n")
}

/// Key/value lines for scripting (no headers, no colors)
pub fn format_tsv(result: &ScoreResult) -> String {
    let mut rows = vec![
        ("composite".to_string(), format_composite(result.composite)),
        (
            "band".to_string(),
            result
                .band
                .map(|b| b.label().to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        ("market_total".to_string(), format_total(result.market_total)),
        (
            "preference_total".to_string(),
            format_total(result.preference_total),
        ),
    ];
    for metric in MarketMetric::ALL {
        rows.push((
            metric.code().to_lowercase(),
            format_score(result.market.get(metric)),
        ));
    }
    for pref in &result.preferences {
        rows.push((pref.category.key().to_string(), format_score(pref.matched)));
    }

    rows.iter()
        .map(|(key, value)| format!("{}\t{}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_json(result: &ScoreResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize score result")
}

/// The band table, for `homescore bands`
pub fn format_bands(use_colors: bool) -> String {
    Band::ALL
        .iter()
        .map(|band| {
            let range = band.range();
            let label = format!("{:<14}", band.label());
            format!(
                "{}{:>4} - {:>3}",
                heading(&label, use_colors),
                range.start(),
                range.end()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
