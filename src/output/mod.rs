pub mod formatter;
pub mod tone;

pub use formatter::{
    format_bands, format_composite, format_currency, format_json, format_report, format_score,
    format_tsv, should_use_colors,
};
