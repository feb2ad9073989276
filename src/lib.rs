//! Score a property listing against its local market and a buyer's weighted
//! preferences.
//!
//! Five market sub-scores (0-100 each) and eight preference matches are
//! combined into a composite out of 999 and classified into a band. Missing
//! inputs stay missing: any total that depends on them is `None`.

pub mod config;
pub mod market_data;
pub mod model;
pub mod output;
pub mod scoring;
pub mod telemetry;
