//! Piecewise-linear transfer curves shared by the sub-score calculators.
//!
//! Each curve is a list of breakpoints sorted by input. Values between two
//! breakpoints are linearly interpolated; values beyond either end take the
//! end's score, so a curve whose ends sit at 0 and 100 clamps for free.

/// A point on a transfer curve: raw metric `input` maps to `score`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub input: f64,
    pub score: f64,
}

impl Breakpoint {
    pub const fn new(input: f64, score: f64) -> Self {
        Self { input, score }
    }
}

/// Interpolate `value` along `curve`. An empty curve scores 0.
pub fn piecewise(value: f64, curve: &[Breakpoint]) -> f64 {
    debug_assert!(
        curve.windows(2).all(|w| w[0].input <= w[1].input),
        "breakpoints must be sorted by input"
    );
    let (first, last) = match (curve.first(), curve.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return 0.0,
    };

    if value <= first.input {
        return first.score;
    }
    for w in curve.windows(2) {
        if value <= w[1].input {
            let span = w[1].input - w[0].input;
            if span == 0.0 {
                return w[1].score;
            }
            let frac = (value - w[0].input) / span;
            return w[0].score + frac * (w[1].score - w[0].score);
        }
    }
    last.score
}

/// Round halves towards positive infinity (2.5 -> 3, -2.5 -> -2).
///
/// `f64::round` rounds halves away from zero, which disagrees on negative
/// halves; scores must round the same way everywhere.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Clamp to the 0-100 sub-score range, then round.
pub fn bounded_score(value: f64) -> f64 {
    round_half_up(value.clamp(0.0, 100.0))
}

/// Score for a non-negative count from a descending lookup table; counts
/// past the end of the table take `beyond`.
pub fn lookup(count: u32, table: &[f64], beyond: f64) -> f64 {
    table.get(count as usize).copied().unwrap_or(beyond)
}
