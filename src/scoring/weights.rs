use crate::model::{Category, Importance};

/// Importance sliders scaled to fractions of their sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedWeights {
    /// Sum of the sliders that were set; `None` when none were
    pub total: Option<f64>,
    weights: [Option<f64>; 8],
}

impl NormalizedWeights {
    pub fn get(&self, category: Category) -> Option<f64> {
        self.weights[category.index()]
    }
}

/// Unset sliders are left out of the sum rather than counted as zero. A
/// zero or missing sum leaves every weight `None`.
pub fn normalize(importance: &Importance) -> NormalizedWeights {
    let sliders = Category::ALL.map(|c| importance.get(c).map(f64::from));

    let total = sliders
        .iter()
        .flatten()
        .copied()
        .reduce(|acc, w| acc + w);

    let weights = match total {
        Some(sum) if sum > 0.0 => sliders.map(|w| w.map(|w| w / sum)),
        _ => [None; 8],
    };

    NormalizedWeights { total, weights }
}
