use serde::{Deserialize, Serialize};

/// One input variable's share of the classifier's decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorWeight {
    pub feature: String,
    pub weight: f64,
}

impl FactorWeight {
    pub fn new(feature: impl Into<String>, weight: f64) -> Self {
        Self {
            feature: feature.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierResult {
    pub irrigation_required: bool,
    pub confidence: f64,
    pub probability_yes: f64,
    /// At most three factors, heaviest first.
    pub top_factors: Vec<FactorWeight>,
}

impl ClassifierResult {
    pub fn from_probability(probability_yes: f64, top_factors: Vec<FactorWeight>) -> Self {
        Self {
            irrigation_required: probability_yes > 0.5,
            confidence: probability_yes.max(1.0 - probability_yes),
            probability_yes,
            top_factors,
        }
    }
}
