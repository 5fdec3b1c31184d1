use super::encoding::{FEATURE_COUNT, FEATURE_NAMES};
use super::PredictionCapability;
use crate::error::{AgriSenseError, Result};
use std::collections::HashMap;

/// Logistic-regression classifier with weights fitted offline.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    intercept: f64,
    coefficients: Vec<f64>,
    importances: HashMap<String, f64>,
    encoding_version: u32,
}

impl LogisticModel {
    /// Build from fitted weights. When `importances` is `None` they are
    /// derived from the normalized absolute coefficients.
    pub fn new(
        intercept: f64,
        coefficients: Vec<f64>,
        importances: Option<HashMap<String, f64>>,
        encoding_version: u32,
    ) -> Result<Self> {
        Self::check_weights(intercept, &coefficients)?;

        let importances = importances.unwrap_or_else(|| coefficient_importances(&coefficients));

        Ok(Self {
            intercept,
            coefficients,
            importances,
            encoding_version,
        })
    }

    /// Reject weights that cannot produce a probability.
    pub fn check_weights(intercept: f64, coefficients: &[f64]) -> Result<()> {
        if coefficients.len() != FEATURE_COUNT {
            return Err(AgriSenseError::Configuration(format!(
                "logistic model needs {} coefficients, got {}",
                FEATURE_COUNT,
                coefficients.len()
            )));
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(AgriSenseError::Configuration(
                "logistic model weights must be finite".into(),
            ));
        }
        Ok(())
    }
}

fn coefficient_importances(coefficients: &[f64]) -> HashMap<String, f64> {
    let total: f64 = coefficients.iter().map(|c| c.abs()).sum();
    FEATURE_NAMES
        .iter()
        .zip(coefficients)
        .map(|(name, c)| {
            let weight = if total > 0.0 {
                c.abs() / total
            } else {
                1.0 / FEATURE_COUNT as f64
            };
            (name.to_string(), weight)
        })
        .collect()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl PredictionCapability for LogisticModel {
    fn predict_proba(&self, encoded_features: &[f64]) -> f64 {
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(encoded_features)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        sigmoid(z)
    }

    fn feature_importances(&self) -> &HashMap<String, f64> {
        &self.importances
    }

    fn encoding_version(&self) -> u32 {
        self.encoding_version
    }
}
