use super::encoding::{EncodedFeatures, EncodingScheme, Normalization, FEATURE_NAMES};
use super::{LogisticModel, PredictionCapability};
use crate::config::ClassifierConfig;
use crate::error::{AgriSenseError, Result};
use crate::models::{ClassifierResult, FactorWeight, FeatureVector};
use std::sync::Arc;

/// Number of importance factors reported with each prediction.
pub const TOP_FACTOR_COUNT: usize = 3;
/// Allowed drift of the importance total from 1.0.
pub const IMPORTANCE_TOLERANCE: f64 = 1e-6;

/// Encodes field snapshots the way the injected model was trained and turns
/// its raw probability into a [`ClassifierResult`].
#[derive(Clone)]
pub struct ClassifierAdapter {
    model: Option<Arc<dyn PredictionCapability>>,
    scheme: EncodingScheme,
    normalization: Normalization,
}

impl ClassifierAdapter {
    pub fn new(scheme: EncodingScheme, normalization: Normalization) -> Result<Self> {
        normalization.validate()?;
        Ok(Self {
            model: None,
            scheme,
            normalization,
        })
    }

    /// Inject the prediction capability. Its encoding version must match the
    /// adapter's scheme.
    pub fn with_model(mut self, model: Arc<dyn PredictionCapability>) -> Result<Self> {
        check_encoding(self.scheme, model.as_ref())?;
        self.model = Some(model);
        Ok(self)
    }

    /// Build an adapter backed by a [`LogisticModel`] from configuration.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let scheme = EncodingScheme::from_version(config.encoding_version)?;
        let model = LogisticModel::new(
            config.model.intercept,
            config.model.coefficients.clone(),
            config.model.feature_importances.clone(),
            config.encoding_version,
        )?;
        tracing::debug!(
            encoding_version = config.encoding_version,
            "loaded logistic irrigation classifier"
        );
        Self::new(scheme, config.normalization.clone())?.with_model(Arc::new(model))
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Categorical codes plus standard-score normalization.
    pub fn encode(&self, field: &FeatureVector) -> EncodedFeatures {
        self.normalization.apply(&self.scheme.encode(field))
    }

    pub fn predict(&self, field: &FeatureVector) -> Result<ClassifierResult> {
        let model = self.model.as_deref().ok_or_else(|| {
            AgriSenseError::Configuration("classifier invoked without a prediction model".into())
        })?;
        check_encoding(self.scheme, model)?;

        let encoded = self.encode(field);
        let probability_yes = model.predict_proba(&encoded);
        if !(0.0..=1.0).contains(&probability_yes) {
            return Err(AgriSenseError::Configuration(format!(
                "model returned probability {} outside [0, 1]",
                probability_yes
            )));
        }

        let top_factors = top_factors(model)?;
        let result = ClassifierResult::from_probability(probability_yes, top_factors);

        tracing::debug!(
            probability_yes,
            irrigate = result.irrigation_required,
            "classifier prediction"
        );

        Ok(result)
    }
}

impl std::fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierAdapter")
            .field("model", &self.model.as_ref().map(|_| "[model]"))
            .field("scheme", &self.scheme)
            .field("normalization", &self.normalization)
            .finish()
    }
}

fn check_encoding(scheme: EncodingScheme, model: &dyn PredictionCapability) -> Result<()> {
    if model.encoding_version() != scheme.version() {
        return Err(AgriSenseError::Configuration(format!(
            "model was fit with encoding v{} but the adapter uses v{}",
            model.encoding_version(),
            scheme.version()
        )));
    }
    Ok(())
}

/// Heaviest importances first, ties in feature declaration order.
fn top_factors(model: &dyn PredictionCapability) -> Result<Vec<FactorWeight>> {
    let importances = model.feature_importances();

    if let Some(unknown) = importances
        .keys()
        .find(|name| !FEATURE_NAMES.contains(&name.as_str()))
    {
        return Err(AgriSenseError::Configuration(format!(
            "model reports importance for unknown feature '{}'",
            unknown
        )));
    }

    let mut factors = Vec::with_capacity(FEATURE_NAMES.len());
    for name in FEATURE_NAMES {
        let weight = importances.get(name).copied().unwrap_or(0.0);
        if !(0.0..=1.0).contains(&weight) {
            return Err(AgriSenseError::Configuration(format!(
                "importance {} for '{}' is outside [0, 1]",
                weight, name
            )));
        }
        factors.push(FactorWeight::new(name, weight));
    }

    let total: f64 = factors.iter().map(|f| f.weight).sum();
    if (total - 1.0).abs() > IMPORTANCE_TOLERANCE {
        return Err(AgriSenseError::Configuration(format!(
            "feature importances sum to {:.6}, expected 1",
            total
        )));
    }

    // Stable sort keeps declaration order among equal weights
    factors.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    factors.truncate(TOP_FACTOR_COUNT);
    Ok(factors)
}
