pub mod adapter;
pub mod encoding;
pub mod logistic;

pub use adapter::ClassifierAdapter;
pub use encoding::{EncodingScheme, Normalization, FEATURE_COUNT, FEATURE_NAMES};
pub use logistic::LogisticModel;

use std::collections::HashMap;

/// A trained binary classifier the adapter can delegate to.
///
/// Implementations must be immutable once built: importances are fixed at
/// load time and `predict_proba` must not mutate shared state.
pub trait PredictionCapability: Send + Sync {
    /// Probability that irrigation is required, given normalized features in
    /// declaration order.
    fn predict_proba(&self, encoded_features: &[f64]) -> f64;

    /// Feature name to importance weight.
    fn feature_importances(&self) -> &HashMap<String, f64>;

    /// Version of the categorical encoding the model was fit with.
    fn encoding_version(&self) -> u32;
}
