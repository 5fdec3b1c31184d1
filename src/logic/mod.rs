pub mod arbiter;
pub mod calculations;
pub mod classifier;
pub mod engine;
pub mod formatter;
pub mod rules;

pub use arbiter::DecisionArbiter;
pub use classifier::{ClassifierAdapter, PredictionCapability};
pub use engine::AdvisoryEngine;
pub use formatter::{PresentationRecord, RecommendationFormatter};
pub use rules::RuleEvaluator;
