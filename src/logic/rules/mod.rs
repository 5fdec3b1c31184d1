pub mod engine;
pub mod moisture_deficit;
pub mod optimal_range;
pub mod over_irrigation;
pub mod rain_delay;
pub mod rain_probability;
pub mod risk;

pub use engine::RuleEvaluator;

use crate::models::{FeatureVector, RuleDecision};

/// Terminal irrigation rule. Rules are checked in precedence order and the
/// first one returning a decision wins.
pub trait IrrigationRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Return a decision if this rule's conditions are met
    fn evaluate(&self, field: &FeatureVector) -> Option<RuleDecision>;
}

/// Modifier applied to whichever decision a terminal rule produced.
pub trait RuleAdjustment: Send + Sync {
    fn id(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn adjust(&self, field: &FeatureVector, decision: RuleDecision) -> RuleDecision;
}
