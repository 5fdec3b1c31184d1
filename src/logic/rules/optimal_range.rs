use super::IrrigationRule;
use crate::logic::calculations::{DRY_THRESHOLD_PCT, WET_THRESHOLD_PCT};
use crate::models::{FeatureVector, RuleDecision, Severity};

/// Optimal range rule - moisture between 30% and 60% inclusive needs no water.
/// Applied when no other terminal rule matches.
pub struct OptimalRangeRule;

impl OptimalRangeRule {
    pub fn decide(&self, field: &FeatureVector) -> RuleDecision {
        RuleDecision::hold(
            Severity::None,
            format!(
                "Moisture {:.1}% is within the optimal range ({:.0}-{:.0}%)",
                field.moisture_pct(),
                DRY_THRESHOLD_PCT,
                WET_THRESHOLD_PCT
            ),
        )
    }
}

impl IrrigationRule for OptimalRangeRule {
    fn id(&self) -> &'static str {
        "optimal_range"
    }

    fn name(&self) -> &'static str {
        "Optimal Moisture"
    }

    fn evaluate(&self, field: &FeatureVector) -> Option<RuleDecision> {
        Some(self.decide(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::sample_conditions;

    #[test]
    fn always_holds_with_no_severity() {
        let field = FeatureVector::new(sample_conditions()).unwrap();
        let decision = OptimalRangeRule.evaluate(&field).unwrap();
        assert!(!decision.irrigation_required);
        assert_eq!(decision.severity, Severity::None);
        assert!(decision.reasons[0].contains("optimal range"));
    }
}
