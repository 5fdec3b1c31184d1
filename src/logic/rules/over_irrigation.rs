use super::IrrigationRule;
use crate::logic::calculations::WET_THRESHOLD_PCT;
use crate::models::{FeatureVector, RuleDecision, Severity};

/// Over-irrigation rule - warns when the soil is already wetter than optimal
///
/// Conditions:
/// - Soil moisture strictly above 60%
pub struct OverIrrigationRule;

impl IrrigationRule for OverIrrigationRule {
    fn id(&self) -> &'static str {
        "over_irrigation"
    }

    fn name(&self) -> &'static str {
        "Over-Irrigation Warning"
    }

    fn evaluate(&self, field: &FeatureVector) -> Option<RuleDecision> {
        let moisture = field.moisture_pct();
        if moisture <= WET_THRESHOLD_PCT {
            return None;
        }

        Some(
            RuleDecision::hold(
                Severity::Warning,
                format!(
                    "Moisture {:.1}% is above optimal - risk of over-irrigation and root rot",
                    moisture
                ),
            )
            .with_reason("Allow the soil to dry naturally before the next irrigation"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::sample_conditions;

    #[test]
    fn wet_soil_is_warning() {
        let mut conditions = sample_conditions();
        conditions.moisture_pct = 70.0;
        let decision = OverIrrigationRule
            .evaluate(&FeatureVector::new(conditions).unwrap())
            .unwrap();
        assert!(!decision.irrigation_required);
        assert_eq!(decision.severity, Severity::Warning);
        assert_eq!(decision.water_mm, 0.0);
        assert!(decision.reasons[0].contains("root rot"));
    }

    #[test]
    fn sixty_percent_is_optimal() {
        let mut conditions = sample_conditions();
        conditions.moisture_pct = 60.0;
        assert!(OverIrrigationRule
            .evaluate(&FeatureVector::new(conditions).unwrap())
            .is_none());
    }
}
