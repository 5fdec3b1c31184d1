use super::RuleAdjustment;
use crate::models::{FeatureVector, IrrigationPlan, RuleDecision};

pub const MODERATE_RAIN_MIN_PCT: f64 = 20.0;
pub const MODERATE_RAIN_MAX_PCT: f64 = 40.0;
/// Share of the run time kept when moderate rain is likely.
pub const MODERATE_RAIN_DURATION_FACTOR: f64 = 0.8;

/// Rain probability adjustment - shortens irrigation runs when rain is
/// moderately likely
///
/// Applies after any terminal rule when the probability is in [20%, 40%).
/// Water depth stays the same; only run time is reduced.
pub struct RainProbabilityAdjustment;

impl RainProbabilityAdjustment {
    pub fn applies(probability_pct: f64) -> bool {
        (MODERATE_RAIN_MIN_PCT..MODERATE_RAIN_MAX_PCT).contains(&probability_pct)
    }
}

impl RuleAdjustment for RainProbabilityAdjustment {
    fn id(&self) -> &'static str {
        "rain_probability"
    }

    fn name(&self) -> &'static str {
        "Moderate Rain Chance"
    }

    fn adjust(&self, field: &FeatureVector, mut decision: RuleDecision) -> RuleDecision {
        let probability = field.rainfall_probability_pct();
        if !Self::applies(probability) {
            return decision;
        }

        decision.duration_hours =
            (decision.duration_hours * MODERATE_RAIN_DURATION_FACTOR).max(0.0);
        decision.top_up = IrrigationPlan::new(
            decision.top_up.water_mm,
            decision.top_up.duration_hours * MODERATE_RAIN_DURATION_FACTOR,
        );

        let reason = if decision.irrigation_required {
            format!(
                "Rain chance {:.0}% - run time shortened by {:.0}% to {:.1} h",
                probability,
                (1.0 - MODERATE_RAIN_DURATION_FACTOR) * 100.0,
                decision.duration_hours
            )
        } else {
            format!(
                "Rain chance {:.0}% - any irrigation run should be shortened by {:.0}%",
                probability,
                (1.0 - MODERATE_RAIN_DURATION_FACTOR) * 100.0
            )
        };
        decision.with_reason(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IrrigationPlan, Severity};
    use crate::models::field::sample_conditions;

    fn field(probability: f64) -> FeatureVector {
        let mut conditions = sample_conditions();
        conditions.rainfall_probability_pct = probability;
        FeatureVector::new(conditions).unwrap()
    }

    #[test]
    fn band_is_half_open() {
        assert!(!RainProbabilityAdjustment::applies(19.9));
        assert!(RainProbabilityAdjustment::applies(20.0));
        assert!(RainProbabilityAdjustment::applies(39.9));
        assert!(!RainProbabilityAdjustment::applies(40.0));
    }

    #[test]
    fn shortens_duration_but_not_water() {
        let decision =
            RuleDecision::irrigate(IrrigationPlan::new(50.0, 5.0), Severity::Warning, "dry");
        let adjusted = RainProbabilityAdjustment.adjust(&field(30.0), decision);
        assert_eq!(adjusted.water_mm, 50.0);
        assert!((adjusted.duration_hours - 4.0).abs() < 1e-12);
        assert!((adjusted.top_up.duration_hours - 4.0).abs() < 1e-12);
        assert_eq!(adjusted.reasons.len(), 2);
        assert!(adjusted.reasons[1].contains("30%"));
    }

    #[test]
    fn outside_band_is_untouched() {
        let decision =
            RuleDecision::irrigate(IrrigationPlan::new(50.0, 5.0), Severity::Warning, "dry");
        let adjusted = RainProbabilityAdjustment.adjust(&field(55.0), decision.clone());
        assert_eq!(adjusted, decision);
    }

    #[test]
    fn hold_stays_at_zero() {
        let decision = RuleDecision::hold(Severity::None, "ok");
        let adjusted = RainProbabilityAdjustment.adjust(&field(25.0), decision);
        assert_eq!(adjusted.duration_hours, 0.0);
        assert_eq!(adjusted.reasons.len(), 2);
    }
}
