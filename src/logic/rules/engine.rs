use super::{
    moisture_deficit::MoistureDeficitRule, optimal_range::OptimalRangeRule,
    over_irrigation::OverIrrigationRule, rain_delay::RainDelayRule,
    rain_probability::RainProbabilityAdjustment, risk::assess_risks, IrrigationRule,
    RuleAdjustment,
};
use crate::logic::calculations::top_up_plan;
use crate::models::{crop_profile, FeatureVector, RuleDecision};

/// Deterministic agronomic rule set.
///
/// Terminal rules run in precedence order (heavy rain, deficit,
/// over-irrigation) and the first match wins. When none match the optimal
/// range decision applies. Adjustments then accumulate on top.
pub struct RuleEvaluator {
    rules: Vec<Box<dyn IrrigationRule>>,
    fallback: OptimalRangeRule,
    adjustments: Vec<Box<dyn RuleAdjustment>>,
}

impl RuleEvaluator {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn IrrigationRule>> = vec![
            Box::new(RainDelayRule),
            Box::new(MoistureDeficitRule),
            Box::new(OverIrrigationRule),
        ];
        let adjustments: Vec<Box<dyn RuleAdjustment>> = vec![Box::new(RainProbabilityAdjustment)];

        Self {
            rules,
            fallback: OptimalRangeRule,
            adjustments,
        }
    }

    pub fn evaluate(&self, field: &FeatureVector) -> RuleDecision {
        let (rule_id, decision) = self
            .rules
            .iter()
            .find_map(|rule| rule.evaluate(field).map(|d| (rule.id(), d)))
            .unwrap_or_else(|| (self.fallback.id(), self.fallback.decide(field)));

        tracing::debug!(
            rule = rule_id,
            irrigate = decision.irrigation_required,
            severity = %decision.severity,
            "terminal rule matched"
        );

        let decision = self.complete(field, decision);

        self.adjustments
            .iter()
            .fold(decision, |decision, adjustment| adjustment.adjust(field, decision))
    }

    /// Attach schedule, risks and the override top-up to a terminal decision.
    fn complete(&self, field: &FeatureVector, decision: RuleDecision) -> RuleDecision {
        let crop = crop_profile(field.crop());
        let soil = field.soil_type();

        let decision = if decision.irrigation_required {
            decision
        } else {
            decision.with_top_up(top_up_plan(
                field.crop(),
                field.crop_stage(),
                soil,
                field.temperature_c(),
            ))
        };

        decision
            .with_schedule(crop.method, soil.irrigation_frequency_days())
            .with_risks(assess_risks(field))
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules
            .iter()
            .map(|r| (r.id(), r.name()))
            .chain(std::iter::once((self.fallback.id(), self.fallback.name())))
            .chain(self.adjustments.iter().map(|a| (a.id(), a.name())))
            .collect()
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::sample_conditions;
    use crate::models::{CropStage, FieldConditions, IrrigationMethod, Severity, SoilType};
    use proptest::prelude::*;

    fn evaluate(edit: impl FnOnce(&mut FieldConditions)) -> RuleDecision {
        let mut conditions = sample_conditions();
        edit(&mut conditions);
        RuleEvaluator::new().evaluate(&FeatureVector::new(conditions).unwrap())
    }

    #[test]
    fn rice_on_clay_example() {
        let decision = evaluate(|c| {
            c.moisture_pct = 25.0;
            c.temperature_c = 32.0;
            c.rainfall_forecast_mm = 10.0;
            c.soil_type = SoilType::Clay;
            c.crop = "Rice".into();
            c.crop_stage = CropStage::Vegetative;
        });
        assert!(decision.irrigation_required);
        assert!((decision.water_mm - 45.0).abs() < 0.5);
        assert!((decision.duration_hours - 4.5).abs() < 0.05);
        assert_eq!(decision.method, IrrigationMethod::Flood);
        assert_eq!(decision.frequency_days, 5);
    }

    #[test]
    fn wet_field_example() {
        let decision = evaluate(|c| {
            c.moisture_pct = 70.0;
            c.rainfall_forecast_mm = 0.0;
        });
        assert!(!decision.irrigation_required);
        assert_eq!(decision.severity, Severity::Warning);
        assert_eq!(decision.water_mm, 0.0);
    }

    #[test]
    fn heavy_rain_short_circuits_dry_soil() {
        let decision = evaluate(|c| {
            c.moisture_pct = 5.0;
            c.rainfall_forecast_mm = 55.0;
        });
        assert!(!decision.irrigation_required);
        assert_eq!(decision.severity, Severity::Advisory);
        assert!(decision.reasons[0].contains("Heavy rain"));
    }

    #[test]
    fn boundaries_are_optimal() {
        for moisture in [30.0, 60.0] {
            let decision = evaluate(|c| c.moisture_pct = moisture);
            assert!(!decision.irrigation_required);
            assert_eq!(decision.severity, Severity::None, "moisture {}", moisture);
        }
    }

    #[test]
    fn unmatched_field_falls_back_to_optimal_range() {
        let field = FeatureVector::new(sample_conditions()).unwrap();
        let evaluator = RuleEvaluator::new();
        assert!(evaluator.rules.iter().all(|r| r.evaluate(&field).is_none()));

        let decision = evaluator.evaluate(&field);
        assert!(!decision.irrigation_required);
        assert_eq!(decision.severity, Severity::None);
        assert!(decision.reasons[0].contains("optimal range"));
    }

    #[test]
    fn hold_decisions_carry_a_top_up() {
        let decision = evaluate(|c| c.moisture_pct = 45.0);
        assert!(!decision.top_up.is_empty());
        assert_eq!(decision.water_mm, 0.0);
    }

    #[test]
    fn rain_probability_accumulates_on_deficit() {
        let plain = evaluate(|c| c.moisture_pct = 20.0);
        let rainy = evaluate(|c| {
            c.moisture_pct = 20.0;
            c.rainfall_probability_pct = 30.0;
        });
        assert_eq!(plain.water_mm, rainy.water_mm);
        assert!((rainy.duration_hours - plain.duration_hours * 0.8).abs() < 1e-9);
        assert_eq!(rainy.reasons.len(), plain.reasons.len() + 1);
    }

    #[test]
    fn deterministic() {
        let first = evaluate(|c| c.moisture_pct = 22.0);
        let second = evaluate(|c| c.moisture_pct = 22.0);
        assert_eq!(first, second);
    }

    #[test]
    fn lists_rules_in_precedence_order() {
        let ids: Vec<_> = RuleEvaluator::new()
            .list_rules()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "rain_delay",
                "moisture_deficit",
                "over_irrigation",
                "optimal_range",
                "rain_probability"
            ]
        );
    }

    fn soil() -> impl Strategy<Value = SoilType> {
        prop::sample::select(SoilType::ALL.to_vec())
    }

    fn stage() -> impl Strategy<Value = CropStage> {
        prop::sample::select(CropStage::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn heavy_rain_never_irrigates(
            moisture in 0.0f64..=100.0,
            rain in 40.001f64..500.0,
            temperature in -10.0f64..50.0,
            soil in soil(),
        ) {
            let decision = evaluate(|c| {
                c.moisture_pct = moisture;
                c.rainfall_forecast_mm = rain;
                c.temperature_c = temperature;
                c.soil_type = soil;
            });
            prop_assert!(!decision.irrigation_required);
        }

        #[test]
        fn optimal_band_needs_no_water(
            moisture in 30.001f64..59.999,
            rain in 0.0f64..=40.0,
            probability in 0.0f64..=100.0,
        ) {
            let decision = evaluate(|c| {
                c.moisture_pct = moisture;
                c.rainfall_forecast_mm = rain;
                c.rainfall_probability_pct = probability;
            });
            prop_assert!(!decision.irrigation_required);
            prop_assert_eq!(decision.water_mm, 0.0);
        }

        #[test]
        fn drier_soil_never_needs_less_water(
            wetter in 0.0f64..30.0,
            drop in 0.0f64..30.0,
            temperature in -10.0f64..50.0,
            soil in soil(),
            stage in stage(),
        ) {
            let drier = (wetter - drop).max(0.0);
            let at = |moisture: f64| evaluate(|c| {
                c.moisture_pct = moisture;
                c.temperature_c = temperature;
                c.soil_type = soil;
                c.crop_stage = stage;
            });
            prop_assert!(at(drier).water_mm >= at(wetter).water_mm);
        }
    }
}
