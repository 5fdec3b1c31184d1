use super::IrrigationRule;
use crate::logic::calculations::{deficit_plan, temperature_multiplier, DRY_THRESHOLD_PCT};
use crate::models::{FeatureVector, RuleDecision, Severity};

/// Moisture deficit rule - recommends irrigation when soil is dry
///
/// Conditions:
/// - Soil moisture strictly below 30%
///
/// Water depth is the crop's stage requirement scaled by the linear deficit
/// and a heat multiplier; run time follows the soil's delivery rate.
///
/// Severity levels:
/// - Warning: below 30% but above the soil's wilting point
/// - Critical: below the wilting point
pub struct MoistureDeficitRule;

impl IrrigationRule for MoistureDeficitRule {
    fn id(&self) -> &'static str {
        "moisture_deficit"
    }

    fn name(&self) -> &'static str {
        "Moisture Deficit"
    }

    fn evaluate(&self, field: &FeatureVector) -> Option<RuleDecision> {
        let moisture = field.moisture_pct();
        if moisture >= DRY_THRESHOLD_PCT {
            return None;
        }

        let soil = field.soil_type();
        let plan = deficit_plan(
            field.crop(),
            field.crop_stage(),
            soil,
            moisture,
            field.temperature_c(),
        );

        let severity = if moisture < soil.wilting_point_pct() {
            Severity::Critical
        } else {
            Severity::Warning
        };

        let multiplier = temperature_multiplier(field.temperature_c());
        let heat_note = if multiplier > 1.0 {
            format!(" (+{:.0}% for heat)", (multiplier - 1.0) * 100.0)
        } else {
            String::new()
        };

        let mut decision = RuleDecision::irrigate(
            plan,
            severity,
            format!(
                "Soil moisture {:.1}% is below {:.0}% at {:.1}°C; apply {:.1} mm{} over {:.1} h",
                moisture,
                DRY_THRESHOLD_PCT,
                field.temperature_c(),
                plan.water_mm,
                heat_note,
                plan.duration_hours
            ),
        );

        if severity == Severity::Critical {
            decision = decision.with_reason(format!(
                "Moisture is under the {} wilting point ({:.0}%) - plants may start wilting soon",
                soil.as_str().to_lowercase(),
                soil.wilting_point_pct()
            ));
        }

        Some(decision)
    }
}
