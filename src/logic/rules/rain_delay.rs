use super::IrrigationRule;
use crate::logic::calculations::{DRY_THRESHOLD_PCT, HEAVY_RAIN_MM};
use crate::models::{FeatureVector, RuleDecision, Severity};

/// Rain delay rule - holds irrigation when heavy rain is forecast
///
/// Conditions:
/// - Forecast rainfall strictly above 40 mm
///
/// Takes precedence over every moisture rule: the rain will refill the
/// root zone whatever the current moisture.
pub struct RainDelayRule;

impl IrrigationRule for RainDelayRule {
    fn id(&self) -> &'static str {
        "rain_delay"
    }

    fn name(&self) -> &'static str {
        "Heavy Rain Delay"
    }

    fn evaluate(&self, field: &FeatureVector) -> Option<RuleDecision> {
        let rain_mm = field.rainfall_forecast_mm();
        if rain_mm <= HEAVY_RAIN_MM {
            return None;
        }

        let mut decision = RuleDecision::hold(
            Severity::Advisory,
            format!(
                "Heavy rain forecast ({:.1} mm) - irrigation delayed",
                rain_mm
            ),
        );

        if field.moisture_pct() < DRY_THRESHOLD_PCT {
            decision = decision.with_reason(format!(
                "Soil is dry ({:.1}%) but the expected rain should cover the deficit",
                field.moisture_pct()
            ));
        }

        Some(decision)
    }
}
