use crate::logic::calculations::{DRY_THRESHOLD_PCT, WET_THRESHOLD_PCT};
use crate::models::{CropStage, FeatureVector};

pub const EXTREME_HEAT_C: f64 = 38.0;
pub const COLD_STRESS_C: f64 = 10.0;
pub const LIKELY_RAIN_PCT: f64 = 70.0;

pub const NO_RISKS: &str = "No significant risks detected";

/// Agronomic risks visible in the current snapshot, most urgent first.
pub fn assess_risks(field: &FeatureVector) -> Vec<String> {
    let moisture = field.moisture_pct();
    let soil = field.soil_type();
    let mut risks = Vec::new();

    if moisture < soil.wilting_point_pct() {
        risks.push("Critical water stress - crop wilting risk".to_string());
    } else if moisture < DRY_THRESHOLD_PCT {
        risks.push("Below optimal moisture - yield reduction possible".to_string());
    }

    if moisture > WET_THRESHOLD_PCT {
        risks.push("High moisture - fungal disease risk".to_string());
    }

    let temperature = field.temperature_c();
    if temperature > EXTREME_HEAT_C {
        risks.push("Extreme heat - increased evaporation".to_string());
    } else if temperature < COLD_STRESS_C {
        risks.push("Cold stress - reduced water uptake".to_string());
    }

    if field.rainfall_probability_pct() > LIKELY_RAIN_PCT && moisture >= DRY_THRESHOLD_PCT {
        risks.push("Rain expected with adequate moisture - skip irrigation".to_string());
    }

    if field.crop_stage() == CropStage::Flowering && moisture < DRY_THRESHOLD_PCT {
        risks.push("Critical flowering stage needs adequate water".to_string());
    }

    if risks.is_empty() {
        risks.push(NO_RISKS.to_string());
    }

    risks
}
