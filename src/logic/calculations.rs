use crate::models::{crop_profile, CropStage, IrrigationPlan, SoilType};

/// Moisture percentage below which the field is in deficit.
pub const DRY_THRESHOLD_PCT: f64 = 30.0;
/// Moisture percentage above which the field risks over-irrigation.
pub const WET_THRESHOLD_PCT: f64 = 60.0;
/// Forecast rainfall (mm) that makes irrigation pointless.
pub const HEAVY_RAIN_MM: f64 = 40.0;
/// Temperature above which evapotranspiration raises the water need.
pub const HEAT_THRESHOLD_C: f64 = 30.0;
/// Extra water per degree above [`HEAT_THRESHOLD_C`].
pub const HEAT_MULTIPLIER_PER_DEGREE: f64 = 0.04;
pub const MAX_TEMPERATURE_MULTIPLIER: f64 = 1.5;
/// Share of the stage requirement applied as a top-up when a no-irrigation
/// decision is overridden.
pub const TOP_UP_FRACTION: f64 = 0.1;

/// Stage water requirement (mm) for a crop, falling back to the default
/// profile for crops outside the catalog.
pub fn base_requirement(crop: &str, stage: CropStage) -> f64 {
    crop_profile(crop).base_requirement_mm(stage)
}

/// Linear deficit below the dry threshold: 0 at the threshold, 1 at 0%.
pub fn moisture_deficit_factor(moisture_pct: f64) -> f64 {
    ((DRY_THRESHOLD_PCT - moisture_pct) / DRY_THRESHOLD_PCT).clamp(0.0, 1.0)
}

/// Evapotranspiration multiplier, 1.0 at or below 30°C and capped at 1.5.
pub fn temperature_multiplier(temperature_c: f64) -> f64 {
    if temperature_c <= HEAT_THRESHOLD_C {
        return 1.0;
    }
    (1.0 + (temperature_c - HEAT_THRESHOLD_C) * HEAT_MULTIPLIER_PER_DEGREE)
        .min(MAX_TEMPERATURE_MULTIPLIER)
}

/// Hours needed to deliver `water_mm` into the given soil.
pub fn delivery_hours(water_mm: f64, soil: SoilType) -> f64 {
    (water_mm / soil.delivery_rate_mm_per_hour()).max(0.0)
}

/// Water and run time needed to recover from the current deficit.
pub fn deficit_plan(
    crop: &str,
    stage: CropStage,
    soil: SoilType,
    moisture_pct: f64,
    temperature_c: f64,
) -> IrrigationPlan {
    let water_mm = (base_requirement(crop, stage)
        * moisture_deficit_factor(moisture_pct)
        * temperature_multiplier(temperature_c))
    .max(0.0);
    IrrigationPlan::new(water_mm, delivery_hours(water_mm, soil))
}

/// Small maintenance watering independent of the current deficit.
pub fn top_up_plan(
    crop: &str,
    stage: CropStage,
    soil: SoilType,
    temperature_c: f64,
) -> IrrigationPlan {
    let water_mm =
        base_requirement(crop, stage) * TOP_UP_FRACTION * temperature_multiplier(temperature_c);
    IrrigationPlan::new(water_mm, delivery_hours(water_mm, soil))
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
