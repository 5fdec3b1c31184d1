use crate::error::{AgriSenseError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SoilType {
    Clay,
    Loam,
    Sandy,
}

impl SoilType {
    pub const ALL: [SoilType; 3] = [SoilType::Clay, SoilType::Loam, SoilType::Sandy];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Clay => "Clay",
            SoilType::Loam => "Loam",
            SoilType::Sandy => "Sandy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "clay" => Some(SoilType::Clay),
            "loam" | "loamy" => Some(SoilType::Loam),
            "sandy" | "sand" => Some(SoilType::Sandy),
            _ => None,
        }
    }

    /// Application rate the soil can absorb, in mm of water per hour.
    /// Sandy soil drains fastest so a given depth is delivered in less time.
    pub fn delivery_rate_mm_per_hour(&self) -> f64 {
        match self {
            SoilType::Clay => 10.0,
            SoilType::Loam => 12.5,
            SoilType::Sandy => 15.0,
        }
    }

    /// Moisture percentage below which crops start wilting.
    pub fn wilting_point_pct(&self) -> f64 {
        match self {
            SoilType::Clay => 25.0,
            SoilType::Loam => 18.0,
            SoilType::Sandy => 10.0,
        }
    }

    /// Days between irrigation runs. Clay retains water longest.
    pub fn irrigation_frequency_days(&self) -> u32 {
        match self {
            SoilType::Clay => 5,
            SoilType::Loam => 3,
            SoilType::Sandy => 2,
        }
    }
}

impl TryFrom<String> for SoilType {
    type Error = AgriSenseError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_str(&value).ok_or_else(|| {
            AgriSenseError::validation("soil_type", format!("unknown soil '{}'", value))
        })
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum CropStage {
    Germination,
    Vegetative,
    Flowering,
    Harvest,
}

impl CropStage {
    pub const ALL: [CropStage; 4] = [
        CropStage::Germination,
        CropStage::Vegetative,
        CropStage::Flowering,
        CropStage::Harvest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropStage::Germination => "Germination",
            CropStage::Vegetative => "Vegetative",
            CropStage::Flowering => "Flowering",
            CropStage::Harvest => "Harvest",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "germination" | "seedling" | "seedling/germination" => Some(CropStage::Germination),
            "vegetative" | "vegetative growth" => Some(CropStage::Vegetative),
            "flowering" => Some(CropStage::Flowering),
            "harvest" | "maturity" | "maturity/harvest" => Some(CropStage::Harvest),
            _ => None,
        }
    }
}

impl TryFrom<String> for CropStage {
    type Error = AgriSenseError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_str(&value).ok_or_else(|| {
            AgriSenseError::validation("crop_stage", format!("unknown stage '{}'", value))
        })
    }
}

impl std::fmt::Display for CropStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw field measurements as supplied by a caller, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConditions {
    pub soil_type: SoilType,
    pub crop: String,
    pub crop_stage: CropStage,
    pub moisture_pct: f64,
    pub temperature_c: f64,
    #[serde(default)]
    pub rainfall_forecast_mm: f64,
    #[serde(default)]
    pub rainfall_probability_pct: f64,
    #[serde(default)]
    pub nitrogen: f64,
    #[serde(default)]
    pub phosphorus: f64,
    #[serde(default)]
    pub potassium: f64,
    #[serde(default = "default_ph")]
    pub ph: f64,
}

fn default_ph() -> f64 {
    7.0
}

/// Validated snapshot of one field's conditions.
///
/// Only constructible through [`FeatureVector::new`], so every value reaching
/// the rule evaluator or the classifier is inside its declared domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    soil_type: SoilType,
    crop: String,
    crop_stage: CropStage,
    moisture_pct: f64,
    temperature_c: f64,
    rainfall_forecast_mm: f64,
    rainfall_probability_pct: f64,
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
    ph: f64,
}

impl FeatureVector {
    pub fn new(conditions: FieldConditions) -> Result<Self> {
        let crop = conditions.crop.trim().to_string();
        if crop.is_empty() {
            return Err(AgriSenseError::validation("crop", "must not be empty"));
        }

        let moisture_pct = percentage("moisture_pct", conditions.moisture_pct)?;
        let rainfall_probability_pct =
            percentage("rainfall_probability_pct", conditions.rainfall_probability_pct)?;
        let temperature_c = finite("temperature_c", conditions.temperature_c)?;
        let rainfall_forecast_mm = non_negative("rainfall_forecast_mm", conditions.rainfall_forecast_mm)?;
        let nitrogen = non_negative("nitrogen", conditions.nitrogen)?;
        let phosphorus = non_negative("phosphorus", conditions.phosphorus)?;
        let potassium = non_negative("potassium", conditions.potassium)?;

        let ph = finite("ph", conditions.ph)?;
        if !(0.0..=14.0).contains(&ph) {
            return Err(AgriSenseError::validation(
                "ph",
                format!("{} is outside 0-14", ph),
            ));
        }

        Ok(Self {
            soil_type: conditions.soil_type,
            crop,
            crop_stage: conditions.crop_stage,
            moisture_pct,
            temperature_c,
            rainfall_forecast_mm,
            rainfall_probability_pct,
            nitrogen,
            phosphorus,
            potassium,
            ph,
        })
    }

    pub fn soil_type(&self) -> SoilType {
        self.soil_type
    }

    pub fn crop(&self) -> &str {
        &self.crop
    }

    pub fn crop_stage(&self) -> CropStage {
        self.crop_stage
    }

    pub fn moisture_pct(&self) -> f64 {
        self.moisture_pct
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn rainfall_forecast_mm(&self) -> f64 {
        self.rainfall_forecast_mm
    }

    pub fn rainfall_probability_pct(&self) -> f64 {
        self.rainfall_probability_pct
    }

    pub fn nitrogen(&self) -> f64 {
        self.nitrogen
    }

    pub fn phosphorus(&self) -> f64 {
        self.phosphorus
    }

    pub fn potassium(&self) -> f64 {
        self.potassium
    }

    pub fn ph(&self) -> f64 {
        self.ph
    }
}

impl TryFrom<FieldConditions> for FeatureVector {
    type Error = AgriSenseError;

    fn try_from(conditions: FieldConditions) -> Result<Self> {
        Self::new(conditions)
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AgriSenseError::validation(
            field,
            format!("{} is not a finite number", value),
        ))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(AgriSenseError::validation(
            field,
            format!("{} must not be negative", value),
        ));
    }
    Ok(value)
}

fn percentage(field: &'static str, value: f64) -> Result<f64> {
    let value = finite(field, value)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(AgriSenseError::validation(
            field,
            format!("{} is outside 0-100%", value),
        ));
    }
    Ok(value)
}

#[cfg(test)]
pub(crate) fn sample_conditions() -> FieldConditions {
    FieldConditions {
        soil_type: SoilType::Loam,
        crop: "Wheat".into(),
        crop_stage: CropStage::Vegetative,
        moisture_pct: 45.0,
        temperature_c: 25.0,
        rainfall_forecast_mm: 0.0,
        rainfall_probability_pct: 0.0,
        nitrogen: 80.0,
        phosphorus: 40.0,
        potassium: 60.0,
        ph: 6.5,
    }
}
