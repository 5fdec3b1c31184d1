use crate::error::{AgriSenseError, Result};
use crate::models::{CropStage, FeatureVector, SoilType};
use serde::{Deserialize, Serialize};

/// Number of numeric inputs the classifier sees.
pub const FEATURE_COUNT: usize = 9;

/// Feature declaration order. Also the tie-break order for importances.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "soil_type",
    "crop_stage",
    "nitrogen",
    "phosphorus",
    "potassium",
    "ph",
    "moisture",
    "temperature",
    "rainfall_probability",
];

pub type EncodedFeatures = [f64; FEATURE_COUNT];

pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|n| *n == name)
}

/// Integer codes for the categorical inputs. A model only works with the
/// scheme it was fit with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingScheme {
    /// Alphabetical label encoding of the lowercase category names.
    V1,
}

impl EncodingScheme {
    pub const CURRENT: EncodingScheme = EncodingScheme::V1;

    pub fn from_version(version: u32) -> Result<Self> {
        match version {
            1 => Ok(EncodingScheme::V1),
            other => Err(AgriSenseError::Configuration(format!(
                "unsupported feature encoding version {}",
                other
            ))),
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            EncodingScheme::V1 => 1,
        }
    }

    pub fn soil_code(&self, soil: SoilType) -> f64 {
        match self {
            EncodingScheme::V1 => match soil {
                SoilType::Clay => 0.0,
                SoilType::Loam => 1.0,
                SoilType::Sandy => 2.0,
            },
        }
    }

    pub fn stage_code(&self, stage: CropStage) -> f64 {
        match self {
            EncodingScheme::V1 => match stage {
                CropStage::Flowering => 0.0,
                CropStage::Germination => 1.0,
                CropStage::Harvest => 2.0,
                CropStage::Vegetative => 3.0,
            },
        }
    }

    /// Raw (unnormalized) features in declaration order.
    pub fn encode(&self, field: &FeatureVector) -> EncodedFeatures {
        [
            self.soil_code(field.soil_type()),
            self.stage_code(field.crop_stage()),
            field.nitrogen(),
            field.phosphorus(),
            field.potassium(),
            field.ph(),
            field.moisture_pct(),
            field.temperature_c(),
            field.rainfall_probability_pct(),
        ]
    }
}

/// Standard-score parameters captured when the model was trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl Normalization {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let normalization = Self { mean, scale };
        normalization.validate()?;
        Ok(normalization)
    }

    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(AgriSenseError::Configuration(format!(
                "normalization needs {} means and scales, got {} and {}",
                FEATURE_COUNT,
                self.mean.len(),
                self.scale.len()
            )));
        }

        for (i, (mean, scale)) in self.mean.iter().zip(&self.scale).enumerate() {
            if !mean.is_finite() || !scale.is_finite() || *scale <= 0.0 {
                return Err(AgriSenseError::Configuration(format!(
                    "invalid normalization for {}: mean {}, scale {}",
                    FEATURE_NAMES[i], mean, scale
                )));
            }
        }

        Ok(())
    }

    pub fn apply(&self, raw: &EncodedFeatures) -> EncodedFeatures {
        let mut out = *raw;
        for (value, (mean, scale)) in out.iter_mut().zip(self.mean.iter().zip(&self.scale)) {
            *value = (*value - mean) / scale;
        }
        out
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::sample_conditions;

    #[test]
    fn v1_codes_are_alphabetical() {
        let scheme = EncodingScheme::V1;
        assert_eq!(scheme.soil_code(SoilType::Clay), 0.0);
        assert_eq!(scheme.soil_code(SoilType::Loam), 1.0);
        assert_eq!(scheme.soil_code(SoilType::Sandy), 2.0);
        assert_eq!(scheme.stage_code(CropStage::Flowering), 0.0);
        assert_eq!(scheme.stage_code(CropStage::Germination), 1.0);
        assert_eq!(scheme.stage_code(CropStage::Harvest), 2.0);
        assert_eq!(scheme.stage_code(CropStage::Vegetative), 3.0);
    }

    #[test]
    fn unknown_version_is_configuration_error() {
        assert_eq!(EncodingScheme::from_version(1).unwrap(), EncodingScheme::V1);
        assert!(EncodingScheme::from_version(2).unwrap_err().is_configuration());
    }

    #[test]
    fn encode_follows_declaration_order() {
        let field = FeatureVector::new(sample_conditions()).unwrap();
        let encoded = EncodingScheme::V1.encode(&field);
        assert_eq!(encoded[feature_index("soil_type").unwrap()], 1.0);
        assert_eq!(encoded[feature_index("crop_stage").unwrap()], 3.0);
        assert_eq!(encoded[feature_index("nitrogen").unwrap()], 80.0);
        assert_eq!(encoded[feature_index("ph").unwrap()], 6.5);
        assert_eq!(encoded[feature_index("moisture").unwrap()], 45.0);
        assert_eq!(encoded[feature_index("rainfall_probability").unwrap()], 0.0);
    }

    #[test]
    fn normalization_standardizes() {
        let mut mean = vec![0.0; FEATURE_COUNT];
        let mut scale = vec![1.0; FEATURE_COUNT];
        mean[6] = 50.0;
        scale[6] = 20.0;
        let norm = Normalization::new(mean, scale).unwrap();

        let mut raw = [0.0; FEATURE_COUNT];
        raw[6] = 30.0;
        raw[2] = 7.0;
        let out = norm.apply(&raw);
        assert!((out[6] + 1.0).abs() < 1e-12);
        assert_eq!(out[2], 7.0);
    }

    #[test]
    fn normalization_rejects_bad_parameters() {
        assert!(Normalization::new(vec![0.0; 3], vec![1.0; 3]).is_err());

        let mut scale = vec![1.0; FEATURE_COUNT];
        scale[4] = 0.0;
        let err = Normalization::new(vec![0.0; FEATURE_COUNT], scale).unwrap_err();
        assert!(err.to_string().contains("potassium"));

        let mut mean = vec![0.0; FEATURE_COUNT];
        mean[0] = f64::NAN;
        assert!(Normalization::new(mean, vec![1.0; FEATURE_COUNT]).is_err());
    }

    #[test]
    fn short_parameters_leave_extra_features_unscaled() {
        let norm: Normalization =
            serde_json::from_str(r#"{"mean": [1.0], "scale": [2.0]}"#).unwrap();
        assert!(norm.validate().is_err());

        let mut raw = [4.0; FEATURE_COUNT];
        raw[0] = 5.0;
        let out = norm.apply(&raw);
        assert_eq!(out[0], 2.0);
        assert_eq!(out[1..], raw[1..]);
    }
}
