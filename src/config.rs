use crate::error::{AgriSenseError, Result};
use crate::logic::classifier::{ClassifierAdapter, EncodingScheme, LogisticModel, Normalization};
use crate::models::{crop_names, CropStage, SoilType};
use config::{Environment, File, FileFormat};
use dialoguer::{Input, Select};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Prefix for environment overrides, e.g. `AGRISENSE__FIELD__CROP=Rice`.
pub const ENV_PREFIX: &str = "AGRISENSE";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub field: FieldDefaults,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<ClassifierConfig>,
}

/// Slow-changing properties of the field, used when the CLI omits them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldDefaults {
    pub soil_type: String,
    pub crop: String,
    pub crop_stage: String,
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

impl FieldDefaults {
    pub fn soil_type(&self) -> Result<SoilType> {
        SoilType::from_str(&self.soil_type).ok_or_else(|| {
            AgriSenseError::Configuration(format!("unknown soil type '{}'", self.soil_type))
        })
    }

    pub fn crop_stage(&self) -> Result<CropStage> {
        CropStage::from_str(&self.crop_stage).ok_or_else(|| {
            AgriSenseError::Configuration(format!("unknown crop stage '{}'", self.crop_stage))
        })
    }
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            soil_type: "loam".into(),
            crop: "Wheat".into(),
            crop_stage: "vegetative".into(),
            nitrogen: 0.0,
            phosphorus: 0.0,
            potassium: 0.0,
            ph: default_ph(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_encoding_version")]
    pub encoding_version: u32,
    #[serde(default)]
    pub normalization: Normalization,
    pub model: ModelConfig,
}

fn default_enabled() -> bool {
    true
}

impl ClassifierConfig {
    /// Check encoding, normalization and weights without loading the model.
    pub fn validate(&self) -> Result<()> {
        EncodingScheme::from_version(self.encoding_version)?;
        self.normalization.validate()?;
        LogisticModel::check_weights(self.model.intercept, &self.model.coefficients)
    }
}

fn default_encoding_version() -> u32 {
    EncodingScheme::CURRENT.version()
}

/// Fitted logistic-regression weights, in feature declaration order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importances: Option<HashMap<String, f64>>,
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(AgriSenseError::Configuration(format!(
                "Config file not found at {:?}. Run `agrisense init` to set up.",
                config_path
            )));
        }

        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            AgriSenseError::Configuration(format!("Failed to read config: {}", e))
        })?;

        tracing::debug!(path = %config_path.display(), "loading configuration");
        Self::from_yaml(&raw)
    }

    /// Parse YAML text, then apply `AGRISENSE__` environment overrides.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        Self::build(raw, env_overrides())
    }

    fn build(raw: &str, env: Environment) -> Result<Self> {
        let content = substitute_env_vars(raw)?;

        let settings = config::Config::builder()
            .add_source(File::from_str(&content, FileFormat::Yaml))
            .add_source(env)
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every section can actually be used.
    pub fn validate(&self) -> Result<()> {
        self.field.soil_type()?;
        self.field.crop_stage()?;
        match &self.classifier {
            Some(c) if c.enabled => c.validate(),
            _ => Ok(()),
        }
    }

    /// Build the classifier described by the `classifier` section, if enabled.
    pub fn classifier_adapter(&self) -> Result<Option<ClassifierAdapter>> {
        match &self.classifier {
            Some(c) if c.enabled => ClassifierAdapter::from_config(c).map(Some),
            _ => Ok(None),
        }
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("agrisense").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/agrisense/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgriSenseError::Configuration("Cannot determine config directory".into()))?
            .join("agrisense");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up AgriSense!");
        println!();

        println!("Field Profile");
        let soils: Vec<&str> = SoilType::ALL.iter().map(|s| s.as_str()).collect();
        let soil = Select::new()
            .with_prompt("  Soil type")
            .items(&soils)
            .default(1)
            .interact()
            .map_err(input_error)?;

        let crops = crop_names();
        let crop = Select::new()
            .with_prompt("  Crop")
            .items(&crops)
            .default(1)
            .interact()
            .map_err(input_error)?;

        let stages: Vec<&str> = CropStage::ALL.iter().map(|s| s.as_str()).collect();
        let stage = Select::new()
            .with_prompt("  Growth stage")
            .items(&stages)
            .default(1)
            .interact()
            .map_err(input_error)?;

        println!();
        println!("Soil Nutrients");
        let nitrogen: f64 = Input::new()
            .with_prompt("  Nitrogen (kg/ha)")
            .default(0.0)
            .interact_text()
            .map_err(input_error)?;

        let phosphorus: f64 = Input::new()
            .with_prompt("  Phosphorus (kg/ha)")
            .default(0.0)
            .interact_text()
            .map_err(input_error)?;

        let potassium: f64 = Input::new()
            .with_prompt("  Potassium (kg/ha)")
            .default(0.0)
            .interact_text()
            .map_err(input_error)?;

        let ph: f64 = Input::new()
            .with_prompt("  Soil pH")
            .default(default_ph())
            .validate_with(|v: &f64| {
                if (0.0..=14.0).contains(v) {
                    Ok(())
                } else {
                    Err("pH must be between 0 and 14")
                }
            })
            .interact_text()
            .map_err(input_error)?;

        println!();

        let config = Config {
            field: FieldDefaults {
                soil_type: soils[soil].to_lowercase(),
                crop: crops[crop].to_string(),
                crop_stage: stages[stage].to_lowercase(),
                nitrogen,
                phosphorus,
                potassium,
                ph,
            },
            classifier: None,
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)?;

        let content = format!(
            "# AgriSense Configuration\n# Generated by `agrisense init`\n# Environment variable substitution (${{VAR}}) is supported.\n# Add a `classifier:` section (see config/config.yaml.example) to enable the model.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }
}

fn env_overrides() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn input_error(e: dialoguer::Error) -> AgriSenseError {
    AgriSenseError::Configuration(format!("Input error: {}", e))
}

/// Replace `${VAR_NAME}` with the variable's value. Unset variables are left
/// in place so the YAML error points at them.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AgriSenseError::Configuration(format!("Bad substitution pattern: {}", e)))?;

    let mut result = content.to_string();
    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        let placeholder = &cap[0];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(placeholder, &value);
        }
    }

    Ok(result)
}
