use agrisense::config::FieldDefaults;
use agrisense::error::{AgriSenseError, Result};
use agrisense::models::{CropStage, FieldConditions, SoilType};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agrisense", version, about = "Irrigation advisory engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend whether and how much to irrigate
    Recommend(RecommendArgs),
    /// Validate config and the classifier
    Check,
    /// Run interactive setup
    Init,
}

#[derive(Args, Debug, Default)]
pub struct RecommendArgs {
    /// YAML file with field conditions; flags override its values
    #[arg(short, long)]
    pub field: Option<PathBuf>,

    /// Soil type (clay, loam, sandy)
    #[arg(long)]
    pub soil: Option<String>,

    #[arg(long)]
    pub crop: Option<String>,

    /// Growth stage (germination, vegetative, flowering, harvest)
    #[arg(long)]
    pub stage: Option<String>,

    /// Soil moisture, percent
    #[arg(short, long)]
    pub moisture: Option<f64>,

    /// Air temperature, °C
    #[arg(short, long, allow_negative_numbers = true)]
    pub temperature: Option<f64>,

    /// Forecast rainfall, mm
    #[arg(long)]
    pub rain_mm: Option<f64>,

    /// Chance of rain, percent
    #[arg(long)]
    pub rain_chance: Option<f64>,

    #[arg(long)]
    pub nitrogen: Option<f64>,

    #[arg(long)]
    pub phosphorus: Option<f64>,

    #[arg(long)]
    pub potassium: Option<f64>,

    #[arg(long)]
    pub ph: Option<f64>,

    /// Ignore the configured classifier
    #[arg(long)]
    pub no_model: bool,

    /// Print the recommendation as JSON
    #[arg(long)]
    pub json: bool,
}

impl RecommendArgs {
    /// Merge the field file (or config defaults) with command-line flags.
    pub fn conditions(&self, defaults: &FieldDefaults) -> Result<FieldConditions> {
        let mut conditions = match &self.field {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                serde_yaml::from_str(&raw)?
            }
            None => FieldConditions {
                soil_type: defaults.soil_type()?,
                crop: defaults.crop.clone(),
                crop_stage: defaults.crop_stage()?,
                moisture_pct: self
                    .moisture
                    .ok_or_else(|| AgriSenseError::validation("moisture_pct", "--moisture is required"))?,
                temperature_c: self.temperature.ok_or_else(|| {
                    AgriSenseError::validation("temperature_c", "--temperature is required")
                })?,
                rainfall_forecast_mm: 0.0,
                rainfall_probability_pct: 0.0,
                nitrogen: defaults.nitrogen,
                phosphorus: defaults.phosphorus,
                potassium: defaults.potassium,
                ph: defaults.ph,
            },
        };

        if let Some(soil) = &self.soil {
            conditions.soil_type = SoilType::from_str(soil)
                .ok_or_else(|| AgriSenseError::validation("soil_type", format!("unknown soil '{}'", soil)))?;
        }
        if let Some(stage) = &self.stage {
            conditions.crop_stage = CropStage::from_str(stage)
                .ok_or_else(|| AgriSenseError::validation("crop_stage", format!("unknown stage '{}'", stage)))?;
        }
        if let Some(crop) = &self.crop {
            conditions.crop = crop.clone();
        }

        let overrides = [
            (&mut conditions.moisture_pct, self.moisture),
            (&mut conditions.temperature_c, self.temperature),
            (&mut conditions.rainfall_forecast_mm, self.rain_mm),
            (&mut conditions.rainfall_probability_pct, self.rain_chance),
            (&mut conditions.nitrogen, self.nitrogen),
            (&mut conditions.phosphorus, self.phosphorus),
            (&mut conditions.potassium, self.potassium),
            (&mut conditions.ph, self.ph),
        ];
        for (slot, value) in overrides {
            if let Some(value) = value {
                *slot = value;
            }
        }

        Ok(conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_recommend_flags() {
        let cli = Cli::parse_from([
            "agrisense", "-vv", "recommend", "--soil", "clay", "--crop", "Rice", "--moisture",
            "25", "--temperature", "32", "--rain-mm", "10", "--json",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Recommend(args) = cli.command else {
            panic!("expected recommend");
        };
        assert!(args.json);
        assert!(!args.no_model);

        let conditions = args.conditions(&FieldDefaults::default()).unwrap();
        assert_eq!(conditions.soil_type, SoilType::Clay);
        assert_eq!(conditions.crop, "Rice");
        assert_eq!(conditions.crop_stage, CropStage::Vegetative);
        assert_eq!(conditions.moisture_pct, 25.0);
        assert_eq!(conditions.rainfall_forecast_mm, 10.0);
        assert_eq!(conditions.ph, 7.0);
    }

    #[test]
    fn moisture_required_without_field_file() {
        let args = RecommendArgs {
            temperature: Some(20.0),
            ..Default::default()
        };
        let err = args.conditions(&FieldDefaults::default()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn unknown_soil_flag_rejected() {
        let args = RecommendArgs {
            moisture: Some(40.0),
            temperature: Some(20.0),
            soil: Some("peat".into()),
            ..Default::default()
        };
        assert!(args.conditions(&FieldDefaults::default()).is_err());
    }

    #[test]
    fn field_file_with_flag_override() {
        let path = std::env::temp_dir().join(format!("agrisense-field-{}.yaml", std::process::id()));
        std::fs::write(
            &path,
            "soil_type: sandy\ncrop: Maize\ncrop_stage: flowering\nmoisture_pct: 20\ntemperature_c: 35\n",
        )
        .unwrap();

        let args = RecommendArgs {
            field: Some(path.clone()),
            moisture: Some(50.0),
            ..Default::default()
        };
        let conditions = args.conditions(&FieldDefaults::default()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(conditions.soil_type, SoilType::Sandy);
        assert_eq!(conditions.crop, "Maize");
        assert_eq!(conditions.moisture_pct, 50.0);
        assert_eq!(conditions.temperature_c, 35.0);
    }
}
