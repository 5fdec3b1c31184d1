mod cli;

use agrisense::config::Config;
use agrisense::logic::AdvisoryEngine;
use agrisense::models::{FeatureVector, FieldConditions};
use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, RecommendArgs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => {
            Config::setup_interactive().context("interactive setup failed")?;
        }
        Commands::Check => check(cli.config)?,
        Commands::Recommend(args) => recommend(cli.config, &args)?,
    }

    Ok(())
}

/// Load config, falling back to defaults only when no file was asked for.
fn load_config(config_override: Option<PathBuf>) -> anyhow::Result<Config> {
    if config_override.is_none() && !Config::exists(None) {
        tracing::warn!("no config file found, using built-in field defaults and no classifier");
        return Ok(Config::default());
    }
    Config::load(config_override).context("failed to load configuration")
}

fn build_engine(config: &Config, use_model: bool) -> anyhow::Result<AdvisoryEngine> {
    let engine = AdvisoryEngine::new();
    if !use_model {
        return Ok(engine);
    }
    match config.classifier_adapter().context("invalid classifier configuration")? {
        Some(adapter) => Ok(engine.with_classifier(adapter)),
        None => Ok(engine),
    }
}

fn recommend(config_override: Option<PathBuf>, args: &RecommendArgs) -> anyhow::Result<()> {
    let config = load_config(config_override)?;
    let engine = build_engine(&config, !args.no_model)?;

    let conditions = args.conditions(&config.field)?;
    let field = FeatureVector::new(conditions).context("invalid field conditions")?;

    let record = engine.present(&field).context("classifier failed")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", record.render_text());
    }
    Ok(())
}

fn check(config_override: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load(config_override).context("failed to load configuration")?;
    println!("Configuration: OK");

    let defaults = &config.field;
    println!(
        "Field: {} on {} soil, {} stage",
        defaults.crop,
        defaults.soil_type()?,
        defaults.crop_stage()?
    );

    let engine = build_engine(&config, true)?;
    println!("Rules:");
    for (id, name) in engine.rules().list_rules() {
        println!("  {:<18} {}", id, name);
    }

    if !engine.has_classifier() {
        println!("Classifier: not configured (rule-only mode)");
        return Ok(());
    }

    // Exercise the classifier with a mid-range field
    let sample = FeatureVector::new(FieldConditions {
        soil_type: defaults.soil_type()?,
        crop: defaults.crop.clone(),
        crop_stage: defaults.crop_stage()?,
        moisture_pct: 45.0,
        temperature_c: 25.0,
        rainfall_forecast_mm: 0.0,
        rainfall_probability_pct: 0.0,
        nitrogen: defaults.nitrogen,
        phosphorus: defaults.phosphorus,
        potassium: defaults.potassium,
        ph: defaults.ph,
    })?;
    let rec = engine.recommend(&sample).context("classifier check failed")?;
    println!("Classifier: OK ({})", rec.agreement);

    Ok(())
}
