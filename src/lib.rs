//! Irrigation advice from agronomic rules, optionally cross-checked by a
//! trained classifier.
//!
//! ```no_run
//! use agrisense::logic::AdvisoryEngine;
//! use agrisense::models::{CropStage, FeatureVector, FieldConditions, SoilType};
//!
//! let field = FeatureVector::new(FieldConditions {
//!     soil_type: SoilType::Clay,
//!     crop: "Rice".into(),
//!     crop_stage: CropStage::Vegetative,
//!     moisture_pct: 25.0,
//!     temperature_c: 32.0,
//!     rainfall_forecast_mm: 10.0,
//!     rainfall_probability_pct: 0.0,
//!     nitrogen: 0.0,
//!     phosphorus: 0.0,
//!     potassium: 0.0,
//!     ph: 6.5,
//! })?;
//! let record = AdvisoryEngine::new().present(&field)?;
//! println!("{}", record.render_text());
//! # Ok::<(), agrisense::error::AgriSenseError>(())
//! ```

pub mod config;
pub mod error;
pub mod logic;
pub mod models;

pub use error::{AgriSenseError, Result};
