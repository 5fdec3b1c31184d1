use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgriSenseError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgriSenseError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        AgriSenseError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AgriSenseError::Validation { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, AgriSenseError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, AgriSenseError>;
