//! Document builder configuration.
//!
//! # Responsibility
//! - Select validation strictness and document type for new documents.
//! - Load settings from JSON or from `SRDOC_*` environment variables.
//!
//! # Invariants
//! - Missing settings fall back to permissive validation of comprehensive
//!   documents.
//! - Unknown values are rejected, never silently defaulted.

use crate::model::kinds::{parse_document_type, DocumentType};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Environment variable selecting `ValidationMode`.
pub const ENV_VALIDATION_MODE: &str = "SRDOC_VALIDATION_MODE";
/// Environment variable selecting `DocumentType`.
pub const ENV_DOCUMENT_TYPE: &str = "SRDOC_DOCUMENT_TYPE";
/// Environment variable selecting the log level.
pub const ENV_LOG_LEVEL: &str = "SRDOC_LOG_LEVEL";

/// How relationship/value mismatches are handled while building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Create the item, flag it invalid and record a diagnostic.
    #[default]
    Permissive,
    /// Refuse the mutation with `TreeError::IncompatibleRelationship`.
    Strict,
}

impl ValidationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Permissive => "permissive",
            Self::Strict => "strict",
        }
    }

    pub fn is_strict(self) -> bool {
        self == Self::Strict
    }
}

/// Parses one validation mode from its stable string id.
pub fn parse_validation_mode(value: &str) -> Result<ValidationMode, ConfigError> {
    match value.trim() {
        "permissive" => Ok(ValidationMode::Permissive),
        "strict" => Ok(ValidationMode::Strict),
        other => Err(ConfigError::InvalidValue {
            key: ENV_VALIDATION_MODE,
            value: other.to_string(),
        }),
    }
}

/// Settings applied to a new `Document`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    pub validation_mode: ValidationMode,
    pub document_type: DocumentType,
    /// Level handed to `init_logging` by executables; `None` keeps the
    /// build-mode default.
    pub log_level: Option<String>,
}

impl DocumentConfig {
    pub fn strict() -> Self {
        Self {
            validation_mode: ValidationMode::Strict,
            ..Self::default()
        }
    }

    pub fn with_document_type(mut self, document_type: DocumentType) -> Self {
        self.document_type = document_type;
        self
    }

    /// Parses a JSON object; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|err| ConfigError::InvalidJson(err.to_string()))
    }

    /// Reads `SRDOC_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Reads `SRDOC_*` variables through `lookup`.
    ///
    /// Blank values are treated as unset.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = read(ENV_VALIDATION_MODE) {
            config.validation_mode = parse_validation_mode(&value)?;
        }
        if let Some(value) = read(ENV_DOCUMENT_TYPE) {
            config.document_type =
                parse_document_type(&value).map_err(|err| ConfigError::InvalidValue {
                    key: ENV_DOCUMENT_TYPE,
                    value: err.value,
                })?;
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = Some(value.trim().to_string());
        }
        Ok(config)
    }
}

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidJson(String),
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(message) => write!(f, "invalid configuration json: {message}"),
            Self::InvalidValue { key, value } => {
                write!(f, "unsupported value for `{key}`: `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}
