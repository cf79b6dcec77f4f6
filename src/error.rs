//! Error types
//!
//! Only construction-time problems are errors. Conditions that come up while a
//! puzzle is running (stale clicks, crowded fields, exhausted pools) are
//! absorbed by the simulation and never reach the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid engine configuration, reported by `Engine::new` and `Settings::validate`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max_active must be at least 1")]
    ZeroCapacity,
    #[error("min_required_on_screen ({floor}) exceeds max_active ({capacity})")]
    FloorExceedsCapacity { floor: usize, capacity: usize },
    #[error("spawn batch sizes must be at least 1")]
    ZeroBatch,
    #[error("fall speed range {min}..={max} is invalid")]
    InvalidSpeedRange { min: f32, max: f32 },
    #[error("scale range {min}..={max} is invalid")]
    InvalidScaleRange { min: f32, max: f32 },
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must not be negative (got {value})")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} must be finite (got {value})")]
    NonFinite { name: &'static str, value: f32 },
    #[error("entity width {entity_width} does not fit a field {field_width} wide")]
    EntityWiderThanField { entity_width: f32, field_width: f32 },
    #[error("max_placement_attempts must be at least 1")]
    ZeroPlacementAttempts,
    #[error("required_ratio must lie in [0, 1] (got {0})")]
    InvalidRatio(f32),
    #[error("no decoy corpus for language '{0}'")]
    UnknownLanguage(String),
    #[error("decoy corpus for language '{0}' is empty")]
    EmptyCorpus(String),
}

/// Failure to read or write a JSON file (settings or challenge sets)
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}
