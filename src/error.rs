//! Error types for configuration loading and score persistence.

use std::path::PathBuf;

/// Invalid or unreadable game configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value that must be zero or positive is negative or not finite.
    #[error("{field} must be a non-negative number, got {value}")]
    Negative { field: String, value: f32 },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        value: f32,
        min: f32,
        max: f32,
    },

    /// A wave could spawn zero aliens forever.
    #[error("spawn chance {0} can leave a wave empty indefinitely")]
    ZeroSpawnChance(String),

    #[error("formation has no cells (rows: {rows}, columns: {columns})")]
    EmptyFormation { rows: usize, columns: usize },

    #[error("{0} has no projectile variants")]
    NoProjectiles(String),

    #[error("loot table of {0} has no positive weight")]
    EmptyLootTable(String),

    #[error("{field}: minimum {min} is greater than maximum {max}")]
    InvertedInterval { field: String, min: f32, max: f32 },
}

/// Failure reading or writing the score file.
#[derive(thiserror::Error, Debug)]
pub enum ScoreError {
    #[error("score file IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("score file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
