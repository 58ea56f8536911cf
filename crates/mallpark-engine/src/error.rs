//! # Engine Error Types
//!
//! Errors raised while loading configuration and building the manager.
//! Parking operations themselves return `ParkingError` unchanged.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   File Access   │  │     Registration        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Io             │  │  Parking (wrapped)      │ │
//! │  │  ConfigParse    │  │  NoConfigPath   │  │                         │ │
//! │  │  ConfigSerialize│  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mallpark_core::{ParkingError, ValidationError};
use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration is structurally valid TOML but semantically wrong.
    #[error("Invalid parking configuration: {0}")]
    InvalidConfig(String),

    /// No explicit path and no platform config directory.
    #[error("No config path available")]
    NoConfigPath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A mall or slot in the configuration was rejected.
    #[error(transparent)]
    Parking(#[from] ParkingError),
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Parking(err.into())
    }
}
