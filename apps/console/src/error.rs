//! # API Error Type
//!
//! What a console caller sees when a command fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  "enter north 0 ABC123 L"                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command::parse ── malformed? ── ApiError(UNKNOWN_COMMAND / VALIDATION) │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  SessionManager::enter ── ParkingError ──► ApiError(code, message)     │
//! │         │                                         │                     │
//! │         ▼                                         ▼                     │
//! │  {"ok":true,"data":{...}}          {"ok":false,"error":{...}}          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mallpark_core::{ParkingError, ValidationError};
use mallpark_engine::EngineError;
use serde::Serialize;

/// Error returned for a failed command.
///
/// ```json
/// {
///   "code": "NO_SLOT_AVAILABLE",
///   "message": "No parking slot available"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Mall or slot not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Every eligible slot is taken
    NoSlotAvailable,

    VehicleAlreadyParked,

    VehicleNotParked,

    /// Slot distances don't fit the mall
    InvalidSlotConfig,

    /// Registration collides with an existing mall
    Conflict,

    /// Configuration could not be loaded or saved
    ConfigError,

    UnknownCommand,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unknown_command(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::UnknownCommand, message)
    }
}

impl From<ParkingError> for ApiError {
    fn from(err: ParkingError) -> Self {
        let code = match &err {
            ParkingError::NoSlotAvailable => ErrorCode::NoSlotAvailable,
            ParkingError::VehicleAlreadyParked { .. } => ErrorCode::VehicleAlreadyParked,
            ParkingError::VehicleNotParked { .. } => ErrorCode::VehicleNotParked,
            ParkingError::InvalidSlotConfig { .. } => ErrorCode::InvalidSlotConfig,
            ParkingError::MallNotFound(_) | ParkingError::SlotNotFound(_) => ErrorCode::NotFound,
            ParkingError::MallAlreadyRegistered(_) => ErrorCode::Conflict,
            ParkingError::UnknownSizeClass(_) | ParkingError::Validation(_) => {
                ErrorCode::ValidationError
            }
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Parking(e) => e.into(),
            EngineError::Io(e) => {
                tracing::error!("Config I/O failed: {}", e);
                ApiError::new(ErrorCode::ConfigError, format!("IO error: {}", e))
            }
            other => ApiError::new(ErrorCode::ConfigError, other.to_string()),
        }
    }
}
