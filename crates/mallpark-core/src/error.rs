//! # Error Types
//!
//! Domain-specific error types for mallpark-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mallpark-core errors (this file)                                      │
//! │  ├── ParkingError     - Business outcomes and data-integrity faults    │
//! │  └── ValidationError  - Malformed input                                │
//! │                                                                         │
//! │  mallpark-engine errors (separate crate)                               │
//! │  └── EngineError      - Configuration loading failures                 │
//! │                                                                         │
//! │  Console errors (in app)                                               │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → ParkingError → ApiError → Caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Outcome Categories
//! - Business outcomes (`NoSlotAvailable`, `VehicleAlreadyParked`,
//!   `VehicleNotParked`) are expected and never retried automatically.
//! - `InvalidSlotConfig` is a data-integrity fault: the slot is rejected,
//!   the process keeps running.

use thiserror::Error;

// =============================================================================
// Parking Error
// =============================================================================

/// Errors returned by every parking operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParkingError {
    /// No free slot large enough for the vehicle.
    ///
    /// ## User Workflow
    /// ```text
    /// enter(plate "ABC123", size L, entry 0)
    ///      │
    ///      ▼
    /// candidates: every LP slot is occupied
    ///      │
    ///      ▼
    /// NoSlotAvailable
    ///      │
    ///      ▼
    /// Gate display: "Parking full for large vehicles"
    /// ```
    #[error("No parking slot available")]
    NoSlotAvailable,

    /// The plate already has an open session.
    #[error("Vehicle {plate_number} is already parked")]
    VehicleAlreadyParked { plate_number: String },

    /// The plate has no open session.
    #[error("Vehicle {plate_number} is not parked")]
    VehicleNotParked { plate_number: String },

    /// A slot's distance vector does not match the mall's entry count.
    #[error("Invalid configuration for slot {slot_id}: {reason}")]
    InvalidSlotConfig { slot_id: String, reason: String },

    /// No mall is registered under this id.
    #[error("Mall not found: {0}")]
    MallNotFound(String),

    /// A mall with this id is already registered.
    #[error("Mall already registered: {0}")]
    MallAlreadyRegistered(String),

    /// The slot references a size class that does not exist.
    #[error("Unknown slot size class: {0}")]
    UnknownSizeClass(String),

    /// No slot with this id in the mall.
    #[error("Slot not found: {0}")]
    SlotNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ParkingError {
    /// Creates an InvalidSlotConfig error.
    pub fn invalid_slot(slot_id: impl Into<String>, reason: impl Into<String>) -> Self {
        ParkingError::InvalidSlotConfig {
            slot_id: slot_id.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for expected business outcomes (as opposed to faults).
    pub fn is_business_outcome(&self) -> bool {
        matches!(
            self,
            ParkingError::NoSlotAvailable
                | ParkingError::VehicleAlreadyParked { .. }
                | ParkingError::VehicleNotParked { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised at the request boundary (and re-checked by the core)
/// before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Numeric value is below its minimum.
    #[error("{field} must be at least {min}")]
    TooSmall { field: String, min: i64 },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Vehicle size string is not S, M or L.
    #[error("Unknown vehicle size '{0}', expected one of S, M, L")]
    UnknownVehicleSize(String),

    /// Two parallel lists differ in length.
    #[error("{left} and {right} must have the same length ({left_len} != {right_len})")]
    LengthMismatch {
        left: String,
        right: String,
        left_len: usize,
        right_len: usize,
    },

    /// Duplicate value (e.g., duplicate slot id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Exit time precedes entry time.
    #[error("Exit time {exit} is before entry time {entry}")]
    ExitBeforeEntry { entry: String, exit: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ParkingError.
pub type ParkingResult<T> = Result<T, ParkingError>;

// =============================================================================
// Unit Tests
// =============================================================================
