//! # Validation Module
//!
//! Input validation utilities for MallPark.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request collaborator (HTTP, console, ...)                    │
//! │  ├── Deserialization into EntryRequest / SlotSpec                      │
//! │  └── THIS MODULE: reject malformed input at the boundary               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: SessionManager                                               │
//! │  └── Re-checks entry index and exit ordering before touching state     │
//! │                                                                         │
//! │  Slot distance vectors are a data-integrity concern: they surface as   │
//! │  ParkingError::InvalidSlotConfig rather than ValidationError.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::error::{ParkingError, ParkingResult, ValidationError};
use crate::types::{MallConfig, MallRates, SlotSizeClass, VehicleSize, MIN_ENTRIES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted plate number.
pub const MAX_PLATE_LEN: usize = 16;

/// Highest accepted rate, 1,000,000,000.00 per charge unit.
pub const MAX_RATE_CENTS: i64 = 100_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a plate number.
///
/// ## Rules
/// - Must not be empty
/// - At most 16 characters
/// - Letters, digits, hyphens and single spaces only
///
/// ## Example
/// ```rust
/// use mallpark_core::validation::validate_plate_number;
///
/// assert!(validate_plate_number("ABC 1234").is_ok());
/// assert!(validate_plate_number("").is_err());
/// assert!(validate_plate_number("ABC#123").is_err());
/// ```
pub fn validate_plate_number(plate: &str) -> ValidationResult<()> {
    let plate = plate.trim();

    if plate.is_empty() {
        return Err(ValidationError::Required {
            field: "plate_number".to_string(),
        });
    }

    if plate.len() > MAX_PLATE_LEN {
        return Err(ValidationError::TooLong {
            field: "plate_number".to_string(),
            max: MAX_PLATE_LEN,
        });
    }

    if !plate
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "plate_number".to_string(),
            reason: "must contain only letters, digits, hyphens and spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates an identifier (mall, slot, size class).
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the number of mall entrances (≥ 3).
pub fn validate_num_entries(num_entries: usize) -> ValidationResult<()> {
    if num_entries < MIN_ENTRIES {
        return Err(ValidationError::TooSmall {
            field: "num_entries".to_string(),
            min: MIN_ENTRIES as i64,
        });
    }

    Ok(())
}

/// Validates an entry index against the mall's entrance count.
///
/// ## Example
/// ```rust
/// use mallpark_core::validation::validate_entry_index;
///
/// assert!(validate_entry_index(2, 3).is_ok());
/// assert!(validate_entry_index(3, 3).is_err());
/// ```
pub fn validate_entry_index(entry_index: usize, num_entries: usize) -> ValidationResult<()> {
    if entry_index >= num_entries {
        return Err(ValidationError::OutOfRange {
            field: "entry_index".to_string(),
            min: 0,
            max: num_entries as i64 - 1,
        });
    }

    Ok(())
}

/// Validates a rate in cents: `0..=MAX_RATE_CENTS`.
pub fn validate_rate_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::TooSmall {
            field: field.to_string(),
            min: 0,
        });
    }

    if cents > MAX_RATE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_RATE_CENTS,
        });
    }

    Ok(())
}

/// Validates a duration in seconds (zero allowed, negative rejected).
pub fn validate_duration_secs(field: &str, secs: i64) -> ValidationResult<()> {
    if secs < 0 {
        return Err(ValidationError::TooSmall {
            field: field.to_string(),
            min: 0,
        });
    }

    Ok(())
}

/// Validates that an exit happens no earlier than its entry.
pub fn validate_exit_time(entry: DateTime<Utc>, exit: DateTime<Utc>) -> ValidationResult<()> {
    if exit < entry {
        return Err(ValidationError::ExitBeforeEntry {
            entry: entry.to_rfc3339(),
            exit: exit.to_rfc3339(),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates the billing parameters of a mall.
pub fn validate_rates(rates: &MallRates) -> ValidationResult<()> {
    validate_rate_cents("flat_rate", rates.flat_rate_cents)?;
    validate_rate_cents("exceed_rate", rates.exceed_rate_cents)?;
    validate_duration_secs("flat_rate_duration", rates.flat_rate_duration_secs)?;
    validate_duration_secs("exceed_duration", rates.exceed_duration_secs)?;
    validate_duration_secs("return_duration", rates.return_duration_secs)?;
    Ok(())
}

/// Validates a complete mall configuration.
pub fn validate_mall_config(mall: &MallConfig) -> ValidationResult<()> {
    validate_id("mall id", &mall.id)?;
    validate_num_entries(mall.num_entries)?;
    validate_rates(&mall.rates())
}

/// Validates a slot size class.
///
/// `value` must lie within the vehicle ranks, `0..=VehicleSize::L.rank()`.
pub fn validate_size_class(class: &SlotSizeClass) -> ValidationResult<()> {
    validate_id("size class id", &class.id)?;
    if class.value > VehicleSize::L.rank() {
        return Err(ValidationError::OutOfRange {
            field: "size class value".to_string(),
            min: 0,
            max: i64::from(VehicleSize::L.rank()),
        });
    }
    validate_rate_cents("continuous_rate", class.continuous_rate_cents)
}

// =============================================================================
// Slot Configuration
// =============================================================================

/// Validates a slot's distance vector and converts it to its stored form.
///
/// ## Rules
/// - Exactly one distance per entrance
/// - Every distance is nonnegative
///
/// ## Errors
/// `ParkingError::InvalidSlotConfig`: the slot cannot be used until its
/// distances are corrected.
///
/// ## Example
/// ```rust
/// use mallpark_core::validation::validate_distances;
///
/// assert_eq!(validate_distances("a", &[3, 1, 4], 3).unwrap(), vec![3, 1, 4]);
/// assert!(validate_distances("a", &[3, 1], 3).is_err());
/// assert!(validate_distances("a", &[3, -1, 4], 3).is_err());
/// ```
pub fn validate_distances(
    slot_id: &str,
    distances: &[i64],
    num_entries: usize,
) -> ParkingResult<Vec<u32>> {
    if distances.len() != num_entries {
        return Err(ParkingError::invalid_slot(
            slot_id,
            format!(
                "expected {} distances (one per entry), got {}",
                num_entries,
                distances.len()
            ),
        ));
    }

    distances
        .iter()
        .enumerate()
        .map(|(entry, &d)| {
            u32::try_from(d).map_err(|_| {
                ParkingError::invalid_slot(
                    slot_id,
                    format!("distance from entry {} must be a nonnegative integer, got {}", entry, d),
                )
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_plate_number() {
        assert!(validate_plate_number("ABC123").is_ok());
        assert!(validate_plate_number("NCR-4521").is_ok());
        assert!(validate_plate_number("ABC 123").is_ok());

        assert!(validate_plate_number("").is_err());
        assert!(validate_plate_number("   ").is_err());
        assert!(validate_plate_number("ABC/123").is_err());
        assert!(validate_plate_number(&"A".repeat(17)).is_err());
    }

    #[test]
    fn test_validate_num_entries() {
        assert!(validate_num_entries(3).is_ok());
        assert!(validate_num_entries(8).is_ok());
        assert!(validate_num_entries(2).is_err());
    }

    #[test]
    fn test_validate_entry_index() {
        assert!(validate_entry_index(0, 3).is_ok());
        assert!(validate_entry_index(2, 3).is_ok());
        assert_eq!(
            validate_entry_index(3, 3).unwrap_err(),
            ValidationError::OutOfRange {
                field: "entry_index".to_string(),
                min: 0,
                max: 2
            }
        );
    }

    #[test]
    fn test_validate_distances() {
        assert_eq!(validate_distances("s1", &[0, 7, 2], 3).unwrap(), vec![0, 7, 2]);

        let err = validate_distances("s1", &[1, 2, 3, 4], 3).unwrap_err();
        assert!(matches!(err, ParkingError::InvalidSlotConfig { ref slot_id, .. } if slot_id == "s1"));

        let err = validate_distances("s2", &[1, -2, 3], 3).unwrap_err();
        assert!(matches!(err, ParkingError::InvalidSlotConfig { .. }));
    }

    #[test]
    fn test_validate_mall_config() {
        let mall = MallConfig::new("mall-1", "Main");
        assert!(validate_mall_config(&mall).is_ok());

        let mut bad = mall.clone().with_num_entries(2);
        assert!(validate_mall_config(&bad).is_err());

        bad = mall.clone();
        bad.flat_rate_cents = -1;
        assert!(validate_mall_config(&bad).is_err());

        bad = mall;
        bad.id = " ".to_string();
        assert!(validate_mall_config(&bad).is_err());
    }

    #[test]
    fn test_validate_rate_cents_bounds() {
        assert!(validate_rate_cents("flat_rate", 0).is_ok());
        assert!(validate_rate_cents("flat_rate", MAX_RATE_CENTS).is_ok());
        assert!(matches!(
            validate_rate_cents("flat_rate", MAX_RATE_CENTS + 1),
            Err(ValidationError::OutOfRange { .. })
        ));

        let mut mall = MallConfig::new("mall-1", "Main");
        mall.flat_rate_cents = i64::MAX;
        assert!(validate_mall_config(&mall).is_err());
    }

    #[test]
    fn test_validate_exit_time() {
        let entry = Utc::now();
        assert!(validate_exit_time(entry, entry).is_ok());
        assert!(validate_exit_time(entry, entry + Duration::seconds(1)).is_ok());
        assert!(matches!(
            validate_exit_time(entry, entry - Duration::seconds(1)),
            Err(ValidationError::ExitBeforeEntry { .. })
        ));
    }
}
