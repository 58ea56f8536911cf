//! # Domain Types
//!
//! Core domain types used throughout MallPark.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   MallConfig    │   │  ParkingSlot    │   │ ParkingSession  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  mall_id        │◄──│  slot_id        │       │
//! │  │  num_entries    │   │  size_class_id  │   │  plate_number   │       │
//! │  │  flat_rate      │   │  distances[]    │   │  entry/exit     │       │
//! │  │  return_dur.    │   │  occupying ─────┼──►│  id             │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │                                       │
//! │  ┌─────────────────┐   ┌────────▼────────┐   ┌─────────────────┐       │
//! │  │  VehicleSize    │   │ SlotSizeClass   │   │    Vehicle      │       │
//! │  │  S (0)          │   │  value (rank)   │   │  plate_number   │       │
//! │  │  M (1)          │   │  hourly rate    │   │  size           │       │
//! │  │  L (2)          │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Monetary fields are stored as `*_cents: i64` with `Money` accessors, and
//! durations as `*_secs: i64`, so every type maps 1:1 onto a storage row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Vehicle Size
// =============================================================================

/// The size of an arriving vehicle.
///
/// A vehicle of rank V may park in any slot whose size class value is ≥ V.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VehicleSize {
    /// Small vehicle (motorcycles, compact cars).
    S,
    /// Medium vehicle (sedans, SUVs).
    M,
    /// Large vehicle (vans, trucks).
    L,
}

impl VehicleSize {
    /// Ordinal capacity rank compared against `SlotSizeClass::value`.
    #[inline]
    pub const fn rank(&self) -> u8 {
        match self {
            VehicleSize::S => 0,
            VehicleSize::M => 1,
            VehicleSize::L => 2,
        }
    }
}

impl fmt::Display for VehicleSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleSize::S => write!(f, "S"),
            VehicleSize::M => write!(f, "M"),
            VehicleSize::L => write!(f, "L"),
        }
    }
}

impl FromStr for VehicleSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "S" => Ok(VehicleSize::S),
            "M" => Ok(VehicleSize::M),
            "L" => Ok(VehicleSize::L),
            other => Err(ValidationError::UnknownVehicleSize(other.to_string())),
        }
    }
}

// =============================================================================
// Slot Size Class
// =============================================================================

/// A slot capacity tier with its continuous hourly rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSizeClass {
    /// Identifier referenced by `ParkingSlot::size_class_id` (e.g. "SP").
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Ordinal capacity rank, ascending. Compared directly with
    /// `VehicleSize::rank`, so it lies in `0..=2`: 0 takes only S, 2 takes all.
    pub value: u8,

    /// Continuous parking rate in cents per hour.
    pub continuous_rate_cents: i64,
}

impl SlotSizeClass {
    /// Creates a size class.
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: u8, rate_cents: i64) -> Self {
        SlotSizeClass {
            id: id.into(),
            name: name.into(),
            value,
            continuous_rate_cents: rate_cents,
        }
    }

    /// Returns the hourly rate as Money.
    #[inline]
    pub fn continuous_rate(&self) -> Money {
        Money::from_cents(self.continuous_rate_cents)
    }

    /// Whether a vehicle of this size fits a slot of this class.
    #[inline]
    pub fn accepts(&self, size: VehicleSize) -> bool {
        self.value >= size.rank()
    }
}

// =============================================================================
// Mall Configuration
// =============================================================================

/// Minimum number of entrances a mall can have.
pub const MIN_ENTRIES: usize = 3;

/// Static reference parameters for one mall.
///
/// ## Defaults
/// ```text
/// num_entries              3
/// flat_rate                40.00        first 3 hours
/// flat_rate_duration       10800 s      (3 h)
/// exceed_rate              5000.00      configured, not billed
/// exceed_duration          86400 s      configured, not billed
/// return_duration          1800 s       (30 min grace)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MallConfig {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Number of entrances (≥ 3). Every slot carries one distance per entry.
    #[serde(default = "default_num_entries")]
    pub num_entries: usize,

    /// Flat fee for the first `flat_rate_duration_secs`.
    #[serde(default = "default_flat_rate_cents")]
    pub flat_rate_cents: i64,

    #[serde(default = "default_flat_rate_duration_secs")]
    pub flat_rate_duration_secs: i64,

    /// Carried for collaborators; no fee formula consumes it.
    #[serde(default = "default_exceed_rate_cents")]
    pub exceed_rate_cents: i64,

    /// Carried for collaborators; no fee formula consumes it.
    #[serde(default = "default_exceed_duration_secs")]
    pub exceed_duration_secs: i64,

    /// Re-entry within this many seconds of the last exit loses the flat rate.
    #[serde(default = "default_return_duration_secs")]
    pub return_duration_secs: i64,
}

fn default_num_entries() -> usize {
    MIN_ENTRIES
}

fn default_flat_rate_cents() -> i64 {
    4000
}

fn default_flat_rate_duration_secs() -> i64 {
    3 * 60 * 60
}

fn default_exceed_rate_cents() -> i64 {
    500_000
}

fn default_exceed_duration_secs() -> i64 {
    24 * 60 * 60
}

fn default_return_duration_secs() -> i64 {
    30 * 60
}

impl MallConfig {
    /// Creates a mall with default rates and durations.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        MallConfig {
            id: id.into(),
            name: name.into(),
            num_entries: default_num_entries(),
            flat_rate_cents: default_flat_rate_cents(),
            flat_rate_duration_secs: default_flat_rate_duration_secs(),
            exceed_rate_cents: default_exceed_rate_cents(),
            exceed_duration_secs: default_exceed_duration_secs(),
            return_duration_secs: default_return_duration_secs(),
        }
    }

    /// Sets the number of entries.
    pub fn with_num_entries(mut self, num_entries: usize) -> Self {
        self.num_entries = num_entries;
        self
    }

    /// Returns the flat rate as Money.
    #[inline]
    pub fn flat_rate(&self) -> Money {
        Money::from_cents(self.flat_rate_cents)
    }

    /// Extracts the rate and duration parameters.
    pub fn rates(&self) -> MallRates {
        MallRates {
            flat_rate_cents: self.flat_rate_cents,
            flat_rate_duration_secs: self.flat_rate_duration_secs,
            exceed_rate_cents: self.exceed_rate_cents,
            exceed_duration_secs: self.exceed_duration_secs,
            return_duration_secs: self.return_duration_secs,
        }
    }

    /// Replaces the rate and duration parameters. The entry count is untouched
    /// because every slot's distance vector depends on it.
    pub fn apply_rates(&mut self, rates: &MallRates) {
        self.flat_rate_cents = rates.flat_rate_cents;
        self.flat_rate_duration_secs = rates.flat_rate_duration_secs;
        self.exceed_rate_cents = rates.exceed_rate_cents;
        self.exceed_duration_secs = rates.exceed_duration_secs;
        self.return_duration_secs = rates.return_duration_secs;
    }
}

/// The mutable billing parameters of a mall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MallRates {
    pub flat_rate_cents: i64,
    pub flat_rate_duration_secs: i64,
    pub exceed_rate_cents: i64,
    pub exceed_duration_secs: i64,
    pub return_duration_secs: i64,
}

// =============================================================================
// Parking Slot
// =============================================================================

/// A physical slot inside a mall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSlot {
    pub id: String,
    pub mall_id: String,
    pub size_class_id: String,

    /// Distance from each entrance, indexed by entry index.
    pub distances: Vec<u32>,

    /// The open session currently holding this slot.
    pub occupying_session_id: Option<String>,
}

impl ParkingSlot {
    /// Whether no session holds this slot.
    #[inline]
    pub fn is_free(&self) -> bool {
        self.occupying_session_id.is_none()
    }
}

/// Slot creation input, as supplied by the configuration collaborator.
///
/// Distances arrive as signed integers so that negative values are reported
/// as `InvalidSlotConfig` instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    /// Explicit id; `{mall_id}-slot-{n}` is generated when absent.
    #[serde(default)]
    pub id: Option<String>,

    pub size_class_id: String,

    pub distances: Vec<i64>,
}

impl SlotSpec {
    pub fn new(size_class_id: impl Into<String>, distances: Vec<i64>) -> Self {
        SlotSpec {
            id: None,
            size_class_id: size_class_id.into(),
            distances,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A mall together with its slots, registered in one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MallRegistration {
    pub mall: MallConfig,

    /// Slots in catalog order.
    #[serde(default)]
    pub slots: Vec<SlotSpec>,
}

impl MallRegistration {
    /// Builds a registration from parallel lists of distance vectors and
    /// size-class ids, as a bulk registration request carries them.
    pub fn from_parallel_lists(
        mall: MallConfig,
        distance_list: Vec<Vec<i64>>,
        size_class_list: Vec<String>,
    ) -> Result<Self, ValidationError> {
        if distance_list.len() != size_class_list.len() {
            return Err(ValidationError::LengthMismatch {
                left: "parking_slot_distance_list".to_string(),
                right: "parking_slot_size_list".to_string(),
                left_len: distance_list.len(),
                right_len: size_class_list.len(),
            });
        }

        let slots = distance_list
            .into_iter()
            .zip(size_class_list)
            .map(|(distances, size_class_id)| SlotSpec::new(size_class_id, distances))
            .collect();

        Ok(MallRegistration { mall, slots })
    }
}

// =============================================================================
// Vehicle
// =============================================================================

/// A vehicle known to the system, keyed by plate number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub plate_number: String,
    pub size: VehicleSize,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

// =============================================================================
// Parking Session
// =============================================================================

/// One parking episode.
///
/// Sessions are never deleted; a closed session stays in history so the
/// return grace period can be evaluated on the next entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSession {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub mall_id: String,
    pub entry_index: usize,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub slot_id: String,
    pub plate_number: String,

    /// Size declared at entry (frozen).
    pub vehicle_size: VehicleSize,

    /// Billing mode decided at entry (frozen).
    pub is_fixed_starting_rate: bool,

    /// Charge computed at exit.
    pub charge_cents: Option<i64>,
}

impl ParkingSession {
    /// Whether the vehicle is still parked.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.exit_time.is_none()
    }

    /// Seconds between entry and exit, if closed.
    pub fn duration_secs(&self) -> Option<i64> {
        self.exit_time
            .map(|exit| (exit - self.entry_time).num_seconds())
    }

    /// Returns the charge as Money, if closed.
    #[inline]
    pub fn charge(&self) -> Option<Money> {
        self.charge_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Requests & Receipts
// =============================================================================

/// Input to `enter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRequest {
    pub mall_id: String,
    pub entry_index: usize,
    pub plate_number: String,
    pub vehicle_size: VehicleSize,
}

impl EntryRequest {
    pub fn new(
        mall_id: impl Into<String>,
        entry_index: usize,
        plate_number: impl Into<String>,
        vehicle_size: VehicleSize,
    ) -> Self {
        EntryRequest {
            mall_id: mall_id.into(),
            entry_index,
            plate_number: plate_number.into(),
            vehicle_size,
        }
    }
}

/// Output of `exit`: the closed session and what is owed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitReceipt {
    pub session: ParkingSession,
    pub charge: Money,
}

impl ExitReceipt {
    #[inline]
    pub fn session_id(&self) -> &str {
        &self.session.id
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_vehicle_size_parsing() {
        assert_eq!("S".parse::<VehicleSize>().unwrap(), VehicleSize::S);
        assert_eq!("m".parse::<VehicleSize>().unwrap(), VehicleSize::M);
        assert_eq!(" L ".parse::<VehicleSize>().unwrap(), VehicleSize::L);
        assert!("XL".parse::<VehicleSize>().is_err());
    }

    #[test]
    fn test_size_class_accepts_smaller_or_equal() {
        let medium = SlotSizeClass::new("MP", "Medium", 1, 6000);
        assert!(medium.accepts(VehicleSize::S));
        assert!(medium.accepts(VehicleSize::M));
        assert!(!medium.accepts(VehicleSize::L));
    }

    #[test]
    fn test_mall_defaults() {
        let mall = MallConfig::new("mall-1", "SM North");
        assert_eq!(mall.num_entries, 3);
        assert_eq!(mall.flat_rate().cents(), 4000);
        assert_eq!(mall.flat_rate_duration_secs, 10800);
        assert_eq!(mall.return_duration_secs, 1800);
        assert_eq!(mall.exceed_duration_secs, 86400);
    }

    #[test]
    fn test_mall_defaults_from_toml_like_input() {
        let mall: MallConfig = serde_json::from_str(r#"{"id": "m"}"#).unwrap();
        assert_eq!(mall, MallConfig::new("m", ""));
    }

    #[test]
    fn test_apply_rates_keeps_entries() {
        let mut mall = MallConfig::new("m", "").with_num_entries(4);
        let mut rates = mall.rates();
        rates.flat_rate_cents = 5000;
        mall.apply_rates(&rates);
        assert_eq!(mall.flat_rate_cents, 5000);
        assert_eq!(mall.num_entries, 4);
    }

    #[test]
    fn test_parallel_lists_must_match() {
        let mall = MallConfig::new("m", "");
        let err = MallRegistration::from_parallel_lists(
            mall.clone(),
            vec![vec![1, 2, 3]],
            vec!["SP".to_string(), "MP".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::LengthMismatch { .. }));

        let reg = MallRegistration::from_parallel_lists(
            mall,
            vec![vec![1, 2, 3], vec![4, 5, 6]],
            vec!["SP".to_string(), "MP".to_string()],
        )
        .unwrap();
        assert_eq!(reg.slots.len(), 2);
        assert_eq!(reg.slots[1].size_class_id, "MP");
    }

    #[test]
    fn test_session_duration() {
        let entry = Utc::now();
        let mut session = ParkingSession {
            id: "s".to_string(),
            mall_id: "m".to_string(),
            entry_index: 0,
            entry_time: entry,
            exit_time: None,
            slot_id: "slot".to_string(),
            plate_number: "ABC123".to_string(),
            vehicle_size: VehicleSize::S,
            is_fixed_starting_rate: true,
            charge_cents: None,
        };
        assert!(session.is_open());
        assert_eq!(session.duration_secs(), None);

        session.exit_time = Some(entry + Duration::seconds(90));
        assert!(!session.is_open());
        assert_eq!(session.duration_secs(), Some(90));
    }
}
