//! # mallpark-core: Pure Parking Logic for MallPark
//!
//! This crate contains the parking rules as pure functions and plain data
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MallPark Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Request collaborator (console, HTTP, ...)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        mallpark-engine (SessionManager, OccupancyRegistry)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ mallpark-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌──────────┐         │   │
//! │  │   │  types   │ │ catalog  │ │ allocator │ │   fee    │         │   │
//! │  │   │  Mall    │ │ Slots    │ │ nearest + │ │ flat +   │         │   │
//! │  │   │  Session │ │ Classes  │ │ tie-break │ │ grace    │         │   │
//! │  │   └──────────┘ └──────────┘ └───────────┘ └──────────┘         │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOCKS • PURE FUNCTIONS                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MallConfig, ParkingSlot, ParkingSession, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Slot catalog and size-class table
//! - [`allocator`] - Nearest-slot selection
//! - [`fee`] - Charge computation and return grace
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation
//!
//! ## Example Usage
//!
//! ```rust
//! use mallpark_core::allocator::{allocate, eligible_candidates};
//! use mallpark_core::catalog::{SizeClassTable, SlotCatalog};
//! use mallpark_core::{SlotSpec, VehicleSize};
//!
//! let classes = SizeClassTable::standard();
//! let mut catalog = SlotCatalog::new("mall-1", 3);
//! catalog.insert(SlotSpec::new("MP", vec![5, 2, 9]).with_id("A"), &classes).unwrap();
//! catalog.insert(SlotSpec::new("SP", vec![5, 8, 1]).with_id("B"), &classes).unwrap();
//!
//! let candidates = eligible_candidates(&catalog, &classes, VehicleSize::S);
//! assert_eq!(allocate(&candidates, 0).unwrap(), "B"); // same distance, smaller slot
//! assert_eq!(allocate(&candidates, 1).unwrap(), "A"); // nearer to entry 1
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocator;
pub mod catalog;
pub mod error;
pub mod fee;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{SizeClassTable, SlotCatalog};
pub use error::{ParkingError, ParkingResult, ValidationError};
pub use money::Money;
pub use types::*;
