//! # mallpark-engine: Stateful Parking Engine
//!
//! Wraps the pure rules of `mallpark-core` in thread-safe state: one
//! registry per mall, a global plate index, and configuration loading.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       mallpark-engine                                   │
//! │                                                                         │
//! │   parking.toml ──► ParkingConfig ──► SessionManager::from_config       │
//! │                                            │                            │
//! │                 enter / exit / queries     │                            │
//! │                                            ▼                            │
//! │         ┌──────────────────┐   ┌──────────────────┐                    │
//! │         │ OccupancyRegistry│   │ OccupancyRegistry│   ... per mall     │
//! │         │ (Mutex)          │   │ (Mutex)          │                    │
//! │         └────────┬─────────┘   └────────┬─────────┘                    │
//! │                  │                      │                               │
//! │                  ▼                      ▼                               │
//! │          mallpark-core: allocator, fee, catalog, validation            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use chrono::{Duration, Utc};
//! use mallpark_core::{EntryRequest, VehicleSize};
//! use mallpark_engine::{ParkingConfig, SessionManager};
//!
//! let manager = SessionManager::from_config(ParkingConfig::sample()).unwrap();
//! let now = Utc::now();
//!
//! let session = manager
//!     .enter_at(EntryRequest::new("north", 0, "ABC123", VehicleSize::S), now)
//!     .unwrap();
//! assert_eq!(session.slot_id, "N-1");
//!
//! let receipt = manager.exit("ABC123", now + Duration::hours(1)).unwrap();
//! assert_eq!(receipt.charge.to_string(), "40.00");
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod registry;

pub use config::ParkingConfig;
pub use error::{EngineError, EngineResult};
pub use manager::SessionManager;
pub use registry::{MallSnapshot, OccupancyRegistry, SlotStatus};
