//! # Occupancy Registry
//!
//! All mutable state of one mall: its configuration, slot catalog and
//! session history.
//!
//! ## Indexes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    OccupancyRegistry (one per mall)                     │
//! │                                                                         │
//! │  sessions: Vec<ParkingSession>      append-only history                │
//! │      ▲           ▲                                                      │
//! │      │           │                                                      │
//! │  open_by_plate   closed_by_plate                                        │
//! │  plate → pos     plate → [pos, pos, ...]   (per-mall history)          │
//! │                                                                         │
//! │  catalog: SlotCatalog                                                   │
//! │  slot.occupying_session_id ──► sessions[open_by_plate[plate]].id       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The registry is not synchronized. `SessionManager` keeps each one behind
//! its own mutex and calls `admit`/`release` with that lock held. The return
//! grace spans every mall, so the vehicle's latest closed session is handed
//! to `admit` by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use mallpark_core::allocator::{allocate, eligible_candidates};
use mallpark_core::fee;
use mallpark_core::validation::{
    validate_entry_index, validate_exit_time, validate_mall_config, validate_rates,
};
use mallpark_core::{
    EntryRequest, ExitReceipt, MallConfig, MallRates, MallRegistration, ParkingError,
    ParkingResult, ParkingSession, ParkingSlot, SizeClassTable, SlotCatalog, SlotSpec,
};

// =============================================================================
// Snapshots
// =============================================================================

/// Read-only view of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStatus {
    pub slot_id: String,
    pub size_class_id: String,
    pub distances: Vec<u32>,
    /// Plate of the vehicle holding the slot.
    pub occupied_by: Option<String>,
}

/// Point-in-time copy of a mall's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MallSnapshot {
    pub mall: MallConfig,
    pub slots: Vec<SlotStatus>,
    pub open_sessions: Vec<ParkingSession>,
}

impl MallSnapshot {
    pub fn free_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.occupied_by.is_none()).count()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Slots and sessions of a single mall.
#[derive(Debug, Clone)]
pub struct OccupancyRegistry {
    mall: MallConfig,
    catalog: SlotCatalog,
    sessions: Vec<ParkingSession>,
    positions: HashMap<String, usize>,
    open_by_plate: HashMap<String, usize>,
    closed_by_plate: HashMap<String, Vec<usize>>,
}

impl OccupancyRegistry {
    /// Creates an empty registry. The mall config must already be valid.
    fn new(mall: MallConfig) -> Self {
        let catalog = SlotCatalog::new(mall.id.clone(), mall.num_entries);
        OccupancyRegistry {
            mall,
            catalog,
            sessions: Vec::new(),
            positions: HashMap::new(),
            open_by_plate: HashMap::new(),
            closed_by_plate: HashMap::new(),
        }
    }

    /// Validates a mall registration and builds its registry.
    ///
    /// ## Errors
    /// Any invalid mall field or slot rejects the whole registration.
    pub fn from_registration(
        registration: MallRegistration,
        classes: &SizeClassTable,
    ) -> ParkingResult<Self> {
        validate_mall_config(&registration.mall)?;

        let mut registry = OccupancyRegistry::new(registration.mall);
        for spec in registration.slots {
            registry.add_slot(spec, classes)?;
        }

        Ok(registry)
    }

    // =========================================================================
    // Catalog Maintenance
    // =========================================================================

    /// Appends a slot to the catalog.
    pub fn add_slot(&mut self, spec: SlotSpec, classes: &SizeClassTable) -> ParkingResult<ParkingSlot> {
        let slot = self.catalog.insert(spec, classes)?.clone();
        debug!(mall_id = %self.mall.id, slot_id = %slot.id, size_class = %slot.size_class_id, "Slot added");
        Ok(slot)
    }

    /// Replaces a slot's distances.
    pub fn correct_slot_distances(&mut self, slot_id: &str, distances: &[i64]) -> ParkingResult<()> {
        self.catalog.correct_distances(slot_id, distances)?;
        debug!(mall_id = %self.mall.id, slot_id, ?distances, "Slot distances corrected");
        Ok(())
    }

    /// Changes the mall's billing parameters.
    pub fn update_rates(&mut self, rates: &MallRates) -> ParkingResult<&MallConfig> {
        validate_rates(rates)?;
        self.mall.apply_rates(rates);
        Ok(&self.mall)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Parks a vehicle: allocate a slot, open a session, occupy the slot.
    ///
    /// ## Steps
    /// ```text
    /// 1. entry index in range?              no → Validation
    /// 2. plate already open here?           yes → VehicleAlreadyParked
    /// 3. eligible_candidates + allocate     none → NoSlotAvailable
    /// 4. grace check against `previous`     → is_fixed_starting_rate
    /// 5. occupy slot, append session        (nothing mutated before this)
    /// ```
    ///
    /// `previous` is the vehicle's most recent closed session in any mall.
    pub fn admit(
        &mut self,
        request: &EntryRequest,
        classes: &SizeClassTable,
        previous: Option<&ParkingSession>,
        now: DateTime<Utc>,
    ) -> ParkingResult<ParkingSession> {
        validate_entry_index(request.entry_index, self.mall.num_entries)?;

        if self.open_by_plate.contains_key(&request.plate_number) {
            return Err(ParkingError::VehicleAlreadyParked {
                plate_number: request.plate_number.clone(),
            });
        }

        let slot_id = {
            let candidates = eligible_candidates(&self.catalog, classes, request.vehicle_size);
            debug!(
                mall_id = %self.mall.id,
                plate = %request.plate_number,
                candidates = candidates.len(),
                "Allocating slot"
            );
            allocate(&candidates, request.entry_index)?.to_string()
        };

        let mut session = ParkingSession {
            id: Uuid::new_v4().to_string(),
            mall_id: self.mall.id.clone(),
            entry_index: request.entry_index,
            entry_time: now,
            exit_time: None,
            slot_id,
            plate_number: request.plate_number.clone(),
            vehicle_size: request.vehicle_size,
            is_fixed_starting_rate: true,
            charge_cents: None,
        };
        session.is_fixed_starting_rate = fee::is_fixed_starting_rate(&session, &self.mall, previous);

        self.catalog.occupy(&session.slot_id, &session.id)?;

        let position = self.sessions.len();
        self.positions.insert(session.id.clone(), position);
        self.open_by_plate.insert(session.plate_number.clone(), position);
        self.sessions.push(session.clone());

        Ok(session)
    }

    /// Unparks a vehicle: close its session, compute the charge, free the slot.
    ///
    /// Every check runs before the first mutation, so a failed release
    /// leaves the registry unchanged.
    pub fn release(
        &mut self,
        plate_number: &str,
        now: DateTime<Utc>,
        classes: &SizeClassTable,
    ) -> ParkingResult<ExitReceipt> {
        let not_parked = || ParkingError::VehicleNotParked {
            plate_number: plate_number.to_string(),
        };

        let position = *self.open_by_plate.get(plate_number).ok_or_else(not_parked)?;
        let open = &self.sessions[position];

        let slot = self
            .catalog
            .get(&open.slot_id)
            .filter(|slot| slot.occupying_session_id.as_deref() == Some(open.id.as_str()))
            .ok_or_else(|| {
                warn!(
                    mall_id = %self.mall.id,
                    plate = plate_number,
                    slot_id = %open.slot_id,
                    "Open session does not hold its slot"
                );
                ParkingError::invalid_slot(open.slot_id.clone(), "occupancy pointer mismatch")
            })?;

        validate_exit_time(open.entry_time, now)?;
        let rate = classes.require(&slot.size_class_id)?.continuous_rate();

        let mut closed = open.clone();
        closed.exit_time = Some(now);
        let charge = fee::compute_charge(&closed, &self.mall, rate);
        closed.charge_cents = Some(charge.cents());

        self.catalog.release(&closed.slot_id, &closed.id)?;
        self.open_by_plate.remove(plate_number);
        self.closed_by_plate
            .entry(plate_number.to_string())
            .or_default()
            .push(position);
        self.sessions[position] = closed.clone();

        Ok(ExitReceipt {
            session: closed,
            charge,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn mall(&self) -> &MallConfig {
        &self.mall
    }

    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    /// All sessions in creation order.
    pub fn sessions(&self) -> &[ParkingSession] {
        &self.sessions
    }

    pub fn session(&self, session_id: &str) -> Option<&ParkingSession> {
        self.positions.get(session_id).map(|&i| &self.sessions[i])
    }

    pub fn open_session(&self, plate_number: &str) -> Option<&ParkingSession> {
        self.open_by_plate.get(plate_number).map(|&i| &self.sessions[i])
    }

    /// The vehicle's closed sessions ordered by exit time.
    pub fn closed_sessions(&self, plate_number: &str) -> Vec<&ParkingSession> {
        let mut closed: Vec<&ParkingSession> = self
            .closed_by_plate
            .get(plate_number)
            .map(|positions| positions.iter().map(|&i| &self.sessions[i]).collect())
            .unwrap_or_default();
        closed.sort_by_key(|s| s.exit_time);
        closed
    }

    /// Copies the current state.
    pub fn snapshot(&self) -> MallSnapshot {
        let slots = self
            .catalog
            .iter()
            .map(|slot| SlotStatus {
                slot_id: slot.id.clone(),
                size_class_id: slot.size_class_id.clone(),
                distances: slot.distances.clone(),
                occupied_by: slot
                    .occupying_session_id
                    .as_deref()
                    .and_then(|id| self.session(id))
                    .map(|s| s.plate_number.clone()),
            })
            .collect();

        let open_sessions = self
            .sessions
            .iter()
            .filter(|s| s.is_open())
            .cloned()
            .collect();

        MallSnapshot {
            mall: self.mall.clone(),
            slots,
            open_sessions,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
