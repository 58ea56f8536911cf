//! # Session Manager
//!
//! Owns every mall's registry and drives the per-vehicle state machine
//! `Unparked → Parked → Unparked`.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SessionManager                                   │
//! │                                                                         │
//! │  malls: RwLock<MallTable>                                               │
//! │    └── mall_id → Arc<Mutex<OccupancyRegistry>>   (one lock per mall)    │
//! │                                                                         │
//! │  parked: Mutex<HashMap<plate, mall_id>>          (global plate index)   │
//! │  last_closed: Mutex<HashMap<plate, Session>>     (latest exit, any mall)│
//! │  vehicles: Mutex<HashMap<plate, Vehicle>>                               │
//! │                                                                         │
//! │  enter:                                                                 │
//! │    1. claim plate in `parked`       (no other lock held)               │
//! │    2. lock mall, read `last_closed` → admit                            │
//! │    3. on failure: drop claim        (mall lock still held)             │
//! │                                                                         │
//! │  exit:                                                                  │
//! │    1. read mall id from `parked`    (no other lock held)               │
//! │    2. lock mall → release                                              │
//! │    3. on success: record in `last_closed`, then drop plate             │
//! │                                     (mall lock still held)             │
//! │                                                                         │
//! │  Order: mall → parked → last_closed → vehicles. Never reversed.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operations on different malls only contend on the plate indexes, each
//! held for a single map operation at a time. A plate's exit is recorded in
//! `last_closed` before its claim is dropped, so the next entry of that plate,
//! in any mall, sees it.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use mallpark_core::validation::validate_plate_number;
use mallpark_core::{
    EntryRequest, ExitReceipt, MallConfig, MallRates, MallRegistration, ParkingError,
    ParkingResult, ParkingSession, ParkingSlot, SizeClassTable, SlotSpec, Vehicle,
};

use crate::config::ParkingConfig;
use crate::error::EngineResult;
use crate::registry::{MallSnapshot, OccupancyRegistry};

type SharedRegistry = Arc<Mutex<OccupancyRegistry>>;

#[derive(Debug, Default)]
struct MallTable {
    /// Registration order.
    order: Vec<String>,
    by_id: HashMap<String, SharedRegistry>,
}

/// Thread-safe entry point for all parking operations.
///
/// Share it between threads behind an `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct SessionManager {
    classes: SizeClassTable,
    malls: RwLock<MallTable>,
    parked: Mutex<HashMap<String, String>>,
    last_closed: Mutex<HashMap<String, ParkingSession>>,
    vehicles: Mutex<HashMap<String, Vehicle>>,
}

impl Default for SessionManager {
    fn default() -> Self {
        SessionManager::new(SizeClassTable::standard())
    }
}

impl SessionManager {
    /// Creates a manager with no malls.
    pub fn new(classes: SizeClassTable) -> Self {
        SessionManager {
            classes,
            malls: RwLock::new(MallTable::default()),
            parked: Mutex::new(HashMap::new()),
            last_closed: Mutex::new(HashMap::new()),
            vehicles: Mutex::new(HashMap::new()),
        }
    }

    /// Builds a manager and registers every configured mall in order.
    pub fn from_config(config: ParkingConfig) -> EngineResult<Self> {
        let manager = SessionManager::new(config.size_class_table()?);

        for registration in config.malls {
            manager.register_mall(registration)?;
        }

        info!(malls = manager.mall_ids().len(), "Session manager ready");
        Ok(manager)
    }

    /// The size classes every mall shares.
    pub fn size_classes(&self) -> &SizeClassTable {
        &self.classes
    }

    fn registry(&self, mall_id: &str) -> ParkingResult<SharedRegistry> {
        self.malls
            .read()
            .by_id
            .get(mall_id)
            .cloned()
            .ok_or_else(|| ParkingError::MallNotFound(mall_id.to_string()))
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a mall together with its slots.
    ///
    /// The registration is validated in full before anything becomes
    /// visible; a rejected registration leaves no trace.
    pub fn register_mall(&self, registration: MallRegistration) -> ParkingResult<MallSnapshot> {
        let mall_id = registration.mall.id.clone();

        let registry = OccupancyRegistry::from_registration(registration, &self.classes)
            .map_err(|e| {
                warn!(mall_id = %mall_id, error = %e, "Mall registration rejected");
                e
            })?;
        let snapshot = registry.snapshot();

        let mut malls = self.malls.write();
        if malls.by_id.contains_key(&mall_id) {
            warn!(mall_id = %mall_id, "Mall already registered");
            return Err(ParkingError::MallAlreadyRegistered(mall_id));
        }
        malls.order.push(mall_id.clone());
        malls.by_id.insert(mall_id.clone(), Arc::new(Mutex::new(registry)));

        info!(
            mall_id = %mall_id,
            num_entries = snapshot.mall.num_entries,
            slots = snapshot.slots.len(),
            "Mall registered"
        );
        Ok(snapshot)
    }

    /// Appends one slot to a mall's catalog.
    pub fn add_slot(&self, mall_id: &str, spec: SlotSpec) -> ParkingResult<ParkingSlot> {
        let registry = self.registry(mall_id)?;
        let mut registry = registry.lock();
        registry.add_slot(spec, &self.classes).map_err(|e| {
            warn!(mall_id, error = %e, "Slot rejected");
            e
        })
    }

    /// Replaces a slot's distance vector.
    pub fn correct_slot_distances(
        &self,
        mall_id: &str,
        slot_id: &str,
        distances: &[i64],
    ) -> ParkingResult<()> {
        let registry = self.registry(mall_id)?;
        let mut registry = registry.lock();
        registry.correct_slot_distances(slot_id, distances)
    }

    /// Changes a mall's billing parameters.
    ///
    /// Open sessions keep the billing mode decided at entry; their charge
    /// uses whatever rates are in force at exit.
    pub fn update_rates(&self, mall_id: &str, rates: MallRates) -> ParkingResult<MallConfig> {
        let registry = self.registry(mall_id)?;
        let mut registry = registry.lock();
        let mall = registry.update_rates(&rates)?.clone();
        info!(mall_id, ?rates, "Mall rates updated");
        Ok(mall)
    }

    // =========================================================================
    // Vehicle Lifecycle
    // =========================================================================

    /// Parks a vehicle using the current time.
    pub fn enter(&self, request: EntryRequest) -> ParkingResult<ParkingSession> {
        self.enter_at(request, Utc::now())
    }

    /// Parks a vehicle at `now`.
    ///
    /// ## Errors
    /// - `Validation` for a malformed plate or an entry index out of range
    /// - `MallNotFound`
    /// - `VehicleAlreadyParked` if the plate has an open session in any mall
    /// - `NoSlotAvailable`
    pub fn enter_at(&self, request: EntryRequest, now: DateTime<Utc>) -> ParkingResult<ParkingSession> {
        validate_plate_number(&request.plate_number)?;
        let request = EntryRequest {
            plate_number: request.plate_number.trim().to_string(),
            ..request
        };
        let plate = request.plate_number.as_str();

        let registry = self.registry(&request.mall_id)?;

        {
            let mut parked = self.parked.lock();
            if let Some(current) = parked.get(plate) {
                debug!(plate, mall_id = %current, "Entry rejected: vehicle already parked");
                return Err(ParkingError::VehicleAlreadyParked {
                    plate_number: plate.to_string(),
                });
            }
            parked.insert(plate.to_string(), request.mall_id.clone());
        }

        let mut registry = registry.lock();
        let previous = self.last_closed.lock().get(plate).cloned();
        let session = match registry.admit(&request, &self.classes, previous.as_ref(), now) {
            Ok(session) => session,
            Err(e) => {
                self.parked.lock().remove(plate);
                log_rejection("Entry rejected", plate, &request.mall_id, &e);
                return Err(e);
            }
        };

        self.record_vehicle(&request, now);

        info!(
            plate,
            mall_id = %session.mall_id,
            slot_id = %session.slot_id,
            fixed_starting_rate = session.is_fixed_starting_rate,
            "Vehicle parked"
        );
        Ok(session)
    }

    /// Unparks a vehicle at `now` and returns what it owes.
    ///
    /// ## Errors
    /// - `VehicleNotParked` if the plate has no open session
    /// - `Validation(ExitBeforeEntry)` if `now` precedes the entry time
    pub fn exit(&self, plate_number: &str, now: DateTime<Utc>) -> ParkingResult<ExitReceipt> {
        let plate = plate_number.trim();
        let not_parked = || ParkingError::VehicleNotParked {
            plate_number: plate.to_string(),
        };

        let mall_id = self.parked.lock().get(plate).cloned().ok_or_else(|| {
            debug!(plate, "Exit rejected: vehicle not parked");
            not_parked()
        })?;
        let registry = self.registry(&mall_id)?;

        let mut registry = registry.lock();
        let receipt = registry.release(plate, now, &self.classes).map_err(|e| {
            log_rejection("Exit rejected", plate, &mall_id, &e);
            e
        })?;
        self.record_exit(&receipt.session);
        self.parked.lock().remove(plate);

        if let Some(vehicle) = self.vehicles.lock().get_mut(plate) {
            vehicle.last_seen_at = now;
        }

        info!(
            plate,
            mall_id = %mall_id,
            slot_id = %receipt.session.slot_id,
            charge = %receipt.charge,
            "Vehicle exited"
        );
        Ok(receipt)
    }

    /// Keeps the plate's closed session with the latest exit time.
    fn record_exit(&self, session: &ParkingSession) {
        let mut last_closed = self.last_closed.lock();
        let newer = last_closed
            .get(&session.plate_number)
            .map_or(true, |latest| latest.exit_time <= session.exit_time);
        if newer {
            last_closed.insert(session.plate_number.clone(), session.clone());
        }
    }

    /// Upserts the vehicle record. The latest declared size wins.
    fn record_vehicle(&self, request: &EntryRequest, now: DateTime<Utc>) {
        let mut vehicles = self.vehicles.lock();
        match vehicles.get_mut(&request.plate_number) {
            Some(vehicle) => {
                if vehicle.size != request.vehicle_size {
                    debug!(
                        plate = %request.plate_number,
                        from = %vehicle.size,
                        to = %request.vehicle_size,
                        "Vehicle size changed"
                    );
                }
                vehicle.size = request.vehicle_size;
                vehicle.last_seen_at = now;
            }
            None => {
                vehicles.insert(
                    request.plate_number.clone(),
                    Vehicle {
                        plate_number: request.plate_number.clone(),
                        size: request.vehicle_size,
                        first_seen_at: now,
                        last_seen_at: now,
                    },
                );
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Registered mall ids in registration order.
    pub fn mall_ids(&self) -> Vec<String> {
        self.malls.read().order.clone()
    }

    pub fn mall_snapshot(&self, mall_id: &str) -> ParkingResult<MallSnapshot> {
        Ok(self.registry(mall_id)?.lock().snapshot())
    }

    /// The plate's open session, in whichever mall it is parked.
    pub fn open_session(&self, plate_number: &str) -> Option<ParkingSession> {
        let mall_id = self.parked.lock().get(plate_number).cloned()?;
        let registry = self.registry(&mall_id).ok()?;
        let session = registry.lock().open_session(plate_number).cloned();
        session
    }

    /// The plate's most recent closed session across all malls.
    pub fn last_closed_session(&self, plate_number: &str) -> Option<ParkingSession> {
        self.last_closed.lock().get(plate_number).cloned()
    }

    pub fn vehicle(&self, plate_number: &str) -> Option<Vehicle> {
        self.vehicles.lock().get(plate_number).cloned()
    }

    /// Closed sessions of a vehicle in one mall, ordered by exit time.
    pub fn vehicle_history(&self, mall_id: &str, plate_number: &str) -> ParkingResult<Vec<ParkingSession>> {
        let registry = self.registry(mall_id)?;
        let registry = registry.lock();
        let history = registry
            .closed_sessions(plate_number)
            .into_iter()
            .cloned()
            .collect();
        Ok(history)
    }

    /// Every session of a mall, open or closed, in creation order.
    pub fn session_history(&self, mall_id: &str) -> ParkingResult<Vec<ParkingSession>> {
        Ok(self.registry(mall_id)?.lock().sessions().to_vec())
    }
}

/// Expected outcomes (no slot, already parked, not parked) log at debug,
/// everything else at warn.
fn log_rejection(message: &str, plate: &str, mall_id: &str, error: &ParkingError) {
    if error.is_business_outcome() {
        debug!(plate, mall_id, error = %error, "{}", message);
    } else {
        warn!(plate, mall_id, error = %error, "{}", message);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
