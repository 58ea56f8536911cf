//! # Fee Engine
//!
//! Computes what a vehicle owes on exit.
//!
//! ## Billing Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FIXED STARTING RATE (default)                                          │
//! │                                                                         │
//! │  0 ──────── flat_rate_duration ─────────────────────────► exit          │
//! │  │  flat_rate (one fee)        │  continuous rate per second │          │
//! │                                                                         │
//! │  charge = flat_rate + max(0, duration − flat_duration) × rate / 3600   │
//! │                                                                         │
//! │  CONTINUOUS (re-entry inside the return grace period)                   │
//! │                                                                         │
//! │  0 ─────────────────────────────────────────────────────► exit          │
//! │  │  continuous rate per second from the first second       │           │
//! │                                                                         │
//! │  charge = duration × rate / 3600                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Return Grace
//! ```text
//!   previous exit T          re-entry
//!   ───────┼────────────────────┼──────────
//!          │◄── ≤ return_duration ──►│  → continuous (no flat-rate reset)
//!          │◄──── > return_duration ────►│ → fixed starting rate
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{MallConfig, ParkingSession};

/// Decides whether a new session starts on the flat rate.
///
/// `most_recent_closed` is the vehicle's single latest-exited prior session
/// in this mall. A prior with no exit time is ignored.
///
/// ## Example
/// ```rust,ignore
/// // Left at 10:00, back at 10:29 with a 30 min grace → continuous billing
/// assert!(!is_fixed_starting_rate(&new_session, &mall, Some(&previous)));
/// ```
pub fn is_fixed_starting_rate(
    session: &ParkingSession,
    mall: &MallConfig,
    most_recent_closed: Option<&ParkingSession>,
) -> bool {
    let Some(previous_exit) = most_recent_closed.and_then(|prior| prior.exit_time) else {
        return true;
    };

    let gap = (session.entry_time - previous_exit).num_seconds();
    gap > mall.return_duration_secs
}

/// The parts a charge is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    /// Whether the flat rate applied.
    pub fixed_starting_rate: bool,

    /// Total parked seconds.
    pub duration_secs: i64,

    /// The flat portion (zero in continuous mode).
    pub flat: Money,

    /// Seconds billed at the continuous rate.
    pub billable_secs: i64,

    /// The continuous portion.
    pub continuous: Money,

    pub total: Money,
}

/// Computes the charge and its components.
///
/// An open session yields an all-zero breakdown. Exit before entry is
/// rejected by the caller; here the duration is clamped at zero.
pub fn charge_breakdown(
    session: &ParkingSession,
    mall: &MallConfig,
    slot_hourly_rate: Money,
) -> ChargeBreakdown {
    let fixed = session.is_fixed_starting_rate;

    let Some(duration) = session.duration_secs() else {
        return ChargeBreakdown {
            fixed_starting_rate: fixed,
            duration_secs: 0,
            flat: Money::zero(),
            billable_secs: 0,
            continuous: Money::zero(),
            total: Money::zero(),
        };
    };
    let duration = duration.max(0);

    let (flat, billable_secs) = if fixed {
        (
            mall.flat_rate(),
            (duration - mall.flat_rate_duration_secs).max(0),
        )
    } else {
        (Money::zero(), duration)
    };

    let continuous = slot_hourly_rate.prorate_hourly(billable_secs);

    ChargeBreakdown {
        fixed_starting_rate: fixed,
        duration_secs: duration,
        flat,
        billable_secs,
        continuous,
        total: flat + continuous,
    }
}

/// Computes the amount owed for a closed session.
pub fn compute_charge(session: &ParkingSession, mall: &MallConfig, slot_hourly_rate: Money) -> Money {
    charge_breakdown(session, mall, slot_hourly_rate).total
}

// =============================================================================
// Unit Tests
// =============================================================================
