//! # Slot Allocator
//!
//! Greedy nearest-slot selection.
//!
//! ## Selection Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  best = first candidate (catalog order)                                │
//! │                                                                         │
//! │  for each later candidate c, with d = c.distances[entry_index]:        │
//! │     d <  best.d                          → best = c   (nearer)         │
//! │     d == best.d && c.value < best.value  → best = c   (tighter fit)    │
//! │     otherwise                            → keep best  (earlier wins)   │
//! │                                                                         │
//! │  Example (entry 0):                                                    │
//! │     A  d=5  M                                                          │
//! │     B  d=5  S   ← replaces A (same distance, smaller)                  │
//! │     C  d=3  L   ← replaces B (nearer)                     → C          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The allocator never mutates anything. The caller must hold the mall lock
//! from building the candidate list until the chosen slot is committed.

use crate::catalog::{SizeClassTable, SlotCatalog};
use crate::error::{ParkingError, ParkingResult};
use crate::types::VehicleSize;

/// A free slot that can take the vehicle, as seen by the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCandidate<'a> {
    pub slot_id: &'a str,
    pub distances: &'a [u32],
    /// Size class value of the slot.
    pub size_value: u8,
}

impl<'a> SlotCandidate<'a> {
    #[inline]
    fn distance_from(&self, entry_index: usize) -> Option<u32> {
        self.distances.get(entry_index).copied()
    }
}

/// Collects the free slots whose size class accepts `size`, in catalog order.
///
/// Slots whose class is missing from `classes` are skipped; the catalog
/// refuses such slots on insert, so this only matters for a table that was
/// swapped out underneath it.
pub fn eligible_candidates<'a>(
    catalog: &'a SlotCatalog,
    classes: &SizeClassTable,
    size: VehicleSize,
) -> Vec<SlotCandidate<'a>> {
    catalog
        .iter()
        .filter(|slot| slot.is_free())
        .filter_map(|slot| {
            let class = classes.get(&slot.size_class_id)?;
            class.accepts(size).then_some(SlotCandidate {
                slot_id: &slot.id,
                distances: &slot.distances,
                size_value: class.value,
            })
        })
        .collect()
}

/// Picks the best slot for a vehicle arriving at `entry_index`.
///
/// Candidates whose distance vector does not cover `entry_index` are
/// skipped. Returns `NoSlotAvailable` when nothing usable remains.
pub fn allocate<'a>(candidates: &[SlotCandidate<'a>], entry_index: usize) -> ParkingResult<&'a str> {
    let mut best: Option<(SlotCandidate<'a>, u32)> = None;

    for candidate in candidates {
        let Some(distance) = candidate.distance_from(entry_index) else {
            continue;
        };

        let replace = match &best {
            None => true,
            Some((current, best_distance)) => {
                distance < *best_distance
                    || (distance == *best_distance && candidate.size_value < current.size_value)
            }
        };

        if replace {
            best = Some((*candidate, distance));
        }
    }

    best.map(|(candidate, _)| candidate.slot_id)
        .ok_or(ParkingError::NoSlotAvailable)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SlotSpec;

    fn candidate<'a>(id: &'a str, distances: &'a [u32], size_value: u8) -> SlotCandidate<'a> {
        SlotCandidate {
            slot_id: id,
            distances,
            size_value,
        }
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(allocate(&[], 0), Err(ParkingError::NoSlotAvailable));
    }

    #[test]
    fn test_nearest_first() {
        let candidates = [
            candidate("A", &[5], 1),
            candidate("B", &[5], 0),
            candidate("C", &[3], 2),
        ];
        assert_eq!(allocate(&candidates, 0), Ok("C"));
    }

    #[test]
    fn test_size_tie_break() {
        let candidates = [candidate("A", &[5], 1), candidate("B", &[5], 0)];
        assert_eq!(allocate(&candidates, 0), Ok("B"));
    }

    #[test]
    fn test_full_tie_keeps_catalog_order() {
        let candidates = [
            candidate("first", &[4], 1),
            candidate("second", &[4], 1),
            candidate("third", &[4], 1),
        ];
        assert_eq!(allocate(&candidates, 0), Ok("first"));

        let reversed = [candidates[2], candidates[1], candidates[0]];
        assert_eq!(allocate(&reversed, 0), Ok("third"));
    }

    #[test]
    fn test_distance_depends_on_entry() {
        let candidates = [candidate("A", &[1, 9, 5], 0), candidate("B", &[9, 1, 5], 0)];
        assert_eq!(allocate(&candidates, 0), Ok("A"));
        assert_eq!(allocate(&candidates, 1), Ok("B"));
        assert_eq!(allocate(&candidates, 2), Ok("A"));
    }

    #[test]
    fn test_skips_candidates_missing_the_entry() {
        let candidates = [candidate("short", &[0], 0), candidate("full", &[7, 7], 0)];
        assert_eq!(allocate(&candidates, 1), Ok("full"));
        assert_eq!(allocate(&candidates[..1], 1), Err(ParkingError::NoSlotAvailable));
    }

    #[test]
    fn test_deterministic() {
        let candidates = [
            candidate("A", &[2, 3, 4], 2),
            candidate("B", &[2, 1, 4], 1),
            candidate("C", &[2, 3, 1], 1),
        ];
        let first = allocate(&candidates, 0);
        for _ in 0..100 {
            assert_eq!(allocate(&candidates, 0), first);
        }
        assert_eq!(first, Ok("B"));
    }

    #[test]
    fn test_eligible_candidates_filters_size_and_occupancy() {
        let table = SizeClassTable::standard();
        let mut catalog = SlotCatalog::new("m", 3);
        for (id, class) in [("s", "SP"), ("m", "MP"), ("l", "LP"), ("m2", "MP")] {
            catalog
                .insert(SlotSpec::new(class, vec![1, 2, 3]).with_id(id), &table)
                .unwrap();
        }
        catalog.occupy("m2", "session").unwrap();

        let ids = |size| -> Vec<String> {
            eligible_candidates(&catalog, &table, size)
                .iter()
                .map(|c| c.slot_id.to_string())
                .collect()
        };

        assert_eq!(ids(VehicleSize::S), vec!["s", "m", "l"]);
        assert_eq!(ids(VehicleSize::M), vec!["m", "l"]);
        assert_eq!(ids(VehicleSize::L), vec!["l"]);
    }
}
