//! # Slot Catalog
//!
//! The set of slots belonging to one mall, plus the size-class table they
//! reference.
//!
//! ## Catalog Order
//! ```text
//! insert(A) ──► [A]
//! insert(B) ──► [A, B]
//! insert(C) ──► [A, B, C]      iteration order == insertion order, always
//! ```
//! The allocator resolves its final ties by this order, so it must never
//! depend on hashing or storage layout. Slots live in a `Vec`; the `HashMap`
//! is only an id → position lookup.

use std::collections::HashMap;

use crate::error::{ParkingError, ParkingResult, ValidationError};
use crate::types::{ParkingSlot, SlotSizeClass, SlotSpec};
use crate::validation::{validate_distances, validate_size_class, ValidationResult};

// =============================================================================
// Size Class Table
// =============================================================================

/// All slot size classes known to the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeClassTable {
    classes: Vec<SlotSizeClass>,
}

impl SizeClassTable {
    /// Builds a table, rejecting duplicate or malformed classes.
    pub fn new(classes: Vec<SlotSizeClass>) -> ValidationResult<Self> {
        for (i, class) in classes.iter().enumerate() {
            validate_size_class(class)?;
            if classes[..i].iter().any(|c| c.id == class.id) {
                return Err(ValidationError::Duplicate {
                    field: "size class id".to_string(),
                    value: class.id.clone(),
                });
            }
        }

        Ok(SizeClassTable { classes })
    }

    /// The three standard classes:
    ///
    /// | id | value | rate/h |
    /// |----|-------|--------|
    /// | SP | 0     | 20.00  |
    /// | MP | 1     | 60.00  |
    /// | LP | 2     | 100.00 |
    pub fn standard() -> Self {
        SizeClassTable {
            classes: vec![
                SlotSizeClass::new("SP", "Small", 0, 2000),
                SlotSizeClass::new("MP", "Medium", 1, 6000),
                SlotSizeClass::new("LP", "Large", 2, 10000),
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&SlotSizeClass> {
        self.classes.iter().find(|c| c.id == id)
    }

    /// Looks up a class, failing with `UnknownSizeClass`.
    pub fn require(&self, id: &str) -> ParkingResult<&SlotSizeClass> {
        self.get(id)
            .ok_or_else(|| ParkingError::UnknownSizeClass(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotSizeClass> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for SizeClassTable {
    fn default() -> Self {
        SizeClassTable::standard()
    }
}

// =============================================================================
// Slot Catalog
// =============================================================================

/// Slots of a single mall in stable catalog order.
#[derive(Debug, Clone)]
pub struct SlotCatalog {
    mall_id: String,
    num_entries: usize,
    slots: Vec<ParkingSlot>,
    positions: HashMap<String, usize>,
}

impl SlotCatalog {
    /// Creates an empty catalog for a mall with `num_entries` entrances.
    pub fn new(mall_id: impl Into<String>, num_entries: usize) -> Self {
        SlotCatalog {
            mall_id: mall_id.into(),
            num_entries,
            slots: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Validates a slot spec and appends it to the catalog.
    ///
    /// ## Errors
    /// - `UnknownSizeClass` if the class id is not in `classes`
    /// - `InvalidSlotConfig` if the distances don't fit the mall
    /// - `Validation(Duplicate)` if the id is already taken
    pub fn insert(&mut self, spec: SlotSpec, classes: &SizeClassTable) -> ParkingResult<&ParkingSlot> {
        let id = match spec.id {
            Some(id) => id,
            None => self.next_generated_id(),
        };

        if self.positions.contains_key(&id) {
            return Err(ValidationError::Duplicate {
                field: "slot id".to_string(),
                value: id,
            }
            .into());
        }

        classes.require(&spec.size_class_id)?;
        let distances = validate_distances(&id, &spec.distances, self.num_entries)?;

        let position = self.slots.len();
        self.positions.insert(id.clone(), position);
        self.slots.push(ParkingSlot {
            id,
            mall_id: self.mall_id.clone(),
            size_class_id: spec.size_class_id,
            distances,
            occupying_session_id: None,
        });

        Ok(&self.slots[position])
    }

    /// First `{mall}-slot-{n}` not already taken, counting up from `len + 1`.
    fn next_generated_id(&self) -> String {
        (self.slots.len() + 1..)
            .map(|n| format!("{}-slot-{}", self.mall_id, n))
            .find(|id| !self.positions.contains_key(id))
            .unwrap_or_default()
    }

    /// Replaces a slot's distance vector after validating it.
    pub fn correct_distances(&mut self, slot_id: &str, distances: &[i64]) -> ParkingResult<()> {
        let validated = validate_distances(slot_id, distances, self.num_entries)?;
        let slot = self.require_mut(slot_id)?;
        slot.distances = validated;
        Ok(())
    }

    /// Marks a free slot as held by `session_id`.
    pub fn occupy(&mut self, slot_id: &str, session_id: &str) -> ParkingResult<()> {
        let slot = self.require_mut(slot_id)?;
        if let Some(current) = &slot.occupying_session_id {
            return Err(ParkingError::invalid_slot(
                slot_id,
                format!("already held by session {}", current),
            ));
        }
        slot.occupying_session_id = Some(session_id.to_string());
        Ok(())
    }

    /// Frees a slot held by `session_id`. A slot held by another session is
    /// left untouched.
    pub fn release(&mut self, slot_id: &str, session_id: &str) -> ParkingResult<()> {
        let slot = self.require_mut(slot_id)?;
        match slot.occupying_session_id.as_deref() {
            Some(current) if current == session_id => {
                slot.occupying_session_id = None;
                Ok(())
            }
            _ => Err(ParkingError::invalid_slot(
                slot_id,
                format!("not held by session {}", session_id),
            )),
        }
    }

    pub fn get(&self, slot_id: &str) -> Option<&ParkingSlot> {
        self.positions.get(slot_id).map(|&i| &self.slots[i])
    }

    fn require_mut(&mut self, slot_id: &str) -> ParkingResult<&mut ParkingSlot> {
        match self.positions.get(slot_id) {
            Some(&i) => Ok(&mut self.slots[i]),
            None => Err(ParkingError::SlotNotFound(slot_id.to_string())),
        }
    }

    /// Slots in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ParkingSlot> {
        self.slots.iter()
    }

    pub fn mall_id(&self) -> &str {
        &self.mall_id
    }

    pub fn num_entries(&self) -> usize {
        self.num_entries
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots with no occupying session.
    pub fn free_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_free()).count()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SlotCatalog {
        SlotCatalog::new("mall", 3)
    }

    #[test]
    fn test_standard_table() {
        let table = SizeClassTable::standard();
        assert_eq!(table.len(), 3);
        assert_eq!(table.require("LP").unwrap().continuous_rate().cents(), 10000);
        assert_eq!(
            table.require("XP").unwrap_err(),
            ParkingError::UnknownSizeClass("XP".to_string())
        );
    }

    #[test]
    fn test_table_rejects_duplicates() {
        let classes = vec![
            SlotSizeClass::new("SP", "Small", 0, 2000),
            SlotSizeClass::new("SP", "Small again", 1, 3000),
        ];
        assert!(matches!(
            SizeClassTable::new(classes),
            Err(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_insert_preserves_order_and_generates_ids() {
        let table = SizeClassTable::standard();
        let mut catalog = catalog();
        catalog.insert(SlotSpec::new("MP", vec![1, 2, 3]), &table).unwrap();
        catalog
            .insert(SlotSpec::new("SP", vec![4, 5, 6]).with_id("north-1"), &table)
            .unwrap();
        catalog.insert(SlotSpec::new("LP", vec![7, 8, 9]), &table).unwrap();

        let ids: Vec<&str> = catalog.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["mall-slot-1", "north-1", "mall-slot-3"]);
        assert_eq!(catalog.free_count(), 3);
    }

    #[test]
    fn test_generated_ids_skip_taken_ones() {
        let table = SizeClassTable::standard();
        let mut catalog = catalog();
        catalog
            .insert(SlotSpec::new("SP", vec![1, 1, 1]).with_id("mall-slot-2"), &table)
            .unwrap();
        catalog.insert(SlotSpec::new("SP", vec![2, 2, 2]), &table).unwrap();
        catalog.insert(SlotSpec::new("SP", vec![3, 3, 3]), &table).unwrap();

        let ids: Vec<&str> = catalog.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["mall-slot-2", "mall-slot-3", "mall-slot-4"]);
    }

    #[test]
    fn test_table_rejects_value_above_largest_vehicle() {
        let classes = vec![SlotSizeClass::new("XP", "Extra", 3, 2000)];
        assert_eq!(
            SizeClassTable::new(classes).unwrap_err(),
            ValidationError::OutOfRange {
                field: "size class value".to_string(),
                min: 0,
                max: 2
            }
        );
        assert!(SizeClassTable::new(vec![SlotSizeClass::new("LP", "Large", 2, 10000)]).is_ok());
    }

    #[test]
    fn test_insert_rejects_bad_slots() {
        let table = SizeClassTable::standard();
        let mut catalog = catalog();

        let err = catalog.insert(SlotSpec::new("MP", vec![1, 2]), &table).unwrap_err();
        assert!(matches!(err, ParkingError::InvalidSlotConfig { .. }));

        let err = catalog.insert(SlotSpec::new("XL", vec![1, 2, 3]), &table).unwrap_err();
        assert!(matches!(err, ParkingError::UnknownSizeClass(_)));

        catalog
            .insert(SlotSpec::new("MP", vec![1, 2, 3]).with_id("a"), &table)
            .unwrap();
        let err = catalog
            .insert(SlotSpec::new("MP", vec![1, 2, 3]).with_id("a"), &table)
            .unwrap_err();
        assert!(matches!(err, ParkingError::Validation(ValidationError::Duplicate { .. })));

        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_occupy_and_release() {
        let table = SizeClassTable::standard();
        let mut catalog = catalog();
        catalog
            .insert(SlotSpec::new("SP", vec![1, 1, 1]).with_id("a"), &table)
            .unwrap();

        catalog.occupy("a", "session-1").unwrap();
        assert!(!catalog.get("a").unwrap().is_free());
        assert!(catalog.occupy("a", "session-2").is_err());

        assert!(catalog.release("a", "session-2").is_err());
        catalog.release("a", "session-1").unwrap();
        assert!(catalog.get("a").unwrap().is_free());

        assert_eq!(
            catalog.occupy("missing", "s").unwrap_err(),
            ParkingError::SlotNotFound("missing".to_string())
        );
    }

    #[test]
    fn test_correct_distances() {
        let table = SizeClassTable::standard();
        let mut catalog = catalog();
        catalog
            .insert(SlotSpec::new("SP", vec![1, 1, 1]).with_id("a"), &table)
            .unwrap();

        assert!(catalog.correct_distances("a", &[1, 2]).is_err());
        catalog.correct_distances("a", &[9, 8, 7]).unwrap();
        assert_eq!(catalog.get("a").unwrap().distances, vec![9, 8, 7]);
    }
}
