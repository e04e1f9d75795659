// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Space` API and generic implementation over a pluggable calculator.

use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::adjustment::Adjustment;
use crate::calculator::Calculator;
use crate::calculators::XzList;
use crate::config::AoiConfig;
use crate::error::AoiError;
use crate::record::{AoiRecord, Records};
use crate::types::{Coord, Position};

/// A shared space whose entities track which others are within interest range.
///
/// Entities are identified by the caller's `I`. The calculator `C` defaults to
/// [`XzList`]; [`FlatScan`][crate::FlatScan] can be swapped in for tiny spaces.
///
/// [`Space::adjust`] only computes a delta; registering neighbors is the
/// caller's decision, made through [`Space::apply`] (or [`Space::sync`], which
/// does both) or [`Space::interest`]/[`Space::uninterest`]. Registration is
/// always symmetric.
pub struct Space<I, T, C = XzList<T>> {
    records: Records<I, T>,
    slots: HashMap<I, usize>,
    calculator: C,
}

impl<I, T, C: Debug> Debug for Space<I, T, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Space")
            .field("entities", &self.records.len())
            .field("calculator", &self.calculator)
            .finish_non_exhaustive()
    }
}

impl<I, T> Space<I, T>
where
    I: Copy + Eq + Hash,
    T: Coord,
{
    /// Create an empty space using the default calculator.
    pub fn new(distance: T) -> Result<Self, AoiError> {
        Self::with_config(AoiConfig::new(distance))
    }
}

impl<I, T, C> Space<I, T, C>
where
    I: Copy + Eq + Hash,
    T: Coord,
    C: Calculator<T>,
{
    /// Create an empty space from a configuration.
    pub fn with_config(config: AoiConfig<T>) -> Result<Self, AoiError> {
        config.validate()?;
        Ok(Self {
            records: Records::with_capacity(config.capacity),
            slots: HashMap::with_capacity(config.capacity),
            calculator: C::with_distance(config.distance),
        })
    }

    /// Create an empty space around an explicit calculator instance.
    ///
    /// The space takes its distance from the calculator. Any slots the
    /// calculator already tracks belong to another arena and are cleared.
    pub fn with_calculator(mut calculator: C) -> Result<Self, AoiError> {
        AoiConfig::new(calculator.distance()).validate()?;
        calculator.clear();
        Ok(Self {
            records: Records::new(),
            slots: HashMap::new(),
            calculator,
        })
    }

    /// The interest distance.
    pub fn distance(&self) -> T {
        self.calculator.distance()
    }

    /// Number of entities in the space.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the space is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether `id` is in the space.
    pub fn contains(&self, id: I) -> bool {
        self.slots.contains_key(&id)
    }

    /// Current position of `id`.
    pub fn position(&self, id: I) -> Option<Position<T>> {
        let slot = *self.slots.get(&id)?;
        Some(self.records.record(slot).position())
    }

    /// The interest record of `id`.
    pub fn record(&self, id: I) -> Option<&AoiRecord<I, T>> {
        let slot = *self.slots.get(&id)?;
        self.records.get(slot)
    }

    /// The record arena.
    pub fn records(&self) -> &Records<I, T> {
        &self.records
    }

    /// The calculator.
    pub fn calculator(&self) -> &C {
        &self.calculator
    }

    /// Add `id` to the space at `position`.
    pub fn enter(&mut self, id: I, position: Position<T>) -> Result<(), AoiError> {
        if !position.is_finite() {
            return Err(AoiError::InvalidPosition);
        }
        if self.slots.contains_key(&id) {
            return Err(AoiError::DuplicateEnter);
        }
        let slot = self.records.alloc(id, position);
        if let Err(err) = self.calculator.enter(&mut self.records, slot, position) {
            self.records.free(slot);
            return Err(err);
        }
        self.slots.insert(id, slot);
        log::debug!("slot {slot} entered at {position:?}");
        Ok(())
    }

    /// Remove `id` from the space.
    ///
    /// The record is dropped from every neighbor's set. Returns the former
    /// neighbors in entry order.
    pub fn leave(&mut self, id: I) -> Result<SmallVec<[I; 8]>, AoiError> {
        let slot = self.slot(id)?;
        self.calculator.leave(&mut self.records, slot)?;

        let mut former: SmallVec<[usize; 8]> = self.records.record(slot).neighbors().collect();
        former.sort_unstable_by_key(|&s| self.records.record(s).seq());
        let ids = former
            .iter()
            .map(|&s| self.records.record(s).id())
            .collect();
        for &other in &former {
            self.records.unlink_neighbors(slot, other);
        }

        self.records.free(slot);
        self.slots.remove(&id);
        log::debug!("slot {slot} left with {} neighbors", former.len());
        Ok(ids)
    }

    /// Move `id` to `position`.
    pub fn move_to(&mut self, id: I, position: Position<T>) -> Result<(), AoiError> {
        if !position.is_finite() {
            return Err(AoiError::InvalidPosition);
        }
        let slot = self.slot(id)?;
        self.calculator.move_to(&mut self.records, slot, position)
    }

    /// Compute which entities came into and went out of range of `id`, relative
    /// to its registered neighbors. Nothing is registered.
    pub fn adjust(&mut self, id: I) -> Result<Adjustment<I>, AoiError> {
        let slot = self.slot(id)?;
        let adjustment = self.calculator.adjust(&mut self.records, slot)?;
        let records = &self.records;
        Ok(adjustment.map(|s| records.record(s).id()))
    }

    /// Register `adjustment.enter` as neighbors of `id` and drop `adjustment.leave`.
    ///
    /// Entities in `leave` that are no longer in the space are skipped; every
    /// entity in `enter` must be present, or nothing is applied.
    pub fn apply(&mut self, id: I, adjustment: &Adjustment<I>) -> Result<(), AoiError> {
        let slot = self.slot(id)?;
        let enter = adjustment
            .enter
            .iter()
            .map(|&e| self.slot(e))
            .collect::<Result<SmallVec<[usize; 8]>, _>>()?;
        for other in enter {
            self.records.link_neighbors(slot, other);
        }
        for other in &adjustment.leave {
            if let Some(&other) = self.slots.get(other) {
                self.records.unlink_neighbors(slot, other);
            }
        }
        Ok(())
    }

    /// [`adjust`][Self::adjust] followed by [`apply`][Self::apply].
    pub fn sync(&mut self, id: I) -> Result<Adjustment<I>, AoiError> {
        let adjustment = self.adjust(id)?;
        self.apply(id, &adjustment)?;
        Ok(adjustment)
    }

    /// Register `a` and `b` as each other's neighbors.
    pub fn interest(&mut self, a: I, b: I) -> Result<(), AoiError> {
        let (a, b) = (self.slot(a)?, self.slot(b)?);
        self.records.link_neighbors(a, b);
        Ok(())
    }

    /// Drop the mutual registration of `a` and `b`.
    pub fn uninterest(&mut self, a: I, b: I) -> Result<(), AoiError> {
        let (a, b) = (self.slot(a)?, self.slot(b)?);
        self.records.unlink_neighbors(a, b);
        Ok(())
    }

    /// Registered neighbors of `id`, in no particular order.
    pub fn neighbors(&self, id: I) -> Result<impl Iterator<Item = I> + '_, AoiError> {
        let slot = self.slot(id)?;
        let records = &self.records;
        Ok(records
            .record(slot)
            .neighbors()
            .map(move |s| records.record(s).id()))
    }

    /// Entities currently inside the interest box of `id`, registered or not.
    pub fn nearby(&self, id: I) -> Result<SmallVec<[I; 8]>, AoiError> {
        let mut out = SmallVec::new();
        self.visit_nearby(id, |other| out.push(other))?;
        Ok(out)
    }

    /// Visit entities currently inside the interest box of `id` (does not allocate).
    ///
    /// The order is calculator-dependent.
    pub fn visit_nearby<F: FnMut(I)>(&self, id: I, mut f: F) -> Result<(), AoiError> {
        let slot = self.slot(id)?;
        self.calculator
            .visit_nearby(&self.records, slot, |s| f(self.records.record(s).id()));
        Ok(())
    }

    /// Check calculator invariants, the identity map, and neighbor symmetry.
    pub fn validate(&self) -> Result<(), AoiError> {
        let result = self.check();
        if let Err(err) = &result {
            log::warn!("space failed validation: {err}");
        }
        result
    }

    /// Remove every entity without reporting anything.
    pub fn clear(&mut self) {
        self.records.clear();
        self.slots.clear();
        self.calculator.clear();
    }

    fn check(&self) -> Result<(), AoiError> {
        self.calculator.validate(&self.records)?;
        let corrupt = |reason| Err(AoiError::CorruptState { reason });
        if self.slots.len() != self.records.len() {
            return corrupt("identity map and arena disagree on size");
        }
        for (&id, &slot) in &self.slots {
            if self.records.get(slot).is_none_or(|r| r.id() != id) {
                return corrupt("identity map points at the wrong slot");
            }
        }
        for (slot, record) in self.records.iter() {
            for other in record.neighbors() {
                if other == slot || self.records.get(other).is_none_or(|r| !r.has_neighbor(slot)) {
                    return corrupt("neighbor registration is not symmetric");
                }
            }
        }
        Ok(())
    }

    fn slot(&self, id: I) -> Result<usize, AoiError> {
        self.slots.get(&id).copied().ok_or(AoiError::NotEntered)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::FlatScan;

    fn space() -> Space<u32, f64> {
        Space::new(10.0).unwrap()
    }

    #[test]
    fn enter_and_leave_correctness() {
        let mut s = space();
        s.enter(1, Position::new(0.0, 0.0)).unwrap();
        s.enter(2, Position::new(5.0, 5.0)).unwrap();

        let adj = s.sync(1).unwrap();
        assert_eq!(adj.enter.as_slice(), &[2]);
        assert!(adj.leave.is_empty());
        assert_eq!(s.neighbors(2).unwrap().collect::<Vec<_>>(), vec![1]);

        s.move_to(2, Position::new(20.0, 20.0)).unwrap();
        let adj = s.sync(1).unwrap();
        assert!(adj.enter.is_empty());
        assert_eq!(adj.leave.as_slice(), &[2]);
        assert!(s.sync(1).unwrap().is_empty());
        assert_eq!(s.neighbors(2).unwrap().count(), 0);
        s.validate().unwrap();
    }

    #[test]
    fn with_calculator_drops_state_from_another_space() {
        let mut old = space();
        old.enter(1, Position::new(0.0, 0.0)).unwrap();
        old.enter(2, Position::new(3.0, 3.0)).unwrap();

        let mut s: Space<u32, f64> = Space::with_calculator(old.calculator().clone()).unwrap();
        assert_eq!(s.calculator().list(crate::Axis::X).len(), 0);
        s.enter(7, Position::new(0.0, 0.0)).unwrap();
        s.enter(8, Position::new(1.0, 1.0)).unwrap();
        s.validate().unwrap();
        assert_eq!(s.sync(7).unwrap().enter.as_slice(), &[8]);
        s.validate().unwrap();

        let mut flat: Space<u32, f64, FlatScan<f64>> =
            Space::with_config(AoiConfig::new(10.0)).unwrap();
        flat.enter(1, Position::new(0.0, 0.0)).unwrap();
        let mut s: Space<u32, f64, FlatScan<f64>> =
            Space::with_calculator(flat.calculator().clone()).unwrap();
        s.enter(7, Position::new(0.0, 0.0)).unwrap();
        s.validate().unwrap();
    }

    #[test]
    fn adjust_alone_registers_nothing() {
        let mut s = space();
        s.enter(1, Position::new(0.0, 0.0)).unwrap();
        s.enter(2, Position::new(1.0, 1.0)).unwrap();
        assert_eq!(s.adjust(1).unwrap().enter.as_slice(), &[2]);
        assert_eq!(s.adjust(1).unwrap().enter.as_slice(), &[2]);
        assert_eq!(s.neighbors(1).unwrap().count(), 0);
    }

    #[test]
    fn symmetric_registration_suppresses_the_reverse_enter() {
        let mut s = space();
        s.enter(1, Position::new(0.0, 0.0)).unwrap();
        s.enter(2, Position::new(3.0, -3.0)).unwrap();
        s.sync(1).unwrap();
        assert!(s.sync(2).unwrap().is_empty());
    }

    #[test]
    fn leave_unregisters_from_former_neighbors() {
        let mut s = space();
        s.enter(1, Position::new(0.0, 0.0)).unwrap();
        s.enter(2, Position::new(1.0, 0.0)).unwrap();
        s.enter(3, Position::new(0.0, 1.0)).unwrap();
        s.sync(1).unwrap();

        let former = s.leave(1).unwrap();
        assert_eq!(former.as_slice(), &[2, 3]);
        assert_eq!(s.neighbors(2).unwrap().count(), 0);
        assert!(!s.contains(1));
        assert_eq!(s.len(), 2);

        // The freed slot is reused; the newcomer starts with no neighbors.
        s.enter(4, Position::new(100.0, 100.0)).unwrap();
        assert!(s.sync(4).unwrap().is_empty());
        s.validate().unwrap();
    }

    #[test]
    fn contract_violations() {
        let mut s = space();
        s.enter(1, Position::new(0.0, 0.0)).unwrap();
        assert_eq!(
            s.enter(1, Position::new(1.0, 1.0)),
            Err(AoiError::DuplicateEnter)
        );
        assert_eq!(s.leave(2), Err(AoiError::NotEntered));
        assert_eq!(
            s.move_to(2, Position::new(0.0, 0.0)),
            Err(AoiError::NotEntered)
        );
        assert_eq!(s.adjust(2), Err(AoiError::NotEntered));
        assert_eq!(s.interest(1, 2), Err(AoiError::NotEntered));
        assert_eq!(
            s.enter(3, Position::new(f64::NAN, 0.0)),
            Err(AoiError::InvalidPosition)
        );
        assert_eq!(
            s.move_to(1, Position::new(0.0, f64::INFINITY)),
            Err(AoiError::InvalidPosition)
        );
        assert_eq!(s.position(1), Some(Position::new(0.0, 0.0)));
        assert!(matches!(
            Space::<u32, f64>::new(-1.0),
            Err(AoiError::InvalidDistance)
        ));
    }

    #[test]
    fn apply_rejects_unknown_enter_without_side_effects() {
        let mut s = space();
        s.enter(1, Position::new(0.0, 0.0)).unwrap();
        s.enter(2, Position::new(1.0, 0.0)).unwrap();
        let mut adj = s.adjust(1).unwrap();
        adj.enter.push(9);
        assert_eq!(s.apply(1, &adj), Err(AoiError::NotEntered));
        assert_eq!(s.neighbors(1).unwrap().count(), 0);
    }

    #[test]
    fn nearby_ignores_registration() {
        let mut s = space();
        s.enter(1, Position::new(0.0, 0.0)).unwrap();
        s.enter(2, Position::new(10.0, 10.0)).unwrap();
        s.enter(3, Position::new(5.0, 15.0)).unwrap();
        assert_eq!(s.nearby(1).unwrap().as_slice(), &[2]);
        s.interest(1, 3).unwrap();
        assert_eq!(s.nearby(1).unwrap().as_slice(), &[2]);
        assert_eq!(s.sync(1).unwrap().leave.as_slice(), &[3]);
    }

    #[test]
    fn flat_scan_space_behaves_the_same() {
        let mut s: Space<u32, i64, FlatScan<i64>> =
            Space::with_config(AoiConfig::new(10).with_capacity(4)).unwrap();
        s.enter(1, Position::new(0, 0)).unwrap();
        s.enter(2, Position::new(5, 5)).unwrap();
        s.enter(3, Position::new(5, 15)).unwrap();
        assert_eq!(s.sync(1).unwrap().enter.as_slice(), &[2]);
        s.move_to(2, Position::new(20, 20)).unwrap();
        assert_eq!(s.sync(1).unwrap().leave.as_slice(), &[2]);
        s.validate().unwrap();
    }

    #[test]
    fn clear_empties_everything() {
        let mut s = space();
        s.enter(1, Position::new(0.0, 0.0)).unwrap();
        s.enter(2, Position::new(1.0, 0.0)).unwrap();
        s.sync(1).unwrap();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.calculator().list(crate::Axis::X).len(), 0);
        s.enter(1, Position::new(0.0, 0.0)).unwrap();
        assert!(s.sync(1).unwrap().is_empty());
        s.validate().unwrap();
    }
}
