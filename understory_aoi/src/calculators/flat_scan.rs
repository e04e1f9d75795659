// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear-scan calculator.

use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::adjustment::Adjustment;
use crate::calculator::Calculator;
use crate::error::AoiError;
use crate::record::Records;
use crate::types::{Coord, Position};

/// Calculator that tests every tracked record on each adjust.
///
/// Enter, leave and move are O(1); adjust is O(n). Only worth it for very small
/// spaces, or as a reference to check other calculators against.
#[derive(Clone, Debug)]
pub struct FlatScan<T> {
    distance: T,
    entered: HashSet<usize>,
}

impl<T: Coord> FlatScan<T> {
    /// Create an empty calculator for the given interest distance.
    pub fn new(distance: T) -> Self {
        Self {
            distance,
            entered: HashSet::new(),
        }
    }

    fn in_range<I>(&self, records: &Records<I, T>, center: &Position<T>, slot: usize) -> bool {
        self.entered.contains(&slot)
            && center.within(&records.record(slot).position, self.distance)
    }
}

impl<T: Coord> Calculator<T> for FlatScan<T> {
    fn with_distance(distance: T) -> Self {
        Self::new(distance)
    }

    fn distance(&self) -> T {
        self.distance
    }

    fn enter<I>(
        &mut self,
        records: &mut Records<I, T>,
        slot: usize,
        position: Position<T>,
    ) -> Result<(), AoiError> {
        if !self.entered.insert(slot) {
            return Err(AoiError::DuplicateEnter);
        }
        records.record_mut(slot).position = position;
        Ok(())
    }

    fn leave<I>(&mut self, _records: &mut Records<I, T>, slot: usize) -> Result<(), AoiError> {
        if !self.entered.remove(&slot) {
            return Err(AoiError::NotEntered);
        }
        Ok(())
    }

    fn move_to<I>(
        &mut self,
        records: &mut Records<I, T>,
        slot: usize,
        position: Position<T>,
    ) -> Result<(), AoiError> {
        if !self.entered.contains(&slot) {
            return Err(AoiError::NotEntered);
        }
        records.record_mut(slot).position = position;
        Ok(())
    }

    fn adjust<I>(
        &mut self,
        records: &mut Records<I, T>,
        slot: usize,
    ) -> Result<Adjustment<usize>, AoiError> {
        if !self.entered.contains(&slot) {
            return Err(AoiError::NotEntered);
        }
        let records: &Records<I, T> = records;
        let record = records.record(slot);
        let center = record.position;

        let mut enter: SmallVec<[usize; 8]> = records
            .iter()
            .filter(|&(s, _)| s != slot && !record.has_neighbor(s))
            .filter(|&(s, _)| self.in_range(records, &center, s))
            .map(|(s, _)| s)
            .collect();
        let mut leave: SmallVec<[usize; 8]> = record
            .neighbors()
            .filter(|&s| !self.in_range(records, &center, s))
            .collect();

        enter.sort_unstable_by_key(|&s| records.record(s).seq());
        leave.sort_unstable_by_key(|&s| records.record(s).seq());
        Ok(Adjustment { enter, leave })
    }

    fn visit_nearby<I, F: FnMut(usize)>(&self, records: &Records<I, T>, slot: usize, mut f: F) {
        let center = records.record(slot).position;
        for (s, _) in records.iter() {
            if s != slot && self.in_range(records, &center, s) {
                f(s);
            }
        }
    }

    fn validate<I>(&self, records: &Records<I, T>) -> Result<(), AoiError> {
        if self.entered.iter().any(|&s| records.get(s).is_none()) {
            return Err(AoiError::CorruptState {
                reason: "tracked slot is vacant",
            });
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.entered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_matches_the_box_test() {
        let mut calc = FlatScan::new(10_i64);
        let mut records: Records<u8, i64> = Records::new();
        let mut enter = |records: &mut Records<u8, i64>, id, x, z| {
            let p = Position::new(x, z);
            let slot = records.alloc(id, p);
            calc.enter(records, slot, p).unwrap();
            slot
        };
        let a = enter(&mut records, 0, 0, 0);
        let b = enter(&mut records, 1, 5, 5);
        let _c = enter(&mut records, 2, 5, 15);
        let d = enter(&mut records, 3, -10, 10);

        let adj = calc.adjust(&mut records, a).unwrap();
        assert_eq!(adj.enter.as_slice(), &[b, d]);
        assert!(adj.leave.is_empty());

        records.link_neighbors(a, b);
        calc.leave(&mut records, b).unwrap();
        let adj = calc.adjust(&mut records, a).unwrap();
        assert_eq!(adj.enter.as_slice(), &[d]);
        assert_eq!(adj.leave.as_slice(), &[b]);
        calc.validate(&records).unwrap();
    }

    #[test]
    fn duplicate_and_missing_slots_fail() {
        let mut calc = FlatScan::new(1.0_f32);
        let mut records: Records<u8, f32> = Records::new();
        let p = Position::new(0.0, 0.0);
        let a = records.alloc(0, p);
        calc.enter(&mut records, a, p).unwrap();
        assert_eq!(calc.enter(&mut records, a, p), Err(AoiError::DuplicateEnter));
        calc.leave(&mut records, a).unwrap();
        assert_eq!(calc.leave(&mut records, a), Err(AoiError::NotEntered));
        assert_eq!(calc.adjust(&mut records, a), Err(AoiError::NotEntered));
    }
}
