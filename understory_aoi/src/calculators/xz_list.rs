// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-list sweep calculator.
//!
//! Keeps one [`SweepList`] per axis. An adjust pass marks everything within
//! the interest distance on X, then on Z; records marked twice are inside the
//! interest box. Known neighbors still in the box are flagged with a sentinel
//! so the second X sweep only reports records that are new. A final Z sweep
//! resets whatever marks remain.

use smallvec::SmallVec;

use crate::adjustment::Adjustment;
use crate::calculator::Calculator;
use crate::error::AoiError;
use crate::record::{BOTH_AXES, KEPT, Records, UNMARKED};
use crate::sweep::{Axis, SweepList};
use crate::types::{Coord, Position, cmp_coord};

/// Calculator backed by an X-ordered and a Z-ordered [`SweepList`].
#[derive(Clone, Debug)]
pub struct XzList<T> {
    x: SweepList<T>,
    z: SweepList<T>,
}

impl<T: Coord> XzList<T> {
    /// Create an empty calculator for the given interest distance.
    ///
    /// # Panics
    ///
    /// In debug builds, if `distance` is negative or not finite. Go through
    /// [`Space::with_config`](crate::Space::with_config) to get
    /// [`AoiError::InvalidDistance`] instead.
    pub fn new(distance: T) -> Self {
        Self {
            x: SweepList::new(Axis::X, distance),
            z: SweepList::new(Axis::Z, distance),
        }
    }

    /// The list ordered by `axis`.
    pub fn list(&self, axis: Axis) -> &SweepList<T> {
        match axis {
            Axis::X => &self.x,
            Axis::Z => &self.z,
        }
    }

    fn is_entered<I>(&self, records: &Records<I, T>, slot: usize) -> bool {
        self.x.contains(records, slot) && self.z.contains(records, slot)
    }
}

impl<T: Coord> Calculator<T> for XzList<T> {
    fn with_distance(distance: T) -> Self {
        Self::new(distance)
    }

    fn distance(&self) -> T {
        self.x.distance()
    }

    fn enter<I>(
        &mut self,
        records: &mut Records<I, T>,
        slot: usize,
        position: Position<T>,
    ) -> Result<(), AoiError> {
        if self.x.contains(records, slot) || self.z.contains(records, slot) {
            return Err(AoiError::DuplicateEnter);
        }
        records.record_mut(slot).position = position;
        self.x.insert(records, slot)?;
        self.z.insert(records, slot)
    }

    fn leave<I>(&mut self, records: &mut Records<I, T>, slot: usize) -> Result<(), AoiError> {
        if !self.is_entered(records, slot) {
            return Err(AoiError::NotEntered);
        }
        self.x.remove(records, slot)?;
        self.z.remove(records, slot)
    }

    fn move_to<I>(
        &mut self,
        records: &mut Records<I, T>,
        slot: usize,
        position: Position<T>,
    ) -> Result<(), AoiError> {
        if !self.is_entered(records, slot) {
            return Err(AoiError::NotEntered);
        }
        let old = records.record(slot).position;
        records.record_mut(slot).position = position;
        if cmp_coord(old.x, position.x).is_ne() {
            self.x.move_to(records, slot, old.x)?;
        }
        if cmp_coord(old.z, position.z).is_ne() {
            self.z.move_to(records, slot, old.z)?;
        }
        Ok(())
    }

    fn adjust<I>(
        &mut self,
        records: &mut Records<I, T>,
        slot: usize,
    ) -> Result<Adjustment<usize>, AoiError> {
        if !self.is_entered(records, slot) {
            return Err(AoiError::NotEntered);
        }
        self.x.mark(records, slot);
        self.z.mark(records, slot);

        let known: SmallVec<[usize; 16]> = records.record(slot).neighbors().collect();
        let mut leave = SmallVec::new();
        for neighbor in known {
            let r = records.record_mut(neighbor);
            if r.mark == BOTH_AXES {
                r.mark = KEPT;
            } else {
                leave.push(neighbor);
            }
        }

        let enter = self.x.take_marked(records, slot);
        self.z.clear_mark(records, slot);

        leave.sort_unstable_by_key(|&s| records.record(s).seq());
        log::trace!(
            "adjust slot {slot}: {} entered, {} left",
            enter.len(),
            leave.len()
        );
        Ok(Adjustment { enter, leave })
    }

    fn visit_nearby<I, F: FnMut(usize)>(&self, records: &Records<I, T>, slot: usize, mut f: F) {
        let center = records.record(slot).position;
        let distance = self.distance();
        self.x.visit_range(records, slot, |s| {
            if T::within(center.z, records.record(s).position.z, distance) {
                f(s);
            }
        });
    }

    fn validate<I>(&self, records: &Records<I, T>) -> Result<(), AoiError> {
        self.x.validate(records)?;
        self.z.validate(records)?;
        if records.iter().any(|(_, r)| r.mark != UNMARKED) {
            return Err(AoiError::CorruptState {
                reason: "mark left set outside an adjust pass",
            });
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.x.clear();
        self.z.clear();
    }
}
