// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-sorted sweep lists.
//!
//! A [`SweepList`] threads a doubly-linked list through the records of a
//! [`Records`] arena, ordered by one coordinate. The links live in the records
//! themselves (one slot per [`Axis`]), so a record sits in both the X and the
//! Z list at once without either list owning it.
//!
//! Records are ordered by `(coordinate, seq)`, which keeps the order total and
//! reproducible for records sharing a coordinate.
//!
//! The sweeps walk outward from a record in both directions and stop at the
//! first record farther than the interest distance, so their cost is bounded by
//! the local density rather than by the list length.

use core::cmp::Ordering;
use core::iter;

use smallvec::SmallVec;

use crate::error::AoiError;
use crate::record::{AoiRecord, BOTH_AXES, Link, Records, UNMARKED};
use crate::types::{Coord, Position, cmp_coord};

/// Which coordinate a [`SweepList`] is ordered by.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The X coordinate.
    X,
    /// The Z coordinate.
    Z,
}

impl Axis {
    /// Both axes, X first.
    pub const ALL: [Self; 2] = [Self::X, Self::Z];

    #[inline(always)]
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Z => 1,
        }
    }

    /// The coordinate of `position` along this axis.
    #[inline(always)]
    pub fn coord<T: Copy>(self, position: &Position<T>) -> T {
        match self {
            Self::X => position.x,
            Self::Z => position.z,
        }
    }
}

/// A sorted doubly-linked list of arena slots along one axis.
#[derive(Clone, Debug)]
pub struct SweepList<T> {
    axis: Axis,
    distance: T,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T: Coord> SweepList<T> {
    /// Create an empty list ordered by `axis`, sweeping `distance` to each side.
    ///
    /// # Panics
    ///
    /// In debug builds, if `distance` is negative or not finite.
    pub fn new(axis: Axis, distance: T) -> Self {
        debug_assert!(
            distance.is_finite() && distance >= T::zero(),
            "sweep distance must be finite and non-negative; got {distance:?}"
        );
        Self {
            axis,
            distance,
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// The axis this list is ordered by.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The sweep half-extent.
    pub fn distance(&self) -> T {
        self.distance
    }

    /// Number of linked records.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no record is linked.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slots in list order.
    pub fn iter<'a, I>(&self, records: &'a Records<I, T>) -> impl Iterator<Item = usize> + 'a {
        let axis = self.axis;
        iter::successors(self.head, move |&slot| records.record(slot).link(axis).next)
    }

    /// Whether `slot` is currently linked into this list.
    pub fn contains<I>(&self, records: &Records<I, T>, slot: usize) -> bool {
        records
            .get(slot)
            .is_some_and(|r| r.link(self.axis).linked)
    }

    /// Drop all links. The records themselves are untouched.
    pub(crate) fn clear(&mut self) {
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Link `slot` in sorted position.
    ///
    /// Appending past the tail is O(1); anything else scans from the head.
    pub(crate) fn insert<I>(
        &mut self,
        records: &mut Records<I, T>,
        slot: usize,
    ) -> Result<(), AoiError> {
        if records.record(slot).link(self.axis).linked {
            return Err(AoiError::corrupt(self.axis, "slot is already linked"));
        }
        let next = match self.tail {
            None => None,
            Some(tail) if self.precedes(records, tail, slot) => None,
            Some(_) => {
                let mut cur = self.head;
                while let Some(c) = cur {
                    if self.precedes(records, slot, c) {
                        break;
                    }
                    cur = records.record(c).link(self.axis).next;
                }
                cur
            }
        };
        self.link_before(records, slot, next);
        self.len += 1;
        Ok(())
    }

    /// Unlink `slot`.
    pub(crate) fn remove<I>(
        &mut self,
        records: &mut Records<I, T>,
        slot: usize,
    ) -> Result<(), AoiError> {
        if !self.contains(records, slot) {
            return Err(AoiError::corrupt(self.axis, "removed slot is not linked"));
        }
        self.unlink(records, slot);
        self.len -= 1;
        Ok(())
    }

    /// Reposition `slot` after its coordinate changed from `old`.
    ///
    /// Walks from the old position toward the new one, so the cost is the
    /// number of records passed. Leaves the list untouched when the record
    /// still sorts between its neighbors.
    pub(crate) fn move_to<I>(
        &mut self,
        records: &mut Records<I, T>,
        slot: usize,
        old: T,
    ) -> Result<(), AoiError> {
        if !self.contains(records, slot) {
            return Err(AoiError::corrupt(self.axis, "moved slot is not linked"));
        }
        let coord = self.coord(records, slot);
        let link = *records.record(slot).link(self.axis);
        match cmp_coord(coord, old) {
            Ordering::Greater => {
                let Some(after) = link.next else {
                    return Ok(());
                };
                if !self.precedes(records, after, slot) {
                    return Ok(());
                }
                self.unlink(records, slot);
                let mut cur = records.record(after).link(self.axis).next;
                while let Some(c) = cur {
                    if !self.precedes(records, c, slot) {
                        break;
                    }
                    cur = records.record(c).link(self.axis).next;
                }
                self.link_before(records, slot, cur);
            }
            Ordering::Less => {
                let Some(before) = link.prev else {
                    return Ok(());
                };
                if !self.precedes(records, slot, before) {
                    return Ok(());
                }
                self.unlink(records, slot);
                let mut cur = records.record(before).link(self.axis).prev;
                while let Some(c) = cur {
                    if self.precedes(records, c, slot) {
                        break;
                    }
                    cur = records.record(c).link(self.axis).prev;
                }
                let next = match cur {
                    Some(c) => records.record(c).link(self.axis).next,
                    None => self.head,
                };
                self.link_before(records, slot, next);
            }
            Ordering::Equal => {}
        }
        debug_assert!(
            self.is_locally_sorted(&*records, slot),
            "{:?} sweep list out of order after move",
            self.axis
        );
        Ok(())
    }

    /// Add 1 to the mark of every record within the distance of `slot`.
    pub(crate) fn mark<I>(&self, records: &mut Records<I, T>, slot: usize) {
        self.sweep(records, slot, |_, r| r.mark += 1);
    }

    /// Reset the mark of every record within the distance of `slot`.
    pub(crate) fn clear_mark<I>(&self, records: &mut Records<I, T>, slot: usize) {
        self.sweep(records, slot, |_, r| r.mark = UNMARKED);
    }

    /// Collect the records within the distance of `slot` that are marked on
    /// both axes, resetting every visited mark.
    ///
    /// Preceding records come first (nearest first), then following ones.
    pub(crate) fn take_marked<I>(
        &self,
        records: &mut Records<I, T>,
        slot: usize,
    ) -> SmallVec<[usize; 8]> {
        let mut out = SmallVec::new();
        self.sweep(records, slot, |s, r| {
            if r.mark == BOTH_AXES {
                out.push(s);
            }
            r.mark = UNMARKED;
        });
        out
    }

    /// Visit every record within the distance of `slot` without touching marks.
    pub fn visit_range<I, F: FnMut(usize)>(&self, records: &Records<I, T>, slot: usize, mut f: F) {
        let (lo, hi) = self.bounds(records, slot);
        let link = *records.record(slot).link(self.axis);
        let mut cur = link.prev;
        while let Some(c) = cur {
            let r = records.record(c);
            if self.axis.coord(&r.position) < lo {
                break;
            }
            f(c);
            cur = r.link(self.axis).prev;
        }
        cur = link.next;
        while let Some(c) = cur {
            let r = records.record(c);
            if self.axis.coord(&r.position) > hi {
                break;
            }
            f(c);
            cur = r.link(self.axis).next;
        }
    }

    /// Check ordering and linkage of the whole list.
    pub fn validate<I>(&self, records: &Records<I, T>) -> Result<(), AoiError> {
        let corrupt = |reason| Err(AoiError::corrupt(self.axis, reason));
        let mut count = 0_usize;
        let mut prev: Option<usize> = None;
        let mut cur = self.head;
        while let Some(c) = cur {
            let Some(r) = records.get(c) else {
                return corrupt("list references a vacant slot");
            };
            let link = r.link(self.axis);
            if !link.linked {
                return corrupt("listed slot is not flagged as linked");
            }
            if link.prev != prev {
                return corrupt("prev link disagrees with list order");
            }
            if let Some(p) = prev
                && !self.precedes(records, p, c)
            {
                return corrupt("list is not sorted");
            }
            count += 1;
            if count > self.len {
                return corrupt("list is longer than its recorded length");
            }
            prev = cur;
            cur = link.next;
        }
        if self.tail != prev {
            return corrupt("tail does not match the last node");
        }
        if count != self.len {
            return corrupt("list is shorter than its recorded length");
        }
        let flagged = records
            .iter()
            .filter(|(_, r)| r.link(self.axis).linked)
            .count();
        if flagged != self.len {
            return corrupt("records flagged as linked are missing from the list");
        }
        Ok(())
    }

    #[inline]
    fn coord<I>(&self, records: &Records<I, T>, slot: usize) -> T {
        self.axis.coord(&records.record(slot).position)
    }

    fn bounds<I>(&self, records: &Records<I, T>, slot: usize) -> (T, T) {
        let center = self.coord(records, slot);
        (T::sub(center, self.distance), T::add(center, self.distance))
    }

    /// Whether `a` sorts strictly before `b`.
    fn precedes<I>(&self, records: &Records<I, T>, a: usize, b: usize) -> bool {
        let (ra, rb) = (records.record(a), records.record(b));
        cmp_coord(self.axis.coord(&ra.position), self.axis.coord(&rb.position))
            .then(ra.seq().cmp(&rb.seq()))
            .is_lt()
    }

    fn is_locally_sorted<I>(&self, records: &Records<I, T>, slot: usize) -> bool {
        let link = records.record(slot).link(self.axis);
        link.prev.is_none_or(|p| self.precedes(records, p, slot))
            && link.next.is_none_or(|n| self.precedes(records, slot, n))
    }

    fn sweep<I, F>(&self, records: &mut Records<I, T>, slot: usize, mut f: F)
    where
        F: FnMut(usize, &mut AoiRecord<I, T>),
    {
        let (lo, hi) = self.bounds(records, slot);
        let link = *records.record(slot).link(self.axis);
        let mut cur = link.prev;
        while let Some(c) = cur {
            let r = records.record_mut(c);
            if self.axis.coord(&r.position) < lo {
                break;
            }
            cur = r.link(self.axis).prev;
            f(c, r);
        }
        cur = link.next;
        while let Some(c) = cur {
            let r = records.record_mut(c);
            if self.axis.coord(&r.position) > hi {
                break;
            }
            cur = r.link(self.axis).next;
            f(c, r);
        }
    }

    /// Link `slot` before `next`, or at the tail when `next` is `None`.
    fn link_before<I>(&mut self, records: &mut Records<I, T>, slot: usize, next: Option<usize>) {
        let prev = match next {
            Some(n) => records.record(n).link(self.axis).prev,
            None => self.tail,
        };
        *records.record_mut(slot).link_mut(self.axis) = Link {
            prev,
            next,
            linked: true,
        };
        match prev {
            Some(p) => records.record_mut(p).link_mut(self.axis).next = Some(slot),
            None => self.head = Some(slot),
        }
        match next {
            Some(n) => records.record_mut(n).link_mut(self.axis).prev = Some(slot),
            None => self.tail = Some(slot),
        }
    }

    fn unlink<I>(&mut self, records: &mut Records<I, T>, slot: usize) {
        let Link { prev, next, .. } = *records.record(slot).link(self.axis);
        match prev {
            Some(p) => records.record_mut(p).link_mut(self.axis).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => records.record_mut(n).link_mut(self.axis).prev = prev,
            None => self.tail = prev,
        }
        *records.record_mut(slot).link_mut(self.axis) = Link::default();
    }
}
