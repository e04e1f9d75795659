// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-entity interest records and the arena that owns them.

use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::sweep::Axis;
use crate::types::Position;

/// Mark value of a record no sweep has touched.
pub(crate) const UNMARKED: i8 = 0;
/// Mark value of a record inside the interest box on both axes.
pub(crate) const BOTH_AXES: i8 = 2;
/// Mark value of a known neighbor that is still in range during an adjust pass.
pub(crate) const KEPT: i8 = -2;

/// Position of a record within one sweep list.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Link {
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
    pub(crate) linked: bool,
}

/// Interest state of one entity in a space.
#[derive(Clone, Debug)]
pub struct AoiRecord<I, T> {
    id: I,
    seq: u64,
    pub(crate) position: Position<T>,
    pub(crate) mark: i8,
    pub(crate) neighbors: HashSet<usize>,
    pub(crate) links: [Link; 2],
}

impl<I: Copy, T: Copy> AoiRecord<I, T> {
    /// The caller's identity for this record.
    pub fn id(&self) -> I {
        self.id
    }

    /// Current position.
    pub fn position(&self) -> Position<T> {
        self.position
    }
}

impl<I, T> AoiRecord<I, T> {
    /// Sequence number assigned on entry; orders records with equal coordinates.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Scratch counter used by adjust passes. Always 0 between calls.
    pub fn mark(&self) -> i8 {
        self.mark
    }

    /// Slots of the records currently registered as neighbors.
    pub fn neighbors(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors.iter().copied()
    }

    /// Whether `slot` is registered as a neighbor.
    pub fn has_neighbor(&self, slot: usize) -> bool {
        self.neighbors.contains(&slot)
    }

    /// Number of registered neighbors.
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    pub(crate) fn link(&self, axis: Axis) -> &Link {
        &self.links[axis.index()]
    }

    #[inline]
    pub(crate) fn link_mut(&mut self, axis: Axis) -> &mut Link {
        &mut self.links[axis.index()]
    }
}

/// Arena of interest records addressed by slot.
///
/// Slots of departed records are reused; the sequence number of a record is
/// never reused, so ordering between records stays stable across reuse.
#[derive(Clone, Debug)]
pub struct Records<I, T> {
    slots: Vec<Option<AoiRecord<I, T>>>,
    free_list: Vec<usize>,
    next_seq: u64,
    len: usize,
}

impl<I, T> Default for Records<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, T> Records<I, T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            next_seq: 0,
            len: 0,
        }
    }

    /// Create an empty arena with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            next_seq: 0,
            len: 0,
        }
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the arena holds no live records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The record in `slot`, if live.
    pub fn get(&self, slot: usize) -> Option<&AoiRecord<I, T>> {
        self.slots.get(slot)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, slot: usize) -> Option<&mut AoiRecord<I, T>> {
        self.slots.get_mut(slot)?.as_mut()
    }

    /// The record in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if the slot is vacant. Lists only ever reference live slots.
    pub fn record(&self, slot: usize) -> &AoiRecord<I, T> {
        self.get(slot)
            .expect("record invariant violated: slot referenced after it was freed")
    }

    pub(crate) fn record_mut(&mut self, slot: usize) -> &mut AoiRecord<I, T> {
        self.get_mut(slot)
            .expect("record invariant violated: slot referenced after it was freed")
    }

    /// Live records in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &AoiRecord<I, T>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, r)| r.as_ref().map(|r| (slot, r)))
    }

    pub(crate) fn alloc(&mut self, id: I, position: Position<T>) -> usize {
        let record = AoiRecord {
            id,
            seq: self.next_seq,
            position,
            mark: UNMARKED,
            neighbors: HashSet::new(),
            links: [Link::default(); 2],
        };
        self.next_seq += 1;
        self.len += 1;
        if let Some(slot) = self.free_list.pop() {
            self.slots[slot] = Some(record);
            slot
        } else {
            self.slots.push(Some(record));
            self.slots.len() - 1
        }
    }

    pub(crate) fn free(&mut self, slot: usize) -> Option<AoiRecord<I, T>> {
        let record = self.slots.get_mut(slot)?.take()?;
        self.free_list.push(slot);
        self.len -= 1;
        Some(record)
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }

    /// Register `a` and `b` as each other's neighbors. Returns false if either is vacant.
    pub(crate) fn link_neighbors(&mut self, a: usize, b: usize) -> bool {
        if a == b || self.get(a).is_none() || self.get(b).is_none() {
            return false;
        }
        self.record_mut(a).neighbors.insert(b);
        self.record_mut(b).neighbors.insert(a);
        true
    }

    /// Drop the mutual neighbor registration of `a` and `b`.
    pub(crate) fn unlink_neighbors(&mut self, a: usize, b: usize) {
        if let Some(r) = self.get_mut(a) {
            r.neighbors.remove(&b);
        }
        if let Some(r) = self.get_mut(b) {
            r.neighbors.remove(&a);
        }
    }
}
