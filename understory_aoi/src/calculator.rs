// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Calculator trait for AOI strategies.

use crate::adjustment::Adjustment;
use crate::error::AoiError;
use crate::record::Records;
use crate::types::{Coord, Position};

/// AOI strategy used by [`Space`][crate::Space].
///
/// A calculator works on slots of a [`Records`] arena owned by the space.
/// Every slot passed in is live; whether it has entered this calculator is
/// tracked by the calculator itself.
pub trait Calculator<T: Coord> {
    /// Create a calculator for the given interest distance.
    fn with_distance(distance: T) -> Self
    where
        Self: Sized;

    /// The interest distance: the half-extent of the square interest box.
    fn distance(&self) -> T;

    /// Place `slot` at `position` and start tracking it.
    fn enter<I>(
        &mut self,
        records: &mut Records<I, T>,
        slot: usize,
        position: Position<T>,
    ) -> Result<(), AoiError>;

    /// Stop tracking `slot`.
    fn leave<I>(&mut self, records: &mut Records<I, T>, slot: usize) -> Result<(), AoiError>;

    /// Move `slot` to `position`.
    fn move_to<I>(
        &mut self,
        records: &mut Records<I, T>,
        slot: usize,
        position: Position<T>,
    ) -> Result<(), AoiError>;

    /// Compare `slot`'s registered neighbors against the records currently in range.
    ///
    /// Neighbor sets are read, never written. `slot` itself is never reported,
    /// and `leave` is ordered by entry sequence.
    fn adjust<I>(
        &mut self,
        records: &mut Records<I, T>,
        slot: usize,
    ) -> Result<Adjustment<usize>, AoiError>;

    /// Visit every record inside the interest box of `slot`, excluding `slot`.
    ///
    /// The order is calculator-dependent.
    fn visit_nearby<I, F: FnMut(usize)>(&self, records: &Records<I, T>, slot: usize, f: F);

    /// Check internal invariants against `records`.
    fn validate<I>(&self, records: &Records<I, T>) -> Result<(), AoiError>;

    /// Forget every tracked slot.
    fn clear(&mut self);
}
