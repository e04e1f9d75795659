// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate types and helpers.

use core::cmp::Ordering;
use core::fmt::Debug;

/// A position on the ground plane of a space.
///
/// Interest is tested on the `x` and `z` axes; height is not part of the record.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position<T> {
    /// Coordinate along the X axis.
    pub x: T,
    /// Coordinate along the Z axis.
    pub z: T,
}

impl<T> Position<T> {
    /// Create a new position.
    #[inline(always)]
    pub const fn new(x: T, z: T) -> Self {
        Self { x, z }
    }
}

impl<T: Coord> Position<T> {
    /// Whether both coordinates are usable for ordering (no NaN or infinity).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }

    /// Whether `other` lies inside the square of half-extent `distance` centered here.
    ///
    /// The boundary is part of the square.
    #[inline]
    pub fn within(&self, other: &Self, distance: T) -> bool {
        T::within(self.x, other.x, distance) && T::within(self.z, other.z, distance)
    }
}

impl<T> From<(T, T)> for Position<T> {
    #[inline]
    fn from((x, z): (T, T)) -> Self {
        Self { x, z }
    }
}

/// Numeric coordinate abstraction for sweep lists.
///
/// Only the operations needed to bound a sweep are required. Integer
/// implementations saturate so a sweep near the edge of the range stays bounded.
pub trait Coord: Copy + PartialOrd + Debug {
    /// Add two coordinates.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two coordinates: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the coordinate type.
    fn zero() -> Self;

    /// Whether the value can take part in an ordering (always true for integers).
    fn is_finite(self) -> bool;

    /// Whether `b` lies in `[a - distance, a + distance]`.
    #[inline]
    fn within(a: Self, b: Self, distance: Self) -> bool {
        Self::sub(a, distance) <= b && b <= Self::add(a, distance)
    }
}

impl Coord for f32 {
    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline(always)]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }
}

impl Coord for f64 {
    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline(always)]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }
}

impl Coord for i32 {
    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline(always)]
    fn zero() -> Self {
        0
    }

    #[inline(always)]
    fn is_finite(self) -> bool {
        true
    }
}

impl Coord for i64 {
    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline(always)]
    fn zero() -> Self {
        0
    }

    #[inline(always)]
    fn is_finite(self) -> bool {
        true
    }
}

/// Total order over coordinates that are known to be finite.
#[inline]
pub(crate) fn cmp_coord<T: PartialOrd>(a: T, b: T) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
