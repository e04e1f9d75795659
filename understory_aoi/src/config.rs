// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Space configuration.

use crate::error::AoiError;
use crate::types::Coord;

/// Construction-time settings of a [`Space`][crate::Space].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AoiConfig<T> {
    /// Interest distance: half the side of the square interest box.
    pub distance: T,
    /// Number of records to reserve room for.
    #[cfg_attr(feature = "serde", serde(default))]
    pub capacity: usize,
}

impl<T: Coord> AoiConfig<T> {
    /// Configuration with the given interest distance and no reserved capacity.
    pub const fn new(distance: T) -> Self {
        Self {
            distance,
            capacity: 0,
        }
    }

    /// Reserve room for `capacity` records up front.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Reject negative or non-finite distances.
    pub fn validate(&self) -> Result<(), AoiError> {
        if !self.distance.is_finite() || self.distance < T::zero() {
            return Err(AoiError::InvalidDistance);
        }
        Ok(())
    }
}
