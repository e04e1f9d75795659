// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by spaces, calculators and sweep lists.

use crate::sweep::Axis;

/// Contract violations reported by the AOI engine.
///
/// None of these are transient: re-issuing the same call without first fixing
/// the caller's state fails the same way.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AoiError {
    /// The entity is already in the space.
    #[error("entity has already entered the space")]
    DuplicateEnter,
    /// The entity is not in the space.
    #[error("entity has not entered the space")]
    NotEntered,
    /// A sweep list is unsorted or its prev/next links disagree.
    #[error("{axis:?} sweep list linkage is corrupt: {reason}")]
    CorruptLinkage {
        /// The list that failed the check.
        axis: Axis,
        /// What was found.
        reason: &'static str,
    },
    /// Calculator state outside the sweep lists disagrees with the arena.
    #[error("calculator state is corrupt: {reason}")]
    CorruptState {
        /// What was found.
        reason: &'static str,
    },
    /// A coordinate is NaN or infinite.
    #[error("position has a non-finite coordinate")]
    InvalidPosition,
    /// The interest distance is negative or not finite.
    #[error("interest distance must be finite and non-negative")]
    InvalidDistance,
}

impl AoiError {
    pub(crate) const fn corrupt(axis: Axis, reason: &'static str) -> Self {
        Self::CorruptLinkage { axis, reason }
    }
}
