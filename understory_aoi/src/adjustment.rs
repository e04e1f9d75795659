// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interest deltas produced by an adjust pass.

use smallvec::SmallVec;

/// Records that came into or went out of range since the last applied adjustment.
///
/// `K` is a slot index when produced by a [`Calculator`][crate::Calculator]
/// and the caller's identity when produced by a [`Space`][crate::Space].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adjustment<K> {
    /// Newly in range.
    pub enter: SmallVec<[K; 8]>,
    /// Registered as neighbors but no longer in range.
    pub leave: SmallVec<[K; 8]>,
}

impl<K> Default for Adjustment<K> {
    fn default() -> Self {
        Self {
            enter: SmallVec::new(),
            leave: SmallVec::new(),
        }
    }
}

impl<K> Adjustment<K> {
    /// True if nothing entered or left.
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.leave.is_empty()
    }

    /// Convert every key with `f`, keeping order.
    pub fn map<U, F: FnMut(K) -> U>(self, mut f: F) -> Adjustment<U> {
        Adjustment {
            enter: self.enter.into_iter().map(&mut f).collect(),
            leave: self.leave.into_iter().map(&mut f).collect(),
        }
    }
}
