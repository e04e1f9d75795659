// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_aoi --heading-base-level=0

//! Understory AOI: incremental area-of-interest tracking.
//!
//! Understory AOI answers, for every entity moving through a shared space, which
//! other entities have come within a fixed interest distance ("enter") and which
//! have gone out of it ("leave"), without recomputing every neighbor set on every
//! tick.
//!
//! - Enter, move, and leave entities keyed by your own identity type.
//! - Ask for the enter/leave delta of one entity with [`Space::adjust`].
//! - Register the delta (symmetrically) with [`Space::apply`], or do both with [`Space::sync`].
//!
//! The interest area is the square of half-extent `distance` around an entity on
//! the X/Z plane, boundary included. One distance is shared by the whole space.
//!
//! The default calculator, [`XzList`], keeps the entities in one sorted list per
//! axis. Moving an entity only walks past the entities it overtook, and an adjust
//! pass only visits entities within the distance on the X or Z axis, so the cost
//! follows local density rather than the size of the space.
//!
//! # Example
//!
//! ```rust
//! use understory_aoi::{Position, Space};
//!
//! let mut space: Space<u32, f64> = Space::new(10.0).unwrap();
//! space.enter(1, Position::new(0.0, 0.0)).unwrap();
//! space.enter(2, Position::new(5.0, 5.0)).unwrap();
//! space.enter(3, Position::new(5.0, 15.0)).unwrap();
//!
//! // 2 is inside the box around 1; 3 is only close on X.
//! let adj = space.sync(1).unwrap();
//! assert_eq!(adj.enter.as_slice(), &[2]);
//! assert!(adj.leave.is_empty());
//!
//! // Once 2 moves away it is reported as leaving.
//! space.move_to(2, Position::new(20.0, 20.0)).unwrap();
//! let adj = space.sync(1).unwrap();
//! assert_eq!(adj.leave.as_slice(), &[2]);
//!
//! // Nothing changed since the last sync.
//! assert!(space.sync(1).unwrap().is_empty());
//! ```
//!
//! A linear-scan calculator is available for tiny spaces, or to cross-check:
//!
//! ```rust
//! use understory_aoi::{AoiConfig, FlatScan, Position, Space};
//!
//! let mut space: Space<&str, i64, FlatScan<i64>> =
//!     Space::with_config(AoiConfig::new(50).with_capacity(8)).unwrap();
//! space.enter("scout", Position::new(0, 0)).unwrap();
//! space.enter("tower", Position::new(40, -50)).unwrap();
//! assert_eq!(space.nearby("scout").unwrap().as_slice(), &["tower"]);
//! ```
//!
//! ## Choosing a calculator
//!
//! - [`XzList`] (default): two sweep lists. A good fit when entities move a
//!   little every tick and most of the space is far from any given entity.
//! - [`FlatScan`]: no index; adjust tests every entity. Simplest and smallest.
//!
//! ## Features
//!
//! [`AoiError`] implements `core::error::Error` in every build; there is no `std` feature.
//!
//! - `serde`: derives `Serialize`/`Deserialize` for [`Position`] and [`AoiConfig`].
//!
//! ### Float semantics
//!
//! Positions with NaN or infinite coordinates are rejected with
//! [`AoiError::InvalidPosition`]. Sweep lists assume every stored coordinate is finite.

#![no_std]

extern crate alloc;

mod adjustment;
mod calculator;
pub mod calculators;
mod config;
mod error;
mod record;
mod space;
mod sweep;
mod types;

pub use adjustment::Adjustment;
pub use calculator::Calculator;
pub use calculators::{FlatScan, XzList};
pub use config::AoiConfig;
pub use error::AoiError;
pub use record::{AoiRecord, Records};
pub use space::Space;
pub use sweep::{Axis, SweepList};
pub use types::{Coord, Position};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_self_neighboring() {
        let mut space: Space<u32, i32> = Space::new(4).unwrap();
        for (id, x) in [(1, 0), (2, 0), (3, 1)] {
            space.enter(id, Position::new(x, 0)).unwrap();
        }
        for id in 1..=3 {
            let adj = space.sync(id).unwrap();
            assert!(!adj.enter.contains(&id));
            assert!(!adj.leave.contains(&id));
        }
        space.validate().unwrap();
    }

    #[test]
    fn integer_coordinates_use_the_inclusive_box() {
        let mut space: Space<u8, i64> = Space::new(3).unwrap();
        space.enter(0, Position::new(0, 0)).unwrap();
        space.enter(1, Position::new(3, -3)).unwrap();
        space.enter(2, Position::new(4, 0)).unwrap();
        assert_eq!(space.sync(0).unwrap().enter.as_slice(), &[1]);
    }

    #[test]
    fn position_converts_from_tuple() {
        let p: Position<f32> = (1.5, -2.0).into();
        assert_eq!(p, Position::new(1.5, -2.0));
    }
}
