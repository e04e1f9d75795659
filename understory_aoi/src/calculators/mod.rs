// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Calculator implementations.
//!
//! - `xz_list`: one sorted sweep list per axis and a mark-counting adjust pass.
//!   Move cost is bounded by the records passed; adjust cost by local density.
//! - `flat_scan`: no index at all; adjust tests every tracked record.
//!
//! Mark pass
//! ---------
//! For a record `r` at `(x, z)` and distance `d`, the X list marks every record
//! with a coordinate in `[x - d, x + d]` and the Z list does the same for `z`.
//! A record marked by both lists is inside the square interest box. Registered
//! neighbors found in the box are set to a sentinel value, so the closing X
//! sweep reports exactly the records that are new, and the closing Z sweep
//! leaves every mark at zero.

pub(crate) mod flat_scan;
pub(crate) mod xz_list;

pub use flat_scan::FlatScan;
pub use xz_list::XzList;
