// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Randomized checks of the sweep-list calculator against a linear scan.

#![allow(missing_docs, reason = "Integration tests")]

use proptest::prelude::*;
use understory_aoi::{Adjustment, Axis, FlatScan, Position, Space};

#[derive(Clone, Debug)]
enum Op {
    Enter(u8, i64, i64),
    Leave(u8),
    Move(u8, i64, i64),
    Sync(u8),
}

fn op() -> impl Strategy<Value = Op> {
    let id = 0_u8..12;
    let coord = -30_i64..30;
    prop_oneof![
        (id.clone(), coord.clone(), coord.clone()).prop_map(|(i, x, z)| Op::Enter(i, x, z)),
        id.clone().prop_map(Op::Leave),
        (id.clone(), coord.clone(), coord).prop_map(|(i, x, z)| Op::Move(i, x, z)),
        id.prop_map(Op::Sync),
    ]
}

fn sorted(mut adj: Adjustment<u8>) -> (Vec<u8>, Vec<u8>) {
    adj.enter.sort_unstable();
    adj.leave.sort_unstable();
    (adj.enter.to_vec(), adj.leave.to_vec())
}

fn assert_lists_sorted(space: &Space<u8, i64>) {
    let records = space.records();
    for axis in Axis::ALL {
        let coords: Vec<i64> = space
            .calculator()
            .list(axis)
            .iter(records)
            .map(|s| axis.coord(&records.record(s).position()))
            .collect();
        assert!(
            coords.windows(2).all(|w| w[0] <= w[1]),
            "{axis:?} list out of order: {coords:?}"
        );
        assert_eq!(coords.len(), space.len(), "{axis:?} list length");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn sweep_lists_agree_with_linear_scan(ops in prop::collection::vec(op(), 1..120)) {
        let mut lists: Space<u8, i64> = Space::new(6).unwrap();
        let mut flat: Space<u8, i64, FlatScan<i64>> =
            Space::with_calculator(FlatScan::new(6)).unwrap();

        for op in ops {
            match op {
                Op::Enter(id, x, z) => {
                    let p = Position::new(x, z);
                    prop_assert_eq!(lists.enter(id, p), flat.enter(id, p));
                }
                Op::Leave(id) => {
                    prop_assert_eq!(lists.leave(id), flat.leave(id));
                }
                Op::Move(id, x, z) => {
                    let p = Position::new(x, z);
                    prop_assert_eq!(lists.move_to(id, p), flat.move_to(id, p));
                }
                Op::Sync(id) => {
                    let got = lists.sync(id);
                    let want = flat.sync(id);
                    prop_assert_eq!(got.is_ok(), want.is_ok());
                    if let (Ok(got), Ok(want)) = (got, want) {
                        prop_assert!(!got.enter.contains(&id) && !got.leave.contains(&id));
                        prop_assert_eq!(sorted(got), sorted(want));
                        // Quiescence: nothing moved since the delta was applied.
                        prop_assert!(lists.adjust(id).unwrap().is_empty());
                    }
                }
            }
            // Covers linkage, ordering, zeroed marks and neighbor symmetry.
            prop_assert_eq!(lists.validate(), Ok(()));
            prop_assert_eq!(flat.validate(), Ok(()));
            assert_lists_sorted(&lists);
        }
    }

    #[test]
    fn float_moves_keep_lists_sorted(
        steps in prop::collection::vec((0_u8..8, -50.0_f64..50.0, -50.0_f64..50.0), 1..80)
    ) {
        let mut space: Space<u8, f64> = Space::new(7.5).unwrap();
        for id in 0..8 {
            space.enter(id, Position::new(f64::from(id), 0.0)).unwrap();
        }
        for (id, x, z) in steps {
            space.move_to(id, Position::new(x, z)).unwrap();
            space.sync(id).unwrap();
            prop_assert_eq!(space.validate(), Ok(()));
        }
    }
}
