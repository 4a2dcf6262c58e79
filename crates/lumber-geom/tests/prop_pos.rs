use lumber_geom::{BlockPos, NEIGHBOR_OFFSETS};
use proptest::prelude::*;

fn arb_pos() -> impl Strategy<Value = BlockPos> {
    (-30_000_000..30_000_000i32, -64..320i32, -30_000_000..30_000_000i32)
        .prop_map(|(x, y, z)| BlockPos::new(x, y, z))
}

proptest! {
    // Moving out along an offset and back lands on the start.
    #[test]
    fn offset_then_difference_roundtrips(p in arb_pos(), i in 0usize..26) {
        let o = NEIGHBOR_OFFSETS[i];
        let n = p + o;
        prop_assert_eq!(n - p, o);
    }

    // Neighbor sets are symmetric: if b touches a then a touches b.
    #[test]
    fn neighbor_relation_is_symmetric(p in arb_pos(), i in 0usize..26) {
        let n = p + NEIGHBOR_OFFSETS[i];
        prop_assert!(n.neighbors().any(|back| back == p));
    }

    #[test]
    fn horizontal_manhattan_ignores_y(p in arb_pos(), dx in -8..8i32, dy in -8..8i32, dz in -8..8i32) {
        let q = p.offset(dx, dy, dz);
        prop_assert_eq!(p.horizontal_manhattan(q), dx.abs() + dz.abs());
    }
}

#[test]
fn neighbors_exclude_self() {
    let p = BlockPos::new(4, 70, -9);
    assert!(p.neighbors().all(|n| n != p));
    assert_eq!(p.neighbors().count(), 26);
}
