//! Integer block coordinates and the neighbor table used by tree traversal.
#![forbid(unsafe_code)]

use core::fmt;
use core::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    #[inline]
    pub fn up(self, n: i32) -> Self {
        self.offset(0, n, 0)
    }

    #[inline]
    pub fn down(self, n: i32) -> Self {
        self.offset(0, -n, 0)
    }

    /// Iterates the 26 positions touching this one (faces, edges and corners).
    pub fn neighbors(self) -> impl Iterator<Item = BlockPos> {
        NEIGHBOR_OFFSETS.iter().map(move |o| self + *o)
    }

    /// Manhattan distance on the X/Z plane.
    #[inline]
    pub fn horizontal_manhattan(self, other: BlockPos) -> i32 {
        (other.x - self.x).abs() + (other.z - self.z).abs()
    }

    /// Center of the block, for particles and sounds.
    #[inline]
    pub fn center(self) -> [f32; 3] {
        [self.x as f32 + 0.5, self.y as f32 + 0.5, self.z as f32 + 0.5]
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<BlockPos> for (i32, i32, i32) {
    fn from(value: BlockPos) -> Self {
        (value.x, value.y, value.z)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
}

impl Offset {
    #[inline]
    pub const fn new(dx: i32, dy: i32, dz: i32) -> Self {
        Self { dx, dy, dz }
    }
}

impl Add<Offset> for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn add(self, rhs: Offset) -> BlockPos {
        self.offset(rhs.dx, rhs.dy, rhs.dz)
    }
}

impl Sub for BlockPos {
    type Output = Offset;
    #[inline]
    fn sub(self, rhs: BlockPos) -> Offset {
        Offset::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

// Faces first, then edges, then corners. Upward directions lead within each
// group so branches are reached before roots.
pub const NEIGHBOR_OFFSETS: [Offset; 26] = [
    // faces
    Offset::new(0, 1, 0),
    Offset::new(1, 0, 0),
    Offset::new(-1, 0, 0),
    Offset::new(0, 0, 1),
    Offset::new(0, 0, -1),
    Offset::new(0, -1, 0),
    // edges, upper ring
    Offset::new(1, 1, 0),
    Offset::new(-1, 1, 0),
    Offset::new(0, 1, 1),
    Offset::new(0, 1, -1),
    // edges, horizontal diagonals
    Offset::new(1, 0, 1),
    Offset::new(-1, 0, -1),
    Offset::new(1, 0, -1),
    Offset::new(-1, 0, 1),
    // edges, lower ring
    Offset::new(1, -1, 0),
    Offset::new(-1, -1, 0),
    Offset::new(0, -1, 1),
    Offset::new(0, -1, -1),
    // corners, upper
    Offset::new(1, 1, 1),
    Offset::new(1, 1, -1),
    Offset::new(-1, 1, -1),
    Offset::new(-1, 1, 1),
    // corners, lower
    Offset::new(1, -1, 1),
    Offset::new(1, -1, -1),
    Offset::new(-1, -1, -1),
    Offset::new(-1, -1, 1),
];

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn neighbor_table_is_the_unit_cube_shell() {
        let mut seen = std::collections::HashSet::new();
        for o in NEIGHBOR_OFFSETS {
            assert!(o != Offset::new(0, 0, 0));
            assert!(o.dx.abs() <= 1 && o.dy.abs() <= 1 && o.dz.abs() <= 1);
            assert!(seen.insert(o), "duplicate offset {:?}", o);
        }
        assert_eq!(seen.len(), 26);
    }

    #[test]
    fn display_uses_colon_separators() {
        assert_eq!(BlockPos::new(-3, 64, 12).to_string(), "-3:64:12");
    }

    proptest! {
        #![proptest_config(ProptestConfig { max_local_rejects: 1 << 20, ..ProptestConfig::default() })]
        #[test]
        fn every_neighbor_is_one_step_away(p in any::<BlockPos>().prop_filter("bounded", |p| {
            p.x.abs() < 1 << 28 && p.y.abs() < 1 << 28 && p.z.abs() < 1 << 28
        })) {
            for n in p.neighbors() {
                let d = n - p;
                prop_assert_eq!(d.dx.abs().max(d.dy.abs()).max(d.dz.abs()), 1);
            }
        }
    }
}
