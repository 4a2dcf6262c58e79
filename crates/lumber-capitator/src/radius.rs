//! Leaf-clearing radius around a felled trunk.
//!
//! Neighbouring trunks mean a shared, dense canopy: clearing leaves there would
//! strip the neighbour too, so the radius collapses to zero. Trunks further out
//! only shrink it.

use lumber_blocks::is_loggable;
use lumber_geom::BlockPos;
use lumber_world::BlockAccess;

/// Horizontal reach of the leaf sweep. The vertical reach is fixed by config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeafRadius {
    pub x: i32,
    pub z: i32,
}

impl LeafRadius {
    pub const NONE: LeafRadius = LeafRadius { x: 0, z: 0 };

    pub fn square(r: i32) -> Self {
        Self { x: r, z: r }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanStep {
    Pending,
    Done(LeafRadius),
}

/// Trunks this close on either horizontal axis share the canopy.
const SHARED_CANOPY_REACH: i32 = 2;

/// Resumable scan of the cube around `center`.
///
/// Each [`step`](RadiusScan::step) inspects one vertical column; finishing an
/// X row costs one extra step. The result is only reported with
/// [`ScanStep::Done`].
#[derive(Clone, Debug)]
pub struct RadiusScan {
    center: BlockPos,
    half: i32,
    dx: i32,
    dz: i32,
    row_done: bool,
    radius: LeafRadius,
    finished: Option<LeafRadius>,
}

impl RadiusScan {
    pub fn new(center: BlockPos, half_extent: i32, default_radius: i32) -> Self {
        let half = half_extent.max(0);
        Self {
            center,
            half,
            dx: -half,
            dz: -half,
            row_done: false,
            radius: LeafRadius::square(default_radius.max(1)),
            finished: None,
        }
    }

    pub fn center(&self) -> BlockPos {
        self.center
    }

    pub fn step(&mut self, world: &impl BlockAccess) -> ScanStep {
        if let Some(r) = self.finished {
            return ScanStep::Done(r);
        }
        if self.row_done {
            self.row_done = false;
            self.dx += 1;
            self.dz = -self.half;
            if self.dx > self.half {
                return self.finish(self.radius);
            }
            return ScanStep::Pending;
        }

        let (dx, dz) = (self.dx, self.dz);
        self.dz += 1;
        if self.dz > self.half {
            self.row_done = true;
        }
        if dx == 0 && dz == 0 {
            return ScanStep::Pending;
        }
        for dy in -self.half..=self.half {
            let p = self.center.offset(dx, dy, dz);
            let Some(b) = world.block(p) else { continue };
            if !is_loggable(&b.type_id) {
                continue;
            }
            if dx.abs() <= SHARED_CANOPY_REACH || dz.abs() <= SHARED_CANOPY_REACH {
                return self.finish(LeafRadius::NONE);
            }
            self.radius.x = (self.radius.x - 1).max(1);
            self.radius.z = (self.radius.z - 1).max(1);
        }
        ScanStep::Pending
    }

    fn finish(&mut self, r: LeafRadius) -> ScanStep {
        self.finished = Some(r);
        ScanStep::Done(r)
    }
}

/// Runs a scan to completion in one go.
pub fn estimate_leaf_radius(
    world: &impl BlockAccess,
    center: BlockPos,
    half_extent: i32,
    default_radius: i32,
) -> LeafRadius {
    let mut scan = RadiusScan::new(center, half_extent, default_radius);
    loop {
        if let ScanStep::Done(r) = scan.step(world) {
            return r;
        }
    }
}
