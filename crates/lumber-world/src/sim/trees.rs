use lumber_geom::BlockPos;

/// Shape of a tree planted into a [`super::SimHost`].
#[derive(Clone, Debug)]
pub struct TreeShape {
    pub log_id: String,
    pub canopy_id: String,
    pub trunk_height: i32,
    pub leaf_radius: i32,
}

impl TreeShape {
    /// Overworld tree: `<species>_log` trunk under a `<species>_leaves` canopy.
    pub fn overworld(species: &str, trunk_height: i32, leaf_radius: i32) -> Self {
        Self {
            log_id: format!("minecraft:{species}_log"),
            canopy_id: format!("minecraft:{species}_leaves"),
            trunk_height,
            leaf_radius,
        }
    }

    /// Huge fungus: `<species>_stem` trunk under a wart-block cap.
    pub fn fungus(species: &str, trunk_height: i32, leaf_radius: i32) -> Self {
        Self {
            log_id: format!("minecraft:{species}_stem"),
            canopy_id: format!("minecraft:{species}_wart_block"),
            trunk_height,
            leaf_radius,
        }
    }
}

/// Blocks making up a tree whose lowest trunk block sits at `base`.
///
/// The canopy is a diamond around the trunk top: full radius on the two
/// layers around the top, one less on the outer layers, and one extra ring
/// below the top so the crown hangs over the trunk.
pub fn tree_blocks(base: BlockPos, shape: &TreeShape) -> Vec<(BlockPos, String)> {
    let mut out = Vec::new();
    let th = shape.trunk_height.max(1);
    for dy in 0..th {
        out.push((base.up(dy), shape.log_id.clone()));
    }
    let top = base.up(th - 1);
    let leaf_r = shape.leaf_radius.max(0);
    for dy in -2..=2 {
        let rad = if dy <= -2 || dy >= 2 { leaf_r - 1 } else { leaf_r };
        let extra = if dy >= 1 { 0 } else { 1 };
        for dx in -leaf_r..=leaf_r {
            for dz in -leaf_r..=leaf_r {
                if dx == 0 && dz == 0 {
                    continue;
                }
                let man = dx.abs() + dz.abs();
                if man <= rad + extra {
                    out.push((top.offset(dx, dy, dz), shape.canopy_id.clone()));
                }
            }
        }
    }
    // cap the trunk
    if leaf_r > 0 {
        out.push((top.up(1), shape.canopy_id.clone()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trunk_is_contiguous_and_canopy_skips_trunk_column() {
        let base = BlockPos::new(0, 64, 0);
        let blocks = tree_blocks(base, &TreeShape::overworld("oak", 5, 2));
        let logs: Vec<_> = blocks.iter().filter(|(_, id)| id.ends_with("_log")).collect();
        assert_eq!(logs.len(), 5);
        for (p, id) in &blocks {
            if id.ends_with("_leaves") && p.x == 0 && p.z == 0 {
                assert!(p.y > 68, "leaf inside trunk at {p}");
            }
        }
    }
}
