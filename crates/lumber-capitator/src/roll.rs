use lumber_geom::BlockPos;

/// Integer mix of a block position, a tick and a seed.
pub(crate) fn hash_pos(pos: BlockPos, tick: u64, seed: u32) -> u32 {
    let t = (tick as u32) ^ ((tick >> 32) as u32);
    let mut h = (pos.x as u32).wrapping_mul(0x85eb_ca6b)
        ^ (pos.y as u32).wrapping_mul(0x1656_67b1)
        ^ (pos.z as u32).wrapping_mul(0xc2b2_ae35)
        ^ t.wrapping_mul(0x9e37_79b9)
        ^ seed.wrapping_mul(0x27d4_eb2d);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

/// Uniform value in `[0, 1)`.
pub(crate) fn roll01(seed: u32, pos: BlockPos, tick: u64, salt: u32) -> f32 {
    let h = hash_pos(pos, tick, seed ^ salt);
    ((h & 0x00FF_FFFF) as f32) / 16_777_216.0
}
