use std::collections::HashMap;

use lumber_blocks::Phase;
use lumber_geom::BlockPos;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredBlock {
    pub type_id: String,
    pub phase: Option<Phase>,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct BlockStoreStats {
    pub chunk_entries: usize,
    pub blocks: usize,
}

/// Chunk-bucketed sparse block map. Unset positions read as air.
pub struct BlockStore {
    chunk: i32,
    inner: HashMap<(i32, i32, i32), HashMap<BlockPos, StoredBlock>>,
}

impl BlockStore {
    pub fn new(chunk: i32) -> Self {
        Self {
            chunk: chunk.max(1),
            inner: HashMap::new(),
        }
    }

    pub fn stats(&self) -> BlockStoreStats {
        BlockStoreStats {
            chunk_entries: self.inner.len(),
            blocks: self.inner.values().map(|m| m.len()).sum(),
        }
    }

    #[inline]
    fn chunk_key(&self, p: BlockPos) -> (i32, i32, i32) {
        (
            p.x.div_euclid(self.chunk),
            p.y.div_euclid(self.chunk),
            p.z.div_euclid(self.chunk),
        )
    }

    pub fn get(&self, p: BlockPos) -> Option<&StoredBlock> {
        let k = self.chunk_key(p);
        self.inner.get(&k).and_then(|m| m.get(&p))
    }

    pub fn get_mut(&mut self, p: BlockPos) -> Option<&mut StoredBlock> {
        let k = self.chunk_key(p);
        self.inner.get_mut(&k).and_then(|m| m.get_mut(&p))
    }

    pub fn set(&mut self, p: BlockPos, b: StoredBlock) {
        let k = self.chunk_key(p);
        self.inner.entry(k).or_default().insert(p, b);
    }

    pub fn remove(&mut self, p: BlockPos) -> Option<StoredBlock> {
        let k = self.chunk_key(p);
        let m = self.inner.get_mut(&k)?;
        let out = m.remove(&p);
        if m.is_empty() {
            self.inner.remove(&k);
        }
        out
    }

    /// Every stored block, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, &StoredBlock)> {
        self.inner.values().flat_map(|m| m.iter().map(|(p, b)| (*p, b)))
    }

    /// Count of stored blocks whose type id satisfies `pred`.
    pub fn count_where(&self, pred: impl Fn(&str) -> bool) -> usize {
        self.iter().filter(|(_, b)| pred(&b.type_id)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_bucket_by_floor() {
        let mut store = BlockStore::new(16);
        let p = BlockPos::new(-1, -1, -17);
        store.set(
            p,
            StoredBlock {
                type_id: "minecraft:oak_log".into(),
                phase: None,
            },
        );
        assert_eq!(store.chunk_key(p), (-1, -1, -2));
        assert!(store.get(p).is_some());
        assert!(store.remove(p).is_some());
        assert_eq!(store.stats().chunk_entries, 0);
    }
}
