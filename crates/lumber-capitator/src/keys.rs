use core::fmt;

use lumber_geom::BlockPos;
use lumber_world::PlayerId;

/// Which countdown a key refers to. Also selects the status-line layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerSlot {
    /// Vanilla log just converted; times out back to vanilla.
    Conversion,
    /// Phase advanced by a hit; times out into a regression.
    Progress,
    /// Cascading rollback after a missed progress window.
    Regression,
}

impl TimerSlot {
    pub const ALL: [TimerSlot; 3] = [
        TimerSlot::Conversion,
        TimerSlot::Progress,
        TimerSlot::Regression,
    ];

    /// Whether losing the sneak posture during this countdown is warned about.
    #[inline]
    pub fn warns_on_unsneak(self) -> bool {
        matches!(self, TimerSlot::Conversion | TimerSlot::Progress)
    }
}

impl fmt::Display for TimerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimerSlot::Conversion => "conversion",
            TimerSlot::Progress => "progress",
            TimerSlot::Regression => "regression",
        })
    }
}

/// One countdown per (block, player, slot).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CountdownKey {
    pub pos: BlockPos,
    pub player: PlayerId,
    pub slot: TimerSlot,
}

impl CountdownKey {
    pub fn new(pos: BlockPos, player: PlayerId, slot: TimerSlot) -> Self {
        Self { pos, player, slot }
    }

    pub fn with_slot(&self, slot: TimerSlot) -> Self {
        Self {
            pos: self.pos,
            player: self.player.clone(),
            slot,
        }
    }

    /// All three slot keys for a block worked by a player.
    pub fn all_slots(pos: BlockPos, player: &PlayerId) -> [CountdownKey; 3] {
        TimerSlot::ALL.map(|slot| CountdownKey::new(pos, player.clone(), slot))
    }
}

impl fmt::Display for CountdownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}/{}", self.player, self.pos, self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_differ_by_slot_only_when_slot_differs() {
        let p = PlayerId::new("steve");
        let pos = BlockPos::new(1, 2, 3);
        let keys: HashSet<_> = CountdownKey::all_slots(pos, &p).into_iter().collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&CountdownKey::new(pos, p.clone(), TimerSlot::Regression)));
        let again = CountdownKey::new(pos, p, TimerSlot::Progress);
        assert_eq!(again.with_slot(TimerSlot::Progress), again);
    }
}
