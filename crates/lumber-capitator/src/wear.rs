use lumber_geom::BlockPos;
use lumber_world::{GameMode, PlayerAccess, PlayerId};

use crate::config::Wear;
use crate::countdown::TIMEOUT_SOUND;
use crate::roll::roll01;

const WEAR_SALT: u32 = 0x7700_1d5e;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WearOutcome {
    Skipped,
    /// New damage value.
    Damaged(u32),
    /// The tool was already worn out and is gone.
    Broke,
}

/// Wears the held tool by one hit. Unbreaking level `n` lets a hit through
/// undamaged with probability `n / (n + 1)`.
pub fn apply_wear(
    host: &mut impl PlayerAccess,
    player: &PlayerId,
    pos: BlockPos,
    tick: u64,
    cfg: &Wear,
) -> WearOutcome {
    if !cfg.enabled || !host.is_valid(player) || host.game_mode(player) == GameMode::Creative {
        return WearOutcome::Skipped;
    }
    let Some(mut item) = host.held_item(player) else {
        return WearOutcome::Skipped;
    };
    let chance = 1.0 / (item.unbreaking as f32 + 1.0);
    if chance < roll01(cfg.seed, pos, tick, WEAR_SALT) {
        return WearOutcome::Skipped;
    }
    let Some(durability) = item.durability.as_mut() else {
        return WearOutcome::Skipped;
    };

    if durability.damage >= durability.max {
        if let Err(e) = host.set_held_item(player, None) {
            log::warn!("failed to remove broken {} from {}: {}", item.type_id, player, e);
            return WearOutcome::Skipped;
        }
        host.play_sound(player, TIMEOUT_SOUND, None, 1.0);
        return WearOutcome::Broke;
    }
    durability.damage += 1;
    let damage = durability.damage;
    match host.set_held_item(player, Some(item)) {
        Ok(()) => WearOutcome::Damaged(damage),
        Err(e) => {
            log::warn!("failed to wear tool of {}: {}", player, e);
            WearOutcome::Skipped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumber_world::ItemStack;
    use lumber_world::sim::SimHost;

    fn holder(item: Option<ItemStack>) -> (SimHost, PlayerId) {
        let mut host = SimHost::new();
        let p = PlayerId::new("wood");
        host.add_player(&p).held = item;
        (host, p)
    }

    #[test]
    fn plain_tool_takes_one_damage_per_hit() {
        let (mut host, p) = holder(Some(ItemStack::tool("minecraft:iron_axe", 250)));
        let cfg = Wear::default();
        let pos = BlockPos::new(0, 64, 0);
        assert_eq!(apply_wear(&mut host, &p, pos, 1, &cfg), WearOutcome::Damaged(1));
        assert_eq!(apply_wear(&mut host, &p, pos, 2, &cfg), WearOutcome::Damaged(2));
    }

    #[test]
    fn worn_out_tool_breaks() {
        let mut axe = ItemStack::tool("minecraft:wooden_axe", 59);
        if let Some(d) = axe.durability.as_mut() {
            d.damage = 59;
        }
        let (mut host, p) = holder(Some(axe));
        let out = apply_wear(&mut host, &p, BlockPos::new(0, 64, 0), 5, &Wear::default());
        assert_eq!(out, WearOutcome::Broke);
        assert!(host.player(&p).and_then(|s| s.held.as_ref()).is_none());
        assert_eq!(host.sounds_named(&p, TIMEOUT_SOUND), 1);
    }

    #[test]
    fn creative_and_plain_items_are_untouched() {
        let (mut host, p) = holder(Some(ItemStack::plain("minecraft:stick")));
        let pos = BlockPos::new(0, 64, 0);
        assert_eq!(apply_wear(&mut host, &p, pos, 1, &Wear::default()), WearOutcome::Skipped);

        let (mut host, p) = holder(Some(ItemStack::tool("minecraft:iron_axe", 250)));
        host.add_player(&p).mode = GameMode::Creative;
        assert_eq!(apply_wear(&mut host, &p, pos, 1, &Wear::default()), WearOutcome::Skipped);
    }

    #[test]
    fn unbreaking_skips_some_hits() {
        let mut axe = ItemStack::tool("minecraft:diamond_axe", 10_000);
        axe.unbreaking = 3;
        let (mut host, p) = holder(Some(axe));
        let cfg = Wear::default();
        let pos = BlockPos::new(4, 70, 4);
        let damaged = (0..400u64)
            .filter(|t| matches!(apply_wear(&mut host, &p, pos, *t, &cfg), WearOutcome::Damaged(_)))
            .count();
        assert!(damaged > 40 && damaged < 180, "damaged {damaged} of 400");
    }
}
