//! Host event handlers: break attempts, finished breaks, placements and item
//! spawns.

use lumber_blocks::{Phase, is_loggable};
use lumber_geom::BlockPos;
use lumber_world::{BlockAccess, BlockView, Host, PlayerId};

use crate::capitator::Capitator;
use crate::countdown::{TIMEOUT_SOUND, posture_ok};
use crate::destroy::{FELL_PITCH, FELL_SOUND};
use crate::display::{self, compose_display};
use crate::keys::{CountdownKey, TimerSlot};
use crate::roll::roll01;
use crate::wear::{WearOutcome, apply_wear};

pub const HIT_PARTICLE: &str = "minecraft:crop_dust_particle";
const HIT_PARTICLES: u32 = 5;

/// Whether the host should go on with its own break.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakDecision {
    Allow,
    Cancel,
}

/// A block the host finished breaking.
#[derive(Clone, Debug)]
pub struct BlockBroken {
    pub player: PlayerId,
    pub pos: BlockPos,
    /// The block as it was before breaking.
    pub broken: BlockView,
}

impl Capitator {
    /// Called before the host breaks a block. Never fails; host write errors
    /// are logged.
    pub fn on_break_attempt<H: Host>(&mut self, host: &mut H, player: &PlayerId, pos: BlockPos) -> BreakDecision {
        if host.marker(pos) {
            log::debug!(target: "orchestrator", "{} is player-placed, ignored", pos);
            return BreakDecision::Allow;
        }
        let Some(block) = host.block(pos) else {
            return BreakDecision::Allow;
        };
        let ns = &self.config.namespaces;
        if ns.is_vanilla_loggable(&block.type_id) {
            self.convert(host, player, pos, &block.type_id)
        } else if ns.is_custom_log(&block.type_id) {
            self.work(host, player, pos, &block)
        } else {
            BreakDecision::Allow
        }
    }

    fn convert<H: Host>(&mut self, host: &mut H, player: &PlayerId, pos: BlockPos, type_id: &str) -> BreakDecision {
        if !posture_ok(&*host, player) {
            return BreakDecision::Allow;
        }
        if !log_above(&*host, pos) {
            log::debug!(target: "orchestrator", "{} has no trunk above, not a tree", pos);
            return BreakDecision::Allow;
        }
        if self.is_floating(&*host, pos) && !self.config.species.is_floating_exempt(type_id) {
            log::debug!(target: "orchestrator", "{} hangs over air, not a tree", pos);
            return BreakDecision::Allow;
        }

        self.protect_target_switch(host, player, pos);
        self.state.active_trees.insert(player.clone(), pos);
        host.play_sound(player, FELL_SOUND, Some(pos), FELL_PITCH);

        let custom = self.config.namespaces.to_custom(type_id);
        match host.set_type(pos, &custom) {
            Ok(()) => {
                log::debug!(target: "orchestrator", "{} converted {} to {}", player, pos, custom);
                let key = CountdownKey::new(pos, player.clone(), TimerSlot::Conversion);
                self.arm(key, &custom, Phase::ZERO, false);
                let secs = self.config.timing.conversion_secs;
                host.set_status(player, &compose_display(TimerSlot::Conversion, secs, Phase::ZERO));
            }
            Err(e) => {
                log::warn!("failed to convert {} at {}: {}; breaking it instead", type_id, pos, e);
                if let Err(e) = host.destroy(pos) {
                    log::warn!("failed to break {} after a failed conversion: {}", pos, e);
                }
            }
        }
        self.wear(host, player, pos);
        BreakDecision::Cancel
    }

    fn work<H: Host>(&mut self, host: &mut H, player: &PlayerId, pos: BlockPos, block: &BlockView) -> BreakDecision {
        let phase = block.phase_or_zero();
        let Some(next) = phase.advanced() else {
            // last hit: the host breaks it and the after-break event decides
            // whether the whole tree goes
            self.cancel_all_slots(pos, player);
            return BreakDecision::Allow;
        };
        if !posture_ok(&*host, player) {
            return BreakDecision::Allow;
        }

        self.protect_target_switch(host, player, pos);
        self.state.active_trees.insert(player.clone(), pos);
        host.play_sound(player, FELL_SOUND, Some(pos), 1.0 + 0.2 * phase.get() as f32);
        if let Err(e) = host.set_phase(pos, next) {
            log::warn!("failed to advance {} to phase {}: {}", pos, next, e);
            return BreakDecision::Cancel;
        }
        log::debug!(target: "orchestrator", "{} advanced {} to phase {}", player, pos, next);

        for key in CountdownKey::all_slots(pos, player) {
            self.cancel_countdown(&key);
        }
        let key = CountdownKey::new(pos, player.clone(), TimerSlot::Progress);
        self.arm(key, &block.type_id, next, true);
        let secs = self.config.timing.progress_secs;
        host.set_status(player, &compose_display(TimerSlot::Progress, secs, next));

        self.hit_particles(host, pos);
        self.wear(host, player, pos);
        BreakDecision::Cancel
    }

    /// Reverts the player's previous tree before a different one is touched.
    pub(crate) fn protect_target_switch<H: Host>(&mut self, host: &mut H, player: &PlayerId, pos: BlockPos) {
        let Some(prev) = self.state.active_trees.get(player).copied() else {
            return;
        };
        if prev == pos {
            return;
        }
        for key in CountdownKey::all_slots(prev, player) {
            self.cancel_countdown(&key);
        }
        self.sync_watch(player);
        let Some(block) = host.block(prev) else {
            return;
        };
        if !self.config.namespaces.is_custom_log(&block.type_id) {
            return;
        }
        log::debug!(target: "orchestrator", "{} switched from {} to {}", player, prev, pos);
        self.revert_to_vanilla(host, prev, &block);
        host.set_status(player, display::PREVIOUS_TREE_REVERTED);
        host.play_sound(player, TIMEOUT_SOUND, None, 1.0);
    }

    /// Called after the host broke a block.
    pub fn on_break_completed<H: Host>(&mut self, host: &mut H, ev: &BlockBroken) {
        host.clear_marker(ev.pos);
        if !self.config.namespaces.is_custom_log(&ev.broken.type_id) {
            return;
        }

        let stale: Vec<CountdownKey> = self
            .state
            .countdowns
            .keys()
            .filter(|k| k.pos == ev.pos)
            .cloned()
            .collect();
        for key in &stale {
            self.cancel_countdown(key);
        }
        for key in &stale {
            self.sync_watch(&key.player);
        }
        self.state.active_trees.retain(|_, p| *p != ev.pos);

        if !ev.broken.phase_or_zero().is_terminal() || !posture_ok(&*host, &ev.player) {
            return;
        }
        self.destroyer
            .start(host, &ev.player, ev.pos, &ev.broken.type_id);
    }

    /// Manual placement: custom blocks are taken back, vanilla trunks are
    /// marked so they can never be worked.
    pub fn on_block_placed<H: Host>(&self, host: &mut H, player: &PlayerId, pos: BlockPos, type_id: &str) {
        let ns = &self.config.namespaces;
        if ns.is_custom(type_id) {
            log::debug!(target: "orchestrator", "{} placed {} at {}, undone", player, type_id, pos);
            if let Err(e) = host.set_type(pos, &ns.air) {
                log::warn!("failed to remove placed {} at {}: {}", type_id, pos, e);
            }
            if let Err(e) = host.set_held_item(player, None) {
                log::warn!("failed to clear the hand of {}: {}", player, e);
            }
        } else if ns.is_vanilla_loggable(type_id) {
            host.set_marker(pos);
        }
    }

    /// Replacement type for a dropped item, if it must not exist as is.
    pub fn on_item_spawned(&self, type_id: &str) -> Option<String> {
        let ns = &self.config.namespaces;
        ns.is_custom(type_id).then(|| ns.to_vanilla(type_id))
    }

    fn is_floating(&self, world: &impl BlockAccess, pos: BlockPos) -> bool {
        let ns = &self.config.namespaces;
        [1, 2].into_iter().all(|d| {
            world
                .block(pos.down(d))
                .is_some_and(|b| ns.is_air(&b.type_id))
        })
    }

    fn hit_particles<H: Host>(&self, host: &mut H, pos: BlockPos) {
        let seed = self.config.wear.seed;
        let tick = self.tasks.now();
        for i in 0..HIT_PARTICLES {
            let r = |axis: u32| roll01(seed, pos, tick, i * 3 + axis);
            let at = [
                pos.x as f32 + r(0) - 0.5,
                pos.y as f32 + 0.5 + r(1) * 0.5,
                pos.z as f32 + r(2) - 0.5,
            ];
            host.spawn_particle(HIT_PARTICLE, at);
        }
    }

    fn wear<H: Host>(&self, host: &mut H, player: &PlayerId, pos: BlockPos) {
        match apply_wear(host, player, pos, self.tasks.now(), &self.config.wear) {
            WearOutcome::Broke => log::debug!(target: "orchestrator", "tool of {} broke", player),
            out => log::trace!(target: "orchestrator", "wear for {}: {:?}", player, out),
        }
    }
}

/// A trunk block in the 3x3 directly above.
fn log_above(world: &impl BlockAccess, pos: BlockPos) -> bool {
    (-1..=1).any(|dx| {
        (-1..=1).any(|dz| {
            world
                .block(pos.offset(dx, 1, dz))
                .is_some_and(|b| is_loggable(&b.type_id))
        })
    })
}
