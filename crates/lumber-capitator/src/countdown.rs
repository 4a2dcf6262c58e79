//! Per-block countdowns and the regression cascade.
//!
//! Each countdown is a repeating tick task. Every `ticks_per_second` firings
//! it loses a second and redraws the player's status line from the block's
//! current phase. When it reaches zero the block is demoted or reverted to its
//! vanilla form, and progress/regression timeouts may arm the next regression.

use lumber_blocks::Phase;
use lumber_geom::BlockPos;
use lumber_runtime::TimerId;
use lumber_world::{BlockView, Host, PlayerAccess, PlayerId};

use crate::capitator::{Capitator, Task};
use crate::display::{self, compose_display};
use crate::keys::{CountdownKey, TimerSlot};

pub(crate) const TIMEOUT_SOUND: &str = "random.break";

#[derive(Clone, Debug)]
pub struct CountdownEntry {
    /// Whole seconds left.
    pub remaining: u32,
    pub timer: TimerId,
    pub type_id: String,
    pub pos: BlockPos,
    pub phase_at_start: Phase,
    pub mode: TimerSlot,
    /// Firings so far.
    pub ticks: u32,
    /// Whether a timeout may arm a regression.
    pub cascade: bool,
    pub armed_at: u64,
}

/// Which countdown a player is currently shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchRecord {
    pub key: CountdownKey,
    pub type_id: String,
    pub mode: TimerSlot,
    pub started_tick: u64,
}

/// Sneaking and still connected.
pub(crate) fn posture_ok(host: &impl PlayerAccess, player: &PlayerId) -> bool {
    host.is_valid(player) && host.is_sneaking(player)
}

impl Capitator {
    fn duration_of(&self, slot: TimerSlot) -> u32 {
        let t = &self.config.timing;
        match slot {
            TimerSlot::Conversion => t.conversion_secs,
            TimerSlot::Progress => t.progress_secs,
            TimerSlot::Regression => t.regression_secs,
        }
    }

    /// Starts the countdown for `key`, replacing any live one under the same
    /// key.
    pub(crate) fn arm(&mut self, key: CountdownKey, type_id: &str, phase: Phase, cascade: bool) {
        self.cancel_countdown(&key);
        let secs = self.duration_of(key.slot);
        let now = self.tasks.now();
        let timer = self.tasks.emit_every(1, Task::Countdown(key.clone()));
        log::debug!(
            target: "countdown",
            "arm {} for {}s at phase {} (timer {})",
            key,
            secs,
            phase,
            timer
        );
        self.state.countdowns.insert(
            key.clone(),
            CountdownEntry {
                remaining: secs,
                timer,
                type_id: type_id.to_string(),
                pos: key.pos,
                phase_at_start: phase,
                mode: key.slot,
                ticks: 0,
                cascade,
                armed_at: now,
            },
        );
        self.state.watch.insert(
            key.player.clone(),
            WatchRecord {
                key: key.clone(),
                type_id: type_id.to_string(),
                mode: key.slot,
                started_tick: now,
            },
        );
    }

    /// Idempotent. Does not touch the watch index; callers re-sync it.
    pub(crate) fn cancel_countdown(&mut self, key: &CountdownKey) -> bool {
        match self.state.countdowns.remove(key) {
            Some(entry) => {
                self.tasks.cancel(entry.timer);
                log::debug!(target: "countdown", "cancel {} (timer {})", key, entry.timer);
                true
            }
            None => false,
        }
    }

    /// Cancels the conversion, progress and regression countdowns of one
    /// player on one block, then re-syncs that player's watch entry.
    pub(crate) fn cancel_all_slots(&mut self, pos: BlockPos, player: &PlayerId) {
        for key in CountdownKey::all_slots(pos, player) {
            self.cancel_countdown(&key);
        }
        self.sync_watch(player);
    }

    /// Points the player's watch entry at their newest live countdown, or
    /// drops it when they have none.
    pub(crate) fn sync_watch(&mut self, player: &PlayerId) {
        if let Some(rec) = self.state.watch.get(player) {
            if self.state.countdowns.contains_key(&rec.key) {
                return;
            }
        }
        let newest = self
            .state
            .countdowns
            .iter()
            .filter(|(k, _)| k.player == *player)
            .max_by_key(|(k, e)| (e.armed_at, k.slot))
            .map(|(k, e)| WatchRecord {
                key: k.clone(),
                type_id: e.type_id.clone(),
                mode: e.mode,
                started_tick: e.armed_at,
            });
        match newest {
            Some(rec) => {
                self.state.watch.insert(player.clone(), rec);
            }
            None => {
                self.state.watch.remove(player);
            }
        }
    }

    pub(crate) fn on_countdown_tick<H: Host>(&mut self, host: &mut H, timer: TimerId, key: &CountdownKey) {
        let tps = self.config.timing.ticks_per_second.max(1);
        let Some(entry) = self.state.countdowns.get_mut(key) else {
            self.tasks.cancel(timer);
            return;
        };
        if entry.timer != timer {
            // replaced under the same key; the old timer is already cancelled
            return;
        }
        if key.slot.warns_on_unsneak() && host.is_valid(&key.player) && !host.is_sneaking(&key.player) {
            host.set_status(&key.player, display::UNSNEAK_WARNING);
        }
        entry.ticks += 1;
        if entry.ticks % tps != 0 {
            return;
        }
        entry.remaining = entry.remaining.saturating_sub(1);
        let remaining = entry.remaining;
        let phase = host
            .block(key.pos)
            .map(|b| b.phase_or_zero())
            .unwrap_or(Phase::ZERO);
        host.set_status(&key.player, &compose_display(key.slot, remaining, phase));
        log::trace!(target: "countdown", "{} {}s left", key, remaining);
        if remaining == 0 {
            self.on_timeout(host, key);
        }
    }

    fn on_timeout<H: Host>(&mut self, host: &mut H, key: &CountdownKey) {
        let Some(entry) = self.state.countdowns.remove(key) else {
            return;
        };
        self.tasks.cancel(entry.timer);

        let ns = &self.config.namespaces;
        let block = match host.block(key.pos) {
            Some(b) if ns.is_custom_log(&b.type_id) => b,
            _ => {
                log::debug!(target: "countdown", "timeout {}: block is gone, dropped", key);
                self.sync_watch(&key.player);
                return;
            }
        };
        let phase = block.phase_or_zero();
        let player = &key.player;
        log::debug!(target: "countdown", "timeout {} at phase {}", key, phase);

        match key.slot {
            TimerSlot::Conversion => {
                self.revert_to_vanilla(host, key.pos, &block);
                host.set_status(player, display::CONVERSION_TIMED_OUT);
            }
            TimerSlot::Progress if phase.get() <= 1 => {
                self.revert_to_vanilla(host, key.pos, &block);
                host.set_status(player, display::PROGRESS_TIMED_OUT);
            }
            TimerSlot::Progress => {
                let to = phase.demoted().unwrap_or(Phase::ZERO);
                if self.demote(host, key.pos, to) {
                    host.set_status(player, &display::phase_dropped(to));
                    if entry.cascade {
                        self.rearm_regression(host, key, &block.type_id);
                    }
                }
            }
            TimerSlot::Regression => {
                let to = if phase.get() > 1 {
                    phase.demoted().unwrap_or(Phase::ZERO)
                } else {
                    Phase::ZERO
                };
                if to == Phase::ZERO {
                    self.revert_to_vanilla(host, key.pos, &block);
                    host.set_status(player, display::CASCADE_FINISHED);
                    log::debug!(target: "countdown", "cascade {} ended in a revert", key);
                } else if self.demote(host, key.pos, to) {
                    host.set_status(player, &display::cascade_dropped(to));
                    if entry.cascade {
                        self.rearm_regression(host, key, &block.type_id);
                    }
                }
            }
        }
        host.play_sound(player, TIMEOUT_SOUND, None, 1.0);
        self.sync_watch(player);
    }

    /// Arms the regression countdown if the block still has progress left
    /// after the demotion.
    fn rearm_regression<H: Host>(&mut self, host: &H, key: &CountdownKey, type_id: &str) {
        let now = host.block(key.pos).map(|b| b.phase_or_zero()).unwrap_or(Phase::ZERO);
        if now.get() > 0 {
            self.arm(key.with_slot(TimerSlot::Regression), type_id, now, true);
        }
    }

    /// False when the host refused the write; the cascade stops there.
    fn demote<H: Host>(&self, host: &mut H, pos: BlockPos, to: Phase) -> bool {
        match host.set_phase(pos, to) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("failed to demote {} to phase {}: {}", pos, to, e);
                false
            }
        }
    }

    pub(crate) fn revert_to_vanilla<H: Host>(&self, host: &mut H, pos: BlockPos, block: &BlockView) {
        let vanilla = self.config.namespaces.to_vanilla(&block.type_id);
        if let Err(e) = host.set_type(pos, &vanilla) {
            log::warn!("failed to revert {} to {}: {}", pos, vanilla, e);
        }
    }
}
