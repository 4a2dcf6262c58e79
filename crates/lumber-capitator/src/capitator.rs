use hashbrown::HashMap;
use lumber_geom::BlockPos;
use lumber_runtime::TaskQueue;
use lumber_world::{Host, PlayerId};

use crate::config::CapitatorConfig;
use crate::countdown::{CountdownEntry, WatchRecord};
use crate::destroy::{self, DestroyReport, Destroyer};
use crate::keys::CountdownKey;

/// Work scheduled on the tick queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Task {
    /// Per-tick firing of a repeating countdown.
    Countdown(CountdownKey),
    /// Leaf queued by a destroy sweep.
    ClearLeaf(BlockPos),
    /// A parked destroy run starts its next batch.
    ResumeDestroy(u64),
}

/// Everything the capitator remembers between events.
#[derive(Default)]
pub struct CapitatorState {
    pub(crate) countdowns: HashMap<CountdownKey, CountdownEntry>,
    pub(crate) active_trees: HashMap<PlayerId, BlockPos>,
    pub(crate) watch: HashMap<PlayerId, WatchRecord>,
}

impl CapitatorState {
    /// Every watch entry names a countdown its player owns, and every player
    /// owning a countdown is watched.
    pub fn is_consistent(&self) -> bool {
        let watched_ok = self.watch.iter().all(|(player, rec)| {
            rec.key.player == *player && self.countdowns.contains_key(&rec.key)
        });
        let owners_ok = self
            .countdowns
            .keys()
            .all(|key| self.watch.contains_key(&key.player));
        watched_ok && owners_ok
    }

    pub fn clear(&mut self) {
        self.countdowns.clear();
        self.active_trees.clear();
        self.watch.clear();
    }
}

/// Tree capitator driven by host events and the host tick loop.
///
/// All mutation goes through the `on_*` handlers and [`Capitator::tick`];
/// none of them return errors. Host write failures are logged and the
/// handler carries on.
pub struct Capitator {
    pub(crate) config: CapitatorConfig,
    pub(crate) state: CapitatorState,
    pub(crate) tasks: TaskQueue<Task>,
    pub(crate) destroyer: Destroyer,
}

impl Capitator {
    pub fn new(config: CapitatorConfig) -> Self {
        Self {
            config,
            state: CapitatorState::default(),
            tasks: TaskQueue::new(),
            destroyer: Destroyer::new(),
        }
    }

    pub fn config(&self) -> &CapitatorConfig {
        &self.config
    }

    pub fn state(&self) -> &CapitatorState {
        &self.state
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.tasks.now()
    }

    /// Runs everything due this tick, then steps destroy runs within the
    /// per-tick job budget.
    pub fn tick<H: Host>(&mut self, host: &mut H) {
        while let Some(env) = self.tasks.pop_ready() {
            match env.payload {
                Task::Countdown(key) => self.on_countdown_tick(host, env.id, &key),
                Task::ClearLeaf(pos) => destroy::clear_leaf(host, pos),
                Task::ResumeDestroy(run) => self.destroyer.resume(run),
            }
        }
        self.destroyer
            .run(host, &mut self.tasks, &self.config.destroy);
        self.tasks.advance_tick();
    }

    /// World teardown: every timer, queued task, destroy run and map entry is
    /// dropped.
    pub fn clear(&mut self) {
        let timers = self.state.countdowns.len();
        let runs = self.destroyer.in_flight();
        self.tasks.clear();
        self.destroyer.clear();
        self.state.clear();
        log::info!(
            "capitator cleared: {} countdown(s), {} destroy run(s) dropped",
            timers,
            runs
        );
    }

    pub fn countdown(&self, key: &CountdownKey) -> Option<&CountdownEntry> {
        self.state.countdowns.get(key)
    }

    /// Countdowns still ticking.
    pub fn live_countdowns(&self) -> usize {
        self.state.countdowns.len()
    }

    pub fn active_tree(&self, player: &PlayerId) -> Option<BlockPos> {
        self.state.active_trees.get(player).copied()
    }

    pub fn watch(&self, player: &PlayerId) -> Option<&WatchRecord> {
        self.state.watch.get(player)
    }

    /// Map invariants plus: each countdown's timer is still scheduled.
    pub fn is_consistent(&self) -> bool {
        self.state.is_consistent()
            && self
                .state
                .countdowns
                .values()
                .all(|e| self.tasks.is_live(e.timer))
    }

    pub fn destroy_runs_in_flight(&self) -> usize {
        self.destroyer.in_flight()
    }

    pub fn take_destroy_reports(&mut self) -> Vec<DestroyReport> {
        self.destroyer.take_reports()
    }

    /// Nothing left to do: no countdowns, no runs, no queued tasks.
    pub fn is_idle(&self) -> bool {
        self.state.countdowns.is_empty()
            && self.destroyer.in_flight() == 0
            && self.tasks.live_len() == 0
    }
}
