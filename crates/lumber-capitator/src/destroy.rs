//! Whole-tree destruction once the last trunk block is broken.
//!
//! A run walks connected trunk blocks depth-first from the broken block,
//! destroying each one and queueing delayed leaf removal around it. The walk
//! is an explicit continuation ([`DestroyRun`]) stepped by the job queue, so
//! no single tick does more than its step budget. After `batch_cap` trunk
//! blocks the run parks and is resumed `batch_delay_ticks` later.

use hashbrown::{HashMap, HashSet};
use lumber_blocks::{is_leaf, is_loggable, is_stem_family};
use lumber_geom::{BlockPos, NEIGHBOR_OFFSETS};
use lumber_runtime::{JobQueue, JobStep, TaskQueue};
use lumber_world::{BlockAccess, Host, PlayerId};

use crate::capitator::Task;
use crate::config::Destroy;
use crate::radius::{LeafRadius, RadiusScan, ScanStep};

pub const FELL_SOUND: &str = "dig.wood";
pub const FELL_PITCH: f32 = 1.3;

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestroyReport {
    pub run: u64,
    pub player: PlayerId,
    pub origin: BlockPos,
    pub logs_destroyed: usize,
    pub batches: usize,
    pub leaves_scheduled: usize,
}

#[derive(Clone, Debug)]
enum Stage {
    /// Pick the next trunk block off the pending stack.
    Expand,
    /// Measure the leaf radius around a trunk block just destroyed.
    Scan(RadiusScan),
    /// Queue leaf removal one X row at a time.
    Sweep {
        center: BlockPos,
        radius: LeafRadius,
        ox: i32,
    },
}

#[derive(Clone, Debug)]
pub struct DestroyRun {
    id: u64,
    player: PlayerId,
    origin: BlockPos,
    clear_leaves: bool,
    visited: HashSet<BlockPos>,
    pending: Vec<BlockPos>,
    stage: Stage,
    batch_destroyed: usize,
    batches: usize,
    logs_destroyed: usize,
    leaves_scheduled: usize,
}

impl DestroyRun {
    /// `broken_type` is the id the origin had before the host broke it; stems
    /// never clear leaves.
    pub fn new(id: u64, player: PlayerId, origin: BlockPos, broken_type: &str) -> Self {
        let mut run = Self {
            id,
            player,
            origin,
            clear_leaves: !is_stem_family(broken_type),
            visited: HashSet::new(),
            pending: Vec::new(),
            stage: Stage::Expand,
            batch_destroyed: 0,
            batches: 1,
            logs_destroyed: 0,
            leaves_scheduled: 0,
        };
        run.visited.insert(origin);
        run.push_neighbors(origin);
        run
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn logs_destroyed(&self) -> usize {
        self.logs_destroyed
    }

    fn push_neighbors(&mut self, at: BlockPos) {
        // reversed so the first table direction is popped first
        for off in NEIGHBOR_OFFSETS.iter().rev() {
            let p = at + *off;
            if !self.visited.contains(&p) {
                self.pending.push(p);
            }
        }
    }

    /// Drops pending entries that are not trunk blocks, marking them visited,
    /// until a trunk block is on top, which is returned without popping it.
    fn next_log(&mut self, world: &impl BlockAccess) -> Option<BlockPos> {
        while let Some(&p) = self.pending.last() {
            if self.visited.contains(&p) {
                self.pending.pop();
                continue;
            }
            match world.block(p) {
                Some(b) if is_loggable(&b.type_id) => return Some(p),
                _ => {
                    self.visited.insert(p);
                    self.pending.pop();
                }
            }
        }
        None
    }

    fn begin_batch(&mut self) {
        self.batch_destroyed = 0;
        self.batches += 1;
    }

    pub(crate) fn step<H: Host>(
        &mut self,
        host: &mut H,
        tasks: &mut TaskQueue<Task>,
        cfg: &Destroy,
    ) -> JobStep {
        match &mut self.stage {
            Stage::Expand => {
                let Some(p) = self.next_log(&*host) else {
                    return JobStep::Done;
                };
                if self.batch_destroyed >= cfg.batch_cap.max(1) {
                    log::debug!(
                        target: "destroy",
                        "run {} parks after batch {} ({} pending)",
                        self.id,
                        self.batches,
                        self.pending.len()
                    );
                    return JobStep::Park;
                }
                self.pending.pop();
                self.visited.insert(p);
                self.batch_destroyed += 1;
                match host.destroy(p) {
                    Ok(()) => self.logs_destroyed += 1,
                    Err(e) => log::warn!("destroy run {}: failed to fell {}: {}", self.id, p, e),
                }
                self.push_neighbors(p);
                if self.clear_leaves {
                    self.stage = Stage::Scan(RadiusScan::new(
                        p,
                        cfg.scan_half_extent,
                        cfg.default_leaf_radius,
                    ));
                }
                JobStep::Yield
            }
            Stage::Scan(scan) => {
                if let ScanStep::Done(radius) = scan.step(&*host) {
                    // a zero radius still sweeps the trunk's own column
                    self.stage = Stage::Sweep {
                        center: scan.center(),
                        radius,
                        ox: -radius.x,
                    };
                }
                JobStep::Yield
            }
            Stage::Sweep { center, radius, ox } => {
                let (center, radius, row) = (*center, *radius, *ox);
                let reach = cfg.leaf_vertical_reach.max(0);
                for oz in -radius.z..=radius.z {
                    for oy in -reach..=reach {
                        let p = center.offset(row, oy, oz);
                        if !host.block(p).is_some_and(|b| is_leaf(&b.type_id)) {
                            continue;
                        }
                        let delay = center.horizontal_manhattan(p) as u64 + cfg.leaf_delay_base;
                        tasks.emit_after(delay, Task::ClearLeaf(p));
                        self.leaves_scheduled += 1;
                    }
                }
                self.stage = if row >= radius.x {
                    Stage::Expand
                } else {
                    Stage::Sweep {
                        center,
                        radius,
                        ox: row + 1,
                    }
                };
                JobStep::Yield
            }
        }
    }

    fn report(&self) -> DestroyReport {
        DestroyReport {
            run: self.id,
            player: self.player.clone(),
            origin: self.origin,
            logs_destroyed: self.logs_destroyed,
            batches: self.batches,
            leaves_scheduled: self.leaves_scheduled,
        }
    }
}

/// Removes a leaf queued by a sweep if it is still a leaf.
pub(crate) fn clear_leaf(world: &mut impl BlockAccess, pos: BlockPos) {
    if !world.block(pos).is_some_and(|b| is_leaf(&b.type_id)) {
        return;
    }
    if let Err(e) = world.destroy(pos) {
        log::warn!("failed to clear leaf at {}: {}", pos, e);
    }
}

/// Owns every destruction run: the ones being stepped and the parked ones
/// waiting for their next batch.
#[derive(Default)]
pub struct Destroyer {
    jobs: JobQueue<DestroyRun>,
    parked: HashMap<u64, DestroyRun>,
    next_run: u64,
    reports: Vec<DestroyReport>,
}

impl Destroyer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start<H: Host>(
        &mut self,
        host: &mut H,
        player: &PlayerId,
        origin: BlockPos,
        broken_type: &str,
    ) -> u64 {
        self.next_run += 1;
        let id = self.next_run;
        host.play_sound(player, FELL_SOUND, Some(origin), FELL_PITCH);
        log::info!(
            "destroy run {} started by {} at {} ({})",
            id,
            player,
            origin,
            broken_type
        );
        self.jobs
            .push(DestroyRun::new(id, player.clone(), origin, broken_type));
        id
    }

    /// Steps runs under `cfg.job_steps_per_tick`; runs that hit the batch cap
    /// get a resume task `batch_delay_ticks` out.
    pub(crate) fn run<H: Host>(&mut self, host: &mut H, tasks: &mut TaskQueue<Task>, cfg: &Destroy) {
        if self.jobs.is_empty() {
            return;
        }
        let mut parked = Vec::new();
        let mut finished = Vec::new();
        let stats = self
            .jobs
            .run(cfg.job_steps_per_tick.max(1), &mut parked, |run| {
                let step = run.step(host, tasks, cfg);
                if step == JobStep::Done {
                    finished.push(run.report());
                }
                step
            });
        log::trace!(
            target: "destroy",
            "{} step(s), {} finished, {} parked",
            stats.steps,
            stats.finished,
            stats.parked
        );
        for run in parked {
            tasks.emit_after(cfg.batch_delay_ticks, Task::ResumeDestroy(run.id));
            self.parked.insert(run.id, run);
        }
        for report in finished {
            log::info!(
                "destroy run {} finished: {} log(s) in {} batch(es), {} leaf removal(s) queued",
                report.run,
                report.logs_destroyed,
                report.batches,
                report.leaves_scheduled
            );
            self.reports.push(report);
        }
    }

    pub(crate) fn resume(&mut self, run_id: u64) {
        let Some(mut run) = self.parked.remove(&run_id) else {
            log::debug!(target: "destroy", "run {} is gone; resume ignored", run_id);
            return;
        };
        run.begin_batch();
        log::debug!(target: "destroy", "run {} resumes with batch {}", run_id, run.batches);
        self.jobs.push(run);
    }

    /// Runs either stepping or parked.
    pub fn in_flight(&self) -> usize {
        self.jobs.len() + self.parked.len()
    }

    pub fn take_reports(&mut self) -> Vec<DestroyReport> {
        std::mem::take(&mut self.reports)
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
        self.parked.clear();
        self.reports.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumber_world::sim::SimHost;

    fn drive(host: &mut SimHost, run: &mut DestroyRun, cfg: &Destroy) -> (JobStep, usize) {
        let mut tasks = TaskQueue::new();
        let mut steps = 0;
        loop {
            steps += 1;
            match run.step(host, &mut tasks, cfg) {
                JobStep::Yield => continue,
                other => return (other, steps),
            }
        }
    }

    #[test]
    fn parks_at_batch_cap_only_when_more_logs_remain() {
        let mut host = SimHost::new();
        let origin = BlockPos::new(0, 64, 0);
        for dy in 1..=8 {
            host.place(origin.up(dy), "minecraft:oak_log");
        }
        let cfg = Destroy::default();
        let mut run = DestroyRun::new(1, PlayerId::new("p"), origin, "rtc:oak_log");
        let (step, _) = drive(&mut host, &mut run, &cfg);
        assert_eq!(step, JobStep::Done);
        assert_eq!(run.logs_destroyed(), 8);
        assert_eq!(run.batches(), 1);

        host.place(origin.up(9), "minecraft:oak_log");
        host.place(origin.up(10), "minecraft:oak_log");
        let mut run = DestroyRun::new(2, PlayerId::new("p"), origin.up(8), "rtc:oak_log");
        for dy in 0..8 {
            host.place(origin.up(dy + 9).offset(1, 0, 0), "minecraft:oak_log");
        }
        let (step, _) = drive(&mut host, &mut run, &cfg);
        assert_eq!(step, JobStep::Park);
        assert_eq!(run.logs_destroyed(), 8);
    }

    #[test]
    fn stems_skip_the_leaf_stages() {
        let mut host = SimHost::new();
        let origin = BlockPos::new(0, 64, 0);
        host.place(origin.up(1), "minecraft:crimson_stem");
        host.place(origin.up(1).offset(1, 0, 0), "minecraft:crimson_wart_block");
        let cfg = Destroy::default();
        let mut run = DestroyRun::new(1, PlayerId::new("p"), origin, "rtc:crimson_stem");
        let (_, steps) = drive(&mut host, &mut run, &cfg);
        // one destroy step, one step that finds nothing left
        assert_eq!(steps, 2);
        assert_eq!(run.report().leaves_scheduled, 0);
    }

    #[test]
    fn zero_radius_sweeps_only_the_trunk_column() {
        let mut host = SimHost::new();
        let origin = BlockPos::new(0, 64, 0);
        let log = origin.up(1);
        host.place(log, "minecraft:birch_log");
        host.place(origin.offset(-2, 1, 0), "minecraft:birch_log");
        host.place(log.up(1), "minecraft:birch_leaves");
        host.place(log.offset(0, 1, 1), "minecraft:birch_leaves");
        let cfg = Destroy::default();
        assert_eq!(
            crate::radius::estimate_leaf_radius(&host, log, cfg.scan_half_extent, cfg.default_leaf_radius),
            LeafRadius::NONE
        );
        let mut run = DestroyRun::new(1, PlayerId::new("p"), origin, "rtc:birch_log");
        let mut tasks = TaskQueue::new();
        while run.step(&mut host, &mut tasks, &cfg) == JobStep::Yield {}
        // the trunk two blocks over is not connected
        assert_eq!(run.logs_destroyed(), 1);
        assert_eq!(run.report().leaves_scheduled, 1);
        assert_eq!(tasks.live_len(), 1);
    }

    #[test]
    fn clear_leaf_only_touches_leaves() {
        let mut host = SimHost::new();
        let leaf = BlockPos::new(0, 70, 0);
        let log = BlockPos::new(1, 70, 0);
        host.place(leaf, "minecraft:oak_leaves");
        host.place(log, "minecraft:oak_log");
        clear_leaf(&mut host, leaf);
        clear_leaf(&mut host, log);
        assert_eq!(host.destroyed_positions(), vec![leaf]);
    }
}
