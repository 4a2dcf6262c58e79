//! Scripted play sessions against the in-memory host.

use lumber_blocks::{Phase, is_leaf, is_loggable};
use lumber_capitator::{BlockBroken, BreakDecision, Capitator, CapitatorConfig};
use lumber_geom::BlockPos;
use lumber_world::sim::{SimHost, TreeShape};
use lumber_world::{BlockAccess, ItemStack, PlayerId};

/// Ticks between two hits of a player working a tree.
const HIT_INTERVAL: u32 = 8;
/// Upper bound for waiting on timers and destroy runs.
const SETTLE_LIMIT: u32 = 20_000;

#[derive(Debug)]
pub struct Summary {
    pub scenario: &'static str,
    pub ticks: u64,
    pub passed: bool,
    pub notes: Vec<String>,
}

struct Session {
    cap: Capitator,
    host: SimHost,
    player: PlayerId,
    shown: usize,
}

impl Session {
    fn new(config: CapitatorConfig) -> Self {
        let host = SimHost::new().with_custom_namespace(config.namespaces.custom.clone());
        let mut session = Self {
            cap: Capitator::new(config),
            host,
            player: PlayerId::new("sim"),
            shown: 0,
        };
        let p = session.host.add_player(&session.player);
        p.sneaking = true;
        p.held = Some(ItemStack::tool("minecraft:iron_axe", 250));
        session
    }

    fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.cap.tick(&mut self.host);
            self.echo_status();
        }
    }

    /// Ticks until nothing is scheduled any more. Returns false on timeout.
    fn settle(&mut self) -> bool {
        for _ in 0..SETTLE_LIMIT {
            if self.cap.is_idle() {
                return true;
            }
            self.cap.tick(&mut self.host);
            self.echo_status();
        }
        self.cap.is_idle()
    }

    fn hit(&mut self, pos: BlockPos) -> BreakDecision {
        let decision = self.cap.on_break_attempt(&mut self.host, &self.player, pos);
        self.echo_status();
        decision
    }

    /// The host side of a break the capitator allowed.
    fn break_block(&mut self, pos: BlockPos) {
        let Some(broken) = self.host.block(pos) else {
            return;
        };
        if let Err(e) = self.host.destroy(pos) {
            log::warn!("host could not break {}: {}", pos, e);
            return;
        }
        self.cap.on_break_completed(
            &mut self.host,
            &BlockBroken {
                player: self.player.clone(),
                pos,
                broken,
            },
        );
    }

    fn echo_status(&mut self) {
        let Some(p) = self.host.player(&self.player) else {
            return;
        };
        for line in &p.status[self.shown..] {
            log::info!("[{}] {}", self.cap.now(), strip_format(line));
        }
        self.shown = p.status.len();
    }

    fn phase(&self, pos: BlockPos) -> Option<Phase> {
        self.host.phase_at(pos)
    }
}

/// Drops `§x` formatting codes.
fn strip_format(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c == '§' {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

pub fn fell(config: CapitatorConfig, species: &str, trunk: i32, canopy: i32, fungus: bool) -> Summary {
    let mut s = Session::new(config);
    let base = BlockPos::new(0, 64, 0);
    let shape = if fungus {
        TreeShape::fungus(species, trunk, canopy)
    } else {
        TreeShape::overworld(species, trunk, canopy)
    };
    let logs = s.host.plant_tree(base, &shape).len();
    log::info!("planted {} with {} trunk block(s) at {}", shape.log_id, logs, base);

    let mut notes = Vec::new();
    let mut passed = true;
    while !s.phase(base).is_some_and(Phase::is_terminal) {
        if s.hit(base) != BreakDecision::Cancel {
            notes.push(format!("hit at phase {:?} was not taken", s.phase(base)));
            passed = false;
            break;
        }
        s.run(HIT_INTERVAL);
    }
    if passed {
        if s.hit(base) == BreakDecision::Allow {
            s.break_block(base);
        } else {
            notes.push("terminal hit was cancelled".into());
            passed = false;
        }
    }
    let settled = s.settle();

    let logs_left = s.host.count_matching(is_loggable);
    let leaves_left = s.host.count_matching(is_leaf);
    for r in s.cap.take_destroy_reports() {
        notes.push(format!(
            "run {}: {} log(s), {} batch(es), {} leaf removal(s)",
            r.run, r.logs_destroyed, r.batches, r.leaves_scheduled
        ));
    }
    notes.push(format!("{} log(s) and {} leaf block(s) left", logs_left, leaves_left));
    if let Some(axe) = s.host.player(&s.player).and_then(|p| p.held.as_ref()) {
        if let Some(d) = axe.durability {
            notes.push(format!("axe wear {}/{}", d.damage, d.max));
        }
    }
    Summary {
        scenario: "fell",
        ticks: s.cap.now(),
        passed: passed && settled && logs_left == 0,
        notes,
    }
}

pub fn abandon(config: CapitatorConfig, phase: u8, species: &str) -> Summary {
    let mut s = Session::new(config);
    let base = BlockPos::new(0, 64, 0);
    let shape = TreeShape::overworld(species, 5, 2);
    s.host.plant_tree(base, &shape);

    let target = Phase::new(phase);
    let mut passed = s.hit(base) == BreakDecision::Cancel;
    while passed && s.phase(base).is_some_and(|p| p < target) {
        s.run(HIT_INTERVAL);
        passed = s.hit(base) == BreakDecision::Cancel;
    }
    log::info!("walking away at phase {:?}", s.phase(base));
    let settled = s.settle();

    let reverted = s.host.type_at(base) == shape.log_id;
    Summary {
        scenario: "abandon",
        ticks: s.cap.now(),
        passed: passed && settled && reverted,
        notes: vec![format!("block is {} again: {}", shape.log_id, reverted)],
    }
}

pub fn switch(config: CapitatorConfig) -> Summary {
    let mut s = Session::new(config);
    let shape = TreeShape::overworld("birch", 5, 2);
    let a = BlockPos::new(0, 64, 0);
    let b = BlockPos::new(12, 64, 0);
    s.host.plant_tree(a, &shape);
    s.host.plant_tree(b, &shape);

    let mut notes = Vec::new();
    s.hit(a);
    s.run(HIT_INTERVAL);
    s.hit(a);
    s.run(HIT_INTERVAL);
    notes.push(format!("tree A at phase {:?}", s.phase(a)));

    s.hit(b);
    let a_reverted = s.host.type_at(a) == shape.log_id;
    let b_active = s.cap.active_tree(&s.player) == Some(b);
    notes.push(format!("switched to B: A reverted {}, B active {}", a_reverted, b_active));

    s.run(HIT_INTERVAL);
    s.hit(b);
    s.run(HIT_INTERVAL);
    s.hit(a);
    let b_reverted = s.host.type_at(b) == shape.log_id;
    notes.push(format!("back to A: B reverted {}", b_reverted));
    let settled = s.settle();

    Summary {
        scenario: "switch",
        ticks: s.cap.now(),
        passed: a_reverted && b_active && b_reverted && settled,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenarios_pass_with_defaults() {
        let felled = fell(CapitatorConfig::default(), "oak", 6, 2, false);
        assert!(felled.passed, "{:?}", felled.notes);
        let stem = fell_fungus();
        assert!(stem.passed, "{:?}", stem.notes);
        for phase in 0..=4 {
            let run = abandon(CapitatorConfig::default(), phase, "spruce");
            assert!(run.passed, "phase {}: {:?}", phase, run.notes);
        }
        let sw = switch(CapitatorConfig::default());
        assert!(sw.passed, "{:?}", sw.notes);
    }

    fn fell_fungus() -> Summary {
        fell(CapitatorConfig::default(), "warped", 7, 2, true)
    }

    #[test]
    fn format_codes_are_stripped() {
        assert_eq!(strip_format("§a██§7░░ §e⏱ 10s§r"), "██░░ ⏱ 10s");
    }
}
