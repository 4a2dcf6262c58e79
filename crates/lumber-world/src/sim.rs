//! In-memory host used by tests and the headless simulator.
//!
//! Every write is recorded in [`SimHost::writes`] so callers can assert on
//! ordering, and individual positions can be made to reject writes to
//! exercise the degraded paths.

pub mod store;
pub mod trees;

use std::collections::{HashMap, HashSet};

use lumber_blocks::{Phase, is_loggable};
use lumber_geom::BlockPos;

use crate::{
    BlockAccess, BlockView, GameMode, HostError, ItemStack, MarkerStore, PlayerAccess, PlayerId,
};
use store::{BlockStore, StoredBlock};
pub use trees::{TreeShape, tree_blocks};

#[derive(Clone, Debug, PartialEq)]
pub struct SoundCue {
    pub name: String,
    pub at: Option<BlockPos>,
    pub pitch: f32,
}

#[derive(Clone, Debug)]
pub struct SimPlayer {
    pub valid: bool,
    pub sneaking: bool,
    pub mode: GameMode,
    pub held: Option<ItemStack>,
    /// Every status line shown, oldest first.
    pub status: Vec<String>,
    pub sounds: Vec<SoundCue>,
}

impl Default for SimPlayer {
    fn default() -> Self {
        Self {
            valid: true,
            sneaking: false,
            mode: GameMode::Survival,
            held: None,
            status: Vec::new(),
            sounds: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Write {
    SetType { pos: BlockPos, type_id: String },
    SetPhase { pos: BlockPos, phase: Phase },
    Destroy { pos: BlockPos },
}

impl Write {
    pub fn pos(&self) -> BlockPos {
        match self {
            Write::SetType { pos, .. } | Write::SetPhase { pos, .. } | Write::Destroy { pos } => {
                *pos
            }
        }
    }
}

pub struct SimHost {
    blocks: BlockStore,
    air: String,
    phased_prefix: String,
    min_y: i32,
    max_y: i32,
    players: HashMap<PlayerId, SimPlayer>,
    markers: HashSet<BlockPos>,
    rejected: HashSet<BlockPos>,
    pub writes: Vec<Write>,
    pub particles: usize,
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimHost {
    pub fn new() -> Self {
        Self {
            blocks: BlockStore::new(16),
            air: "minecraft:air".into(),
            phased_prefix: "rtc:".into(),
            min_y: -64,
            max_y: 320,
            players: HashMap::new(),
            markers: HashSet::new(),
            rejected: HashSet::new(),
            writes: Vec::new(),
            particles: 0,
        }
    }

    /// Namespace whose loggable blocks carry a phase state.
    pub fn with_custom_namespace(mut self, prefix: impl Into<String>) -> Self {
        self.phased_prefix = prefix.into();
        self
    }

    #[inline]
    fn loaded(&self, pos: BlockPos) -> bool {
        pos.y >= self.min_y && pos.y < self.max_y
    }

    fn phased(&self, type_id: &str) -> bool {
        type_id.starts_with(&self.phased_prefix) && is_loggable(type_id)
    }

    fn check_write(&self, pos: BlockPos) -> Result<(), HostError> {
        if !self.loaded(pos) {
            return Err(HostError::Missing(pos));
        }
        if self.rejected.contains(&pos) {
            return Err(HostError::Rejected {
                pos,
                reason: "position is write-protected".into(),
            });
        }
        Ok(())
    }

    // --- world setup (not recorded) ---

    pub fn place(&mut self, pos: BlockPos, type_id: &str) {
        if type_id == self.air {
            self.blocks.remove(pos);
            return;
        }
        let phase = self.phased(type_id).then_some(Phase::ZERO);
        self.blocks.set(
            pos,
            StoredBlock {
                type_id: type_id.to_string(),
                phase,
            },
        );
    }

    pub fn place_custom(&mut self, pos: BlockPos, type_id: &str, phase: Phase) {
        self.blocks.set(
            pos,
            StoredBlock {
                type_id: type_id.to_string(),
                phase: Some(phase),
            },
        );
    }

    /// Plants a tree on a dirt block and returns its trunk positions.
    pub fn plant_tree(&mut self, base: BlockPos, shape: &TreeShape) -> Vec<BlockPos> {
        self.place(base.down(1), "minecraft:dirt");
        let mut trunk = Vec::new();
        for (p, id) in tree_blocks(base, shape) {
            if id == shape.log_id {
                trunk.push(p);
            }
            self.place(p, &id);
        }
        trunk
    }

    pub fn reject_writes_at(&mut self, pos: BlockPos) {
        self.rejected.insert(pos);
    }

    pub fn accept_writes_at(&mut self, pos: BlockPos) {
        self.rejected.remove(&pos);
    }

    // --- inspection ---

    pub fn type_at(&self, pos: BlockPos) -> String {
        self.blocks
            .get(pos)
            .map(|b| b.type_id.clone())
            .unwrap_or_else(|| self.air.clone())
    }

    pub fn phase_at(&self, pos: BlockPos) -> Option<Phase> {
        self.blocks.get(pos).and_then(|b| b.phase)
    }

    pub fn count_matching(&self, pred: impl Fn(&str) -> bool) -> usize {
        self.blocks.count_where(pred)
    }

    pub fn destroyed_positions(&self) -> Vec<BlockPos> {
        self.writes
            .iter()
            .filter_map(|w| match w {
                Write::Destroy { pos } => Some(*pos),
                _ => None,
            })
            .collect()
    }

    // --- players ---

    pub fn add_player(&mut self, id: &PlayerId) -> &mut SimPlayer {
        self.players.entry(id.clone()).or_default()
    }

    pub fn player(&self, id: &PlayerId) -> Option<&SimPlayer> {
        self.players.get(id)
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut SimPlayer> {
        self.players.get_mut(id)
    }

    pub fn set_sneaking(&mut self, id: &PlayerId, sneaking: bool) {
        if let Some(p) = self.players.get_mut(id) {
            p.sneaking = sneaking;
        }
    }

    pub fn last_status(&self, id: &PlayerId) -> Option<&str> {
        self.players
            .get(id)
            .and_then(|p| p.status.last())
            .map(String::as_str)
    }

    pub fn sounds_named(&self, id: &PlayerId, name: &str) -> usize {
        self.players
            .get(id)
            .map(|p| p.sounds.iter().filter(|s| s.name == name).count())
            .unwrap_or(0)
    }
}

impl BlockAccess for SimHost {
    fn block(&self, pos: BlockPos) -> Option<BlockView> {
        if !self.loaded(pos) {
            return None;
        }
        Some(match self.blocks.get(pos) {
            Some(b) => BlockView {
                type_id: b.type_id.clone(),
                phase: b.phase,
            },
            None => BlockView::new(self.air.clone()),
        })
    }

    fn set_type(&mut self, pos: BlockPos, type_id: &str) -> Result<(), HostError> {
        self.check_write(pos)?;
        self.place(pos, type_id);
        self.writes.push(Write::SetType {
            pos,
            type_id: type_id.to_string(),
        });
        Ok(())
    }

    fn set_phase(&mut self, pos: BlockPos, phase: Phase) -> Result<(), HostError> {
        self.check_write(pos)?;
        let Some(b) = self.blocks.get_mut(pos) else {
            return Err(HostError::Rejected {
                pos,
                reason: "no block to update".into(),
            });
        };
        if b.phase.is_none() {
            return Err(HostError::Rejected {
                pos,
                reason: format!("{} has no phase state", b.type_id),
            });
        }
        b.phase = Some(phase);
        self.writes.push(Write::SetPhase { pos, phase });
        Ok(())
    }

    fn destroy(&mut self, pos: BlockPos) -> Result<(), HostError> {
        self.check_write(pos)?;
        self.blocks.remove(pos);
        self.writes.push(Write::Destroy { pos });
        Ok(())
    }

    fn spawn_particle(&mut self, _name: &str, _at: [f32; 3]) {
        self.particles += 1;
    }
}

impl PlayerAccess for SimHost {
    fn is_valid(&self, player: &PlayerId) -> bool {
        self.players.get(player).is_some_and(|p| p.valid)
    }

    fn is_sneaking(&self, player: &PlayerId) -> bool {
        self.players.get(player).is_some_and(|p| p.sneaking)
    }

    fn game_mode(&self, player: &PlayerId) -> GameMode {
        self.players
            .get(player)
            .map(|p| p.mode)
            .unwrap_or_default()
    }

    fn set_status(&mut self, player: &PlayerId, text: &str) {
        if let Some(p) = self.players.get_mut(player) {
            p.status.push(text.to_string());
        }
    }

    fn play_sound(&mut self, player: &PlayerId, sound: &str, at: Option<BlockPos>, pitch: f32) {
        if let Some(p) = self.players.get_mut(player) {
            p.sounds.push(SoundCue {
                name: sound.to_string(),
                at,
                pitch,
            });
        }
    }

    fn held_item(&self, player: &PlayerId) -> Option<ItemStack> {
        self.players.get(player).and_then(|p| p.held.clone())
    }

    fn set_held_item(&mut self, player: &PlayerId, item: Option<ItemStack>) -> Result<(), HostError> {
        let p = self
            .players
            .get_mut(player)
            .ok_or_else(|| HostError::UnknownPlayer(player.clone()))?;
        p.held = item;
        Ok(())
    }
}

impl MarkerStore for SimHost {
    fn marker(&self, pos: BlockPos) -> bool {
        self.markers.contains(&pos)
    }

    fn set_marker(&mut self, pos: BlockPos) {
        self.markers.insert(pos);
    }

    fn clear_marker(&mut self, pos: BlockPos) {
        self.markers.remove(&pos);
    }
}
